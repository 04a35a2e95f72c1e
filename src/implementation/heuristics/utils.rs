// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provide some convenient utilities to work with used defined heuristics.

use std::cmp::Ordering;

use compare::Compare;

use crate::{SubProblemRanking, SubProblem};

/// This is a thin wrapper to convert a SubProblemRanking into a `Compare`
/// object as is sometimes required (e.g. to configure the order in a binary heap)
#[derive(Debug, Clone, Copy)]
pub struct CompareSubProblem<X:SubProblemRanking>(X);
impl <X:SubProblemRanking> CompareSubProblem<X> {
    pub fn new(x: X) -> Self {
        Self(x)
    }
}
impl <X:SubProblemRanking> Compare<SubProblem<X::State>> for CompareSubProblem<X> {
    fn compare(&self, l: &SubProblem<X::State>, r: &SubProblem<X::State>) -> Ordering {
        self.0.compare(l, r)
    }
}

#[cfg(test)]
mod test {
    use std::{cmp::Ordering, sync::Arc};
    use compare::Compare;
    use crate::{SubProblemRanking, SubProblem, CompareSubProblem};

    struct ByDepth;
    impl SubProblemRanking for ByDepth {
        type State = char;

        fn compare(&self, a: &SubProblem<char>, b: &SubProblem<char>) -> Ordering {
            a.depth.cmp(&b.depth)
        }
    }

    fn sub(state: char, depth: usize) -> SubProblem<char> {
        SubProblem{state: Arc::new(state), value: 0, ub: isize::MAX, path: vec![], depth}
    }

    #[test]
    fn comparesubproblem_delegates_to_the_ranking() {
        let cmp = CompareSubProblem::new(ByDepth);
        assert_eq!(Ordering::Less,    cmp.compare(&sub('z', 1), &sub('a', 2)));
        assert_eq!(Ordering::Greater, cmp.compare(&sub('a', 3), &sub('z', 2)));
        assert_eq!(Ordering::Equal,   cmp.compare(&sub('a', 3), &sub('z', 3)));
    }
}
