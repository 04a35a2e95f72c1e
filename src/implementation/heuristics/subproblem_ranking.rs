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

//! This module provides the implementation of subproblem rankings that are used to
//! set the ordering of the solver frontier.

use std::cmp::Ordering;

use crate::{StateRanking, SubProblemRanking, SubProblem};

/// The MaxUB (maximum upper bound) strategy is one that always selects the node
/// having the highest upper bound in the frontier. In case of equalities, the
/// ties are broken using the length of the longest path and eventually a state
/// ranking.
///
/// # Note
/// The `SimpleFrontier` ranks the nodes on their upper bound before it
/// consults this ranking, so that only its tie breaking matters there.
#[derive(Debug, Clone, Copy)]
pub struct MaxUB<'a, O: StateRanking>(&'a O);
impl <'a, O: StateRanking> MaxUB<'a, O> {
    pub fn new(x: &'a O) -> Self {
        Self(x)
    }
}
impl<O: StateRanking> SubProblemRanking for MaxUB<'_, O> {
    type State = O::State;

    fn compare(&self, l: &SubProblem<O::State>, r: &SubProblem<O::State>) -> Ordering {
        l.ub.cmp(&r.ub)
            .then_with(|| l.value.cmp(&r.value))
            .then_with(|| self.0.compare(&l.state, &r.state))
    }
}

#[cfg(test)]
#[allow(clippy::many_single_char_names)]
mod test_maxub {
    use std::cmp::Ordering;
    use std::sync::Arc;

    use binary_heap_plus::BinaryHeap;

    use crate::*;

    struct CharRanking;
    impl StateRanking for CharRanking {
        type State = char;

        fn compare(&self, a: &Self::State, b: &Self::State) -> Ordering {
            a.cmp(b)
        }
    }

    fn sub(state: char, value: isize, ub: isize) -> SubProblem<char> {
        SubProblem {state: Arc::new(state), value, ub, path: vec![], depth: 0}
    }

    #[test]
    fn example() {
        let nodes = vec![
            sub('a', 42, 300),
            sub('b',  2, 100),
            sub('c', 24, 150),
            sub('d', 13,  60),
            sub('e', 65, 700),
            sub('f', 19, 100),
        ];
        let mut priority_q = BinaryHeap::from_vec_cmp(nodes, CompareSubProblem::new(MaxUB::new(&CharRanking)));

        assert_eq!('e', *priority_q.pop().unwrap().state); // because 700 is the highest upper bound
        assert_eq!('a', *priority_q.pop().unwrap().state); // because 300 is the next highest
        assert_eq!('c', *priority_q.pop().unwrap().state); // idem, because of ub = 150
        assert_eq!('f', *priority_q.pop().unwrap().state); // because ub = 100 but value = 19
        assert_eq!('b', *priority_q.pop().unwrap().state); // because ub = 100 but value = 2
        assert_eq!('d', *priority_q.pop().unwrap().state); // because ub = 60 which is the worst
    }

    #[test]
    fn gt_because_ub() {
        let cmp = MaxUB::new(&CharRanking);
        assert_eq!(Ordering::Greater, cmp.compare(&sub('a', 42, 300), &sub('b', 42, 100)));
    }
    #[test]
    fn gt_because_value() {
        let cmp = MaxUB::new(&CharRanking);
        assert_eq!(Ordering::Greater, cmp.compare(&sub('a', 42, 300), &sub('b', 2, 300)));
    }
    #[test]
    fn lt_because_state() {
        let cmp = MaxUB::new(&CharRanking);
        assert_eq!(Ordering::Less, cmp.compare(&sub('a', 42, 300), &sub('b', 42, 300)));
    }
    #[test]
    fn eq_self() {
        let a = sub('a', 42, 300);
        let cmp = MaxUB::new(&CharRanking);
        assert_eq!(Ordering::Equal, cmp.compare(&a, &a));
    }
}
