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

//! This module provides the implementation of a simple solver frontier (priority queue)

use std::cmp::Ordering;

use binary_heap_plus::BinaryHeap;

use crate::*;

/// The simplest frontier implementation you can think of: is basically consists
/// of a binary heap that pushes an pops frontier nodes
///
/// # Note
/// The solvers stop as soon as the popped node cannot beat the incumbent,
/// which is only sound when the nodes come out by non increasing upper bound.
/// Hence, whatever the ranking it is given, this frontier always pops the
/// node with the largest `ub` first. The ranking only breaks the ties.
pub struct SimpleFrontier<O: SubProblemRanking> {
    heap: BinaryHeap<SubProblem<O::State>, CompareSubProblem<UbFirst<O>>>,
    cutset_type: CutsetType,
}
impl <O> SimpleFrontier<O> where O: SubProblemRanking {
    /// Creates a frontier fed with last exact layer cutsets
    pub fn new(o: O) -> Self {
        Self::with_cutset_type(o, CutsetType::LastExactLayer)
    }
    /// Creates a frontier fed with the given type of cutsets
    pub fn with_cutset_type(o: O, cutset_type: CutsetType) -> Self {
        Self{ heap: BinaryHeap::from_vec_cmp(vec![], CompareSubProblem::new(UbFirst(o))), cutset_type }
    }
}

/// Ranks the subproblems on their upper bound first
struct UbFirst<O>(O);
impl <O> SubProblemRanking for UbFirst<O> where O: SubProblemRanking {
    type State = O::State;

    fn compare(&self, l: &SubProblem<O::State>, r: &SubProblem<O::State>) -> Ordering {
        l.ub.cmp(&r.ub).then_with(|| self.0.compare(l, r))
    }
}
impl <O> Frontier for SimpleFrontier<O> where O: SubProblemRanking {
    type State = O::State;

    fn push(&mut self, node: SubProblem<Self::State>) {
        self.heap.push(node)
    }

    fn pop(&mut self) -> Option<SubProblem<Self::State>> {
        self.heap.pop()
    }

    fn clear(&mut self) {
        self.heap.clear()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn cutset_type(&self) -> CutsetType {
        self.cutset_type
    }
}
