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

//! This module provides the default variable ordering and rough upper bound.

use crate::{VariableHeuristic, Variable, VarSet, FastUpperBound};

/// Branches on the free variables in their natural order: the variable having
/// the smallest index is always decided upon first.
#[derive(Debug, Default, Copy, Clone)]
pub struct NaturalOrder;
impl <X> VariableHeuristic<X> for NaturalOrder {
    fn next_variable(&self, _: usize, free: &VarSet, _: &mut dyn Iterator<Item = &X>) -> Option<Variable> {
        free.iter().next()
    }
}

/// The trivial upper bound: nothing is known about what a state might earn.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoUpperBound;
impl <X> FastUpperBound<X> for NoUpperBound {
    fn fast_upper_bound(&self, _: &X, _: &VarSet) -> isize {
        isize::MAX
    }
}
