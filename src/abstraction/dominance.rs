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

use std::sync::Arc;

/// This trait gives the possibility to model dominance relations between the
/// states of a specific problem. The dominance relation is evaluated only for
/// pairs of states that are mapped to the same key.
pub trait Dominance {
    type State;
    type Key;

    /// Takes a state and returns a key that maps it to comparable states.
    /// When `None` is returned, the state is never compared to any other.
    fn get_key(&self, state: &Self::State) -> Option<Self::Key>;

    /// Returns true iff `b` is at least as good as `a` (in which case `a`
    /// can be discarded whenever it is not reached with a better value).
    /// Note: both states are assumed to have the same key.
    fn is_dominated_or_equal(&self, a: &Self::State, b: &Self::State) -> bool;
}

/// The component which keeps track of the non dominated states that have been
/// encountered at each depth, and prunes the states it finds dominated.
pub trait DominanceChecker<State> {
    /// Returns true if the state reached at `depth` with `value` is dominated
    /// by a stored entry. Otherwise, the entry is recorded and the entries it
    /// dominates are forgotten.
    fn is_dominated_or_insert(&self, state: Arc<State>, depth: usize, value: isize) -> bool;
}
