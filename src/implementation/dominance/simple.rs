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

use std::{hash::Hash, sync::Arc};
use dashmap::{DashMap, mapref::entry::Entry};

use crate::{Dominance, DominanceChecker};

/// A state along with the length of the longest path known to reach it.
#[derive(Debug)]
struct DominanceEntry<T> {
    state: Arc<T>,
    value: isize,
}

/// Simple implementation of a dominance checker that stores a vector of non-dominated
/// states for each distinct (depth, key) pair.
#[derive(Debug)]
pub struct SimpleDominanceChecker<D>
where
    D: Dominance,
    D::Key: Eq + Hash,
{
    dominance: D,
    data: DashMap<(usize, D::Key), Vec<DominanceEntry<D::State>>, fxhash::FxBuildHasher>,
}

impl<D> SimpleDominanceChecker<D>
where
    D: Dominance,
    D::Key: Eq + Hash,
{
    pub fn new(dominance: D) -> Self {
        Self { dominance, data: Default::default() }
    }
}

impl<D> DominanceChecker<D::State> for SimpleDominanceChecker<D>
where
    D: Dominance,
    D::Key: Eq + Hash,
{
    fn is_dominated_or_insert(&self, state: Arc<D::State>, depth: usize, value: isize) -> bool {
        if let Some(key) = self.dominance.get_key(state.as_ref()) {
            match self.data.entry((depth, key)) {
                Entry::Occupied(mut e) => {
                    let front = e.get_mut();
                    let dominated = front.iter()
                        .any(|other| other.value > value && self.dominance.is_dominated_or_equal(state.as_ref(), other.state.as_ref()));
                    if !dominated {
                        front.retain(|other|
                            !(value >= other.value && self.dominance.is_dominated_or_equal(other.state.as_ref(), state.as_ref())));
                        front.push(DominanceEntry { state, value });
                    }
                    dominated
                },
                Entry::Vacant(e) => {
                    e.insert(vec![DominanceEntry { state, value }]);
                    false
                },
            }
        } else {
            false
        }
    }
}
