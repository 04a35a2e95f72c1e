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

//! This module defines the strategies used to bring an oversized layer back
//! to the maximum width of a decision diagram.

use crate::StateRanking;

/// A node of the layer that is being reduced, as seen by a reduction strategy.
#[derive(Debug, Clone, Copy)]
pub struct LayerNode<'a, State> {
    /// The state of the node
    pub state: &'a State,
    /// The length of the longest path from the root to that node
    pub value: isize,
}

/// A reduction strategy partitions the nodes of an oversized layer into (at
/// most) `max_width` clusters. When compiling a relaxed DD, all the nodes of a
/// cluster are merged together. When compiling a restricted one, only the
/// best node of each cluster survives.
pub trait ReductionStrategy<State> {
    /// Returns a partition of the indices `0..layer.len()` into at most
    /// `max_width` non empty clusters.
    ///
    /// # Note
    /// The compiler only calls this method when `layer.len() > max_width`
    /// and `max_width >= 1`.
    fn define_clusters(
        &self,
        layer: &[LayerNode<State>],
        max_width: usize,
        ranking: &dyn StateRanking<State = State>,
    ) -> Vec<Vec<usize>>;
}
