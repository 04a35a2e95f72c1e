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

use crate::{ReductionStrategy, LayerNode, StateRanking};

/// _This is the default reduction strategy._ It keeps the `max_width - 1`
/// best nodes of the layer (highest value, then highest rank) untouched and
/// puts all the others in one single cluster.
///
/// When used to compile a restricted DD, this amounts to dropping all but
/// the `max_width` best nodes. When used to compile a relaxed DD, this merges
/// the least promising nodes together.
#[derive(Debug, Default, Clone, Copy)]
pub struct CostBased;

impl CostBased {
    /// Returns the indices of the layer nodes sorted from the most to the
    /// least promising one.
    pub(crate) fn sorted<T>(layer: &[LayerNode<T>], ranking: &dyn StateRanking<State = T>) -> Vec<usize> {
        let mut order = (0..layer.len()).collect::<Vec<_>>();
        order.sort_unstable_by(|a, b| {
            let (a, b) = (&layer[*a], &layer[*b]);
            a.value.cmp(&b.value)
                .then_with(|| ranking.compare(a.state, b.state))
                .reverse()
        }); // reverse because greater means more likely to be kept
        order
    }
}

impl<T> ReductionStrategy<T> for CostBased {
    fn define_clusters(
        &self,
        layer: &[LayerNode<T>],
        max_width: usize,
        ranking: &dyn StateRanking<State = T>,
    ) -> Vec<Vec<usize>> {
        let max_width = max_width.max(1);
        let mut order = Self::sorted(layer, ranking);
        if order.len() <= max_width {
            return order.into_iter().map(|i| vec![i]).collect();
        }

        let rest = order.split_off(max_width - 1);
        let mut clusters = order.into_iter().map(|i| vec![i]).collect::<Vec<_>>();
        clusters.push(rest);
        clusters
    }
}
