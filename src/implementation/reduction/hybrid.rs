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

use crate::{Error, LayerNode, ReductionStrategy, StateDistance, StateRanking};

use super::{cost_based::CostBased, ghp::{Ghp, DEFAULT_SEED}};

/// A reduction strategy which preserves a fraction `alpha` of the layer width
/// for the best nodes (exactly as `CostBased` would do) and uses the GHP to
/// partition all the other nodes.
pub struct Hybrid<D: StateDistance> {
    ghp: Ghp<D>,
    alpha: f64,
}

impl<D: StateDistance> Hybrid<D> {
    pub const DEFAULT_ALPHA: f64 = 0.5;

    pub fn new(distance: D) -> Self {
        Hybrid { ghp: Ghp::with_seed(distance, DEFAULT_SEED), alpha: Self::DEFAULT_ALPHA }
    }
    /// Creates a hybrid strategy preserving a ratio `alpha` of the width for
    /// the best nodes. `alpha` must lie in the [0, 1] interval.
    pub fn with_ratio(distance: D, alpha: f64, seed: u64) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(Error::InvalidRatio(alpha));
        }
        Ok(Hybrid { ghp: Ghp::with_seed(distance, seed), alpha })
    }
}

impl<D: StateDistance> ReductionStrategy<D::State> for Hybrid<D> {
    fn define_clusters(
        &self,
        layer: &[LayerNode<D::State>],
        max_width: usize,
        ranking: &dyn StateRanking<State = D::State>,
    ) -> Vec<Vec<usize>> {
        let max_width = max_width.max(1);
        let nb_preserved = ((max_width as f64 * self.alpha).ceil() as usize).min(max_width - 1);

        let mut clusters = CostBased.define_clusters(layer, nb_preserved + 1, ranking);
        if clusters.len() <= nb_preserved {
            return clusters;
        }
        let rest = clusters.pop().unwrap_or_default();
        clusters.extend(self.ghp.partition(layer, rest, max_width - nb_preserved));
        clusters
    }
}
