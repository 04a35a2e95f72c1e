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

use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{Error, LayerNode, ReductionStrategy, StateCoordinates, StateRanking};

use super::ghp::DEFAULT_SEED;

/// Lloyd's k-means clustering of the layer, where `k` is the maximum width.
/// The states are projected in a euclidean space by a `StateCoordinates`.
pub struct KMeans<C: StateCoordinates> {
    coordinates: C,
    max_iterations: usize,
    rng: Mutex<StdRng>,
}

impl<C: StateCoordinates> KMeans<C> {
    pub const DEFAULT_MAX_ITERATIONS: usize = 50;

    pub fn new(coordinates: C) -> Self {
        KMeans {
            coordinates,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            rng: Mutex::new(StdRng::seed_from_u64(DEFAULT_SEED)),
        }
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Result<Self, Error> {
        if max_iterations == 0 {
            return Err(Error::InvalidIterationLimit);
        }
        self.max_iterations = max_iterations;
        Ok(self)
    }
}

fn sq_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn random_point(rng: &mut StdRng, lo: &[f64], hi: &[f64]) -> Vec<f64> {
    lo.iter().zip(hi.iter())
        .map(|(l, h)| l + rng.random::<f64>() * (h - l))
        .collect()
}

impl<C: StateCoordinates> ReductionStrategy<C::State> for KMeans<C> {
    fn define_clusters(
        &self,
        layer: &[LayerNode<C::State>],
        max_width: usize,
        _: &dyn StateRanking<State = C::State>,
    ) -> Vec<Vec<usize>> {
        let k = max_width.max(1);
        let points = layer.iter()
            .map(|n| self.coordinates.coordinates(n.state))
            .collect::<Vec<_>>();
        let dims = points.iter().map(|p| p.len()).min().unwrap_or(0);

        let mut lo = vec![f64::MAX; dims];
        let mut hi = vec![f64::MIN; dims];
        for p in points.iter() {
            for d in 0..dims {
                lo[d] = lo[d].min(p[d]);
                hi[d] = hi[d].max(p[d]);
            }
        }

        let mut rng = self.rng.lock();
        let mut centroids = (0..k).map(|_| random_point(&mut rng, &lo, &hi)).collect::<Vec<_>>();
        let mut assignment = vec![usize::MAX; points.len()];

        for _ in 0..self.max_iterations {
            let mut changed = false;
            for (i, p) in points.iter().enumerate() {
                let closest = centroids.iter()
                    .enumerate()
                    .map(|(c, centroid)| (c, sq_distance(&p[..dims], centroid)))
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(c, _)| c)
                    .unwrap_or(0);
                if assignment[i] != closest {
                    assignment[i] = closest;
                    changed = true;
                }
            }
            if !changed {
                break;
            }

            let mut sums = vec![vec![0.0; dims]; k];
            let mut counts = vec![0_usize; k];
            for (i, p) in points.iter().enumerate() {
                let c = assignment[i];
                counts[c] += 1;
                for d in 0..dims {
                    sums[c][d] += p[d];
                }
            }
            for c in 0..k {
                if counts[c] == 0 {
                    centroids[c] = random_point(&mut rng, &lo, &hi);
                } else {
                    centroids[c] = sums[c].iter().map(|s| s / counts[c] as f64).collect();
                }
            }
        }

        let mut clusters = vec![vec![]; k];
        for (i, c) in assignment.into_iter().enumerate() {
            clusters[c].push(i);
        }
        clusters.retain(|c| !c.is_empty());
        clusters
    }
}
