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

use binary_heap_plus::BinaryHeap;
use parking_lot::Mutex;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{LayerNode, ReductionStrategy, StateDistance, StateRanking};

use super::ghp::{farthest, DEFAULT_SEED, NB_PIVOT_REFINEMENTS};

struct Split {
    priority: f64,
    members: Vec<usize>,
    pivot: usize,
    most_distant: Option<usize>,
}

/// Multi-bisection partitioning. It is similar to the GHP except that the
/// distance between a node and its pivot is only computed once: a cluster
/// is always split using its own pivot and the member that lies the farthest
/// away from it.
pub struct Mbp<D: StateDistance> {
    distance: D,
    rng: Mutex<StdRng>,
}

impl<D: StateDistance> Mbp<D> {
    pub fn new(distance: D) -> Self {
        Self::with_seed(distance, DEFAULT_SEED)
    }
    pub fn with_seed(distance: D, seed: u64) -> Self {
        Mbp { distance, rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl<D: StateDistance> ReductionStrategy<D::State> for Mbp<D> {
    fn define_clusters(
        &self,
        layer: &[LayerNode<D::State>],
        max_width: usize,
        _: &dyn StateRanking<State = D::State>,
    ) -> Vec<Vec<usize>> {
        let max_width = max_width.max(1);
        let mut members = (0..layer.len()).collect::<Vec<_>>();
        if members.len() < 2 {
            return vec![members];
        }
        members.shuffle(&mut *self.rng.lock());

        let mut pivot_a = members[0];
        let mut pivot_b = farthest(&self.distance, layer, pivot_a, &members);
        for _ in 0..NB_PIVOT_REFINEMENTS {
            let Some(b) = pivot_b else { break };
            match farthest(&self.distance, layer, b, &members) {
                Some(a) if a != pivot_a => {
                    pivot_a = a;
                    pivot_b = farthest(&self.distance, layer, pivot_a, &members);
                }
                _ => break,
            }
        }

        let mut dist = layer.iter()
            .map(|n| self.distance.distance(n.state, layer[pivot_a].state))
            .collect::<Vec<_>>();

        let mut heap = BinaryHeap::new_by(|a: &Split, b: &Split| {
            a.priority.total_cmp(&b.priority)
                .then_with(|| a.members.len().cmp(&b.members.len()))
        });
        heap.push(Split { priority: 0.0, members, pivot: pivot_a, most_distant: pivot_b });

        let mut done = vec![];
        while heap.len() + done.len() < max_width {
            let Some(current) = heap.pop() else { break };
            let Some(pivot_b) = current.most_distant.filter(|_| current.members.len() >= 2) else {
                done.push(current.members);
                continue;
            };
            let pivot_a = current.pivot;

            let mut a = vec![pivot_a];
            let mut b = vec![pivot_b];
            let (mut max_a, mut far_a) = (0.0_f64, None);
            let (mut max_b, mut far_b) = (0.0_f64, None);
            for m in current.members.iter().copied() {
                if m == pivot_a || m == pivot_b {
                    continue;
                }
                let da = dist[m];
                let db = self.distance.distance(layer[m].state, layer[pivot_b].state);
                if da < db {
                    a.push(m);
                    if da > max_a {
                        max_a = da;
                        far_a = Some(m);
                    }
                } else {
                    b.push(m);
                    dist[m] = db;
                    if db > max_b {
                        max_b = db;
                        far_b = Some(m);
                    }
                }
            }
            dist[pivot_b] = 0.0;

            heap.push(Split { priority: max_a, members: a, pivot: pivot_a, most_distant: far_a });
            heap.push(Split { priority: max_b, members: b, pivot: pivot_b, most_distant: far_b });
        }

        done.extend(heap.into_vec().into_iter().map(|s| s.members));
        done
    }
}

#[cfg(test)]
mod test_mbp {
    use crate::*;
    use crate::implementation::reduction::ghp::test_ghp::{assert_partition, layer, Abs, Natural};

    #[test]
    fn mbp_yields_a_partition_of_the_layer() {
        let states = [1, 2, 3, 10, 11, 12, 20, 21, 22, 30];
        let nodes = layer(&states);
        let clusters = Mbp::new(Abs).define_clusters(&nodes, 4, &Natural);
        assert_eq!(4, clusters.len());
        assert_partition(&clusters, states.len(), 4);
    }
    #[test]
    fn mbp_separates_distant_groups() {
        let states = [1, 2, 3, 100, 101, 102];
        let nodes = layer(&states);
        let mut clusters = Mbp::new(Abs).define_clusters(&nodes, 2, &Natural);
        clusters.iter_mut().for_each(|c| c.sort_unstable());
        clusters.sort_unstable();
        assert_eq!(vec![vec![0, 1, 2], vec![3, 4, 5]], clusters);
    }
    #[test]
    fn mbp_does_not_split_identical_states() {
        let states = [4, 4, 4, 4];
        let nodes = layer(&states);
        let clusters = Mbp::new(Abs).define_clusters(&nodes, 3, &Natural);
        assert_partition(&clusters, states.len(), 3);
    }
}
