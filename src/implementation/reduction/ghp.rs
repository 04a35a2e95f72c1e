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

//! This module provides the generalized hyperplane partitioning (GHP)
//! reduction strategies. They recursively bisect the layer around two pivot
//! states so that similar states end up in the same cluster.

use binary_heap_plus::BinaryHeap;
use parking_lot::Mutex;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{LayerNode, ReductionStrategy, Relaxation, StateDistance, StateRanking};

/// The seed used by the randomized strategies when none is provided.
pub const DEFAULT_SEED: u64 = 465465;
/// How many times the pivots are refined when looking for distant pivots.
pub(crate) const NB_PIVOT_REFINEMENTS: usize = 5;

/// A cluster that is waiting to be split, along with its priority.
pub(crate) struct Cluster {
    pub priority: f64,
    pub members: Vec<usize>,
}

/// Returns the member that is the farthest away from `reference` (the
/// reference itself is never returned).
pub(crate) fn farthest<S, D>(
    distance: &D,
    layer: &[LayerNode<S>],
    reference: usize,
    members: &[usize],
) -> Option<usize>
where D: StateDistance<State = S>
{
    let mut best = None;
    let mut max_dist = -1.0;
    for m in members.iter().copied() {
        if m == reference {
            continue;
        }
        let d = distance.distance(layer[m].state, layer[reference].state);
        if d > max_dist {
            max_dist = d;
            best = Some(m);
        }
    }
    best
}

/// Splits `members` in two around a pair of pivots. The result holds both
/// halves along with the largest distance between a member and its pivot.
fn bisect<S, D>(
    distance: &D,
    layer: &[LayerNode<S>],
    members: &mut [usize],
    rng: &mut StdRng,
    most_distant_pivot: bool,
) -> ((Vec<usize>, f64), (Vec<usize>, f64))
where D: StateDistance<State = S>
{
    members.shuffle(rng);
    let mut pivot_a = members[0];
    let mut pivot_b = members[1];
    if most_distant_pivot {
        pivot_b = farthest(distance, layer, pivot_a, members).unwrap_or(pivot_b);
        for _ in 0..NB_PIVOT_REFINEMENTS {
            pivot_a = farthest(distance, layer, pivot_b, members).unwrap_or(pivot_a);
            pivot_b = farthest(distance, layer, pivot_a, members).unwrap_or(pivot_b);
        }
    }

    let mut a = vec![pivot_a];
    let mut b = vec![pivot_b];
    let mut max_a = 0.0_f64;
    let mut max_b = 0.0_f64;
    for m in members.iter().copied() {
        if m == pivot_a || m == pivot_b {
            continue;
        }
        let da = distance.distance(layer[m].state, layer[pivot_a].state);
        let db = distance.distance(layer[m].state, layer[pivot_b].state);
        if da < db {
            max_a = max_a.max(da);
            a.push(m);
        } else {
            max_b = max_b.max(db);
            b.push(m);
        }
    }
    ((a, max_a), (b, max_b))
}

/// Repeatedly splits the cluster on top of the heap until `nb_clusters`
/// clusters exist or nothing can be split anymore.
#[allow(clippy::too_many_arguments)]
fn partition<S, D, F, P>(
    distance: &D,
    layer: &[LayerNode<S>],
    members: Vec<usize>,
    nb_clusters: usize,
    rng: &Mutex<StdRng>,
    most_distant_pivot: bool,
    mut heap: BinaryHeap<Cluster, F>,
    priority: P,
) -> Vec<Vec<usize>>
where D: StateDistance<State = S>,
      F: compare::Compare<Cluster>,
      P: Fn(&[usize], f64) -> f64,
{
    let mut rng = rng.lock();
    let mut done = vec![];

    heap.push(Cluster { priority: 0.0, members });
    while heap.len() + done.len() < nb_clusters {
        let Some(mut current) = heap.pop() else { break };
        if current.members.len() < 2 {
            done.push(current.members);
            continue;
        }
        let ((a, max_a), (b, max_b)) =
            bisect(distance, layer, &mut current.members, &mut rng, most_distant_pivot);
        heap.push(Cluster { priority: priority(&a, max_a), members: a });
        heap.push(Cluster { priority: priority(&b, max_b), members: b });
    }

    done.extend(heap.into_vec().into_iter().map(|c| c.members));
    done
}

/// Generalized hyperplane partitioning. The cluster with the largest spread
/// (distance between its pivot and its farthest member) is split first.
pub struct Ghp<D: StateDistance> {
    distance: D,
    most_distant_pivot: bool,
    rng: Mutex<StdRng>,
}

impl<D: StateDistance> Ghp<D> {
    pub fn new(distance: D) -> Self {
        Self::with_seed(distance, DEFAULT_SEED)
    }
    pub fn with_seed(distance: D, seed: u64) -> Self {
        Ghp {
            distance,
            most_distant_pivot: true,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
    /// When false, the pivots are simply two random members of the cluster.
    pub fn with_most_distant_pivot(mut self, enabled: bool) -> Self {
        self.most_distant_pivot = enabled;
        self
    }

    /// Partitions the given members of the layer into at most `nb_clusters`.
    pub(crate) fn partition(
        &self,
        layer: &[LayerNode<D::State>],
        members: Vec<usize>,
        nb_clusters: usize,
    ) -> Vec<Vec<usize>> {
        let heap = BinaryHeap::new_by(|a: &Cluster, b: &Cluster| {
            a.priority.total_cmp(&b.priority)
                .then_with(|| a.members.len().cmp(&b.members.len()))
        });
        partition(&self.distance, layer, members, nb_clusters, &self.rng,
            self.most_distant_pivot, heap, |_, max_dist| max_dist)
    }
}

impl<D: StateDistance> ReductionStrategy<D::State> for Ghp<D> {
    fn define_clusters(
        &self,
        layer: &[LayerNode<D::State>],
        max_width: usize,
        _: &dyn StateRanking<State = D::State>,
    ) -> Vec<Vec<usize>> {
        self.partition(layer, (0..layer.len()).collect(), max_width.max(1))
    }
}

/// A variant of the GHP where the priority of a cluster is the distance
/// between the merged state of its members and the root state. The cluster
/// whose merge stays the closest to the root is split first.
pub struct GhpAlt<D: StateDistance, R: Relaxation<State = D::State>> {
    distance: D,
    relaxation: R,
    root: D::State,
    rng: Mutex<StdRng>,
}

impl<D: StateDistance, R: Relaxation<State = D::State>> GhpAlt<D, R> {
    pub fn new(distance: D, relaxation: R, root: D::State) -> Self {
        Self::with_seed(distance, relaxation, root, DEFAULT_SEED)
    }
    pub fn with_seed(distance: D, relaxation: R, root: D::State, seed: u64) -> Self {
        GhpAlt { distance, relaxation, root, rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl<D: StateDistance, R: Relaxation<State = D::State>> ReductionStrategy<D::State> for GhpAlt<D, R> {
    fn define_clusters(
        &self,
        layer: &[LayerNode<D::State>],
        max_width: usize,
        _: &dyn StateRanking<State = D::State>,
    ) -> Vec<Vec<usize>> {
        // smallest priority first
        let heap = BinaryHeap::new_by(|a: &Cluster, b: &Cluster| {
            b.priority.total_cmp(&a.priority)
                .then_with(|| b.members.len().cmp(&a.members.len()))
        });
        let priority = |members: &[usize], _: f64| {
            if members.len() < 2 {
                f64::MAX
            } else {
                let merged = self.relaxation.merge(&mut members.iter().map(|m| layer[*m].state));
                self.distance.distance(&merged, &self.root)
            }
        };
        partition(&self.distance, layer, (0..layer.len()).collect(), max_width.max(1),
            &self.rng, true, heap, priority)
    }
}

#[cfg(test)]
pub(crate) mod test_ghp {
    use std::cmp::Ordering;

    use crate::*;

    pub struct Abs;
    impl StateDistance for Abs {
        type State = isize;
        fn distance(&self, a: &isize, b: &isize) -> f64 {
            (a - b).abs() as f64
        }
    }
    pub struct Natural;
    impl StateRanking for Natural {
        type State = isize;
        fn compare(&self, a: &isize, b: &isize) -> Ordering {
            a.cmp(b)
        }
    }
    struct MaxRelax;
    impl Relaxation for MaxRelax {
        type State = isize;
        fn merge(&self, states: &mut dyn Iterator<Item = &isize>) -> isize {
            states.copied().max().unwrap_or_default()
        }
        fn relax(&self, _: &isize, _: &isize, _: &isize, _: Decision, cost: isize) -> isize {
            cost
        }
    }

    pub fn layer(states: &[isize]) -> Vec<LayerNode<isize>> {
        states.iter().map(|s| LayerNode { state: s, value: 0 }).collect()
    }
    pub fn assert_partition(clusters: &[Vec<usize>], n: usize, max_width: usize) {
        assert!(clusters.len() <= max_width);
        assert!(clusters.iter().all(|c| !c.is_empty()));
        let mut all = clusters.iter().flatten().copied().collect::<Vec<_>>();
        all.sort_unstable();
        assert_eq!((0..n).collect::<Vec<_>>(), all);
    }
    fn normalize(mut clusters: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
        clusters.iter_mut().for_each(|c| c.sort_unstable());
        clusters.sort_unstable();
        clusters
    }

    #[test]
    fn ghp_yields_a_partition_of_the_layer() {
        let states = [1, 2, 3, 10, 11, 12, 20, 21, 22, 30];
        let nodes = layer(&states);
        let clusters = Ghp::new(Abs).define_clusters(&nodes, 4, &Natural);
        assert_eq!(4, clusters.len());
        assert_partition(&clusters, states.len(), 4);
    }
    #[test]
    fn ghp_separates_distant_groups() {
        let states = [1, 2, 3, 100, 101, 102];
        let nodes = layer(&states);
        let clusters = normalize(Ghp::new(Abs).define_clusters(&nodes, 2, &Natural));
        assert_eq!(vec![vec![0, 1, 2], vec![3, 4, 5]], clusters);
    }
    #[test]
    fn ghp_with_random_pivots_yields_a_partition() {
        let states = [5, 9, 1, 7, 3, 8];
        let nodes = layer(&states);
        let clusters = Ghp::new(Abs).with_most_distant_pivot(false).define_clusters(&nodes, 3, &Natural);
        assert_partition(&clusters, states.len(), 3);
    }
    #[test]
    fn ghp_is_deterministic_for_a_given_seed() {
        let states = [5, 9, 1, 7, 3, 8, 4, 4, 12];
        let nodes = layer(&states);
        let a = Ghp::with_seed(Abs, 7).with_most_distant_pivot(false).define_clusters(&nodes, 3, &Natural);
        let b = Ghp::with_seed(Abs, 7).with_most_distant_pivot(false).define_clusters(&nodes, 3, &Natural);
        assert_eq!(normalize(a), normalize(b));
    }
    #[test]
    fn ghp_stops_when_clusters_cannot_be_split() {
        let states = [1, 2, 3];
        let nodes = layer(&states);
        let clusters = Ghp::new(Abs).define_clusters(&nodes, 10, &Natural);
        assert_eq!(3, clusters.len());
        assert_partition(&clusters, 3, 10);
    }
    #[test]
    fn ghp_alt_yields_a_partition_of_the_layer() {
        let states = [1, 2, 3, 10, 11, 12, 20, 21, 22, 30];
        let nodes = layer(&states);
        let clusters = GhpAlt::new(Abs, MaxRelax, 0).define_clusters(&nodes, 5, &Natural);
        assert_eq!(5, clusters.len());
        assert_partition(&clusters, states.len(), 5);
    }
}
