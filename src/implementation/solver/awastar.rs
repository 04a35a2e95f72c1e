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
//! This module provides an anytime weighted A* solver. It explores the state
//! space like A* does, but a node is ranked on its value plus a fraction of
//! its fast upper bound. This favors the nodes which already earned a lot and
//! makes the search reach complete solutions early. It then keeps improving
//! on them until no open node can beat the incumbent.
use std::{cmp::Ordering, hash::Hash, time::Instant};

use binary_heap_plus::BinaryHeap;
use compare::Compare;
use log::{debug, info, trace};

use crate::*;
use super::Incumbent;
use super::explicit::{MaxF, StateSpace};

/// An open node along with its weighted priority
struct Weighted<State> {
    priority: f64,
    node: SubProblem<State>,
}

/// Orders the open nodes by decreasing weighted priority, the ties are
/// broken the way A* would.
#[derive(Debug, Default, Clone, Copy)]
struct MaxWeighted;
impl<T> Compare<Weighted<T>> for MaxWeighted {
    fn compare(&self, l: &Weighted<T>, r: &Weighted<T>) -> Ordering {
        l.priority.total_cmp(&r.priority)
            .then_with(|| MaxF.compare(&l.node, &r.node))
    }
}

/// The anytime weighted A* (AwA*).
///
/// A node with value `g` and optimistic estimate `f = g + h` is expanded in
/// the order of `g + weight * h`. With a weight of 1 this is plain A*; with
/// a weight of 0 the search greedily follows the most valuable paths. Only
/// the actual `f` is used to prune, so that the incumbent is proved optimal
/// once the open list has been emptied. When the fast upper bound knows
/// nothing about a node (`f` is +inf) the node ranks above all others.
pub struct AwAStarSolver<'a, State> {
    space: StateSpace<'a, State>,
    cutoff: &'a dyn Cutoff,
    weight: f64,
    open: BinaryHeap<Weighted<State>, MaxWeighted>,

    best: Incumbent,
    best_ub: isize,
    abort_proof: Option<Reason>,
    stats: SearchStatistics,
}

impl<'a, State: Eq + Hash> AwAStarSolver<'a, State> {
    pub fn new(problem: &'a dyn Problem<State = State>, cutoff: &'a dyn Cutoff) -> Self {
        AwAStarSolver {
            space: StateSpace::new(problem),
            cutoff,
            weight: SearchParameters::default().weight,
            open: BinaryHeap::from_vec_cmp(vec![], MaxWeighted),
            best: Incumbent::new(),
            best_ub: isize::MAX,
            abort_proof: None,
            stats: SearchStatistics::default(),
        }
    }
    /// Sets the share of the upper bound counted in the priority of a node.
    /// It must lie in [0, 1].
    pub fn with_weight(mut self, weight: f64) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(Error::InvalidWeight(weight));
        }
        self.weight = weight;
        Ok(self)
    }
    /// Only the weight is relevant to this solver
    pub fn with_parameters(self, params: SearchParameters) -> Result<Self, Error> {
        self.with_weight(params.weight)
    }
    pub fn with_variable_heuristic(mut self, var_heu: &'a dyn VariableHeuristic<State>) -> Self {
        self.space.var_heu = var_heu;
        self
    }
    pub fn with_upper_bound(mut self, upper_bound: &'a dyn FastUpperBound<State>) -> Self {
        self.space.upper_bound = upper_bound;
        self
    }
    pub fn with_dominance(mut self, dominance: &'a dyn DominanceChecker<State>) -> Self {
        self.space.dominance = dominance;
        self
    }

    fn weighted(weight: f64, node: SubProblem<State>) -> Weighted<State> {
        let priority = if node.ub == isize::MAX {
            f64::INFINITY
        } else {
            node.value as f64 + weight * node.ub.saturating_sub(node.value) as f64
        };
        Weighted { priority, node }
    }

    /// The open list is not sorted by `f`: all of it must be scanned
    fn abort_search(&mut self, reason: Reason) {
        debug!("search aborted: {reason:?}");
        self.abort_proof = Some(reason);
        self.best_ub = self.open.iter()
            .map(|w| w.node.ub)
            .fold(self.best.value, isize::max);
        self.open.clear();
    }
}

impl<State: Eq + Hash> Solver for AwAStarSolver<'_, State> {
    fn maximize(&mut self) -> Completion {
        let start = Instant::now();
        let n = self.space.problem.nb_variables();
        info!("weighted A* search started on {} variables with weight {}", n, self.weight);

        self.abort_proof = None;
        self.best_ub = isize::MAX;
        self.stats = SearchStatistics::default();
        self.open.clear();
        let root = self.space.reset();
        self.open.push(Self::weighted(self.weight, root));

        loop {
            if self.cutoff.must_stop() {
                self.abort_search(Reason::CutoffOccurred);
                break;
            }
            let Some(Weighted { node, .. }) = self.open.pop() else {
                self.best_ub = self.best.value;
                break;
            };
            if !self.space.close(&node) || node.ub <= self.best.value {
                continue;
            }

            self.stats.nb_iterations += 1;
            trace!("explore node: depth {}, ub {}, frontier {}", node.depth, node.ub, self.open.len());
            if node.depth == n {
                self.best.improve(node.value, node.path);
                continue;
            }

            let weight = self.weight;
            let best_lb = self.best.value;
            let open = &mut self.open;
            let best = &mut self.best;
            self.space.expand(&node, best_lb, |child| {
                if child.depth == n {
                    best.improve(child.value, child.path);
                } else {
                    open.push(Self::weighted(weight, child));
                }
            });
            self.stats.max_frontier_size = self.stats.max_frontier_size.max(self.open.len());
        }

        self.best.sort();
        let proved = self.abort_proof.is_none();
        self.stats.elapsed = start.elapsed();
        self.stats.status = SearchStatus::from_outcome(proved, self.best.solution.is_some());
        self.stats.gap = self.gap();
        info!("weighted A* search ended: {} | best value: {:?} | bounds: [{}, {}]",
            self.stats, self.best.best_value(), self.best.value, self.best_ub);

        Completion { is_exact: proved, best_value: self.best.best_value() }
    }

    fn best_value(&self) -> Option<isize> {
        self.best.best_value()
    }
    fn best_solution(&self) -> Option<Solution> {
        self.best.solution.clone()
    }
    fn best_lower_bound(&self) -> isize {
        self.best.value
    }
    fn best_upper_bound(&self) -> isize {
        self.best_ub
    }
    fn set_primal(&mut self, value: isize, solution: Solution) {
        self.best.improve(value, solution);
    }
    fn statistics(&self) -> SearchStatistics {
        self.stats
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
