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

//! This module provides an A* solver. Instead of compiling decision diagrams,
//! it explores the state space of the problem one node at a time, always
//! expanding the node with the largest optimistic estimate `f`.
use std::{hash::Hash, time::Instant};

use binary_heap_plus::BinaryHeap;
use log::{debug, info, trace};

use crate::*;
use super::Incumbent;
use super::explicit::{MaxF, StateSpace};

/// A best-first search over the explicit state space of a problem.
///
/// The priority of a node is `f = value + fast_upper_bound(state, free)`, so
/// the quality of the `FastUpperBound` determines how much of the state space
/// gets explored. With the default (`NoUpperBound`) the search amounts to an
/// exhaustive enumeration. As long as the bound never under estimates what
/// a state can earn, the first complete assignment that is popped is optimal.
///
/// # Example
/// ```
/// # use ddsolve::*;
/// # struct Coins;
/// # impl Problem for Coins {
/// #     type State = usize;
/// #     fn nb_variables(&self) -> usize { 3 }
/// #     fn initial_state(&self) -> usize { 0 }
/// #     fn initial_value(&self) -> isize { 0 }
/// #     fn transition(&self, s: &usize, d: Decision) -> usize { s + d.value as usize }
/// #     fn transition_cost(&self, _: &usize, d: Decision) -> isize { d.value * (d.variable.id() as isize + 1) }
/// #     fn for_each_in_domain(&self, variable: Variable, s: &usize, f: &mut dyn DecisionCallback) {
/// #         f.apply(Decision { variable, value: 0 });
/// #         if *s < 2 { f.apply(Decision { variable, value: 1 }); }
/// #     }
/// # }
/// // pick at most two of three coins worth 1, 2 and 3
/// let problem = Coins;
/// let mut solver = AStarSolver::new(&problem, &NoCutoff);
/// let outcome = solver.maximize();
/// assert_eq!(Completion { is_exact: true, best_value: Some(5) }, outcome);
/// ```
pub struct AStarSolver<'a, State> {
    space: StateSpace<'a, State>,
    cutoff: &'a dyn Cutoff,
    /// the open nodes, ordered by decreasing `f`
    open: BinaryHeap<SubProblem<State>, MaxF>,

    best: Incumbent,
    best_ub: isize,
    abort_proof: Option<Reason>,
    stats: SearchStatistics,
}

impl<'a, State: Eq + Hash> AStarSolver<'a, State> {
    pub fn new(problem: &'a dyn Problem<State = State>, cutoff: &'a dyn Cutoff) -> Self {
        AStarSolver {
            space: StateSpace::new(problem),
            cutoff,
            open: BinaryHeap::from_vec_cmp(vec![], MaxF),
            best: Incumbent::new(),
            best_ub: isize::MAX,
            abort_proof: None,
            stats: SearchStatistics::default(),
        }
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

    fn abort_search(&mut self, reason: Reason) {
        debug!("search aborted: {reason:?}");
        self.abort_proof = Some(reason);
        self.best_ub = self.open.peek().map_or(isize::MIN, |n| n.ub).max(self.best.value);
        self.open.clear();
    }
}

impl<State: Eq + Hash> Solver for AStarSolver<'_, State> {
    fn maximize(&mut self) -> Completion {
        let start = Instant::now();
        let n = self.space.problem.nb_variables();
        info!("A* search started on {n} variables");

        self.abort_proof = None;
        self.best_ub = isize::MAX;
        self.stats = SearchStatistics::default();
        self.open.clear();
        let root = self.space.reset();
        self.open.push(root);

        loop {
            if self.cutoff.must_stop() {
                self.abort_search(Reason::CutoffOccurred);
                break;
            }
            let Some(node) = self.open.pop() else {
                self.best_ub = self.best.value;
                break;
            };
            if !self.space.close(&node) {
                continue;
            }
            // no open node can beat the incumbent anymore
            if node.ub <= self.best.value {
                self.best_ub = self.best.value;
                self.open.clear();
                break;
            }

            self.stats.nb_iterations += 1;
            trace!("explore node: depth {}, ub {}, frontier {}", node.depth, node.ub, self.open.len());
            if node.depth == n {
                self.best.improve(node.value, node.path);
                self.best_ub = self.best.value;
                self.open.clear();
                break;
            }

            let open = &mut self.open;
            self.space.expand(&node, self.best.value, |child| open.push(child));
            self.stats.max_frontier_size = self.stats.max_frontier_size.max(self.open.len());
        }

        self.best.sort();
        let proved = self.abort_proof.is_none();
        self.stats.elapsed = start.elapsed();
        self.stats.status = SearchStatus::from_outcome(proved, self.best.solution.is_some());
        self.stats.gap = self.gap();
        info!("A* search ended: {} | best value: {:?} | bounds: [{}, {}]",
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
