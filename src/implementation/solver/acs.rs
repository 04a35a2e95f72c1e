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

//! This module provides the anytime column search (ACS) solver.
use std::{hash::Hash, time::Instant};

use binary_heap_plus::BinaryHeap;
use log::{debug, info, trace};

use crate::*;
use super::Incumbent;
use super::explicit::{MaxF, StateSpace};

/// Anytime column search keeps one open queue per depth of the state space.
/// Each round sweeps the depths from the root down and expands at most
/// `column_width` nodes of each queue, which makes it dive towards complete
/// solutions early while still widening the search at every round.
///
/// # Note
/// The optimality of the solution is only proved when every queue has been
/// drained (or flushed because none of its nodes can beat the incumbent).
/// A run interrupted by the cutoff is best effort: its upper bound is the
/// largest priority still waiting in one of the queues.
pub struct AcsSolver<'a, State> {
    space: StateSpace<'a, State>,
    cutoff: &'a dyn Cutoff,
    column_width: usize,
    /// one open queue per depth
    open: Vec<BinaryHeap<SubProblem<State>, MaxF>>,

    best: Incumbent,
    best_ub: isize,
    abort_proof: Option<Reason>,
    stats: SearchStatistics,
}

impl<'a, State: Eq + Hash> AcsSolver<'a, State> {
    pub fn new(problem: &'a dyn Problem<State = State>, cutoff: &'a dyn Cutoff) -> Self {
        AcsSolver {
            space: StateSpace::new(problem),
            cutoff,
            column_width: SearchParameters::default().column_width,
            open: vec![],
            best: Incumbent::new(),
            best_ub: isize::MAX,
            abort_proof: None,
            stats: SearchStatistics::default(),
        }
    }
    /// Sets the number of nodes expanded per depth and per round
    pub fn with_column_width(mut self, column_width: usize) -> Result<Self, Error> {
        if column_width == 0 {
            return Err(Error::InvalidColumnWidth);
        }
        self.column_width = column_width;
        Ok(self)
    }
    /// Only the column width is relevant to this solver
    pub fn with_parameters(self, params: SearchParameters) -> Result<Self, Error> {
        self.with_column_width(params.column_width)
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

    fn open_len(&self) -> usize {
        self.open.iter().map(|q| q.len()).sum()
    }

    fn abort_search(&mut self, reason: Reason) {
        debug!("search aborted: {reason:?}");
        self.abort_proof = Some(reason);
        self.best_ub = self.open.iter()
            .filter_map(|q| q.peek().map(|n| n.ub))
            .fold(self.best.value, isize::max);
        self.open.iter_mut().for_each(|q| q.clear());
    }

    /// Expands up to `column_width` nodes of each queue
    fn round(&mut self) {
        let n = self.space.problem.nb_variables();
        for depth in 0..=n {
            for _ in 0..self.column_width {
                let Some(node) = self.open[depth].pop() else {
                    break;
                };
                if !self.space.close(&node) {
                    continue;
                }
                // the rest of this queue cannot beat the incumbent either
                if node.ub <= self.best.value {
                    self.open[depth].clear();
                    break;
                }

                self.stats.nb_iterations += 1;
                trace!("explore node: depth {}, ub {}, frontier {}", node.depth, node.ub, self.open[depth].len());
                if depth == n {
                    self.best.improve(node.value, node.path);
                    continue;
                }

                let next = &mut self.open[depth + 1];
                self.space.expand(&node, self.best.value, |child| next.push(child));
            }
        }
        self.stats.max_frontier_size = self.stats.max_frontier_size.max(self.open_len());
    }
}

impl<State: Eq + Hash> Solver for AcsSolver<'_, State> {
    fn maximize(&mut self) -> Completion {
        let start = Instant::now();
        let n = self.space.problem.nb_variables();
        info!("column search started on {} variables with columns of {}", n, self.column_width);

        self.abort_proof = None;
        self.best_ub = isize::MAX;
        self.stats = SearchStatistics::default();
        self.open = (0..=n).map(|_| BinaryHeap::from_vec_cmp(vec![], MaxF)).collect();
        let root = self.space.reset();
        self.open[0].push(root);

        loop {
            if self.cutoff.must_stop() {
                self.abort_search(Reason::CutoffOccurred);
                break;
            }
            self.round();
            if self.open_len() == 0 {
                self.best_ub = self.best.value;
                break;
            }
        }

        self.best.sort();
        let proved = self.abort_proof.is_none();
        self.stats.elapsed = start.elapsed();
        self.stats.status = SearchStatus::from_outcome(proved, self.best.solution.is_some());
        self.stats.gap = self.gap();
        info!("column search ended: {} | best value: {:?} | bounds: [{}, {}]",
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
