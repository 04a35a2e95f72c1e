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

//! This module provides the implementation of a sequential mdd solver. That is
//! a solver that will solve the problem using one single thread of execution.
//!
//! This is usually not the implementation you will want to use if you are
//! after solving a hard problem efficiently. However, in those cases where
//! you would be using a constrained environment where multithreading is not
//! an option; then you might want to use this implementation instead.
use std::{hash::Hash, sync::Arc, time::Instant};

use log::{info, debug, trace};

use crate::*;
use super::{Incumbent, root_node};

enum WorkLoad<T> {
    Complete,
    Aborted,
    WorkItem { node: SubProblem<T> },
}

/// The diagram-based branch-and-bound, running on the calling thread.
///
/// The type parameter `D` is the kind of decision diagram compiled for each
/// subproblem, and `C` is the kind of cache used to prune the search (use
/// `EmptyCache` to disable caching).
pub struct SequentialSolver<'a, State, D, C>
where
    D: DecisionDiagram<State = State> + Default,
    C: Cache<State> + Default,
{
    problem: &'a dyn Problem<State = State>,
    relaxation: &'a dyn Relaxation<State = State>,
    ranking: &'a dyn StateRanking<State = State>,
    width_heu: &'a dyn WidthHeuristic<State>,
    cutoff: &'a dyn Cutoff,
    var_heu: &'a dyn VariableHeuristic<State>,
    upper_bound: &'a dyn FastUpperBound<State>,
    reduction: &'a dyn ReductionStrategy<State>,
    dominance: &'a dyn DominanceChecker<State>,
    params: SearchParameters,

    frontier: &'a mut dyn Frontier<State = State>,
    cache: C,
    /// The number of open nodes at each depth
    open_by_layer: Vec<usize>,
    /// All layers above this one have been cleared from the cache
    first_active_layer: usize,

    best: Incumbent,
    best_ub: isize,
    abort_proof: Option<Reason>,
    stats: SearchStatistics,

    mdd: D,
}

impl<'a, State, D, C> SequentialSolver<'a, State, D, C>
where
    State: Eq + Hash,
    D: DecisionDiagram<State = State> + Default,
    C: Cache<State> + Default,
{
    /// Creates a solver with the default collaborators: the variables are
    /// branched on in their natural order, there is no fast upper bound, no
    /// dominance and the layers are reduced with the `CostBased` strategy.
    ///
    /// Fails with `Error::InvalidWidth` when the width heuristic allows no
    /// node at all in the root diagram.
    pub fn new(
        problem: &'a dyn Problem<State = State>,
        relaxation: &'a dyn Relaxation<State = State>,
        ranking: &'a dyn StateRanking<State = State>,
        width_heu: &'a dyn WidthHeuristic<State>,
        cutoff: &'a dyn Cutoff,
        frontier: &'a mut dyn Frontier<State = State>,
    ) -> Result<Self, Error> {
        if width_heu.max_width(&root_node(problem)) == 0 {
            return Err(Error::InvalidWidth);
        }
        Ok(SequentialSolver {
            problem,
            relaxation,
            ranking,
            width_heu,
            cutoff,
            var_heu: &NaturalOrder,
            upper_bound: &NoUpperBound,
            reduction: &CostBased,
            dominance: &EmptyDominanceChecker,
            params: SearchParameters::default(),
            //
            frontier,
            cache: C::default(),
            open_by_layer: vec![],
            first_active_layer: 0,
            //
            best: Incumbent::new(),
            best_ub: isize::MAX,
            abort_proof: None,
            stats: SearchStatistics::default(),
            mdd: D::default(),
        })
    }
    pub fn with_variable_heuristic(mut self, var_heu: &'a dyn VariableHeuristic<State>) -> Self {
        self.var_heu = var_heu;
        self
    }
    pub fn with_upper_bound(mut self, upper_bound: &'a dyn FastUpperBound<State>) -> Self {
        self.upper_bound = upper_bound;
        self
    }
    pub fn with_reduction(mut self, reduction: &'a dyn ReductionStrategy<State>) -> Self {
        self.reduction = reduction;
        self
    }
    pub fn with_dominance(mut self, dominance: &'a dyn DominanceChecker<State>) -> Self {
        self.dominance = dominance;
        self
    }
    /// Only the gap limit is relevant to this solver
    pub fn with_parameters(mut self, params: SearchParameters) -> Self {
        self.params = params;
        self
    }

    fn initialize(&mut self) {
        let n = self.problem.nb_variables();
        self.cache.initialize(n);
        self.open_by_layer = vec![0; n + 1];
        self.first_active_layer = 0;
        self.best_ub = isize::MAX;
        self.abort_proof = None;
        self.stats = SearchStatistics::default();

        self.frontier.clear();
        self.frontier.push(root_node(self.problem));
        self.open_by_layer[0] += 1;
    }

    /// Compiles a restricted and possibly a relaxed mdd rooted in `node`.
    /// When the relaxed mdd is not exact, its cutset is pushed onto the
    /// frontier.
    fn process_one_node(&mut self, node: SubProblem<State>) -> Result<(), Reason> {
        // 1. RESTRICTION
        let node_ub = node.ub;
        let best_lb = self.best.value;

        if node_ub <= best_lb {
            return Ok(());
        }

        let width = self.width_heu.max_width(&node);
        let mut compilation = CompilationInput {
            comp_type: CompilationType::Restricted,
            problem: self.problem,
            relaxation: self.relaxation,
            ranking: self.ranking,
            var_heu: self.var_heu,
            upper_bound: self.upper_bound,
            reduction: self.reduction,
            cutoff: self.cutoff,
            max_width: width,
            residual: &node,
            best_lb,
            cutset_type: self.frontier.cutset_type(),
            cache: &self.cache,
            dominance: self.dominance,
        };

        let Completion { is_exact, .. } = self.mdd.compile(&compilation)?;
        self.best.improve_with(&self.mdd);
        if is_exact {
            return Ok(());
        }

        // 2. RELAXATION
        compilation.comp_type = CompilationType::Relaxed;
        compilation.best_lb = self.best.value;

        let Completion { is_exact, .. } = self.mdd.compile(&compilation)?;
        self.best.improve_with(&self.mdd);
        if !is_exact {
            self.enqueue_cutset(node_ub);
        }
        Ok(())
    }

    /// Tightens the bound of the cutset nodes with the bound of their parent
    /// and pushes those which can still improve the incumbent.
    fn enqueue_cutset(&mut self, ub: isize) {
        let best_lb = self.best.value;
        let frontier = &mut self.frontier;
        let open_by_layer = &mut self.open_by_layer;
        self.mdd.drain_cutset(|mut cutset_node| {
            cutset_node.ub = ub.min(cutset_node.ub);
            if cutset_node.ub > best_lb {
                let depth = cutset_node.depth;
                let before = frontier.len();
                frontier.push(cutset_node);
                open_by_layer[depth] += frontier.len() - before;
            }
        });
        self.stats.max_frontier_size = self.stats.max_frontier_size.max(self.frontier.len());
    }

    fn abort_search(&mut self, reason: Reason, current_ub: isize) {
        debug!("search aborted: {reason:?}");
        self.abort_proof = Some(reason);

        let mut ub = current_ub.max(self.best.value);
        if let Some(top) = self.frontier.pop() {
            ub = ub.max(top.ub);
        }
        self.best_ub = ub;
        self.frontier.clear();
        self.cache.clear();
    }

    fn get_workload(&mut self) -> WorkLoad<State> {
        // Can we clean up the cache?
        while self.first_active_layer < self.problem.nb_variables()
            && self.open_by_layer[self.first_active_layer] == 0
        {
            self.cache.clear_layer(self.first_active_layer);
            self.first_active_layer += 1;
        }

        // Do we need to stop
        if self.abort_proof.is_some() {
            return WorkLoad::Aborted;
        }
        if self.cutoff.must_stop() {
            self.abort_search(Reason::CutoffOccurred, isize::MIN);
            return WorkLoad::Aborted;
        }

        while let Some(node) = self.frontier.pop() {
            self.open_by_layer[node.depth] = self.open_by_layer[node.depth].saturating_sub(1);

            // Nothing left can improve the incumbent: the proof is complete
            if node.ub <= self.best.value {
                self.frontier.clear();
                self.open_by_layer.iter_mut().for_each(|o| *o = 0);
                break;
            }
            if !self.cache.must_explore(&node) {
                continue;
            }
            self.cache.update_threshold(Arc::clone(&node.state), node.depth, node.value, true);

            // Consume the current node and process it
            self.stats.nb_iterations += 1;
            self.best_ub = node.ub;
            trace!("explore node: depth {}, ub {}, frontier {}", node.depth, node.ub, self.frontier.len());
            return WorkLoad::WorkItem { node };
        }

        self.best_ub = self.best.value;
        WorkLoad::Complete
    }

    fn gap_limit_reached(&self) -> bool {
        self.params.gap_limit > 0.0
            && !self.frontier.is_empty()
            && self.gap() <= self.params.gap_limit
    }
}

impl<State, D, C> Solver for SequentialSolver<'_, State, D, C>
where
    State: Eq + Hash,
    D: DecisionDiagram<State = State> + Default,
    C: Cache<State> + Default,
{
    fn maximize(&mut self) -> Completion {
        let start = Instant::now();
        self.initialize();
        info!("sequential search started on {} variables", self.problem.nb_variables());

        loop {
            match self.get_workload() {
                WorkLoad::Complete => break,
                WorkLoad::Aborted => break,
                WorkLoad::WorkItem { node } => {
                    let ub = node.ub;
                    if let Err(reason) = self.process_one_node(node) {
                        self.abort_search(reason, ub);
                        break;
                    }
                    if self.gap_limit_reached() {
                        self.abort_search(Reason::GapLimitReached, ub);
                        break;
                    }
                }
            }
        }

        self.best.sort();
        self.stats.elapsed = start.elapsed();
        self.stats.status = SearchStatus::from_outcome(self.abort_proof.is_none(), self.best.solution.is_some());
        self.stats.gap = self.gap();
        info!("sequential search ended: {} | best value: {:?} | bounds: [{}, {}]",
            self.stats, self.best.best_value(), self.best_lower_bound(), self.best_upper_bound());

        Completion { is_exact: self.abort_proof.is_none(), best_value: self.best.best_value() }
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
