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

//! This module provides a solver which compiles one single exact decision
//! diagram for the whole problem. It does not scale beyond small instances
//! but it is a convenient oracle to check the other solvers against.
use std::{hash::Hash, marker::PhantomData, time::Instant};

use log::{debug, info};

use crate::*;
use super::{Incumbent, root_node};

/// Solves the problem by compiling an exact DD of unbounded width.
pub struct ExactSolver<'a, State, D = DefaultMdd<State>>
where
    State: Eq + Hash,
    D: DecisionDiagram<State = State> + Default,
{
    problem: &'a dyn Problem<State = State>,
    relaxation: &'a dyn Relaxation<State = State>,
    ranking: &'a dyn StateRanking<State = State>,
    cutoff: &'a dyn Cutoff,
    var_heu: &'a dyn VariableHeuristic<State>,
    dominance: &'a dyn DominanceChecker<State>,

    best: Incumbent,
    best_ub: isize,
    stats: SearchStatistics,
    _phantom: PhantomData<D>,
}

impl<'a, State, D> ExactSolver<'a, State, D>
where
    State: Eq + Hash,
    D: DecisionDiagram<State = State> + Default,
{
    /// The relaxation and ranking are never used to shrink a layer. The
    /// compiler only needs them to be there.
    pub fn new(
        problem: &'a dyn Problem<State = State>,
        relaxation: &'a dyn Relaxation<State = State>,
        ranking: &'a dyn StateRanking<State = State>,
        cutoff: &'a dyn Cutoff,
    ) -> Self {
        ExactSolver {
            problem,
            relaxation,
            ranking,
            cutoff,
            var_heu: &NaturalOrder,
            dominance: &EmptyDominanceChecker,
            best: Incumbent::new(),
            best_ub: isize::MAX,
            stats: SearchStatistics::default(),
            _phantom: PhantomData,
        }
    }
    pub fn with_variable_heuristic(mut self, var_heu: &'a dyn VariableHeuristic<State>) -> Self {
        self.var_heu = var_heu;
        self
    }
    pub fn with_dominance(mut self, dominance: &'a dyn DominanceChecker<State>) -> Self {
        self.dominance = dominance;
        self
    }
}

impl<State, D> Solver for ExactSolver<'_, State, D>
where
    State: Eq + Hash,
    D: DecisionDiagram<State = State> + Default,
{
    fn maximize(&mut self) -> Completion {
        let start = Instant::now();
        info!("exact compilation started on {} variables", self.problem.nb_variables());

        let root = root_node(self.problem);
        let cache = EmptyCache::new();
        let input = CompilationInput {
            comp_type: CompilationType::Exact,
            problem: self.problem,
            relaxation: self.relaxation,
            ranking: self.ranking,
            var_heu: self.var_heu,
            upper_bound: &NoUpperBound,
            reduction: &CostBased,
            cutoff: self.cutoff,
            max_width: usize::MAX,
            residual: &root,
            best_lb: self.best.value,
            cutset_type: CutsetType::LastExactLayer,
            cache: &cache,
            dominance: self.dominance,
        };

        self.stats = SearchStatistics::default();
        self.stats.nb_iterations = 1;
        let mut mdd = D::default();
        let proved = match mdd.compile(&input) {
            Ok(_) => {
                self.best.improve_with(&mdd);
                self.best_ub = self.best.value;
                true
            },
            Err(reason) => {
                debug!("search aborted: {reason:?}");
                self.best_ub = isize::MAX;
                false
            },
        };

        self.best.sort();
        self.stats.elapsed = start.elapsed();
        self.stats.status = SearchStatus::from_outcome(proved, self.best.solution.is_some());
        self.stats.gap = self.gap();
        info!("exact compilation ended: {} | best value: {:?}", self.stats, self.best.best_value());

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
