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
//! This module provides the solvers which compile one single bounded width
//! decision diagram for the whole problem. A relaxed diagram yields an upper
//! bound on the optimum, a restricted one yields a feasible solution. Neither
//! explores a frontier, so they are only proved optimal when the diagram they
//! compiled happens to be exact.
use std::{hash::Hash, marker::PhantomData, time::Instant};

use log::{debug, info};

use crate::*;
use super::{Incumbent, root_node};

/// Compiles one relaxed or one restricted DD rooted in the initial state.
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
/// # struct Fewest;
/// # impl Relaxation for Fewest {
/// #     type State = usize;
/// #     fn merge(&self, s: &mut dyn Iterator<Item = &usize>) -> usize { s.copied().min().unwrap_or(0) }
/// #     fn relax(&self, _: &usize, _: &usize, _: &usize, _: Decision, cost: isize) -> isize { cost }
/// # }
/// # struct FewestFirst;
/// # impl StateRanking for FewestFirst {
/// #     type State = usize;
/// #     fn compare(&self, a: &usize, b: &usize) -> std::cmp::Ordering { b.cmp(a) }
/// # }
/// // pick at most two of three coins worth 1, 2 and 3
/// let width = FixedWidth(100);
/// let mut solver: SingleDiagramSolver<usize> =
///     SingleDiagramSolver::relaxed(&Coins, &Fewest, &FewestFirst, &width, &NoCutoff).unwrap();
/// // the diagram is wide enough to be exact
/// assert_eq!(Completion { is_exact: true, best_value: Some(5) }, solver.maximize());
/// ```
pub struct SingleDiagramSolver<'a, State, D = DefaultMdd<State>>
where
    State: Eq + Hash,
    D: DecisionDiagram<State = State> + Default,
{
    comp_type: CompilationType,
    problem: &'a dyn Problem<State = State>,
    relaxation: &'a dyn Relaxation<State = State>,
    ranking: &'a dyn StateRanking<State = State>,
    width_heu: &'a dyn WidthHeuristic<State>,
    cutoff: &'a dyn Cutoff,
    var_heu: &'a dyn VariableHeuristic<State>,
    upper_bound: &'a dyn FastUpperBound<State>,
    reduction: &'a dyn ReductionStrategy<State>,
    dominance: &'a dyn DominanceChecker<State>,

    best: Incumbent,
    best_ub: isize,
    stats: SearchStatistics,
    _phantom: PhantomData<D>,
}

impl<'a, State, D> SingleDiagramSolver<'a, State, D>
where
    State: Eq + Hash,
    D: DecisionDiagram<State = State> + Default,
{
    /// A solver whose diagram bounds the optimum from above. Fails with
    /// `Error::InvalidWidth` when the width heuristic allows no node at all.
    pub fn relaxed(
        problem: &'a dyn Problem<State = State>,
        relaxation: &'a dyn Relaxation<State = State>,
        ranking: &'a dyn StateRanking<State = State>,
        width_heu: &'a dyn WidthHeuristic<State>,
        cutoff: &'a dyn Cutoff,
    ) -> Result<Self, Error> {
        Self::new(CompilationType::Relaxed, problem, relaxation, ranking, width_heu, cutoff)
    }
    /// A solver whose diagram only contains feasible solutions. Fails with
    /// `Error::InvalidWidth` when the width heuristic allows no node at all.
    pub fn restricted(
        problem: &'a dyn Problem<State = State>,
        relaxation: &'a dyn Relaxation<State = State>,
        ranking: &'a dyn StateRanking<State = State>,
        width_heu: &'a dyn WidthHeuristic<State>,
        cutoff: &'a dyn Cutoff,
    ) -> Result<Self, Error> {
        Self::new(CompilationType::Restricted, problem, relaxation, ranking, width_heu, cutoff)
    }

    fn new(
        comp_type: CompilationType,
        problem: &'a dyn Problem<State = State>,
        relaxation: &'a dyn Relaxation<State = State>,
        ranking: &'a dyn StateRanking<State = State>,
        width_heu: &'a dyn WidthHeuristic<State>,
        cutoff: &'a dyn Cutoff,
    ) -> Result<Self, Error> {
        if width_heu.max_width(&root_node(problem)) == 0 {
            return Err(Error::InvalidWidth);
        }
        Ok(SingleDiagramSolver {
            comp_type,
            problem,
            relaxation,
            ranking,
            width_heu,
            cutoff,
            var_heu: &NaturalOrder,
            upper_bound: &NoUpperBound,
            reduction: &CostBased,
            dominance: &EmptyDominanceChecker,
            best: Incumbent::new(),
            best_ub: isize::MAX,
            stats: SearchStatistics::default(),
            _phantom: PhantomData,
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
}

impl<State, D> Solver for SingleDiagramSolver<'_, State, D>
where
    State: Eq + Hash,
    D: DecisionDiagram<State = State> + Default,
{
    fn maximize(&mut self) -> Completion {
        let start = Instant::now();
        info!("{:?} compilation started on {} variables", self.comp_type, self.problem.nb_variables());

        let root = root_node(self.problem);
        let cache = EmptyCache::new();
        let input = CompilationInput {
            comp_type: self.comp_type,
            problem: self.problem,
            relaxation: self.relaxation,
            ranking: self.ranking,
            var_heu: self.var_heu,
            upper_bound: self.upper_bound,
            reduction: self.reduction,
            cutoff: self.cutoff,
            max_width: self.width_heu.max_width(&root),
            residual: &root,
            best_lb: self.best.value,
            cutset_type: CutsetType::LastExactLayer,
            cache: &cache,
            dominance: self.dominance,
        };

        self.stats = SearchStatistics::default();
        self.stats.nb_iterations = 1;
        let mut mdd = D::default();
        self.best_ub = match mdd.compile(&input) {
            Ok(Completion { is_exact, .. }) => {
                self.best.improve_with(&mdd);
                match self.comp_type {
                    _ if is_exact => self.best.value,
                    // nothing left in the diagram means nothing beats the incumbent
                    CompilationType::Relaxed => mdd.best_value().map_or(self.best.value, |ub| ub.max(self.best.value)),
                    _ => isize::MAX,
                }
            },
            Err(reason) => {
                debug!("search aborted: {reason:?}");
                isize::MAX
            },
        };
        let proved = self.best_ub <= self.best.value;

        self.best.sort();
        self.stats.elapsed = start.elapsed();
        self.stats.status = SearchStatus::from_outcome(proved, self.best.solution.is_some());
        self.stats.gap = self.gap();
        info!("{:?} compilation ended: {} | best value: {:?} | bounds: [{}, {}]",
            self.comp_type, self.stats, self.best.best_value(), self.best.value, self.best_ub);

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
