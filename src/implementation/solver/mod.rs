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

//! This module provides the solver implementations: the diagram-based
//! branch-and-bound (sequential and parallel), A* and its anytime weighted
//! variant, anytime column search, a plain exact compilation and the
//! single relaxed or restricted compilations.
mod parameters;
mod sequential;
mod parallel;
mod astar;
mod awastar;
mod acs;
mod exact;
mod single;
mod explicit;

pub use parameters::*;
pub use sequential::*;
pub use parallel::*;
pub use astar::*;
pub use awastar::*;
pub use acs::*;
pub use exact::*;
pub use single::*;

use std::sync::Arc;

use log::debug;

use crate::{DecisionDiagram, DefaultMdd, EmptyCache, Problem, SimpleCache, Solution, SubProblem};

/// A type alias to emphasize that this is the solver that should be used by default.
pub type DefaultSolver<'a, State>     = ParallelSolver<'a, State, DefaultMdd<State>, SimpleCache<State>>;

pub type ParCachingSolver<'a, State>  = ParallelSolver<'a, State, DefaultMdd<State>, SimpleCache<State>>;
pub type ParNoCachingSolver<'a, State>= ParallelSolver<'a, State, DefaultMdd<State>, EmptyCache<State>>;

pub type SeqCachingSolver<'a, State>  = SequentialSolver<'a, State, DefaultMdd<State>, SimpleCache<State>>;
pub type SeqNoCachingSolver<'a, State>= SequentialSolver<'a, State, DefaultMdd<State>, EmptyCache<State>>;

/// The subproblem standing for the complete problem
pub(crate) fn root_node<State>(problem: &dyn Problem<State = State>) -> SubProblem<State> {
    SubProblem {
        state: Arc::new(problem.initial_state()),
        value: problem.initial_value(),
        path: vec![],
        ub: isize::MAX,
        depth: 0,
    }
}

/// The best solution known so far and its value. The value is the best lower
/// bound of the search: it can be set without a solution (it is then -inf).
#[derive(Debug, Clone)]
pub(crate) struct Incumbent {
    pub(crate) value: isize,
    pub(crate) solution: Option<Solution>,
}
impl Incumbent {
    pub(crate) fn new() -> Self {
        Self { value: isize::MIN, solution: None }
    }
    /// The value of the best solution (if there is one)
    pub(crate) fn best_value(&self) -> Option<isize> {
        self.solution.as_ref().map(|_| self.value)
    }
    /// Replaces the incumbent iff `value` improves it. Returns true when
    /// that happened.
    pub(crate) fn improve(&mut self, value: isize, solution: Solution) -> bool {
        if value > self.value {
            debug!("new incumbent: {value}");
            self.value = value;
            self.solution = Some(solution);
            true
        } else {
            false
        }
    }
    /// Tries to improve the incumbent with the best exact path of the last
    /// compiled diagram.
    pub(crate) fn improve_with<D: DecisionDiagram>(&mut self, mdd: &D) -> bool {
        match mdd.best_exact_value() {
            Some(value) if value > self.value => match mdd.best_exact_solution() {
                Some(solution) => self.improve(value, solution),
                None => false,
            },
            _ => false,
        }
    }
    /// Orders the decisions of the solution by variable index
    pub(crate) fn sort(&mut self) {
        if let Some(sol) = self.solution.as_mut() {
            sol.sort_unstable_by_key(|d| d.variable.id())
        }
    }
}

/// The knapsack problem is used as a benchmark by the unit tests of all the
/// solvers.
#[cfg(test)]
pub(crate) mod test_knapsack {
    use std::cmp::Ordering;

    use crate::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KnapsackState {
        pub depth: usize,
        pub capacity: usize,
    }

    pub struct Knapsack {
        pub capacity: usize,
        pub profit: Vec<usize>,
        pub weight: Vec<usize>,
    }

    const TAKE_IT: isize = 1;
    const LEAVE_IT_OUT: isize = 0;

    impl Problem for Knapsack {
        type State = KnapsackState;

        fn nb_variables(&self) -> usize {
            self.profit.len()
        }
        fn initial_state(&self) -> Self::State {
            KnapsackState { depth: 0, capacity: self.capacity }
        }
        fn initial_value(&self) -> isize {
            0
        }
        fn transition(&self, state: &Self::State, dec: Decision) -> Self::State {
            let mut ret = *state;
            ret.depth += 1;
            if dec.value == TAKE_IT {
                ret.capacity -= self.weight[dec.variable.id()]
            }
            ret
        }
        fn transition_cost(&self, _: &Self::State, dec: Decision) -> isize {
            self.profit[dec.variable.id()] as isize * dec.value
        }
        fn for_each_in_domain(&self, variable: Variable, state: &Self::State, f: &mut dyn DecisionCallback) {
            if state.capacity >= self.weight[variable.id()] {
                f.apply(Decision { variable, value: TAKE_IT });
            }
            f.apply(Decision { variable, value: LEAVE_IT_OUT });
        }
    }

    pub struct KPRelax;
    impl Relaxation for KPRelax {
        type State = KnapsackState;

        fn merge(&self, states: &mut dyn Iterator<Item = &Self::State>) -> Self::State {
            states.copied()
                .max_by_key(|s| s.capacity)
                .unwrap_or(KnapsackState { depth: 0, capacity: 0 })
        }
        fn relax(&self, _: &Self::State, _: &Self::State, _: &Self::State, _: Decision, cost: isize) -> isize {
            cost
        }
    }

    pub struct KPRanking;
    impl StateRanking for KPRanking {
        type State = KnapsackState;

        fn compare(&self, a: &Self::State, b: &Self::State) -> Ordering {
            a.capacity.cmp(&b.capacity)
        }
    }

    /// The sum of the profits of all the remaining items that still fit
    pub struct KPBound<'a>(pub &'a Knapsack);
    impl FastUpperBound<KnapsackState> for KPBound<'_> {
        fn fast_upper_bound(&self, state: &KnapsackState, free: &VarSet) -> isize {
            free.iter()
                .filter(|v| self.0.weight[v.id()] <= state.capacity)
                .map(|v| self.0.profit[v.id()] as isize)
                .sum()
        }
    }

    pub struct KPDominance;
    impl Dominance for KPDominance {
        type State = KnapsackState;
        type Key = usize;

        fn get_key(&self, state: &KnapsackState) -> Option<usize> {
            Some(state.depth)
        }
        fn is_dominated_or_equal(&self, a: &KnapsackState, b: &KnapsackState) -> bool {
            a.capacity <= b.capacity
        }
    }

    /// The optimum of this instance is 220
    pub fn small() -> Knapsack {
        Knapsack {
            capacity: 50,
            profit  : vec![60, 100, 120],
            weight  : vec![10,  20,  30],
        }
    }

    /// The optimum of this instance is 53 (items 0, 1, 4, 6 and 9)
    pub fn medium() -> Knapsack {
        Knapsack {
            capacity: 20,
            profit  : vec![10,  7, 13,  8, 12, 3, 9, 11, 5, 15],
            weight  : vec![ 3,  2,  6,  4,  5, 1, 4,  5, 3,  6],
        }
    }

    /// Sums the profit of the items that are taken in the given solution
    pub fn profit_of(problem: &Knapsack, solution: &[Decision]) -> isize {
        solution.iter()
            .map(|d| problem.profit[d.variable.id()] as isize * d.value)
            .sum()
    }

    /// Sums the weight of the items that are taken in the given solution
    pub fn weight_of(problem: &Knapsack, solution: &[Decision]) -> usize {
        solution.iter()
            .filter(|d| d.value == TAKE_IT)
            .map(|d| problem.weight[d.variable.id()])
            .sum()
    }

    /// A cutoff which fires immediately
    pub struct KillSwitch;
    impl Cutoff for KillSwitch {
        fn must_stop(&self) -> bool {
            true
        }
    }

    /// Pick at most two of three coins worth 1, 2 and 3. The best pick (5)
    /// reaches the same state as a worse one (4 or 3) at every depth, so a
    /// search must keep the better path to a state it has already seen.
    pub struct Coins;
    impl Problem for Coins {
        type State = usize;

        fn nb_variables(&self) -> usize {
            3
        }
        fn initial_state(&self) -> usize {
            0
        }
        fn initial_value(&self) -> isize {
            0
        }
        fn transition(&self, picked: &usize, dec: Decision) -> usize {
            picked + dec.value as usize
        }
        fn transition_cost(&self, _: &usize, dec: Decision) -> isize {
            dec.value * (dec.variable.id() as isize + 1)
        }
        fn for_each_in_domain(&self, variable: Variable, picked: &usize, f: &mut dyn DecisionCallback) {
            f.apply(Decision { variable, value: 0 });
            if *picked < 2 {
                f.apply(Decision { variable, value: 1 });
            }
        }
    }
}
