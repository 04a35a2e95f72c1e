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

//! # ddsolve
//! ddsolve is a generic engine to solve combinatorial optimization problems
//! with decision diagrams. You describe your problem as a dynamic program (see
//! `Problem`) along with a `Relaxation` which tells how several states can be
//! merged into one standing for them all. The engine then compiles bounded
//! width decision diagrams: restricted ones to find good solutions, relaxed
//! ones to bound what remains to be found. Those are combined in a branch and
//! bound which proves the optimality of the best solution it finds.
//!
//! The sole condition to ensure the correctness of the algorithm is that the
//! merged state must be an over approximation of all what is feasible from
//! the states it replaces.
//!
//! Besides the diagram based branch and bound (sequential or parallel), the
//! same model can be solved with an `AStarSolver`, its anytime weighted
//! variant `AwAStarSolver`, an `AcsSolver` (anytime column search) or an
//! `ExactSolver` which compiles one exact diagram. A `SingleDiagramSolver`
//! compiles one relaxed (or restricted) diagram to get a quick bound (or a
//! quick solution).
//!
//! ## Quick Example
//! The following solves a small binary knapsack. The state of a node is the
//! remaining capacity of the sack (along with the depth of the node, which is
//! handy to define a dominance relation).
//!
//! ```
//! use ddsolve::*;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! struct KnapsackState {
//!     depth: usize,
//!     capacity: usize,
//! }
//!
//! struct Knapsack {
//!     capacity: usize,
//!     profit: Vec<usize>,
//!     weight: Vec<usize>,
//! }
//!
//! impl Problem for Knapsack {
//!     type State = KnapsackState;
//!
//!     fn nb_variables(&self) -> usize {
//!         self.profit.len()
//!     }
//!     fn initial_state(&self) -> KnapsackState {
//!         KnapsackState { depth: 0, capacity: self.capacity }
//!     }
//!     fn initial_value(&self) -> isize {
//!         0
//!     }
//!     fn transition(&self, state: &KnapsackState, dec: Decision) -> KnapsackState {
//!         KnapsackState {
//!             depth: state.depth + 1,
//!             capacity: state.capacity - self.weight[dec.variable.id()] * dec.value as usize,
//!         }
//!     }
//!     fn transition_cost(&self, _: &KnapsackState, dec: Decision) -> isize {
//!         self.profit[dec.variable.id()] as isize * dec.value
//!     }
//!     fn for_each_in_domain(&self, variable: Variable, state: &KnapsackState, f: &mut dyn DecisionCallback) {
//!         if state.capacity >= self.weight[variable.id()] {
//!             f.apply(Decision { variable, value: 1 });
//!         }
//!         f.apply(Decision { variable, value: 0 });
//!     }
//! }
//!
//! /// Keeping the largest capacity allows everything the merged states allow
//! struct KPRelax;
//! impl Relaxation for KPRelax {
//!     type State = KnapsackState;
//!
//!     fn merge(&self, states: &mut dyn Iterator<Item = &KnapsackState>) -> KnapsackState {
//!         states.copied()
//!             .max_by_key(|s| s.capacity)
//!             .unwrap_or(KnapsackState { depth: 0, capacity: 0 })
//!     }
//!     fn relax(&self, _: &KnapsackState, _: &KnapsackState, _: &KnapsackState, _: Decision, cost: isize) -> isize {
//!         cost
//!     }
//! }
//!
//! /// The states with the most room left are the most promising
//! struct KPRanking;
//! impl StateRanking for KPRanking {
//!     type State = KnapsackState;
//!
//!     fn compare(&self, a: &KnapsackState, b: &KnapsackState) -> std::cmp::Ordering {
//!         a.capacity.cmp(&b.capacity)
//!     }
//! }
//!
//! let problem = Knapsack {
//!     capacity: 50,
//!     profit  : vec![60, 100, 120],
//!     weight  : vec![10,  20,  30],
//! };
//! let width = FixedWidth(2);
//! let mut frontier = SimpleFrontier::new(MaxUB::new(&KPRanking));
//! let mut solver = DefaultSolver::new(&problem, &KPRelax, &KPRanking, &width, &NoCutoff, &mut frontier)
//!     .expect("a width of 2 is valid");
//!
//! let outcome = solver.maximize();
//! assert_eq!(Completion { is_exact: true, best_value: Some(220) }, outcome);
//! assert_eq!(SearchStatus::Optimal, solver.statistics().status);
//!
//! for decision in solver.best_solution().unwrap_or_default() {
//!     if decision.value == 1 {
//!         println!("take item {}", decision.variable.id());
//!     }
//! }
//! ```
//!
//! ## Getting a grasp on the codebase
//! The core abstractions are `Problem` and `Relaxation`. Most of the rest is
//! about tuning: the `WidthHeuristic` bounds the size of the diagrams, the
//! `StateRanking` and the `ReductionStrategy` decide which nodes are merged
//! or dropped, a `FastUpperBound` and a `Dominance` relation prune the search,
//! and a `Cutoff` decides when to give up. The solvers log their progress
//! through the `log` facade.

mod common;
mod abstraction;
mod implementation;

pub use common::*;
pub use abstraction::*;
pub use implementation::*;
