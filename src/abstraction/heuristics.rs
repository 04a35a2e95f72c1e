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

//! This module defines the traits used to encapsulate solver heuristics.
//!
//! Namely, it defines :
//!
//!  - the `WidthHeuristic` which is used to control the maximum width of an MDD
//!  - the `StateRanking` heuristic which is used to guess the nodes promisingess
//!  - the `VariableHeuristic` which decides what variable to branch on next
//!  - the `FastUpperBound` which cheaply bounds what a state can still earn
//!  - the `StateDistance` and `StateCoordinates` which let clustering based
//!    reduction strategies compare states
//!  - the `Cutoff` heuristic which is used to impose a stopping criterion on the
//!    solver resolution.

use std::cmp::Ordering;

use crate::{SubProblem, Variable, VarSet};

/// This trait enclapsulates the behavior of the heuristic that determines
/// the maximum permitted width of a decision diagram.
///
/// Unlike `Problem`, `Relaxation` and `StateRanking`, the `WidthHeuristic`
/// uses a type parameter rather than an associated type to know about the
/// state. This is because it makes sense to define a width heuristic that is
/// applicable regardless of the problem being solved (`FixedWidth` and
/// `NbUnassignedWidth` are two examples of such heuristics).
pub trait WidthHeuristic<State> {
    /// Estimates a good maximum width for an MDD rooted in the given state
    fn max_width(&self, state: &SubProblem<State>) -> usize;
}

/// A state ranking is an heuristic that imposes a partial order on states.
/// This order is used by the framework as a means to discriminate the most
/// promising nodes from the least promising ones when restricting or relaxing
/// a layer from some given DD.
/// According to this ordering, greater means better and hence more likely to
/// be kept after restriction or relaxation.
pub trait StateRanking {
    /// As is the case for `Problem` and `Relaxation`, a `StateRanking` must
    /// tell the kind of states it is able to operate on.
    type State;

    /// This method compares two states and determines which is the most
    /// desirable to keep. In this ordering, greater means better.
    fn compare(&self, a: &Self::State, b: &Self::State) -> Ordering;
}

/// A subproblem ranking is an heuristic that imposes a partial order on
/// subproblems on the solver frontier. This order is used by the framework
/// as a means to impose a given ordering on the nodes that are popped from
/// the solver frontier.
pub trait SubProblemRanking {
    /// As is the case for `Problem` and `Relaxation`, a `SubProblemRanking`
    /// must tell the kind of states it is able to operate on.
    type State;

    /// This method compares two subproblems and determines which is the one
    /// that needs to be popped off the frontier first. In this ordering, greater
    /// means more likely to be popped first.
    fn compare(&self, a: &SubProblem<Self::State>, b: &SubProblem<Self::State>) -> Ordering;
}

/// Decides what variable is to be branched on when the next layer of a
/// decision diagram is developed. The states of the nodes composing the
/// layer that is about to be expanded are made available through an iterator.
///
/// Returning `None` while some variable remains free means that the diagram
/// must stop developing.
pub trait VariableHeuristic<State> {
    /// Returns the next variable to branch on, picked among `free`.
    fn next_variable(
        &self,
        depth: usize,
        free: &VarSet,
        next_layer: &mut dyn Iterator<Item = &State>,
    ) -> Option<Variable>;
}

/// A fast upper bound is a cheap, problem specific, estimate of the best value
/// that can still be collected when starting from some state and deciding all
/// of the `free` variables.
///
/// # Soundness
/// The value returned must never under estimate the true optimum reachable
/// from `state`. Returning `isize::MAX` is always correct (albeit useless).
///
/// # Note
/// The engine always maximizes. A minimization problem is expected to negate
/// its objective, which makes its fast lower bound the fast upper bound of the
/// negated problem.
pub trait FastUpperBound<State> {
    /// Returns an upper bound on the value that can be added to the value
    /// of `state` while deciding the `free` variables.
    fn fast_upper_bound(&self, state: &State, free: &VarSet) -> isize;
}

/// A metric on the states of a problem. This is what the clustering based
/// reduction strategies use to decide which states to merge together.
pub trait StateDistance {
    type State;

    /// Returns a non negative distance between `a` and `b`. It is expected
    /// to be symmetric and to be zero when both states are equal.
    fn distance(&self, a: &Self::State, b: &Self::State) -> f64;
}

/// Projects the states of a problem onto a point of a euclidean space.
/// All points must have the same dimension.
pub trait StateCoordinates {
    type State;

    fn coordinates(&self, state: &Self::State) -> Vec<f64>;
}

/// This trait encapsulates a criterion (external to the solver) which imposes
/// to stop searching for a better solution. Typically, this is done to grant
/// a given time budget to the search.
pub trait Cutoff {
    /// Returns true iff the criterion is met and the search must stop.
    fn must_stop(&self) -> bool;
}
