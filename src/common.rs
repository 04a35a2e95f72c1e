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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client library is likely to work with.

use std::{fmt, sync::Arc, time::Duration};

use bit_set::BitSet;

// ----------------------------------------------------------------------------
// --- VARIABLE ---------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes a variable from the optimization problem at hand.
/// In this case, each variable is assumed to be identified with an integer
/// ranging from 0 until `problem.nb_variables()`
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Variable(pub usize);
impl Variable {
    #[inline]
    /// This function returns the id (numeric value) of the variable.
    ///
    /// # Examples:
    /// ```
    /// # use ddsolve::Variable;
    /// assert_eq!(0, Variable(0).id());
    /// assert_eq!(3, Variable(3).id());
    /// ```
    pub fn id(self) -> usize {
        self.0
    }
}

// ----------------------------------------------------------------------------
// --- VARSET -----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The set of variables that have not been assigned yet along some path of a
/// decision diagram. This is what the variable heuristics and the fast upper
/// bounds get to see about the residual problem.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VarSet(pub BitSet);
impl VarSet {
    /// Returns a set containing all the variables in `0..n`
    pub fn all(n: usize) -> Self {
        let mut bs = BitSet::with_capacity(n);
        for i in 0..n {
            bs.insert(i);
        }
        VarSet(bs)
    }
    /// Returns an empty set of variables
    pub fn empty() -> Self {
        VarSet(BitSet::new())
    }
    /// Adds the given variable to the set
    pub fn add(&mut self, v: Variable) {
        self.0.insert(v.0);
    }
    /// Removes the given variable from the set
    pub fn remove(&mut self, v: Variable) {
        self.0.remove(v.0);
    }
    /// Returns true iff the set contains the given variable
    pub fn contains(&self, v: Variable) -> bool {
        self.0.contains(v.0)
    }
    /// Returns the number of variables in the set
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Returns true iff no variable remains in the set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Iterates over the variables of the set, in increasing order
    pub fn iter(&self) -> impl Iterator<Item = Variable> + '_ {
        self.0.iter().map(Variable)
    }
    /// Returns the set of the variables that are not decided upon in `path`
    /// (assuming the problem has `n` variables).
    pub fn unassigned(n: usize, path: &[Decision]) -> Self {
        let mut vars = Self::all(n);
        for d in path {
            vars.remove(d.variable);
        }
        vars
    }
}

// ----------------------------------------------------------------------------
// --- DECISION ---------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This denotes a decision that was made during the search. It affects a given
/// `value` to the specified `variable`. Any given `Decision` should be
/// understood as ```[[ variable = value ]]````
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Decision {
    pub variable : Variable,
    pub value    : isize
}

// ----------------------------------------------------------------------------
// --- SUBPROBLEM -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A subproblem is a residual problem that must be solved in order to complete the
/// resolution of the original problem which had been defined.
///
/// # Note:
/// Subproblems are automatically instanciated from nodes in the exact custsets
/// of relaxed decision diagrams. If you are only discovering the API, rest
/// assured.. you don't need to implement any subproblem yourself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubProblem<T> {
    /// The root state of this sub problem
    pub state: Arc<T>,
    /// The root value of this sub problem
    pub value: isize,
    /// The path to traverse to reach this subproblem from the root
    /// of the original problem
    pub path: Vec<Decision>,
    /// An upper bound on the objective reachable in this subproblem
    pub ub: isize,
    /// The depth of the subproblem with respect to the root problem
    pub depth: usize,
}

// ----------------------------------------------------------------------------
// --- THRESHOLD --------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A threshold is a value that can be stored during the execution of a branch
/// and bound algorithm. It is associated with a single exact state and is used
/// to determine whether a new node with the same state is worth exploring.
///
/// Thresholds are ordered by value first. For a same value, an explored
/// threshold is greater than an unexplored one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Threshold {
    /// The value of the threshold
    pub value: isize,
    /// Whether a node with the given value has already been explored
    pub explored: bool,
}

// ----------------------------------------------------------------------------
// --- Results ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A reason explaining why the mdd stopped developing
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Reason {
    /// It stopped because the configured cutoff criterion was met
    CutoffOccurred,
    /// The search stopped because the optimality gap fell below the
    /// configured limit. This one is never returned by a compilation.
    GapLimitReached,
}

/// The outcome of an mdd development
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// is the given solution exact (proved optimal for the given [sub-]problem)?
    /// or is it an approximation ?
    pub is_exact: bool,
    /// if present the value of the best solution derived from this mdd
    pub best_value: Option<isize>,
}

/// The status of a search once it has come to an end.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SearchStatus {
    /// The search completed and proved the incumbent to be optimal
    Optimal,
    /// The search was interrupted, but a feasible solution is known
    Sat,
    /// The search completed without finding any feasible solution
    Unsat,
    /// The search was interrupted before any feasible solution was found
    Unknown,
}
impl SearchStatus {
    /// Derives the status of a search from whether or not the proof was
    /// completed and whether or not an incumbent solution exists.
    pub fn from_outcome(proved: bool, has_solution: bool) -> Self {
        match (proved, has_solution) {
            (true,  true ) => SearchStatus::Optimal,
            (true,  false) => SearchStatus::Unsat,
            (false, true ) => SearchStatus::Sat,
            (false, false) => SearchStatus::Unknown,
        }
    }
}
impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStatus::Optimal => write!(f, "OPTIMAL"),
            SearchStatus::Sat     => write!(f, "SAT"),
            SearchStatus::Unsat   => write!(f, "UNSAT"),
            SearchStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Summary of one run of a solver
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SearchStatistics {
    /// The number of subproblems that have been popped and explored
    pub nb_iterations: usize,
    /// The largest size reached by the solver frontier (or open set)
    pub max_frontier_size: usize,
    /// The wall clock time spent in the search
    pub elapsed: Duration,
    /// How did the search end ?
    pub status: SearchStatus,
    /// The optimality gap at the end of the search
    pub gap: f32,
}
impl Default for SearchStatistics {
    fn default() -> Self {
        Self {
            nb_iterations: 0,
            max_frontier_size: 0,
            elapsed: Duration::ZERO,
            status: SearchStatus::Unknown,
            gap: 1.0,
        }
    }
}
impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status: {} | iterations: {} | max frontier: {} | elapsed: {:.3?} | gap: {:.4}",
            self.status, self.nb_iterations, self.max_frontier_size, self.elapsed, self.gap)
    }
}

// ----------------------------------------------------------------------------
// --- ERRORS -----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The configuration errors which are detected when a solver (or one of its
/// components) is set up. Nothing in the search loop itself ever fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The maximum width of the decision diagrams must be at least one
    #[error("invalid width: the maximum width of a decision diagram must be >= 1")]
    InvalidWidth,
    /// A parallel solver needs at least one worker
    #[error("at least one worker thread is required")]
    NoWorkerThread,
    /// The column width of an anytime column search must be at least one
    #[error("invalid column width: at least one node per column is required")]
    InvalidColumnWidth,
    /// The gap limit must lie in [0, 1]
    #[error("invalid gap limit {0}: expected a value in [0, 1]")]
    InvalidGapLimit(f32),
    /// A ratio must lie in [0, 1]
    #[error("invalid ratio {0}: expected a value in [0, 1]")]
    InvalidRatio(f64),
    /// The weight of the upper bound in a weighted A* must lie in [0, 1]
    #[error("invalid weight {0}: expected a value in [0, 1]")]
    InvalidWeight(f64),
    /// An iterative procedure needs to be granted at least one iteration
    #[error("invalid iteration limit: at least one iteration is required")]
    InvalidIterationLimit,
    /// A builder was not given a mandatory field
    #[error("missing configuration field: {0}")]
    UninitializedField(&'static str),
}
impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(e: derive_builder::UninitializedFieldError) -> Self {
        Error::UninitializedField(e.field_name())
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################





#[cfg(test)]
mod test_error {
    use crate::Error;

    #[test]
    fn errors_have_a_readable_message() {
        assert!(Error::InvalidWidth.to_string().contains("width"));
        assert!(Error::InvalidGapLimit(2.0).to_string().contains('2'));
    }
}
