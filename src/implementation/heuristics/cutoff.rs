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

//! This module provides the implementation of various cutoff heuristics that can
//! be used to tune the behavior of a solver.

use std::time::{Duration, Instant};

use crate::Cutoff;

/// _This is the default cutoff heuristic._ It imposes that the search goes
/// proves optimality before to stop.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoCutoff;
impl Cutoff for NoCutoff {
    fn must_stop(&self) -> bool {false}
}

/// This cutoff allows one to specify a maximum time budget to solve the problem.
/// Once the time budget is elapsed, the search stops and the best solution that
/// has been found (so far) is returned.
///
/// # Example
/// ```
/// # use ddsolve::*;
/// # use std::time::Duration;
/// let cutoff = TimeBudget::new(Duration::from_secs(30));
/// assert!(!cutoff.must_stop());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    deadline: Instant,
}
impl TimeBudget {
    pub fn new(budget: Duration) -> Self {
        Self::until(Instant::now() + budget)
    }
    /// Creates a budget that expires at the given instant
    pub fn until(deadline: Instant) -> Self {
        TimeBudget { deadline }
    }
}
impl Cutoff for TimeBudget {
    fn must_stop(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

#[cfg(test)]
mod test_cutoff {
    use std::time::{Duration, Instant};

    use crate::{Cutoff, NoCutoff, TimeBudget};

    #[test]
    fn no_cutoff_never_stops() {
        assert!(!NoCutoff.must_stop());
    }
    #[test]
    fn time_budget_is_not_exhausted_immediately() {
        let budget = TimeBudget::new(Duration::from_secs(3600));
        assert!(!budget.must_stop());
    }
    #[test]
    fn time_budget_stops_once_the_deadline_has_passed() {
        let budget = TimeBudget::until(Instant::now());
        std::thread::sleep(Duration::from_millis(1));
        assert!(budget.must_stop());
    }
}
