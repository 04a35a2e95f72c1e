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

//! This module provides the knobs which tune the behavior of the solvers.

use derive_builder::Builder;

use crate::Error;

/// The parameters of a search. You will typically want to create it with
/// a `SearchParametersBuilder`, which checks the consistency of the values
/// you provide.
///
/// # Example
/// ```
/// # use ddsolve::*;
/// let params = SearchParametersBuilder::default()
///     .nb_threads(2)
///     .gap_limit(0.01)
///     .build()
///     .unwrap();
/// assert_eq!(5, params.column_width);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
#[builder(build_fn(validate = "Self::validate", error = "Error"))]
pub struct SearchParameters {
    /// The number of workers spawned by the parallel solver
    #[builder(default = "num_cpus::get()")]
    pub nb_threads: usize,
    /// The branch-and-bound solvers stop as soon as the gap between their
    /// bounds falls below this limit. A limit of 0 disables the check.
    #[builder(default = "0.0")]
    pub gap_limit: f32,
    /// The number of nodes an anytime column search pops from each layer
    /// in one round
    #[builder(default = "5")]
    pub column_width: usize,
    /// The share of the fast upper bound which counts in the priority of a
    /// node explored by the anytime weighted A*
    #[builder(default = "0.5")]
    pub weight: f64,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            nb_threads: num_cpus::get(),
            gap_limit: 0.0,
            column_width: 5,
            weight: 0.5,
        }
    }
}

impl SearchParametersBuilder {
    fn validate(&self) -> Result<(), Error> {
        if let Some(0) = self.nb_threads {
            return Err(Error::NoWorkerThread);
        }
        if let Some(0) = self.column_width {
            return Err(Error::InvalidColumnWidth);
        }
        if let Some(w) = self.weight {
            if !(0.0..=1.0).contains(&w) {
                return Err(Error::InvalidWeight(w));
            }
        }
        match self.gap_limit {
            Some(gap) if !(0.0..=1.0).contains(&gap) => Err(Error::InvalidGapLimit(gap)),
            _ => Ok(()),
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_parameters {
    use crate::*;

    #[test]
    fn default_parameters_use_all_cores_and_no_gap() {
        let params = SearchParametersBuilder::default().build().unwrap();
        assert_eq!(num_cpus::get(), params.nb_threads);
        assert_eq!(0.0, params.gap_limit);
        assert_eq!(5, params.column_width);
        assert_eq!(0.5, params.weight);
        assert_eq!(SearchParameters::default(), params);
    }
    #[test]
    fn zero_threads_is_a_configuration_error() {
        let params = SearchParametersBuilder::default().nb_threads(0).build();
        assert_eq!(Err(Error::NoWorkerThread), params);
    }
    #[test]
    fn zero_column_width_is_a_configuration_error() {
        let params = SearchParametersBuilder::default().column_width(0).build();
        assert_eq!(Err(Error::InvalidColumnWidth), params);
    }
    #[test]
    fn gap_limit_must_lie_between_zero_and_one() {
        let params = SearchParametersBuilder::default().gap_limit(1.5).build();
        assert_eq!(Err(Error::InvalidGapLimit(1.5)), params);
        let params = SearchParametersBuilder::default().gap_limit(-0.1).build();
        assert_eq!(Err(Error::InvalidGapLimit(-0.1)), params);
        let params = SearchParametersBuilder::default().gap_limit(f32::NAN).build();
        assert!(matches!(params, Err(Error::InvalidGapLimit(_))));

        let params = SearchParametersBuilder::default().gap_limit(1.0).build();
        assert!(params.is_ok());
    }
    #[test]
    fn weight_must_lie_between_zero_and_one() {
        let params = SearchParametersBuilder::default().weight(2.0).build();
        assert_eq!(Err(Error::InvalidWeight(2.0)), params);
        let params = SearchParametersBuilder::default().weight(0.0).build();
        assert_eq!(0.0, params.unwrap().weight);
    }
}
