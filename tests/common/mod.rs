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

//! The models shared by the integration tests: a binary knapsack and a
//! minimum set cover (stated as the maximization of minus the number of sets
//! being used). Both come with brute force oracles.
#![allow(dead_code)]

use std::cmp::Ordering;

use ddsolve::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Installs a logger so that `RUST_LOG=debug cargo test` shows the search
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ----------------------------------------------------------------------------
// --- KNAPSACK ---------------------------------------------------------------
// ----------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KnapsackState {
    pub depth: usize,
    pub capacity: usize,
}

#[derive(Debug, Clone)]
pub struct Knapsack {
    pub capacity: usize,
    pub profit: Vec<usize>,
    pub weight: Vec<usize>,
}

impl Knapsack {
    /// The textbook instance, its optimum is 220
    pub fn small() -> Self {
        Knapsack { capacity: 50, profit: vec![60, 100, 120], weight: vec![10, 20, 30] }
    }
    pub fn random(nb_items: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let profit: Vec<usize> = (0..nb_items).map(|_| rng.random_range(1..=30)).collect();
        let weight: Vec<usize> = (0..nb_items).map(|_| rng.random_range(1..=15)).collect();
        let capacity = weight.iter().sum::<usize>() / 2;
        Knapsack { capacity, profit, weight }
    }
    /// Enumerates all subsets of the items
    pub fn brute_force(&self) -> isize {
        let n = self.profit.len();
        (0_usize..1 << n)
            .filter(|subset| self.weight_of_subset(*subset) <= self.capacity)
            .map(|subset| (0..n).filter(|i| subset & (1 << i) != 0).map(|i| self.profit[i] as isize).sum::<isize>())
            .max()
            .unwrap_or(0)
    }
    fn weight_of_subset(&self, subset: usize) -> usize {
        (0..self.weight.len()).filter(|i| subset & (1 << i) != 0).map(|i| self.weight[i]).sum()
    }
    /// Checks the solution is a complete feasible assignment and returns its value
    pub fn evaluate(&self, solution: &[Decision]) -> isize {
        assert_eq!(self.profit.len(), solution.len());
        let weight: usize = solution.iter().map(|d| self.weight[d.variable.id()] * d.value as usize).sum();
        assert!(weight <= self.capacity);
        solution.iter().map(|d| self.profit[d.variable.id()] as isize * d.value).sum()
    }
}

impl Problem for Knapsack {
    type State = KnapsackState;

    fn nb_variables(&self) -> usize {
        self.profit.len()
    }
    fn initial_state(&self) -> KnapsackState {
        KnapsackState { depth: 0, capacity: self.capacity }
    }
    fn initial_value(&self) -> isize {
        0
    }
    fn transition(&self, state: &KnapsackState, dec: Decision) -> KnapsackState {
        KnapsackState {
            depth: state.depth + 1,
            capacity: state.capacity - self.weight[dec.variable.id()] * dec.value as usize,
        }
    }
    fn transition_cost(&self, _: &KnapsackState, dec: Decision) -> isize {
        self.profit[dec.variable.id()] as isize * dec.value
    }
    fn for_each_in_domain(&self, variable: Variable, state: &KnapsackState, f: &mut dyn DecisionCallback) {
        if state.capacity >= self.weight[variable.id()] {
            f.apply(Decision { variable, value: 1 });
        }
        f.apply(Decision { variable, value: 0 });
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KPRelax;
impl Relaxation for KPRelax {
    type State = KnapsackState;

    fn merge(&self, states: &mut dyn Iterator<Item = &KnapsackState>) -> KnapsackState {
        states.copied()
            .max_by_key(|s| s.capacity)
            .unwrap_or(KnapsackState { depth: 0, capacity: 0 })
    }
    fn relax(&self, _: &KnapsackState, _: &KnapsackState, _: &KnapsackState, _: Decision, cost: isize) -> isize {
        cost
    }
}

pub struct KPRanking;
impl StateRanking for KPRanking {
    type State = KnapsackState;

    fn compare(&self, a: &KnapsackState, b: &KnapsackState) -> Ordering {
        a.capacity.cmp(&b.capacity)
    }
}

/// The sum of the profits of the free items that still fit
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

pub struct KPDistance;
impl StateDistance for KPDistance {
    type State = KnapsackState;

    fn distance(&self, a: &KnapsackState, b: &KnapsackState) -> f64 {
        (a.capacity as f64 - b.capacity as f64).abs()
    }
}

pub struct KPCoordinates;
impl StateCoordinates for KPCoordinates {
    type State = KnapsackState;

    fn coordinates(&self, state: &KnapsackState) -> Vec<f64> {
        vec![state.capacity as f64]
    }
}

// ----------------------------------------------------------------------------
// --- SET COVER --------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The elements still to be covered and the sets not decided upon yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoverState {
    pub uncovered: u64,
    pub free: u64,
}

/// There is one variable per set: taking the set costs one
#[derive(Debug, Clone)]
pub struct SetCover {
    pub nb_elements: usize,
    pub sets: Vec<u64>,
}

impl SetCover {
    /// Six elements, six sets and one of them covers everything
    pub fn tiny() -> Self {
        SetCover {
            nb_elements: 6,
            sets: vec![0b000011, 0b001100, 0b110000, 0b010101, 0b101010, 0b111111],
        }
    }
    /// Every element belongs to at least one set
    pub fn random(nb_elements: usize, nb_sets: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sets: Vec<u64> = (0..nb_sets)
            .map(|_| (0..nb_elements).filter(|_| rng.random_bool(0.3)).fold(0, |s, e| s | 1 << e))
            .collect();
        for e in 0..nb_elements {
            if sets.iter().all(|s| s & (1 << e) == 0) {
                let j = rng.random_range(0..nb_sets);
                sets[j] |= 1 << e;
            }
        }
        SetCover { nb_elements, sets }
    }
    fn all_elements(&self) -> u64 {
        (1 << self.nb_elements) - 1
    }
    /// Minus the size of the smallest cover
    pub fn brute_force(&self) -> isize {
        let m = self.sets.len();
        (0_usize..1 << m)
            .filter(|subset| {
                let covered = (0..m).filter(|j| subset & (1 << j) != 0).fold(0, |c, j| c | self.sets[j]);
                covered == self.all_elements()
            })
            .map(|subset| -(subset.count_ones() as isize))
            .max()
            .unwrap_or(isize::MIN)
    }
    /// Checks the solution is a complete cover and returns its value
    pub fn evaluate(&self, solution: &[Decision]) -> isize {
        assert_eq!(self.sets.len(), solution.len());
        let covered = solution.iter()
            .filter(|d| d.value == 1)
            .fold(0, |c, d| c | self.sets[d.variable.id()]);
        assert_eq!(self.all_elements(), covered);
        -solution.iter().map(|d| d.value).sum::<isize>()
    }
}

impl Problem for SetCover {
    type State = CoverState;

    fn nb_variables(&self) -> usize {
        self.sets.len()
    }
    fn initial_state(&self) -> CoverState {
        CoverState { uncovered: self.all_elements(), free: (1 << self.sets.len()) - 1 }
    }
    fn initial_value(&self) -> isize {
        0
    }
    fn transition(&self, state: &CoverState, dec: Decision) -> CoverState {
        let j = dec.variable.id();
        let uncovered = if dec.value == 1 { state.uncovered & !self.sets[j] } else { state.uncovered };
        CoverState { uncovered, free: state.free & !(1 << j) }
    }
    fn transition_cost(&self, _: &CoverState, dec: Decision) -> isize {
        -dec.value
    }
    /// A set is only taken when it covers something new, and it is only left
    /// out when the other free sets can still cover everything.
    fn for_each_in_domain(&self, variable: Variable, state: &CoverState, f: &mut dyn DecisionCallback) {
        let j = variable.id();
        let others = (0..self.sets.len())
            .filter(|k| *k != j && state.free & (1 << k) != 0)
            .fold(0, |c, k| c | self.sets[k]);
        if state.uncovered & self.sets[j] != 0 {
            f.apply(Decision { variable, value: 1 });
        }
        if state.uncovered & !others == 0 {
            f.apply(Decision { variable, value: 0 });
        }
    }
}

/// Fewer elements to cover with more sets to do it
pub struct CoverRelax;
impl Relaxation for CoverRelax {
    type State = CoverState;

    fn merge(&self, states: &mut dyn Iterator<Item = &CoverState>) -> CoverState {
        states.fold(CoverState { uncovered: u64::MAX, free: 0 }, |m, s| CoverState {
            uncovered: m.uncovered & s.uncovered,
            free: m.free | s.free,
        })
    }
    fn relax(&self, _: &CoverState, _: &CoverState, _: &CoverState, _: Decision, cost: isize) -> isize {
        cost
    }
}

pub struct CoverRanking;
impl StateRanking for CoverRanking {
    type State = CoverState;

    fn compare(&self, a: &CoverState, b: &CoverState) -> Ordering {
        b.uncovered.count_ones().cmp(&a.uncovered.count_ones())
    }
}

/// At least one more set is needed while something is uncovered
pub struct CoverBound;
impl FastUpperBound<CoverState> for CoverBound {
    fn fast_upper_bound(&self, state: &CoverState, _: &VarSet) -> isize {
        if state.uncovered == 0 { 0 } else { -1 }
    }
}

pub struct CoverDominance;
impl Dominance for CoverDominance {
    type State = CoverState;
    type Key = u64;

    fn get_key(&self, state: &CoverState) -> Option<u64> {
        Some(state.free)
    }
    fn is_dominated_or_equal(&self, a: &CoverState, b: &CoverState) -> bool {
        b.uncovered & !a.uncovered == 0
    }
}
