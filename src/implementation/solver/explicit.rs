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

//! The explicit exploration of the state space which is shared by the A* and
//! the anytime column search solvers. Rather than compiling decision diagrams,
//! these solvers expand one node at a time and keep track of the best value
//! known for each (state, depth) pair.
use std::{cmp::Ordering, hash::Hash, sync::Arc};

use compare::Compare;
use fxhash::FxHashMap;

use crate::*;

/// Orders the nodes of an explicit search: the largest `f` (stored in the
/// `ub` field) comes first, then the largest value and then the deepest node.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct MaxF;
impl<T> Compare<SubProblem<T>> for MaxF {
    fn compare(&self, l: &SubProblem<T>, r: &SubProblem<T>) -> Ordering {
        l.ub.cmp(&r.ub)
            .then_with(|| l.value.cmp(&r.value))
            .then_with(|| l.depth.cmp(&r.depth))
    }
}

type Key<State> = (Arc<State>, usize);

/// The bookkeeping of an explicit search
pub(crate) struct StateSpace<'a, State> {
    pub(crate) problem: &'a dyn Problem<State = State>,
    pub(crate) var_heu: &'a dyn VariableHeuristic<State>,
    pub(crate) upper_bound: &'a dyn FastUpperBound<State>,
    pub(crate) dominance: &'a dyn DominanceChecker<State>,
    /// best value of the nodes waiting to be expanded
    present: FxHashMap<Key<State>, isize>,
    /// best value of the nodes which have already been expanded
    closed: FxHashMap<Key<State>, isize>,
}

impl<'a, State: Eq + Hash> StateSpace<'a, State> {
    pub(crate) fn new(problem: &'a dyn Problem<State = State>) -> Self {
        StateSpace {
            problem,
            var_heu: &NaturalOrder,
            upper_bound: &NoUpperBound,
            dominance: &EmptyDominanceChecker,
            present: Default::default(),
            closed: Default::default(),
        }
    }

    /// Forgets everything about a previous search and returns the root node
    pub(crate) fn reset(&mut self) -> SubProblem<State> {
        self.present.clear();
        self.closed.clear();

        let n = self.problem.nb_variables();
        let state = Arc::new(self.problem.initial_state());
        let value = self.problem.initial_value();
        let f = self.priority(state.as_ref(), value, &VarSet::all(n));
        self.present.insert((Arc::clone(&state), 0), value);
        SubProblem { state, value, path: vec![], ub: f, depth: 0 }
    }

    /// The value of the node plus a bound on what it can still earn. A node
    /// with no free variable left earns nothing more.
    fn priority(&self, state: &State, value: isize, free: &VarSet) -> isize {
        if free.is_empty() {
            value
        } else {
            value.saturating_add(self.upper_bound.fast_upper_bound(state, free))
        }
    }

    /// Moves a node from the open to the closed set. Returns false when
    /// the node is stale: a node with the same state and depth and a
    /// better value has been pushed after it.
    pub(crate) fn close(&mut self, node: &SubProblem<State>) -> bool {
        let key = (Arc::clone(&node.state), node.depth);
        match self.present.get(&key) {
            Some(&g) if g == node.value => {
                self.present.remove(&key);
                self.closed.insert(key, g);
                true
            },
            _ => false,
        }
    }

    /// Generates the children of `node` and passes those which might still
    /// improve on `best_lb` to `push`. A child whose (state, depth) is already
    /// open or closed with a value at least as good is discarded; otherwise a
    /// closed node is reopened.
    pub(crate) fn expand<F>(&mut self, node: &SubProblem<State>, best_lb: isize, mut push: F)
    where
        F: FnMut(SubProblem<State>),
    {
        let n = self.problem.nb_variables();
        let mut free = VarSet::unassigned(n, &node.path);
        let Some(var) = self.var_heu.next_variable(node.depth, &free, &mut std::iter::empty()) else {
            return;
        };
        free.remove(var);

        let mut decisions = vec![];
        self.problem.for_each_in_domain(var, node.state.as_ref(), &mut |d| decisions.push(d));

        let depth = node.depth + 1;
        for decision in decisions {
            let state = self.problem.transition(node.state.as_ref(), decision);
            let value = node.value.saturating_add(self.problem.transition_cost(node.state.as_ref(), decision));
            let f = self.priority(&state, value, &free);
            if f <= best_lb {
                continue;
            }

            let state = Arc::new(state);
            if self.dominance.is_dominated_or_insert(Arc::clone(&state), depth, value) {
                continue;
            }
            let key = (Arc::clone(&state), depth);
            if self.present.get(&key).is_some_and(|&old| old >= value) {
                continue;
            }
            match self.closed.get(&key) {
                Some(&old) if old >= value => continue,
                Some(_) => { self.closed.remove(&key); },
                None => {},
            }
            self.present.insert(key, value);

            let mut path = node.path.clone();
            path.push(decision);
            push(SubProblem { state, value, path, ub: f, depth });
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
