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

use std::{sync::Arc, hash::Hash};

use dashmap::DashMap;

use crate::{Cache, Threshold};

/// Simple implementation of the Cache using one concurrent hashmap for each
/// layer of the problem (each depth from 0 to the number of variables).
#[derive(Debug)]
pub struct SimpleCache<State>
where State: Hash + Eq {
    thresholds_by_layer: Vec<DashMap<Arc<State>, Threshold, fxhash::FxBuildHasher>>,
}
impl <State> Default for SimpleCache<State>
where State: Hash + Eq {
    fn default() -> Self {
        Self { thresholds_by_layer: vec![] }
    }
}
impl <State> SimpleCache<State>
where State: Hash + Eq {
    /// Creates a cache which is ready to be used with a problem having the
    /// given number of variables
    pub fn new(nb_variables: usize) -> Self {
        let mut cache = Self::default();
        cache.initialize(nb_variables);
        cache
    }
}

impl<State> Cache<State> for SimpleCache<State>
where State: Hash + Eq {
    fn initialize(&mut self, nb_variables: usize) {
        self.thresholds_by_layer.clear();
        for _ in 0..=nb_variables {
            self.thresholds_by_layer.push(Default::default());
        }
    }

    fn get_threshold(&self, state: &State, depth: usize) -> Option<Threshold> {
        self.thresholds_by_layer.get(depth)
            .and_then(|layer| layer.get(state).as_deref().copied())
    }

    fn update_threshold(&self, state: Arc<State>, depth: usize, value: isize, explored: bool) {
        if let Some(layer) = self.thresholds_by_layer.get(depth) {
            layer.entry(state)
                .and_modify(|e| *e = Threshold { value, explored }.max(*e))
                .or_insert(Threshold { value, explored });
        }
    }

    fn clear_layer(&self, depth: usize) {
        if let Some(layer) = self.thresholds_by_layer.get(depth) {
            layer.clear();
        }
    }

    fn clear(&self) {
        self.thresholds_by_layer.iter().for_each(|l| l.clear());
    }
}

#[cfg(test)]
mod test_simple_cache {
    use std::sync::Arc;

    use crate::{Cache, SimpleCache, SubProblem, Threshold};

    fn sub(state: usize, value: isize, depth: usize) -> SubProblem<usize> {
        SubProblem { state: Arc::new(state), value, ub: isize::MAX, path: vec![], depth }
    }

    #[test]
    fn by_default_there_is_no_threshold() {
        let cache = SimpleCache::<usize>::new(3);
        assert_eq!(None, cache.get_threshold(&7, 1));
        assert!(cache.must_explore(&sub(7, isize::MIN, 1)));
    }
    #[test]
    fn an_uninitialized_cache_ignores_updates() {
        let cache = SimpleCache::<usize>::default();
        cache.update_threshold(Arc::new(7), 1, 10, true);
        assert_eq!(None, cache.get_threshold(&7, 1));
    }
    #[test]
    fn thresholds_are_stored_per_depth() {
        let cache = SimpleCache::new(3);
        cache.update_threshold(Arc::new(7), 1, 10, true);
        assert_eq!(Some(Threshold{value: 10, explored: true}), cache.get_threshold(&7, 1));
        assert_eq!(None, cache.get_threshold(&7, 2));
    }
    #[test]
    fn update_threshold_never_decreases_the_stored_value() {
        let cache = SimpleCache::new(3);
        let updates = [(5, false), (12, false), (3, true), (12, true), (8, false), (12, false)];
        let mut last = Threshold{value: isize::MIN, explored: false};
        for (value, explored) in updates {
            cache.update_threshold(Arc::new(1), 2, value, explored);
            let current = cache.get_threshold(&1, 2).unwrap();
            assert!(current >= last);
            last = current;
        }
        assert_eq!(Threshold{value: 12, explored: true}, last);
    }
    #[test]
    fn must_explore_only_when_value_beats_the_threshold() {
        let cache = SimpleCache::new(3);
        cache.update_threshold(Arc::new(1), 2, 10, false);
        assert!( cache.must_explore(&sub(1, 11, 2)));
        assert!( cache.must_explore(&sub(1, 10, 2)));
        assert!(!cache.must_explore(&sub(1,  9, 2)));

        cache.update_threshold(Arc::new(1), 2, 10, true);
        assert!( cache.must_explore(&sub(1, 11, 2)));
        assert!(!cache.must_explore(&sub(1, 10, 2)));
    }
    #[test]
    fn clear_layer_only_forgets_that_layer() {
        let cache = SimpleCache::new(3);
        cache.update_threshold(Arc::new(1), 1, 10, true);
        cache.update_threshold(Arc::new(1), 2, 10, true);
        cache.clear_layer(1);
        assert_eq!(None, cache.get_threshold(&1, 1));
        assert!(cache.get_threshold(&1, 2).is_some());
    }
    #[test]
    fn clear_forgets_everything() {
        let cache = SimpleCache::new(3);
        cache.update_threshold(Arc::new(1), 1, 10, true);
        cache.update_threshold(Arc::new(2), 3, 10, true);
        cache.clear();
        assert_eq!(None, cache.get_threshold(&1, 1));
        assert_eq!(None, cache.get_threshold(&2, 3));
    }
}
