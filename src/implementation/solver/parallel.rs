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

//! This module provides the implementation of a parallel mdd solver. That is
//! a solver that will solve the problem using as many threads as requested.
//! By default, it uses as many threads as the number of hardware threads
//! available on the machine.
use std::{hash::Hash, marker::PhantomData, sync::Arc, time::Instant};

use log::{info, debug, trace};
use parking_lot::{Condvar, Mutex};

use crate::*;
use super::{Incumbent, root_node};

/// The shared data that may only be manipulated within critical sections
struct Critical<'a, State> {
    /// This is the frontier: the set of nodes that must still be explored
    /// before the problem can be considered 'solved'.
    ///
    /// # Note:
    /// The frontier orders the nodes by upper bound (so the highest ub is going
    /// to pop first). So, it is guaranteed that the upper bound of the first
    /// node being popped is an upper bound on the value reachable by exploring
    /// any of the nodes remaining on the frontier. As a consequence, the
    /// exploration can be stopped as soon as a node with an ub <= current best
    /// lower bound is popped.
    frontier: &'a mut (dyn Frontier<State = State> + Send + Sync),
    /// This is the number of nodes that are currently being explored.
    ///
    /// # Note
    /// This is the piece of information that lets us distinguish between a
    /// node-starvation and the completion of the problem resolution. This
    /// counter needs to be carefully managed to guarantee the termination of
    /// all threads.
    ongoing: usize,
    /// The number of nodes in the frontier, for each depth
    open_by_layer: Vec<usize>,
    /// The number of nodes being processed, for each depth
    ongoing_by_layer: Vec<usize>,
    /// All layers above this one have been cleared from the cache
    first_active_layer: usize,
    /// The best solution found so far and the best lower bound
    best: Incumbent,
    /// This is the value of the best known upper bound. It only gets set when
    /// the search is over.
    best_ub: isize,
    /// The upper bound of the node which is currently processed by each
    /// thread. An idle thread has an upper bound of -inf.
    upper_bounds: Vec<isize>,
    /// If we decide not to go through a complete proof of optimality, this is
    /// the reason why we took that decision.
    abort_proof: Option<Reason>,
    stats: SearchStatistics,
}

/// The state which is shared among the many running threads: it provides an
/// access to the critical data (protected by a mutex) as well as a monitor
/// (condvar) to park threads in case of node-starvation.
struct Shared<'a, State, C>
where
    C: Cache<State> + Send + Sync + Default,
{
    problem: &'a (dyn Problem<State = State> + Send + Sync),
    relaxation: &'a (dyn Relaxation<State = State> + Send + Sync),
    ranking: &'a (dyn StateRanking<State = State> + Send + Sync),
    width_heu: &'a (dyn WidthHeuristic<State> + Send + Sync),
    cutoff: &'a (dyn Cutoff + Send + Sync),
    var_heu: &'a (dyn VariableHeuristic<State> + Send + Sync),
    upper_bound: &'a (dyn FastUpperBound<State> + Send + Sync),
    reduction: &'a (dyn ReductionStrategy<State> + Send + Sync),
    dominance: &'a (dyn DominanceChecker<State> + Send + Sync),
    gap_limit: f32,

    /// Data structure containing info about past compilations used to prune the search
    cache: C,

    /// This is the shared state data which can only be accessed within critical
    /// sections. Therefore, it is protected by a mutex which prevents concurrent
    /// reads/writes.
    critical: Mutex<Critical<'a, State>>,
    /// This is the monitor on which nodes must wait when facing an empty frontier.
    /// The corollary, it that whenever a node has completed the processing of
    /// a subproblem, it must wake-up all parked threads waiting on this monitor.
    monitor: Condvar,
}

/// The workload a thread can get from the shared state
enum WorkLoad<T> {
    /// There is no work left to be done: you can safely terminate
    Complete,
    /// The work must stop because of an external cutoff
    Aborted,
    /// There is nothing you can do right now. Check again when you wake up
    Starvation,
    /// The item to process
    WorkItem { node: SubProblem<T> },
}

/// This is the structure implementing a multi-threaded MDD solver.
///
/// # Example Usage
/// ```
/// # use ddsolve::*;
/// #
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # pub struct KnapsackState {
/// #     depth: usize,
/// #     capacity: usize
/// # }
/// #
/// # struct Knapsack {
/// #     capacity: usize,
/// #     profit: Vec<usize>,
/// #     weight: Vec<usize>,
/// # }
/// #
/// # const TAKE_IT: isize = 1;
/// # const LEAVE_IT_OUT: isize = 0;
/// #
/// # impl Problem for Knapsack {
/// #     type State = KnapsackState;
/// #     fn nb_variables(&self) -> usize {
/// #         self.profit.len()
/// #     }
/// #     fn initial_state(&self) -> Self::State {
/// #         KnapsackState{ depth: 0, capacity: self.capacity }
/// #     }
/// #     fn initial_value(&self) -> isize {
/// #         0
/// #     }
/// #     fn transition(&self, state: &Self::State, dec: Decision) -> Self::State {
/// #         let mut ret = *state;
/// #         ret.depth  += 1;
/// #         if dec.value == TAKE_IT {
/// #             ret.capacity -= self.weight[dec.variable.id()]
/// #         }
/// #         ret
/// #     }
/// #     fn transition_cost(&self, _state: &Self::State, dec: Decision) -> isize {
/// #         self.profit[dec.variable.id()] as isize * dec.value
/// #     }
/// #     fn for_each_in_domain(&self, variable: Variable, state: &Self::State, f: &mut dyn DecisionCallback)
/// #     {
/// #         if state.capacity >= self.weight[variable.id()] {
/// #             f.apply(Decision { variable, value: TAKE_IT });
/// #         }
/// #         f.apply(Decision { variable, value: LEAVE_IT_OUT });
/// #     }
/// # }
/// # struct KPRelax;
/// # impl Relaxation for KPRelax {
/// #     type State = KnapsackState;
/// #
/// #     fn merge(&self, states: &mut dyn Iterator<Item = &Self::State>) -> Self::State {
/// #         states.copied().max_by_key(|node| node.capacity).unwrap()
/// #     }
/// #     fn relax(&self, _source: &Self::State, _dest: &Self::State, _merged: &Self::State, _decision: Decision, cost: isize) -> isize {
/// #         cost
/// #     }
/// # }
/// #
/// # struct KPRanking;
/// # impl StateRanking for KPRanking {
/// #     type State = KnapsackState;
/// #
/// #     fn compare(&self, a: &Self::State, b: &Self::State) -> std::cmp::Ordering {
/// #         a.capacity.cmp(&b.capacity)
/// #     }
/// # }
/// # struct KPDominance;
/// # impl Dominance for KPDominance {
/// #     type State = KnapsackState;
/// #     type Key = usize;
/// #     fn get_key(&self, state: &Self::State) -> Option<Self::Key> {
/// #        Some(state.depth)
/// #     }
/// #     fn is_dominated_or_equal(&self, a: &Self::State, b: &Self::State) -> bool {
/// #         a.capacity <= b.capacity
/// #     }
/// # }
///
/// // To create a new solver, you need to be able to provide it with a problem instance, a relaxation
/// // and the various required heuristic. This example assumes the existence of the Knapsack structure
/// // and relaxation.
///
/// // 1. Create an instance of our knapsack problem
/// let problem = Knapsack {
///     capacity: 50,
///     profit  : vec![60, 100, 120],
///     weight  : vec![10,  20,  30]
/// };
///
/// // 2. Create a relaxation of the problem
/// let relaxation = KPRelax;
///
/// // 3. Create a ranking to discriminate the promising and uninteresting states
/// let heuristic = KPRanking;
///
/// // 4. Define the policy you will want to use regarding the maximum width of the DD
/// let width = FixedWidth(100); // here we mean max 100 nodes per layer
///
/// // 5. Add a dominance relation checker
/// let dominance = SimpleDominanceChecker::new(KPDominance);
///
/// // 6. Decide of a cutoff heuristic (if you don't want to let the solver run for ever)
/// let cutoff = NoCutoff; // might as well be a TimeBudget (or something else)
///
/// // 7. Create the solver frontier
/// let mut frontier = SimpleFrontier::new(MaxUB::new(&heuristic));
///
/// // 8. Instantiate your solver
/// let mut solver = DefaultSolver::new(
///       &problem,
///       &relaxation,
///       &heuristic,
///       &width,
///       &cutoff,
///       &mut frontier)
///     .unwrap()
///     .with_dominance(&dominance);
///
/// // 9. Maximize your objective function
/// // the outcome provides the value of the best solution that was found for
/// // the problem (if one was found) along with a flag indicating whether or
/// // not the solution was proven optimal. Hence an unsatisfiable problem
/// // would have `outcome.best_value == None` and `outcome.is_exact` true.
/// // The `is_exact` flag will only be false if you explicitly decide to stop
/// // searching with an arbitrary cutoff.
/// let outcome = solver.maximize();
/// // The best solution (if one exist) is retrieved with
/// let solution = solver.best_solution();
///
/// // 10. Do whatever you like with the optimal solution.
/// assert_eq!(Some(220), outcome.best_value);
/// println!("Solution");
/// for decision in solution.unwrap().iter() {
///     if decision.value == 1 {
///         println!("{}", decision.variable.id());
///     }
/// }
/// ```
pub struct ParallelSolver<'a, State, D, C>
where
    D: DecisionDiagram<State = State> + Default,
    C: Cache<State> + Send + Sync + Default,
{
    /// This is the shared state. Each thread is going to take a reference to it.
    shared: Shared<'a, State, C>,
    /// This is a configuration parameter that tunes the number of threads that
    /// will be spawned to solve the problem. By default, this number amounts
    /// to the number of hardware threads available on the machine.
    nb_threads: usize,
    /// This is just a marker that allows us to remember the exact type of the
    /// mdds to be instantiated.
    _phantom: PhantomData<D>,
}

impl<'a, State, D, C> ParallelSolver<'a, State, D, C>
where
    State: Eq + Hash,
    D: DecisionDiagram<State = State> + Default,
    C: Cache<State> + Send + Sync + Default,
{
    /// Creates a solver using as many threads as there are hardware threads,
    /// with the default collaborators: the variables are branched on in their
    /// natural order, there is no fast upper bound, no dominance and the
    /// layers are reduced with the `CostBased` strategy.
    ///
    /// Fails with `Error::InvalidWidth` when the width heuristic allows no
    /// node at all in the root diagram.
    pub fn new(
        problem: &'a (dyn Problem<State = State> + Send + Sync),
        relaxation: &'a (dyn Relaxation<State = State> + Send + Sync),
        ranking: &'a (dyn StateRanking<State = State> + Send + Sync),
        width_heu: &'a (dyn WidthHeuristic<State> + Send + Sync),
        cutoff: &'a (dyn Cutoff + Send + Sync),
        frontier: &'a mut (dyn Frontier<State = State> + Send + Sync),
    ) -> Result<Self, Error> {
        if width_heu.max_width(&root_node(problem)) == 0 {
            return Err(Error::InvalidWidth);
        }
        let params = SearchParameters::default();
        Ok(ParallelSolver {
            shared: Shared {
                problem,
                relaxation,
                ranking,
                width_heu,
                cutoff,
                var_heu: &NaturalOrder,
                upper_bound: &NoUpperBound,
                reduction: &CostBased,
                dominance: &EmptyDominanceChecker,
                gap_limit: params.gap_limit,
                cache: C::default(),
                //
                monitor: Condvar::new(),
                critical: Mutex::new(Critical {
                    frontier,
                    ongoing: 0,
                    open_by_layer: vec![],
                    ongoing_by_layer: vec![],
                    first_active_layer: 0,
                    best: Incumbent::new(),
                    best_ub: isize::MAX,
                    upper_bounds: vec![],
                    abort_proof: None,
                    stats: SearchStatistics::default(),
                }),
            },
            nb_threads: params.nb_threads.max(1),
            _phantom: PhantomData,
        })
    }
    pub fn with_variable_heuristic(mut self, var_heu: &'a (dyn VariableHeuristic<State> + Send + Sync)) -> Self {
        self.shared.var_heu = var_heu;
        self
    }
    pub fn with_upper_bound(mut self, upper_bound: &'a (dyn FastUpperBound<State> + Send + Sync)) -> Self {
        self.shared.upper_bound = upper_bound;
        self
    }
    pub fn with_reduction(mut self, reduction: &'a (dyn ReductionStrategy<State> + Send + Sync)) -> Self {
        self.shared.reduction = reduction;
        self
    }
    pub fn with_dominance(mut self, dominance: &'a (dyn DominanceChecker<State> + Send + Sync)) -> Self {
        self.shared.dominance = dominance;
        self
    }
    /// Sets the number of threads and the gap limit used by the solver
    pub fn with_parameters(mut self, params: SearchParameters) -> Self {
        self.nb_threads = params.nb_threads.max(1);
        self.shared.gap_limit = params.gap_limit;
        self
    }

    /// This method initializes the problem resolution. Put more simply, this
    /// method posts the root node of the mdd onto the frontier so that a thread
    /// can pick it up and the processing can be bootstrapped.
    fn initialize(&mut self) {
        let n = self.shared.problem.nb_variables();
        self.shared.cache.initialize(n);

        let root = root_node(self.shared.problem);
        let critical = self.shared.critical.get_mut();
        critical.frontier.clear();
        critical.frontier.push(root);
        critical.ongoing = 0;
        critical.open_by_layer = vec![0; n + 1];
        critical.ongoing_by_layer = vec![0; n + 1];
        critical.open_by_layer[0] += 1;
        critical.first_active_layer = 0;
        critical.best_ub = isize::MAX;
        critical.upper_bounds = vec![isize::MIN; self.nb_threads];
        critical.abort_proof = None;
        critical.stats = SearchStatistics::default();
    }

    /// This method processes the given `node`. To do so, it reads the current
    /// best lower bound from the critical data. Then it expands a restricted
    /// and possibly a relaxed mdd rooted in `node`. If that is necessary,
    /// it stores cut-set nodes onto the frontier for further parallel processing.
    fn process_one_node(
        mdd: &mut D,
        shared: &Shared<'a, State, C>,
        node: SubProblem<State>,
    ) -> Result<(), Reason> {
        // 1. RESTRICTION
        let node_ub = node.ub;
        let best_lb = Self::best_lb(shared);

        if node_ub <= best_lb {
            return Ok(());
        }

        let width = shared.width_heu.max_width(&node);
        let cutset_type = shared.critical.lock().frontier.cutset_type();
        let mut compilation = CompilationInput {
            comp_type: CompilationType::Restricted,
            problem: shared.problem,
            relaxation: shared.relaxation,
            ranking: shared.ranking,
            var_heu: shared.var_heu,
            upper_bound: shared.upper_bound,
            reduction: shared.reduction,
            cutoff: shared.cutoff,
            max_width: width,
            residual: &node,
            best_lb,
            cutset_type,
            cache: &shared.cache,
            dominance: shared.dominance,
        };

        let Completion { is_exact, .. } = mdd.compile(&compilation)?;
        Self::maybe_update_best(mdd, shared);
        if is_exact {
            return Ok(());
        }

        // 2. RELAXATION
        compilation.comp_type = CompilationType::Relaxed;
        compilation.best_lb = Self::best_lb(shared);

        let Completion { is_exact, .. } = mdd.compile(&compilation)?;
        Self::maybe_update_best(mdd, shared);
        if !is_exact {
            Self::enqueue_cutset(mdd, shared, node_ub);
        }
        Ok(())
    }

    fn best_lb(shared: &Shared<'a, State, C>) -> isize {
        shared.critical.lock().best.value
    }

    /// This private method updates the shared best known node and lower bound in
    /// case the best value of the current `mdd` expansion improves the current
    /// bounds.
    fn maybe_update_best(mdd: &D, shared: &Shared<'a, State, C>) {
        shared.critical.lock().best.improve_with(mdd);
    }
    /// If necessary, tightens the bound of nodes in the cut-set of `mdd` and
    /// then add the relevant nodes to the shared frontier.
    fn enqueue_cutset(mdd: &mut D, shared: &Shared<'a, State, C>, ub: isize) {
        let mut critical = shared.critical.lock();
        let critical = &mut *critical;
        let best_lb = critical.best.value;
        let frontier = &mut critical.frontier;
        let open_by_layer = &mut critical.open_by_layer;
        mdd.drain_cutset(|mut cutset_node| {
            cutset_node.ub = ub.min(cutset_node.ub);
            if cutset_node.ub > best_lb {
                let depth = cutset_node.depth;
                let before = frontier.len();
                frontier.push(cutset_node);
                open_by_layer[depth] += frontier.len() - before;
            }
        });
        critical.stats.max_frontier_size = critical.stats.max_frontier_size.max(critical.frontier.len());
    }
    /// Acknowledges that a thread finished processing its node.
    fn notify_node_finished(shared: &Shared<'a, State, C>, thread_id: usize, depth: usize) {
        let mut critical = shared.critical.lock();
        critical.ongoing -= 1;
        critical.upper_bounds[thread_id] = isize::MIN;
        critical.ongoing_by_layer[depth] -= 1;
        shared.monitor.notify_all();
    }

    fn abort_search(shared: &Shared<'a, State, C>, reason: Reason, current_ub: isize) {
        let mut critical = shared.critical.lock();
        Self::abort_in_critical(shared, &mut critical, reason, current_ub);
    }

    /// The upper bound of an aborted search is the largest one of the nodes
    /// being processed and of the frontier.
    fn abort_in_critical(shared: &Shared<'a, State, C>, critical: &mut Critical<'a, State>, reason: Reason, current_ub: isize) {
        // A second abort can only widen the bound of the first one
        let previous = match critical.abort_proof {
            Some(_) => critical.best_ub,
            None => {
                debug!("search aborted: {reason:?}");
                critical.abort_proof = Some(reason);
                isize::MIN
            }
        };
        let mut ub = current_ub
            .max(previous)
            .max(critical.best.value)
            .max(critical.upper_bounds.iter().copied().max().unwrap_or(isize::MIN));
        if let Some(top) = critical.frontier.pop() {
            ub = ub.max(top.ub);
        }
        critical.best_ub = ub;
        critical.frontier.clear();
        critical.open_by_layer.iter_mut().for_each(|o| *o = 0);
        shared.cache.clear();
        shared.monitor.notify_all();
    }

    /// Consults the shared state to fetch a workload. Depending on the current
    /// state, the workload can either be:
    ///
    ///   + Complete, when the problem is solved and all threads should stop
    ///   + Aborted, when the search was stopped before completion
    ///   + Starvation, when there is no subproblem available for processing
    ///     at the time being (but some subproblem are still being processed
    ///     and thus the problem cannot be considered solved).
    ///   + WorkItem, when the thread successfully obtained a subproblem to
    ///     process.
    fn get_workload(shared: &Shared<'a, State, C>, thread_id: usize) -> WorkLoad<State> {
        let mut critical = shared.critical.lock();

        // Can we clean up the cache?
        while critical.first_active_layer < shared.problem.nb_variables()
            && critical.open_by_layer[critical.first_active_layer] + critical.ongoing_by_layer[critical.first_active_layer] == 0
        {
            shared.cache.clear_layer(critical.first_active_layer);
            critical.first_active_layer += 1;
        }

        // Do we need to stop
        if critical.abort_proof.is_some() {
            return WorkLoad::Aborted;
        }
        if shared.cutoff.must_stop() {
            Self::abort_in_critical(shared, &mut critical, Reason::CutoffOccurred, isize::MIN);
            return WorkLoad::Aborted;
        }

        // Are we done ?
        if critical.ongoing == 0 && critical.frontier.is_empty() {
            critical.best_ub = critical.best.value;
            return WorkLoad::Complete;
        }

        // Nothing to do yet ? => Wait for someone to post jobs
        if critical.frontier.is_empty() {
            shared.monitor.wait(&mut critical);
            return WorkLoad::Starvation;
        }

        while let Some(node) = critical.frontier.pop() {
            let depth = node.depth;
            critical.open_by_layer[depth] = critical.open_by_layer[depth].saturating_sub(1);

            // Nothing relevant ? => Wait for the ongoing work to complete
            if node.ub <= critical.best.value {
                critical.frontier.clear();
                critical.open_by_layer.iter_mut().for_each(|o| *o = 0);
                return WorkLoad::Starvation;
            }
            if !shared.cache.must_explore(&node) {
                continue;
            }
            shared.cache.update_threshold(Arc::clone(&node.state), depth, node.value, true);

            // The gap is measured against the largest bound still in play
            let ongoing_ub = critical.upper_bounds.iter().copied().max().unwrap_or(isize::MIN);
            if shared.gap_limit > 0.0
                && critical.best.value > isize::MIN
                && optimality_gap(critical.best.value, node.ub.max(ongoing_ub)) <= shared.gap_limit
            {
                Self::abort_in_critical(shared, &mut critical, Reason::GapLimitReached, node.ub);
                return WorkLoad::Aborted;
            }

            // Consume the current node and process it
            critical.ongoing += 1;
            critical.stats.nb_iterations += 1;
            critical.upper_bounds[thread_id] = node.ub;
            critical.ongoing_by_layer[depth] += 1;
            trace!("explore node: depth {}, ub {}, frontier {}", depth, node.ub, critical.frontier.len());
            return WorkLoad::WorkItem { node };
        }
        WorkLoad::Starvation
    }
}

impl<State, D, C> Solver for ParallelSolver<'_, State, D, C>
where
    State: Eq + Hash,
    D: DecisionDiagram<State = State> + Default,
    C: Cache<State> + Send + Sync + Default,
{
    /// Applies the branch and bound algorithm proposed by Bergman et al. to
    /// solve the problem to optimality. To do so, it spawns `nb_threads` workers
    /// (long running threads); each of which will continually get a workload
    /// and process it until the problem is solved.
    fn maximize(&mut self) -> Completion {
        let start = Instant::now();
        self.initialize();
        info!("parallel search started on {} variables with {} threads",
            self.shared.problem.nb_variables(), self.nb_threads);

        std::thread::scope(|s| {
            for i in 0..self.nb_threads {
                let shared = &self.shared;
                s.spawn(move || {
                    let mut mdd = D::default();
                    loop {
                        match Self::get_workload(shared, i) {
                            WorkLoad::Complete => break,
                            WorkLoad::Aborted => break,
                            WorkLoad::Starvation => continue,
                            WorkLoad::WorkItem { node } => {
                                let ub = node.ub;
                                let depth = node.depth;
                                let outcome = Self::process_one_node(&mut mdd, shared, node);
                                if let Err(reason) = outcome {
                                    Self::abort_search(shared, reason, ub);
                                    Self::notify_node_finished(shared, i, depth);
                                    break;
                                } else {
                                    Self::notify_node_finished(shared, i, depth);
                                }
                            }
                        }
                    }
                });
            }
        });

        let critical = self.shared.critical.get_mut();
        critical.best.sort();
        let proved = critical.abort_proof.is_none();
        critical.stats.elapsed = start.elapsed();
        critical.stats.status = SearchStatus::from_outcome(proved, critical.best.solution.is_some());
        critical.stats.gap = optimality_gap(critical.best.value, critical.best_ub);
        info!("parallel search ended: {} | best value: {:?} | bounds: [{}, {}]",
            critical.stats, critical.best.best_value(), critical.best.value, critical.best_ub);

        Completion { is_exact: proved, best_value: critical.best.best_value() }
    }

    /// Returns the best solution that has been identified for this problem.
    fn best_solution(&self) -> Option<Solution> {
        self.shared.critical.lock().best.solution.clone()
    }
    /// Returns the value of the best solution that has been identified for
    /// this problem.
    fn best_value(&self) -> Option<isize> {
        self.shared.critical.lock().best.best_value()
    }
    /// Returns the value of the best lower bound that has been identified for
    /// this problem.
    fn best_lower_bound(&self) -> isize {
        self.shared.critical.lock().best.value
    }
    /// Returns the value of the best upper bound that has been identified for
    /// this problem.
    fn best_upper_bound(&self) -> isize {
        self.shared.critical.lock().best_ub
    }
    /// Sets a primal (best known value and solution) of the problem.
    fn set_primal(&mut self, value: isize, solution: Solution) {
        self.shared.critical.lock().best.improve(value, solution);
    }
    fn statistics(&self) -> SearchStatistics {
        self.shared.critical.lock().stats
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
