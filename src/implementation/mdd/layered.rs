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

//! This module provides the layered implementation of a decision diagram.
//! The diagram is unrolled one layer at a time: all the nodes of a layer
//! branch on the same variable. Nodes, edges and the inbound edge lists are
//! stored in arenas and referred to by their index.

use std::{cmp::Ordering, collections::hash_map::Entry, fmt::Debug, hash::Hash, sync::Arc};

use fxhash::{FxHashMap, FxHashSet};

use crate::{NodeFlags, Decision, CompilationInput, Completion, Reason, CompilationType, CutsetType, Problem, DecisionDiagram, SubProblem, Solution, VarSet, LayerNode, VizConfig};

/// The identifier of a node: it indicates the position of the referenced node
/// in the 'nodes' vector of the dd structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct NodeId(usize);

/// The identifier of an edge: it indicates the position of the referenced edge
/// in the 'edges' vector of the dd structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeId(usize);

/// The identifier of an edge list: it indicates the position of an edge list
/// in the 'edgelists' vector of the dd structure.
#[derive(Debug, Clone, Copy)]
struct EdgesListId(usize);

/// The identifier of a layer: it indicates the position of the referenced layer
/// in the 'layers' vector of the dd structure.
#[derive(Debug, Clone, Copy)]
struct LayerId(usize);

#[derive(Debug, Clone)]
struct Node<T> {
    state: Arc<T>,
    /// The length of the longest path between the problem root and this node
    value_top: isize,
    /// The length of the longest path between this node and the terminal node.
    /// It is only populated by the local bounds computation.
    value_bot: isize,
    /// The last edge on the longest path between the root and this node
    best: Option<EdgeId>,
    /// The head of the list of edges entering this node
    inbound: EdgesListId,
    /// The rough upper bound of this node. It remains +inf as long as the
    /// node is not expanded.
    rub: isize,
    /// The value below which reaching this node again is pointless. It is
    /// only populated after the dd has been fully unrolled.
    theta: Option<isize>,
    flags: NodeFlags,
    depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    from: NodeId,
    to: NodeId,
    decision: Decision,
    cost: isize,
}

/// One cell of the linked lists of inbound edges
#[derive(Debug, Clone, Copy)]
enum EdgesList {
    Cons { head: EdgeId, tail: EdgesListId },
    Nil,
}

/// A layer is a contiguous range of the 'nodes' vector. It includes the
/// nodes that were deleted while squashing the layer.
#[derive(Debug, Clone, Copy)]
struct Layer {
    from: usize,
    to: usize,
}

/// The decision diagram in itself. It keeps track of the nodes, edges and
/// layers composing the diagram along with the path leading from the problem
/// root to the root of this diagram (the residual subproblem).
///
/// The cutset is only ever collected when the dd is compiled in relaxed mode.
/// Its kind (last exact layer or frontier) is given by the compilation input.
#[derive(Debug, Clone)]
pub struct LayeredMdd<T>
where
    T: Eq + Hash,
{
    layers: Vec<Layer>,
    nodes: Vec<Node<T>>,
    edges: Vec<Edge>,
    edgelists: Vec<EdgesList>,

    /// The nodes of the layer being created. Two transitions to the same
    /// state lead to the same node.
    next_l: FxHashMap<Arc<T>, NodeId>,
    /// The variables that have not been branched on yet
    free: VarSet,

    path_to_root: Vec<Decision>,
    /// The last exact layer (saved upon the first squash)
    lel: Option<LayerId>,
    cutset: Vec<NodeId>,
    best_node: Option<NodeId>,
    best_exact_node: Option<NodeId>,
    /// True when no layer was ever relaxed or restricted
    is_exact: bool,
    /// True when the longest path of a relaxed dd traverses no merged node
    has_exact_best_path: bool,
}

/// The default decision diagram implementation
pub type DefaultMdd<T> = LayeredMdd<T>;

const NIL: EdgesListId = EdgesListId(0);

// Tech note: these macros spare us a fight with the borrow checker
// (they only borrow the field they need).

macro_rules! get {
    (    node     $id:expr, $dd:expr) => {&    $dd.nodes    [$id.0]};
    (mut node     $id:expr, $dd:expr) => {&mut $dd.nodes    [$id.0]};
    (    edge     $id:expr, $dd:expr) => {&    $dd.edges    [$id.0]};
    (    edgelist $id:expr, $dd:expr) => {&    $dd.edgelists[$id.0]};
    (    layer    $id:expr, $dd:expr) => {&    $dd.layers   [$id.0]};
}

macro_rules! foreach {
    (edge of $id:expr, $dd:expr, $action:expr) => {
        let mut list = get!(node $id, $dd).inbound;
        while let EdgesList::Cons{head, tail} = *get!(edgelist list, $dd) {
            let edge = *get!(edge head, $dd);
            $action(edge);
            list = tail;
        }
    };
}

macro_rules! append_edge_to {
    ($dd:expr, $id:expr, $edge:expr) => {
        let new_eid = EdgeId($dd.edges.len());
        let lst_id  = EdgesListId($dd.edgelists.len());
        $dd.edges.push($edge);
        $dd.edgelists.push(EdgesList::Cons { head: new_eid, tail: get!(node $id, $dd).inbound });

        let parent = get!(node $edge.from, $dd);
        let parent_exact = parent.flags.is_exact();
        let value = parent.value_top.saturating_add($edge.cost);

        let node = get!(mut node $id, $dd);
        let exact = parent_exact & node.flags.is_exact();
        node.flags.set_exact(exact);
        node.inbound = lst_id;

        if value >= node.value_top {
            node.best = Some(new_eid);
            node.value_top = value;
        }
    };
}

impl<T> Default for LayeredMdd<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DecisionDiagram for LayeredMdd<T>
where
    T: Eq + Hash,
{
    type State = T;

    fn compile(&mut self, input: &CompilationInput<T>) -> Result<Completion, Reason> {
        self._compile(input)
    }
    fn is_exact(&self) -> bool {
        self.is_exact
    }
    fn relaxed_best_path_is_exact(&self) -> bool {
        self.has_exact_best_path
    }
    fn best_value(&self) -> Option<isize> {
        self.best_node.map(|id| get!(node id, self).value_top)
    }
    fn best_solution(&self) -> Option<Solution> {
        self.best_node.map(|id| self._best_path(id))
    }
    fn best_exact_value(&self) -> Option<isize> {
        self.best_exact_node.map(|id| get!(node id, self).value_top)
    }
    fn best_exact_solution(&self) -> Option<Solution> {
        self.best_exact_node.map(|id| self._best_path(id))
    }
    fn drain_cutset<F>(&mut self, func: F)
    where
        F: FnMut(SubProblem<T>),
    {
        self._drain_cutset(func)
    }
}

impl<T> LayeredMdd<T>
where
    T: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            layers: vec![],
            nodes: vec![],
            edges: vec![],
            edgelists: vec![],
            //
            next_l: Default::default(),
            free: VarSet::empty(),
            //
            path_to_root: vec![],
            lel: None,
            cutset: vec![],
            best_node: None,
            best_exact_node: None,
            is_exact: true,
            has_exact_best_path: false,
        }
    }

    fn _clear(&mut self) {
        self.layers.clear();
        self.nodes.clear();
        self.edges.clear();
        self.edgelists.clear();
        self.next_l.clear();
        self.free = VarSet::empty();
        self.path_to_root.clear();
        self.lel = None;
        self.cutset.clear();
        self.best_node = None;
        self.best_exact_node = None;
        self.is_exact = true;
        self.has_exact_best_path = false;
    }

    fn _best_path(&self, id: NodeId) -> Vec<Decision> {
        Self::_best_path_partial_borrow(id, &self.path_to_root, &self.nodes, &self.edges)
    }

    fn _best_path_partial_borrow(
        id: NodeId,
        root_pa: &[Decision],
        nodes: &[Node<T>],
        edges: &[Edge],
    ) -> Vec<Decision> {
        let mut sol = root_pa.to_owned();
        let mut edge_id = nodes[id.0].best;
        while let Some(eid) = edge_id {
            let edge = edges[eid.0];
            sol.push(edge.decision);
            edge_id = nodes[edge.from.0].best;
        }
        sol
    }

    fn _compile(&mut self, input: &CompilationInput<T>) -> Result<Completion, Reason> {
        self._clear();
        self._initialize(input);

        let mut curr_l = vec![];
        let mut depth = input.residual.depth;
        while !self.free.is_empty() {
            let next_var = input.var_heu.next_variable(
                depth,
                &self.free,
                &mut self.next_l.keys().map(|s| s.as_ref()));
            let Some(var) = next_var else { break };

            // Did the cutoff kick in ?
            if input.cutoff.must_stop() {
                return Err(Reason::CutoffOccurred);
            }

            if !self._move_to_next_layer(input, &mut curr_l) {
                break;
            }

            for node_id in curr_l.iter() {
                let state = get!(node node_id, self).state.clone();
                let rub = input.upper_bound.fast_upper_bound(state.as_ref(), &self.free);
                let node = get!(mut node node_id, self);
                node.rub = rub;
                if node.value_top.saturating_add(rub) > input.best_lb {
                    input.problem.for_each_in_domain(var, state.as_ref(), &mut |decision| {
                        self._branch_on(*node_id, decision, input.problem)
                    })
                }
            }

            self.free.remove(var);
            depth += 1;
        }

        self._finalize(input);

        Ok(Completion {
            is_exact: self.is_exact || self.has_exact_best_path,
            best_value: self.best_value(),
        })
    }

    fn _initialize(&mut self, input: &CompilationInput<T>) {
        self.path_to_root.extend_from_slice(&input.residual.path);
        self.free = VarSet::unassigned(input.problem.nb_variables(), &input.residual.path);
        self.edgelists.push(EdgesList::Nil);

        let root = Node {
            state: input.residual.state.clone(),
            value_top: input.residual.value,
            value_bot: isize::MIN,
            best: None,
            inbound: NIL,
            rub: isize::MAX,
            theta: None,
            flags: NodeFlags::new_exact(),
            depth: input.residual.depth,
        };
        self.nodes.push(root);
        self.next_l.insert(input.residual.state.clone(), NodeId(0));
    }

    fn _move_to_next_layer(&mut self, input: &CompilationInput<T>, curr_l: &mut Vec<NodeId>) -> bool {
        curr_l.clear();
        curr_l.extend(self.next_l.drain().map(|(_, id)| id));
        if curr_l.is_empty() {
            return false;
        }

        // the root was checked against the cache before it was compiled
        if !self.layers.is_empty() {
            self._filter_with_cache(input, curr_l);
        }
        self._filter_with_dominance(input, curr_l);
        self._squash_if_needed(input, curr_l);
        curr_l.sort_unstable();

        let from = self.layers.last().map(|l| l.to).unwrap_or(0);
        self.layers.push(Layer { from, to: self.nodes.len() });
        true
    }

    fn _filter_with_cache(&mut self, input: &CompilationInput<T>, curr_l: &mut Vec<NodeId>) {
        curr_l.retain(|id| {
            let node = get!(mut node id, self);
            match input.cache.get_threshold(node.state.as_ref(), node.depth) {
                Some(threshold) if node.value_top <= threshold.value => {
                    node.flags.set_pruned(true);
                    node.theta = Some(threshold.value); // propagated later on
                    false
                },
                _ => true,
            }
        });
    }

    fn _filter_with_dominance(&mut self, input: &CompilationInput<T>, curr_l: &mut Vec<NodeId>) {
        // best nodes first: they are the most likely to dominate the others
        curr_l.sort_unstable_by(|a, b| {
            get!(node b, self).value_top.cmp(&get!(node a, self).value_top).then_with(|| a.cmp(b))
        });
        curr_l.retain(|id| {
            let node = get!(mut node id, self);
            if node.flags.is_exact()
                && input.dominance.is_dominated_or_insert(node.state.clone(), node.depth, node.value_top)
            {
                node.flags.set_pruned(true);
                node.theta = Some(node.value_top);
                false
            } else {
                true
            }
        });
    }

    fn _branch_on(
        &mut self,
        from_id: NodeId,
        decision: Decision,
        problem: &dyn Problem<State = T>,
    ) {
        let state = get!(node from_id, self).state.as_ref();
        let next_state = Arc::new(problem.transition(state, decision));
        let cost = problem.transition_cost(state, decision);

        let node_id = match self.next_l.entry(next_state.clone()) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let parent = get!(node from_id, self);
                let depth = parent.depth + 1;
                let mut flags = NodeFlags::new_exact();
                flags.set_exact(parent.flags.is_exact());

                let node_id = NodeId(self.nodes.len());
                self.nodes.push(Node {
                    state: next_state,
                    value_top: isize::MIN,
                    value_bot: isize::MIN,
                    //
                    best: None,
                    inbound: NIL,
                    //
                    rub: isize::MAX,
                    theta: None,
                    flags,
                    depth,
                });
                e.insert(node_id);
                node_id
            }
        };
        append_edge_to!(self, node_id, Edge {
            from: from_id,
            to  : node_id,
            decision,
            cost,
        });
    }

    fn _squash_if_needed(&mut self, input: &CompilationInput<T>, curr_l: &mut Vec<NodeId>) {
        let max_width = input.max_width.max(1);
        if curr_l.len() <= max_width {
            return;
        }
        match input.comp_type {
            CompilationType::Exact => { /* do nothing: you want to explore the complete DD */ },
            CompilationType::Restricted => {
                self._maybe_save_lel();
                self._restrict(input, curr_l, max_width);
            },
            CompilationType::Relaxed => {
                // never relax the layer right below the root
                if self.layers.len() > 1 {
                    self._maybe_save_lel();
                    self._relax(input, curr_l, max_width);
                }
            },
        }
    }

    fn _maybe_save_lel(&mut self) {
        if self.lel.is_none() {
            // lel is the previous layer
            self.lel = Some(LayerId(self.layers.len().saturating_sub(1)));
        }
    }

    /// Asks the reduction strategy for a partition of the current layer.
    fn _clusters(&self, input: &CompilationInput<T>, curr_l: &[NodeId], max_width: usize) -> Vec<Vec<NodeId>> {
        let layer = curr_l.iter()
            .map(|id| {
                let node = get!(node id, self);
                LayerNode { state: node.state.as_ref(), value: node.value_top }
            })
            .collect::<Vec<_>>();

        input.reduction.define_clusters(&layer, max_width, input.ranking)
            .into_iter()
            .map(|cluster| cluster.into_iter().filter_map(|i| curr_l.get(i).copied()).collect::<Vec<_>>())
            .filter(|cluster| !cluster.is_empty())
            .collect()
    }

    fn _compare_nodes(&self, input: &CompilationInput<T>, a: NodeId, b: NodeId) -> Ordering {
        let (a, b) = (get!(node a, self), get!(node b, self));
        a.value_top.cmp(&b.value_top)
            .then_with(|| input.ranking.compare(a.state.as_ref(), b.state.as_ref()))
    }

    fn _restrict(&mut self, input: &CompilationInput<T>, curr_l: &mut Vec<NodeId>, max_width: usize) {
        let clusters = self._clusters(input, curr_l, max_width);
        curr_l.clear();

        for cluster in clusters {
            let best = cluster.iter().copied().max_by(|a, b| self._compare_nodes(input, *a, *b));
            for id in cluster {
                if Some(id) != best {
                    get!(mut node id, self).flags.set_deleted(true);
                }
            }
            curr_l.extend(best);
        }
    }

    #[allow(clippy::redundant_closure_call)]
    fn _relax(&mut self, input: &CompilationInput<T>, curr_l: &mut Vec<NodeId>, max_width: usize) {
        let clusters = self._clusters(input, curr_l, max_width);
        let mut by_state = curr_l.iter()
            .map(|id| (get!(node id, self).state.clone(), *id))
            .collect::<FxHashMap<_, _>>();

        // first pass: decide which node stands for each cluster
        let mut kept = FxHashSet::<NodeId>::default();
        let mut merges = vec![];
        curr_l.clear();
        for cluster in clusters {
            if let [single] = cluster.as_slice() {
                let single = *single;
                if kept.insert(single) {
                    curr_l.push(single);
                }
                continue;
            }

            let merged = Arc::new(input.relaxation.merge(&mut cluster.iter().map(|id| get!(node id, self).state.as_ref())));
            let target = match by_state.get(&merged) {
                Some(recycled) => *recycled,
                None => {
                    let node_id = NodeId(self.nodes.len());
                    let depth = get!(node cluster[0], self).depth;
                    self.nodes.push(Node {
                        state: merged.clone(),
                        value_top: isize::MIN,
                        value_bot: isize::MIN,
                        best: None,    // yet
                        inbound: NIL,  // yet
                        //
                        rub: isize::MAX,
                        theta: None,
                        flags: NodeFlags::new_relaxed(),
                        depth,
                    });
                    by_state.insert(merged.clone(), node_id);
                    node_id
                }
            };
            get!(mut node target, self).flags.set_relaxed(true);
            if kept.insert(target) {
                curr_l.push(target);
            }
            merges.push((cluster, target, merged));
        }

        // second pass: redirect the inbound edges of the merged nodes
        for (cluster, target, merged) in merges {
            for drop_id in cluster {
                if kept.contains(&drop_id) {
                    continue;
                }
                get!(mut node drop_id, self).flags.set_deleted(true);

                foreach!(edge of drop_id, self, |edge: Edge| {
                    let src   = get!(node edge.from, self).state.as_ref();
                    let dst   = get!(node edge.to,   self).state.as_ref();
                    let rcost = input.relaxation.relax(src, dst, merged.as_ref(), edge.decision, edge.cost);

                    append_edge_to!(self, target, Edge {
                        from: edge.from,
                        to: target,
                        decision: edge.decision,
                        cost: rcost
                    });
                });
            }
        }
    }

    fn _finalize(&mut self, input: &CompilationInput<T>) {
        self._finalize_layers();
        self._find_best_node();
        self._finalize_exact(input);
        self._compute_cutset(input);
        self._compute_local_bounds(input);
        self._compute_thresholds(input);
    }

    fn _finalize_layers(&mut self) {
        if !self.next_l.is_empty() {
            let from = self.layers.last().map(|l| l.to).unwrap_or(0);
            self.layers.push(Layer { from, to: self.nodes.len() });
        }
    }

    fn _find_best_node(&mut self) {
        let nodes = &self.nodes;
        let better = |a: &NodeId, b: &NodeId| nodes[a.0].value_top.cmp(&nodes[b.0].value_top).then_with(|| b.cmp(a));

        self.best_node = self.next_l.values().copied().max_by(better);
        self.best_exact_node = self.next_l.values()
            .copied()
            .filter(|id| nodes[id.0].flags.is_exact())
            .max_by(better);
    }

    fn _finalize_exact(&mut self, input: &CompilationInput<T>) {
        self.is_exact = self.lel.is_none();
        self.has_exact_best_path = input.comp_type == CompilationType::Relaxed
            && !self.is_exact
            && self._has_exact_best_path(self.best_node);

        if self.has_exact_best_path {
            self.best_exact_node = self.best_node;
        }
    }

    fn _has_exact_best_path(&self, node: Option<NodeId>) -> bool {
        let mut current = node;
        while let Some(id) = current {
            let n = get!(node id, self);
            if n.flags.is_exact() {
                return true;
            }
            if n.flags.is_relaxed() {
                return false;
            }
            current = n.best.map(|e| get!(edge e, self).from);
        }
        true
    }

    fn _compute_cutset(&mut self, input: &CompilationInput<T>) {
        match self.lel {
            None => {
                for node in self.nodes.iter_mut().filter(|n| !n.flags.is_deleted()) {
                    node.flags.set_above_cutset(true);
                }
            },
            Some(lel) if input.comp_type == CompilationType::Relaxed => match input.cutset_type {
                CutsetType::LastExactLayer => self._compute_last_exact_layer_cutset(lel),
                CutsetType::Frontier => self._compute_frontier_cutset(lel),
            },
            Some(_) => { /* a restricted dd has no cutset */ },
        }
    }

    fn _compute_last_exact_layer_cutset(&mut self, lel: LayerId) {
        let Layer { from, to } = *get!(layer lel, self);
        for node in self.nodes[..to].iter_mut().filter(|n| !n.flags.is_deleted()) {
            node.flags.set_above_cutset(true);
        }
        for (id, node) in self.nodes.iter_mut().enumerate().take(to).skip(from) {
            if !node.flags.is_deleted() && !node.flags.is_pruned() {
                node.flags.set_cutset(true);
                self.cutset.push(NodeId(id));
            }
        }
    }

    #[allow(clippy::redundant_closure_call)]
    fn _compute_frontier_cutset(&mut self, lel: LayerId) {
        // traverse bottom-up
        for Layer { from, to } in self.layers.iter().skip(lel.0).rev().copied() {
            for id in from..to {
                let id = NodeId(id);
                let node = get!(node id, self);
                if node.flags.is_deleted() || node.flags.is_exact() {
                    continue;
                }
                foreach!(edge of id, self, |edge: Edge| {
                    let parent = get!(mut node edge.from, self);
                    if parent.flags.is_exact() && !parent.flags.is_cutset() {
                        parent.flags.set_cutset(true);
                        self.cutset.push(edge.from);
                    }
                });
            }
        }
        for node in self.nodes.iter_mut() {
            if node.flags.is_exact() && !node.flags.is_deleted() {
                node.flags.set_above_cutset(true);
            }
        }
    }

    #[allow(clippy::redundant_closure_call)]
    fn _compute_local_bounds(&mut self, input: &CompilationInput<T>) {
        if self.lel.is_none() || input.comp_type != CompilationType::Relaxed {
            return;
        }
        // initialize the terminal layer
        for id in self.next_l.values() {
            let node = get!(mut node id, self);
            node.value_bot = 0;
            node.flags.set_marked(true);
        }

        // traverse bottom-up
        // note: the cache needs a locb for all nodes, not only those below the cutset
        for Layer { from, to } in self.layers.iter().rev().copied() {
            for id in from..to {
                let id = NodeId(id);
                let node = get!(node id, self);
                if !node.flags.is_marked() {
                    continue;
                }
                let value = node.value_bot;
                foreach!(edge of id, self, |edge: Edge| {
                    let using_edge = value.saturating_add(edge.cost);
                    let parent = get!(mut node edge.from, self);
                    parent.flags.set_marked(true);
                    parent.value_bot = parent.value_bot.max(using_edge);
                });
            }
        }
    }

    #[allow(clippy::redundant_closure_call)]
    fn _compute_thresholds(&mut self, input: &CompilationInput<T>) {
        if input.comp_type != CompilationType::Relaxed && !self.is_exact {
            return;
        }

        let mut best_known = input.best_lb;
        if let Some(best_exact) = self.best_exact_node {
            best_known = best_known.max(get!(node best_exact, self).value_top);

            for id in self.next_l.values() {
                let node = get!(mut node id, self);
                if node.flags.is_exact() {
                    node.theta = Some(best_known);
                }
            }
        }

        for Layer { from, to } in self.layers.iter().rev().copied() {
            for id in from..to {
                let id = NodeId(id);
                let node = get!(mut node id, self);
                if node.flags.is_deleted() {
                    continue;
                }

                // the theta of a pruned node is known already: it is only propagated
                if !node.flags.is_pruned() {
                    let tot_rub = node.value_top.saturating_add(node.rub);
                    if tot_rub <= best_known {
                        node.theta = Some(best_known.saturating_sub(node.rub));
                    } else if node.flags.is_cutset() {
                        let tot_locb = node.value_top.saturating_add(node.value_bot);
                        if tot_locb <= best_known {
                            let theta = node.theta.unwrap_or(isize::MAX);
                            node.theta = Some(theta.min(best_known.saturating_sub(node.value_bot)));
                        } else {
                            node.theta = Some(node.value_top);
                        }
                    } else if node.flags.is_exact() && node.theta.is_none() {
                        // dead end
                        node.theta = Some(isize::MAX);
                    }

                    Self::_maybe_update_cache(node, input);
                }

                if let Some(my_theta) = node.theta {
                    foreach!(edge of id, self, |edge: Edge| {
                        let parent = get!(mut node edge.from, self);
                        let theta  = parent.theta.unwrap_or(isize::MAX);
                        parent.theta = Some(theta.min(my_theta.saturating_sub(edge.cost)));
                    });
                }
            }
        }
    }

    fn _maybe_update_cache(node: &Node<T>, input: &CompilationInput<T>) {
        // only the nodes in or above the cutset can be stored in the cache
        if let Some(theta) = node.theta {
            if node.flags.is_above_cutset() {
                // a cutset node has not been explored yet
                input.cache.update_threshold(node.state.clone(), node.depth, theta, !node.flags.is_cutset());
            }
        }
    }

    fn _drain_cutset<F>(&mut self, mut func: F)
    where
        F: FnMut(SubProblem<T>),
    {
        let Some(best_value) = self.best_value() else {
            self.cutset.clear();
            return;
        };
        for id in self.cutset.drain(..) {
            let node = get!(node id, self);
            if !node.flags.is_marked() {
                continue;
            }
            let rub  = node.value_top.saturating_add(node.rub);
            let locb = node.value_top.saturating_add(node.value_bot);
            let ub = rub.min(locb).min(best_value);

            func(SubProblem {
                state: node.state.clone(),
                value: node.value_top,
                path: Self::_best_path_partial_borrow(id, &self.path_to_root, &self.nodes, &self.edges),
                ub,
                depth: node.depth,
            })
        }
    }
}

impl<T> LayeredMdd<T>
where
    T: Debug + Eq + Hash,
{
    /// Renders the last compiled diagram as a (not compiled) graphviz 'dot'
    /// string. This leaves you the freedom to fiddle with the graph if needed.
    pub fn as_graphviz(&self, config: &VizConfig) -> String {
        let mut out = String::from("digraph {\n\tranksep = 3;\n\n");

        for (id, node) in self.nodes.iter().enumerate() {
            if !config.show_deleted && node.flags.is_deleted() {
                continue;
            }
            out.push_str(&format!("\t{id} [{}];\n", self.node_attributes(node, config)));

            let best = node.best.map(|eid| *get!(edge eid, self));
            let mut list = node.inbound;
            while let EdgesList::Cons { head, tail } = *get!(edgelist list, self) {
                let edge = *get!(edge head, self);
                out.push_str(&Self::edge(edge, Some(edge) == best));
                list = tail;
            }
        }

        if config.show_deleted && config.group_merged {
            out.push_str(&self.merged_clusters());
        }
        out.push_str(&self.terminal_node());
        out.push_str("}\n");
        out
    }

    fn merged_clusters(&self) -> String {
        let mut by_depth = std::collections::BTreeMap::<usize, Vec<String>>::new();
        for (id, node) in self.nodes.iter().enumerate() {
            if node.flags.is_deleted() || node.flags.is_relaxed() {
                by_depth.entry(node.depth).or_default().push(id.to_string());
            }
        }
        let mut out = String::new();
        for (depth, merged) in by_depth {
            out.push_str(&format!(
                "\tsubgraph cluster_{depth} {{\n\t\tstyle=filled;\n\t\tcolor=purple;\n\t\t{}\n\t}};\n",
                merged.join(";")));
        }
        out
    }

    /// Draws the terminal node (if the dd is feasible) and the edges leading to it.
    fn terminal_node(&self) -> String {
        let mut out = String::new();
        let mut terminal = self.next_l.values().copied().collect::<Vec<_>>();
        if terminal.is_empty() {
            return out;
        }
        terminal.sort_unstable();
        out.push_str("\tterminal [shape=\"circle\", label=\"\", style=\"filled\", color=\"black\", group=\"terminal\"];\n");

        let vmax = self.best_value().unwrap_or(isize::MAX);
        for id in terminal {
            let width = if self.nodes[id.0].value_top == vmax { 3 } else { 1 };
            out.push_str(&format!("\t{} -> terminal [penwidth={width}];\n", id.0));
        }
        out
    }

    fn edge(edge: Edge, is_best: bool) -> String {
        let Edge { from, to, decision, cost } = edge;
        let width = if is_best { 3 } else { 1 };
        let variable = decision.variable.id();
        let value = decision.value;
        format!("\t{} -> {} [penwidth={width},label=\"(x{variable} = {value})\\ncost = {cost}\"];\n", from.0, to.0)
    }

    fn node_attributes(&self, node: &Node<T>, config: &VizConfig) -> String {
        let merged = node.flags.is_relaxed();
        let shape = if merged || node.flags.is_deleted() { "square" } else { "circle" };
        let peripheries = if node.flags.is_cutset() { 4 } else { 1 };
        let color = if node.flags.is_cutset() {
            "red"
        } else if node.flags.is_exact() {
            "\"#99ccff\""
        } else if merged {
            "yellow"
        } else {
            "lightgray"
        };
        let group = node.best
            .map(|eid| get!(edge eid, self).decision.variable.id().to_string())
            .unwrap_or_else(|| "root".to_string());

        let mut label = format!("{:?}", node.state);
        if config.show_value {
            label.push_str(&format!("\\nval: {}", Self::extreme(node.value_top)));
        }
        if config.show_locb {
            label.push_str(&format!("\\nlocb: {}", Self::extreme(node.value_bot)));
        }
        if config.show_rub {
            label.push_str(&format!("\\nrub: {}", Self::extreme(node.rub)));
        }
        if config.show_threshold {
            label.push_str(&format!("\\ntheta: {}", Self::extreme(node.theta.unwrap_or(isize::MAX))));
        }

        format!("shape={shape},style=filled,color={color},peripheries={peripheries},group=\"{group}\",label=\"{label}\"")
    }

    /// Replaces the extreme values with +inf and -inf
    fn extreme(x: isize) -> String {
        match x {
            isize::MAX => "+inf".to_string(),
            isize::MIN => "-inf".to_string(),
            _ => x.to_string(),
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_layered_mdd {
    use std::cmp::Ordering;
    use std::sync::Arc;

    use fxhash::FxHashMap;

    use crate::*;

    type Mdd<T> = LayeredMdd<T>;

    fn root() -> SubProblem<DummyState> {
        SubProblem {
            state: Arc::new(DummyState { depth: 0, value: 0 }),
            value: 0,
            path: vec![],
            ub: isize::MAX,
            depth: 0,
        }
    }

    fn dummy_input<'a>(
        comp_type: CompilationType,
        max_width: usize,
        best_lb: isize,
        residual: &'a SubProblem<DummyState>,
        cache: &'a dyn Cache<DummyState>,
    ) -> CompilationInput<'a, DummyState> {
        CompilationInput {
            comp_type,
            problem:     &DummyProblem,
            relaxation:  &DummyRelax,
            ranking:     &DummyRanking,
            var_heu:     &NaturalOrder,
            upper_bound: &DummyBound,
            reduction:   &CostBased,
            cutoff:      &NoCutoff,
            max_width,
            residual,
            best_lb,
            cutset_type: CutsetType::LastExactLayer,
            cache,
            dominance:   &EmptyDominanceChecker,
        }
    }

    #[test]
    fn by_default_the_mdd_type_is_exact() {
        let mdd = Mdd::<usize>::new();

        assert!(mdd.is_exact());
        assert!(!mdd.relaxed_best_path_is_exact());
        assert_eq!(None, mdd.best_value());
    }

    #[test]
    fn root_remembers_the_pa_from_the_frontier_node() {
        let cache = EmptyCache::new();
        let residual = SubProblem {
            state: Arc::new(DummyState { depth: 1, value: 42 }),
            value: 42,
            path:  vec![Decision { variable: Variable(0), value: 42 }],
            ub:    isize::MAX,
            depth: 1,
        };
        let mut mdd = Mdd::new();
        for comp_type in [CompilationType::Exact, CompilationType::Relaxed, CompilationType::Restricted] {
            let input = dummy_input(comp_type, 3, isize::MIN, &residual, &cache);
            assert!(mdd.compile(&input).is_ok());
            assert_eq!(mdd.path_to_root, vec![Decision { variable: Variable(0), value: 42 }]);

            let solution = mdd.best_solution().unwrap();
            assert_eq!(3, solution.len());
            assert_eq!(Decision { variable: Variable(0), value: 42 }, solution[0]);
            assert_eq!(Some(46), mdd.best_value());
        }
    }

    // In an exact setup, the dummy problem would be 3*3*3 = 9 large at the bottom level
    #[test]
    fn exact_completely_unrolls_the_mdd_no_matter_its_width() {
        let cache = EmptyCache::new();
        let residual = root();
        let input = dummy_input(CompilationType::Exact, 1, isize::MIN, &residual, &cache);
        let mut mdd = Mdd::new();

        assert!(mdd.compile(&input).is_ok());
        assert!(mdd.is_exact());
        assert_eq!(mdd.best_value(), Some(6));
        assert_eq!(mdd.best_solution().unwrap(),
                   vec![
                       Decision { variable: Variable(2), value: 2 },
                       Decision { variable: Variable(1), value: 2 },
                       Decision { variable: Variable(0), value: 2 },
                   ]
        );
    }

    #[test]
    fn compiling_an_exact_mdd_twice_yields_the_same_outcome() {
        let cache = EmptyCache::new();
        let residual = root();
        let input = dummy_input(CompilationType::Exact, 1, isize::MIN, &residual, &cache);
        let mut mdd = Mdd::new();

        let first = mdd.compile(&input);
        let first_solution = mdd.best_solution();
        let second = mdd.compile(&input);
        assert_eq!(first, second);
        assert_eq!(first_solution, mdd.best_solution());
    }

    #[test]
    fn restricted_drops_the_less_interesting_nodes() {
        let cache = EmptyCache::new();
        let residual = root();
        let input = dummy_input(CompilationType::Restricted, 1, isize::MIN, &residual, &cache);
        let mut mdd = Mdd::new();

        assert!(mdd.compile(&input).is_ok());
        assert!(!mdd.is_exact());
        assert_eq!(mdd.best_value(), Some(6));
        assert_eq!(mdd.best_exact_value(), Some(6));
        assert_eq!(mdd.best_solution().unwrap(),
                   vec![
                       Decision { variable: Variable(2), value: 2 },
                       Decision { variable: Variable(1), value: 2 },
                       Decision { variable: Variable(0), value: 2 },
                   ]
        );
        // each layer holds one single node that was kept
        let kept = mdd.nodes.iter().filter(|n| !n.flags.is_deleted()).count();
        assert_eq!(1 + 1 + 1 + 3, kept);
    }

    #[test]
    fn relaxed_merges_the_less_interesting_nodes() {
        let cache = EmptyCache::new();
        let residual = root();
        let input = dummy_input(CompilationType::Relaxed, 1, isize::MIN, &residual, &cache);
        let mut mdd = Mdd::new();

        assert!(mdd.compile(&input).is_ok());
        assert!(!mdd.is_exact());
        assert!(!mdd.relaxed_best_path_is_exact());
        assert_eq!(mdd.best_value(), Some(24));
        assert_eq!(mdd.best_solution().unwrap(),
                   vec![
                       Decision { variable: Variable(2), value: 2 },
                       Decision { variable: Variable(1), value: 0 }, // that's a relaxed edge
                       Decision { variable: Variable(0), value: 2 },
                   ]
        );
    }

    #[test]
    fn relaxed_populates_the_cutset_and_will_not_squash_first_layer() {
        let cache = EmptyCache::new();
        let residual = root();
        let input = dummy_input(CompilationType::Relaxed, 1, isize::MIN, &residual, &cache);
        let mut mdd = Mdd::new();
        assert!(mdd.compile(&input).is_ok());

        let mut cutset = vec![];
        mdd.drain_cutset(|n| cutset.push(n));
        assert_eq!(cutset.len(), 3); // L1 was not squashed even though it was 3 wide
        for node in cutset {
            assert_eq!(1, node.depth);
            assert_eq!(1, node.path.len());
            assert!(node.ub >= node.value);
        }
    }

    #[test]
    fn the_cutset_can_only_be_drained_once() {
        let cache = EmptyCache::new();
        let residual = root();
        let input = dummy_input(CompilationType::Relaxed, 1, isize::MIN, &residual, &cache);
        let mut mdd = Mdd::new();
        assert!(mdd.compile(&input).is_ok());

        let mut count = 0;
        mdd.drain_cutset(|_| count += 1);
        mdd.drain_cutset(|_| count += 1);
        assert_eq!(3, count);
    }

    #[test]
    fn completion_must_be_coherent_with_outcome() {
        let cache = EmptyCache::new();
        let residual = root();
        for comp_type in [CompilationType::Exact, CompilationType::Relaxed, CompilationType::Restricted] {
            let input = dummy_input(comp_type, 1, isize::MIN, &residual, &cache);
            let mut mdd = Mdd::new();
            let completion = mdd.compile(&input).unwrap();
            assert_eq!(completion.is_exact, mdd.is_exact() || mdd.relaxed_best_path_is_exact());
            assert_eq!(completion.best_value, mdd.best_value());
        }
    }

    #[test]
    fn compilation_fails_with_cutoff_when_cutoff_occurs() {
        let cache = EmptyCache::new();
        let residual = root();
        for comp_type in [CompilationType::Exact, CompilationType::Relaxed, CompilationType::Restricted] {
            let mut input = dummy_input(comp_type, 1, isize::MIN, &residual, &cache);
            input.cutoff = &KillSwitch;
            let mut mdd = Mdd::new();
            assert_eq!(Err(Reason::CutoffOccurred), mdd.compile(&input));
        }
    }

    #[test]
    fn a_relaxed_mdd_is_exact_as_long_as_no_merge_occurs() {
        let cache = EmptyCache::new();
        let residual = root();
        let input = dummy_input(CompilationType::Relaxed, 10, isize::MIN, &residual, &cache);
        let mut mdd = Mdd::new();
        assert!(mdd.compile(&input).is_ok());
        assert!(mdd.is_exact());
        assert_eq!(Some(6), mdd.best_exact_value());
    }

    #[test]
    fn a_restricted_mdd_is_exact_as_long_as_no_restriction_occurs() {
        let cache = EmptyCache::new();
        let residual = root();
        let input = dummy_input(CompilationType::Restricted, 10, isize::MIN, &residual, &cache);
        let mut mdd = Mdd::new();
        assert!(mdd.compile(&input).is_ok());
        assert!(mdd.is_exact());
    }

    #[test]
    fn a_width_of_zero_behaves_as_a_width_of_one() {
        let cache = EmptyCache::new();
        let residual = root();
        let input = dummy_input(CompilationType::Restricted, 0, isize::MIN, &residual, &cache);
        let mut mdd = Mdd::new();
        assert!(mdd.compile(&input).is_ok());
        assert_eq!(Some(6), mdd.best_value());
    }

    #[test]
    fn when_the_problem_is_infeasible_there_is_no_solution() {
        let cache = EmptyCache::new();
        let residual = root();
        for comp_type in [CompilationType::Exact, CompilationType::Relaxed, CompilationType::Restricted] {
            let mut input = dummy_input(comp_type, 1, isize::MIN, &residual, &cache);
            input.problem = &DummyInfeasibleProblem;
            let mut mdd = Mdd::new();
            assert!(mdd.compile(&input).is_ok());
            assert!(mdd.best_solution().is_none());
            assert!(mdd.best_value().is_none());
            assert!(mdd.best_exact_value().is_none());
        }
    }

    #[test]
    fn nodes_with_an_ub_less_than_best_known_lb_are_not_expanded() {
        let cache = EmptyCache::new();
        let residual = root();
        for comp_type in [CompilationType::Exact, CompilationType::Relaxed, CompilationType::Restricted] {
            let input = dummy_input(comp_type, usize::MAX, 1000, &residual, &cache);
            let mut mdd = Mdd::new();
            assert!(mdd.compile(&input).is_ok());
            assert!(mdd.best_solution().is_none());
            assert_eq!(1, mdd.nodes.len());
        }
    }

    #[test]
    fn nodes_with_a_value_less_than_known_threshold_are_not_expanded() {
        let cache = SimpleCache::new(3);
        cache.update_threshold(Arc::new(DummyState { depth: 1, value: 0 }), 1, 0, true);
        cache.update_threshold(Arc::new(DummyState { depth: 1, value: 1 }), 1, 1, true);
        cache.update_threshold(Arc::new(DummyState { depth: 1, value: 2 }), 1, 2, true);
        let residual = root();
        for comp_type in [CompilationType::Exact, CompilationType::Relaxed, CompilationType::Restricted] {
            let input = dummy_input(comp_type, usize::MAX, isize::MIN, &residual, &cache);
            let mut mdd = Mdd::new();
            assert!(mdd.compile(&input).is_ok());
            assert!(mdd.best_solution().is_none());
            assert!(mdd.nodes.iter().skip(1).all(|n| n.flags.is_pruned()));
        }
    }

    #[test]
    fn dominated_exact_nodes_are_not_expanded() {
        let cache = EmptyCache::new();
        let dominance = SimpleDominanceChecker::new(DummyDominance);
        let residual = root();
        let mut input = dummy_input(CompilationType::Exact, usize::MAX, isize::MIN, &residual, &cache);
        input.dominance = &dominance;
        let mut mdd = Mdd::new();

        assert!(mdd.compile(&input).is_ok());
        assert_eq!(Some(6), mdd.best_value());
        // two nodes are dominated in each of the first two layers
        assert_eq!(4, mdd.nodes.iter().filter(|n| n.flags.is_pruned()).count());
    }

    #[test]
    fn a_custom_variable_heuristic_decides_the_branching_order() {
        let cache = EmptyCache::new();
        let residual = root();
        let mut input = dummy_input(CompilationType::Exact, usize::MAX, isize::MIN, &residual, &cache);
        input.var_heu = &Reversed;
        let mut mdd = Mdd::new();

        assert!(mdd.compile(&input).is_ok());
        assert_eq!(mdd.best_solution().unwrap(),
                   vec![
                       Decision { variable: Variable(0), value: 2 },
                       Decision { variable: Variable(1), value: 2 },
                       Decision { variable: Variable(2), value: 2 },
                   ]
        );
    }

    #[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
    struct DummyState {
        value: isize,
        depth: usize,
    }

    #[derive(Copy, Clone)]
    struct DummyProblem;
    impl Problem for DummyProblem {
        type State = DummyState;

        fn nb_variables(&self)  -> usize { 3 }
        fn initial_value(&self) -> isize { 0 }
        fn initial_state(&self) -> Self::State {
            DummyState { value: 0, depth: 0 }
        }
        fn transition(&self, state: &Self::State, decision: Decision) -> Self::State {
            DummyState { value: state.value + decision.value, depth: 1 + state.depth }
        }
        fn transition_cost(&self, _: &Self::State, decision: Decision) -> isize {
            decision.value
        }
        fn for_each_in_domain(&self, var: Variable, _: &Self::State, f: &mut dyn DecisionCallback) {
            for d in 0..=2 {
                f.apply(Decision { variable: var, value: d })
            }
        }
    }

    #[derive(Clone, Copy)]
    struct DummyInfeasibleProblem;
    impl Problem for DummyInfeasibleProblem {
        type State = DummyState;

        fn nb_variables(&self)  -> usize { 3 }
        fn initial_value(&self) -> isize { 0 }
        fn initial_state(&self) -> Self::State {
            DummyState { value: 0, depth: 0 }
        }
        fn transition(&self, state: &Self::State, decision: Decision) -> Self::State {
            DummyState { value: state.value + decision.value, depth: 1 + state.depth }
        }
        fn transition_cost(&self, _: &Self::State, decision: Decision) -> isize {
            decision.value
        }
        fn for_each_in_domain(&self, _: Variable, _: &Self::State, _: &mut dyn DecisionCallback) {
            /* do nothing, just consider that all domains are empty */
        }
    }

    #[derive(Copy, Clone)]
    struct DummyRelax;
    impl Relaxation for DummyRelax {
        type State = DummyState;

        fn merge(&self, s: &mut dyn Iterator<Item = &Self::State>) -> Self::State {
            let depth = s.next().map(|s| s.depth).unwrap_or_default();
            DummyState { value: 100, depth }
        }
        fn relax(&self, _: &Self::State, _: &Self::State, _: &Self::State, _: Decision, _: isize) -> isize {
            20
        }
    }

    struct DummyBound;
    impl FastUpperBound<DummyState> for DummyBound {
        fn fast_upper_bound(&self, _: &DummyState, free: &VarSet) -> isize {
            free.len() as isize * 10
        }
    }

    #[derive(Copy, Clone)]
    struct DummyRanking;
    impl StateRanking for DummyRanking {
        type State = DummyState;

        fn compare(&self, a: &Self::State, b: &Self::State) -> Ordering {
            a.value.cmp(&b.value).reverse()
        }
    }

    struct DummyDominance;
    impl Dominance for DummyDominance {
        type State = DummyState;
        type Key = usize;

        fn get_key(&self, state: &DummyState) -> Option<usize> {
            Some(state.depth)
        }
        fn is_dominated_or_equal(&self, a: &DummyState, b: &DummyState) -> bool {
            a.value <= b.value
        }
    }

    struct KillSwitch;
    impl Cutoff for KillSwitch {
        fn must_stop(&self) -> bool {
            true
        }
    }

    struct Reversed;
    impl<X> VariableHeuristic<X> for Reversed {
        fn next_variable(&self, _: usize, free: &VarSet, _: &mut dyn Iterator<Item = &X>) -> Option<Variable> {
            free.iter().last()
        }
    }

    // ------------------------------------------------------------------------
    // The following problem yields a diagram that looks like this when it is
    // compiled with a maximum width of 3 (c and d are merged into M):
    //
    //                      r
    //                 10 /   \ 7
    //                   a     b
    //                 2 |  3/ |6 \5
    //                   M     e   f
    //                 4 |   0 | 1/ \2
    //                   g     h     i
    //                    \0   |0   /0
    //                         t
    // ------------------------------------------------------------------------
    #[derive(Copy, Clone)]
    struct LocBoundsAndThresholdsExamplePb;
    impl Problem for LocBoundsAndThresholdsExamplePb {
        type State = char;
        fn nb_variables (&self) -> usize {  4  }
        fn initial_state(&self) -> char  { 'r' }
        fn initial_value(&self) -> isize {  0  }
        fn for_each_in_domain(&self, variable: Variable, state: &Self::State, f: &mut dyn DecisionCallback) {
            (match *state {
                'r' => vec![10, 7],
                'a' => vec![2],
                'b' => vec![3, 6, 5],
                'c' | 'd' | 'M' => vec![4],
                'e' => vec![0],
                'f' => vec![1, 2],
                'g' | 'h' | 'i' => vec![0],
                _   => vec![],
            })
            .iter()
            .copied()
            .for_each(&mut |value| f.apply(Decision { variable, value }))
        }
        fn transition(&self, state: &char, d: Decision) -> char {
            match (*state, d.value) {
                ('r', 10) => 'a',
                ('r',  7) => 'b',
                ('a',  2) => 'c',
                ('b',  3) => 'd',
                ('b',  6) => 'e',
                ('b',  5) => 'f',
                ('c' | 'd' | 'M', 4) => 'g',
                ('e',  0) => 'h',
                ('f',  1) => 'h',
                ('f',  2) => 'i',
                _         => 't'
            }
        }
        fn transition_cost(&self, _: &char, d: Decision) -> isize {
            d.value
        }
    }

    #[derive(Copy, Clone)]
    struct LocBoundsAndThresholdsExampleRelax;
    impl Relaxation for LocBoundsAndThresholdsExampleRelax {
        type State = char;
        fn merge(&self, _: &mut dyn Iterator<Item = &char>) -> char {
            'M'
        }
        fn relax(&self, _: &char, _: &char, _: &char, _: Decision, cost: isize) -> isize {
            cost
        }
    }

    /// Makes the merged paths so costly that the longest path becomes exact
    struct PenalizingRelax;
    impl Relaxation for PenalizingRelax {
        type State = char;
        fn merge(&self, _: &mut dyn Iterator<Item = &char>) -> char {
            'M'
        }
        fn relax(&self, _: &char, _: &char, _: &char, _: Decision, cost: isize) -> isize {
            cost - 10
        }
    }

    struct CharBound;
    impl FastUpperBound<char> for CharBound {
        fn fast_upper_bound(&self, state: &char, _: &VarSet) -> isize {
            match *state {
                'r' => 30,
                'a' | 'b' => 20,
                'c' | 'd' | 'M' | 'e' | 'f' => 10,
                _ => 0,
            }
        }
    }

    #[derive(Clone, Copy)]
    struct CmpChar;
    impl StateRanking for CmpChar {
        type State = char;
        fn compare(&self, a: &char, b: &char) -> Ordering {
            a.cmp(b)
        }
    }

    fn char_root() -> SubProblem<char> {
        SubProblem { state: Arc::new('r'), value: 0, path: vec![], ub: isize::MAX, depth: 0 }
    }

    fn char_input<'a>(
        comp_type: CompilationType,
        cutset_type: CutsetType,
        residual: &'a SubProblem<char>,
        cache: &'a dyn Cache<char>,
    ) -> CompilationInput<'a, char> {
        CompilationInput {
            comp_type,
            problem:     &LocBoundsAndThresholdsExamplePb,
            relaxation:  &LocBoundsAndThresholdsExampleRelax,
            ranking:     &CmpChar,
            var_heu:     &NaturalOrder,
            upper_bound: &CharBound,
            reduction:   &CostBased,
            cutoff:      &NoCutoff,
            max_width:   3,
            residual,
            best_lb:     0,
            cutset_type,
            cache,
            dominance:   &EmptyDominanceChecker,
        }
    }

    #[test]
    fn exact_finds_the_best_exact_path() {
        let cache = EmptyCache::new();
        let residual = char_root();
        let input = char_input(CompilationType::Exact, CutsetType::LastExactLayer, &residual, &cache);
        let mut mdd = Mdd::new();
        assert!(mdd.compile(&input).is_ok());
        assert!(mdd.is_exact());
        assert_eq!(Some(16), mdd.best_value());
        assert_eq!(Some(16), mdd.best_exact_value());
        assert_eq!(mdd.best_solution(), mdd.best_exact_solution());
    }

    #[test]
    fn restricted_keeps_the_best_member_of_each_cluster() {
        let cache = EmptyCache::new();
        let residual = char_root();
        let input = char_input(CompilationType::Restricted, CutsetType::LastExactLayer, &residual, &cache);
        let mut mdd = Mdd::new();
        let completion = mdd.compile(&input).unwrap();
        assert!(!completion.is_exact);
        assert_eq!(Some(16), completion.best_value);
        assert_eq!(Some(16), mdd.best_exact_value());

        let deleted = mdd.nodes.iter().filter(|n| n.flags.is_deleted()).map(|n| *n.state).collect::<Vec<_>>();
        assert_eq!(vec!['d'], deleted);
    }

    #[test]
    fn relaxed_computes_local_bounds_and_thresholds_with_last_exact_layer() {
        let cache = SimpleCache::new(4);
        let residual = char_root();
        let input = char_input(CompilationType::Relaxed, CutsetType::LastExactLayer, &residual, &cache);
        let mut mdd = Mdd::new();
        assert!(mdd.compile(&input).is_ok());

        assert!(!mdd.is_exact());
        assert!(!mdd.relaxed_best_path_is_exact());
        assert_eq!(Some(16), mdd.best_value());
        assert_eq!(None, mdd.best_exact_value());

        let mut v = FxHashMap::<char, isize>::default();
        mdd.drain_cutset(|n| { v.insert(*n.state, n.ub); });

        assert_eq!(16, v[&'a']);
        assert_eq!(14, v[&'b']);
        assert_eq!(2, v.len());

        assert_eq!(Some(Threshold { value: 0, explored: true }), cache.get_threshold(&'r', 0));
        assert_eq!(Some(Threshold { value: 10, explored: false }), cache.get_threshold(&'a', 1));
        assert_eq!(Some(Threshold { value: 7, explored: false }), cache.get_threshold(&'b', 1));
        assert!(cache.get_threshold(&'M', 2).is_none());
        assert!(cache.get_threshold(&'e', 2).is_none());
        assert!(cache.get_threshold(&'f', 2).is_none());
        assert!(cache.get_threshold(&'h', 3).is_none());
        assert!(cache.get_threshold(&'t', 4).is_none());
    }

    #[test]
    fn relaxed_computes_local_bounds_and_thresholds_with_frontier() {
        let cache = SimpleCache::new(4);
        let residual = char_root();
        let input = char_input(CompilationType::Relaxed, CutsetType::Frontier, &residual, &cache);
        let mut mdd = Mdd::new();
        assert!(mdd.compile(&input).is_ok());

        assert!(!mdd.is_exact());
        assert_eq!(Some(16), mdd.best_value());

        let mut v = FxHashMap::<char, isize>::default();
        mdd.drain_cutset(|n| { v.insert(*n.state, n.ub); });

        assert_eq!(16, v[&'a']);
        assert_eq!(14, v[&'b']);
        assert_eq!(13, v[&'h']);
        assert_eq!(14, v[&'i']);
        assert_eq!(4, v.len());

        assert!(cache.get_threshold(&'M', 2).is_none());
        assert!(cache.get_threshold(&'g', 3).is_none());
        assert!(cache.get_threshold(&'t', 4).is_none());

        assert_eq!(Some(Threshold { value: 0, explored: true }), cache.get_threshold(&'r', 0));
        assert_eq!(Some(Threshold { value: 10, explored: false }), cache.get_threshold(&'a', 1));
        assert_eq!(Some(Threshold { value: 7, explored: false }), cache.get_threshold(&'b', 1));
        assert_eq!(Some(Threshold { value: 13, explored: true }), cache.get_threshold(&'e', 2));
        assert_eq!(Some(Threshold { value: 12, explored: true }), cache.get_threshold(&'f', 2));
        assert_eq!(Some(Threshold { value: 13, explored: false }), cache.get_threshold(&'h', 3));
        assert_eq!(Some(Threshold { value: 14, explored: false }), cache.get_threshold(&'i', 3));
    }

    #[test]
    fn a_relaxed_mdd_whose_best_path_avoids_merged_nodes_is_exact_for_its_subproblem() {
        let cache = EmptyCache::new();
        let residual = char_root();
        let mut input = char_input(CompilationType::Relaxed, CutsetType::LastExactLayer, &residual, &cache);
        input.relaxation = &PenalizingRelax;
        let mut mdd = Mdd::new();
        let completion = mdd.compile(&input).unwrap();

        assert!(!mdd.is_exact());
        assert!(mdd.relaxed_best_path_is_exact());
        assert!(completion.is_exact);
        assert_eq!(Some(14), mdd.best_value());
        assert_eq!(Some(14), mdd.best_exact_value());
    }

    #[test]
    fn nodes_pruned_by_the_cache_still_propagate_their_threshold() {
        let cache = SimpleCache::new(4);
        cache.update_threshold(Arc::new('b'), 1, 7, true);
        let residual = char_root();
        let input = char_input(CompilationType::Exact, CutsetType::LastExactLayer, &residual, &cache);
        let mut mdd = Mdd::new();
        assert!(mdd.compile(&input).is_ok());

        assert!(mdd.is_exact());
        assert_eq!(Some(16), mdd.best_value());
        assert_eq!(Some(Threshold { value: 7, explored: true }), cache.get_threshold(&'b', 1));
        assert_eq!(Some(Threshold { value: 0, explored: true }), cache.get_threshold(&'r', 0));
    }

    #[test]
    fn every_reduction_strategy_yields_a_sound_relaxation() {
        struct CharDistance;
        impl StateDistance for CharDistance {
            type State = char;
            fn distance(&self, a: &char, b: &char) -> f64 {
                (*a as i64 - *b as i64).abs() as f64
            }
        }
        struct CharCoordinates;
        impl StateCoordinates for CharCoordinates {
            type State = char;
            fn coordinates(&self, state: &char) -> Vec<f64> {
                vec![*state as u32 as f64]
            }
        }
        let reductions: Vec<Box<dyn ReductionStrategy<char>>> = vec![
            Box::new(CostBased),
            Box::new(Ghp::new(CharDistance)),
            Box::new(GhpAlt::new(CharDistance, LocBoundsAndThresholdsExampleRelax, 'r')),
            Box::new(Mbp::new(CharDistance)),
            Box::new(Hybrid::new(CharDistance)),
            Box::new(KMeans::new(CharCoordinates)),
        ];

        let cache = EmptyCache::new();
        let residual = char_root();
        for reduction in reductions.iter() {
            let mut input = char_input(CompilationType::Relaxed, CutsetType::LastExactLayer, &residual, &cache);
            input.reduction = reduction.as_ref();
            let mut mdd = Mdd::new();
            assert!(mdd.compile(&input).is_ok());
            assert!(mdd.best_value().unwrap() >= 16);

            input.comp_type = CompilationType::Restricted;
            assert!(mdd.compile(&input).is_ok());
            assert!(mdd.best_value().unwrap() <= 16);
        }
    }

    #[test]
    fn graphviz_export_shows_what_it_is_asked_to() {
        let cache = EmptyCache::new();
        let residual = char_root();
        let input = char_input(CompilationType::Relaxed, CutsetType::LastExactLayer, &residual, &cache);
        let mut mdd = Mdd::new();
        assert!(mdd.compile(&input).is_ok());

        let default = mdd.as_graphviz(&VizConfigBuilder::default().build().unwrap());
        assert!(default.starts_with("digraph {"));
        assert!(default.contains("terminal"));
        assert!(default.contains("'M'"));
        assert!(default.contains("locb"));
        assert!(!default.contains("'c'"));
        assert!(!default.contains("cluster_"));

        let terse = mdd.as_graphviz(&VizConfigBuilder::default()
            .show_value(false)
            .show_locb(false)
            .show_rub(false)
            .show_threshold(false)
            .build().unwrap());
        assert!(!terse.contains("val:"));
        assert!(!terse.contains("locb"));
        assert!(!terse.contains("rub"));
        assert!(!terse.contains("theta"));

        let deleted = mdd.as_graphviz(&VizConfigBuilder::default()
            .show_deleted(true)
            .group_merged(true)
            .build().unwrap());
        assert!(deleted.contains("'c'"));
        assert!(deleted.contains("'d'"));
        assert!(deleted.contains("subgraph cluster_2"));
    }
}
