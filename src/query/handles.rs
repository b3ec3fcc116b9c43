// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Incoming connection points per state.
//!
//! Every transition arriving at a state gets its own handle so edges terminate at distinct
//! offsets, plus one trailing "next slot" handle that receives the next connect gesture.
//! Handles are never stored on the model; they are a projection of the transition set.

use std::collections::{BTreeMap, BTreeSet};

use smallvec::SmallVec;

use crate::model::{NodeId, ProcessGraph, TransitionId};

const NEXT_SLOT_PREFIX: &str = "in-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// Dedicated arrival point of one transition; the handle id is the transition id.
    Transition,
    /// Synthetic drop target (`in-{count+1}`); never persisted or exported.
    NextSlot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle {
    id: String,
    ordinal: usize,
    kind: HandleKind,
}

impl Handle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Index among the node's handles. Visual only.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    pub fn is_next_slot(&self) -> bool {
        self.kind == HandleKind::NextSlot
    }

    /// Horizontal offset from the node's left edge.
    pub fn offset(&self, spacing: f64) -> f64 {
        self.ordinal as f64 * spacing
    }
}

pub type HandleList = SmallVec<[Handle; 4]>;

/// Computes the handle list of a single node.
///
/// Order is the insertion order of the transition set; a transition id is represented once
/// no matter how often it appears. The start state never has incoming handles.
pub fn incoming_handles(graph: &ProcessGraph, node_id: &NodeId) -> HandleList {
    let incoming = graph.incoming(node_id).map(|t| t.id().clone()).collect::<Vec<_>>();
    handles_from_incoming(node_id, &incoming)
}

fn handles_from_incoming(node_id: &NodeId, incoming: &[TransitionId]) -> HandleList {
    let mut handles = HandleList::new();
    if node_id.is_start() {
        return handles;
    }

    let mut seen = BTreeSet::<&TransitionId>::new();
    for transition_id in incoming {
        if !seen.insert(transition_id) {
            continue;
        }
        handles.push(Handle {
            id: transition_id.to_string(),
            ordinal: handles.len(),
            kind: HandleKind::Transition,
        });
    }

    let count = handles.len();
    handles.push(Handle {
        id: format!("{NEXT_SLOT_PREFIX}{}", count + 1),
        ordinal: count,
        kind: HandleKind::NextSlot,
    });
    handles
}

#[derive(Debug, Clone)]
struct Entry {
    incoming: Vec<TransitionId>,
    handles: HandleList,
}

/// Memoized handle lists for every node of a graph.
///
/// [`HandleAllocator::sync`] only recomputes nodes whose incoming transitions changed, and a
/// sync without underlying changes is a no-op.
#[derive(Debug, Clone, Default)]
pub struct HandleAllocator {
    entries: BTreeMap<NodeId, Entry>,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the memo in line with `graph`; returns the nodes whose handle list changed.
    pub fn sync(&mut self, graph: &ProcessGraph) -> Vec<NodeId> {
        let mut incoming_by_node = BTreeMap::<&NodeId, Vec<TransitionId>>::new();
        for node in graph.nodes() {
            incoming_by_node.entry(node.id()).or_default();
        }
        for transition in graph.transitions() {
            if let Some(ids) = incoming_by_node.get_mut(transition.target()) {
                ids.push(transition.id().clone());
            }
        }

        let mut changed = Vec::new();

        let stale = self
            .entries
            .keys()
            .filter(|node_id| !incoming_by_node.contains_key(node_id))
            .cloned()
            .collect::<Vec<_>>();
        for node_id in stale {
            self.entries.remove(&node_id);
            changed.push(node_id);
        }

        for (node_id, incoming) in incoming_by_node {
            let up_to_date =
                self.entries.get(node_id).is_some_and(|entry| entry.incoming == incoming);
            if up_to_date {
                continue;
            }
            let handles = handles_from_incoming(node_id, &incoming);
            self.entries.insert(node_id.clone(), Entry { incoming, handles });
            changed.push(node_id.clone());
        }

        changed.sort();
        changed
    }

    pub fn handles(&self, node_id: &NodeId) -> &[Handle] {
        self.entries.get(node_id).map(|entry| entry.handles.as_slice()).unwrap_or(&[])
    }

    /// Real (non-synthetic) handle count of a node.
    pub fn real_handle_count(&self, node_id: &NodeId) -> usize {
        self.handles(node_id).iter().filter(|h| !h.is_next_slot()).count()
    }

    pub fn next_slot(&self, node_id: &NodeId) -> Option<&Handle> {
        self.handles(node_id).iter().find(|h| h.is_next_slot())
    }

    /// The arrival handle of `transition_id` on `node_id`, if it is rendered.
    pub fn handle_for_transition(
        &self,
        node_id: &NodeId,
        transition_id: &TransitionId,
    ) -> Option<&Handle> {
        self.handles(node_id)
            .iter()
            .find(|h| h.kind() == HandleKind::Transition && h.id() == transition_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{incoming_handles, HandleAllocator, HandleKind};
    use crate::model::fixtures::{converging_process, nid, tid};
    use crate::model::{ActorKind, NodeId, ProcessGraph, Transition};

    fn ids(handles: &[super::Handle]) -> Vec<&str> {
        handles.iter().map(|h| h.id()).collect()
    }

    #[test]
    fn node_without_incoming_transitions_only_has_the_next_slot() {
        let graph = converging_process();
        let handles = incoming_handles(&graph, &nid("unknown"));
        assert_eq!(ids(&handles), vec!["in-1"]);
        assert_eq!(handles[0].kind(), HandleKind::NextSlot);
        assert_eq!(handles[0].ordinal(), 0);
    }

    #[test]
    fn handles_follow_transition_insertion_order_then_next_slot() {
        let graph = converging_process();
        let handles = incoming_handles(&graph, &nid("done"));
        assert_eq!(ids(&handles), vec!["finish-a", "finish-b", "in-3"]);
        assert_eq!(handles.iter().map(|h| h.ordinal()).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(handles[1].offset(20.0), 20.0);
        assert_eq!(handles[2].offset(20.0), 40.0);
    }

    #[test]
    fn start_node_never_has_incoming_handles() {
        let mut graph = converging_process();
        graph.add_transition(Transition::new(
            tid("back"),
            nid("done"),
            NodeId::start(),
            ActorKind::Operator,
        ));

        assert!(incoming_handles(&graph, &NodeId::start()).is_empty());

        let mut allocator = HandleAllocator::new();
        allocator.sync(&graph);
        assert!(allocator.handles(&NodeId::start()).is_empty());
    }

    #[test]
    fn repeated_transition_id_counts_once() {
        let mut graph = ProcessGraph::new();
        for actor in ActorKind::ALL {
            graph.add_transition(Transition::new(tid("go"), nid("a"), nid("b"), actor));
        }
        let other = Transition::new(tid("other"), nid("a"), nid("b"), ActorKind::Customer);
        graph.add_transition(other);

        let handles = incoming_handles(&graph, &nid("b"));
        assert_eq!(ids(&handles), vec!["go", "other", "in-3"]);
    }

    #[test]
    fn sync_is_idempotent_and_reports_only_changed_nodes() {
        let mut graph = converging_process();
        let mut allocator = HandleAllocator::new();

        let first = allocator.sync(&graph);
        assert_eq!(first.len(), graph.nodes().len());
        assert!(allocator.sync(&graph).is_empty());

        let back = Transition::new(tid("loop"), nid("done"), nid("a"), ActorKind::Automatic);
        graph.add_transition(back);
        assert_eq!(allocator.sync(&graph), vec![nid("a")]);
        assert_eq!(allocator.real_handle_count(&nid("a")), 2);
        assert_eq!(allocator.next_slot(&nid("a")).map(|h| h.id()), Some("in-3"));
        assert!(allocator.handle_for_transition(&nid("a"), &tid("loop")).is_some());
    }

    #[test]
    fn sync_drops_removed_nodes() {
        let mut graph = converging_process();
        let mut allocator = HandleAllocator::new();
        allocator.sync(&graph);

        graph.remove_node(&nid("b")).expect("remove");
        let changed = allocator.sync(&graph);

        assert!(changed.contains(&nid("b")));
        assert!(changed.contains(&nid("done")));
        assert!(allocator.handles(&nid("b")).is_empty());
        assert_eq!(ids(allocator.handles(&nid("done"))), vec!["finish-a", "in-2"]);
    }
}
