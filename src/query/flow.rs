// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::model::{NodeId, ProcessGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeDegree {
    pub in_degree: u64,
    pub out_degree: u64,
}

impl NodeDegree {
    /// Not touched by any transition; such a state is absent from the exported document.
    pub fn is_isolated(&self) -> bool {
        self.in_degree == 0 && self.out_degree == 0
    }
}

/// In/out degree per known node. Transitions pointing at unknown nodes are ignored.
pub fn degrees(graph: &ProcessGraph) -> BTreeMap<NodeId, NodeDegree> {
    let mut degrees: BTreeMap<NodeId, NodeDegree> = BTreeMap::new();
    for node in graph.nodes() {
        degrees.entry(node.id().clone()).or_default();
    }

    for transition in graph.transitions() {
        if let Some(degree) = degrees.get_mut(transition.source()) {
            degree.out_degree = degree.out_degree.saturating_add(1);
        }
        if let Some(degree) = degrees.get_mut(transition.target()) {
            degree.in_degree = degree.in_degree.saturating_add(1);
        }
    }

    degrees
}

/// States reachable from the start state by following transitions forward.
pub fn reachable_from_start(graph: &ProcessGraph) -> BTreeSet<NodeId> {
    let mut outgoing: BTreeMap<&NodeId, Vec<&NodeId>> = BTreeMap::new();
    for transition in graph.transitions() {
        outgoing.entry(transition.source()).or_default().push(transition.target());
    }

    let mut visited = BTreeSet::<NodeId>::new();
    let start = NodeId::start();
    if !graph.contains_node(&start) {
        return visited;
    }

    let mut queue = VecDeque::<NodeId>::new();
    visited.insert(start.clone());
    queue.push_back(start);

    while let Some(node_id) = queue.pop_front() {
        for next_id in outgoing.get(&node_id).into_iter().flatten() {
            if !graph.contains_node(next_id) {
                continue;
            }
            if visited.insert((*next_id).clone()) {
                queue.push_back((*next_id).clone());
            }
        }
    }

    visited
}

/// States the process can never enter, in graph order.
pub fn unreachable_states(graph: &ProcessGraph) -> Vec<NodeId> {
    let reachable = reachable_from_start(graph);
    graph
        .nodes()
        .iter()
        .map(|node| node.id())
        .filter(|node_id| !reachable.contains(*node_id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{degrees, reachable_from_start, unreachable_states, NodeDegree};
    use crate::model::fixtures::{booking_process, nid};
    use crate::model::{Node, NodeId, Position};

    #[test]
    fn degrees_count_in_and_out_edges() {
        let graph = booking_process();
        let degrees = degrees(&graph);

        assert_eq!(degrees[&NodeId::start()], NodeDegree { in_degree: 0, out_degree: 1 });
        assert_eq!(degrees[&nid("requested")], NodeDegree { in_degree: 1, out_degree: 2 });
        assert_eq!(degrees[&nid("completed")], NodeDegree { in_degree: 1, out_degree: 0 });
        assert!(!degrees[&nid("declined")].is_isolated());
    }

    #[test]
    fn isolated_states_are_unreachable() {
        let mut graph = booking_process();
        graph.add_node(Node::new(nid("orphan"), Position::ORIGIN)).expect("add");

        assert!(degrees(&graph)[&nid("orphan")].is_isolated());
        assert!(!reachable_from_start(&graph).contains(&nid("orphan")));
        assert_eq!(unreachable_states(&graph), vec![nid("orphan")]);
    }
}
