// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The save/restore unit: nodes, transitions and viewport as one JSON blob.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::graph::{ActorKind, Node, Position, ProcessGraph, Transition, Viewport};
use super::ids::{NodeId, TransitionId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,
    #[serde(default)]
    pub transitions: Vec<SnapshotTransition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub position: Position,
}

/// Endpoints are optional on the wire: older or hand-edited blobs may carry a transition
/// that was never fully connected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotTransition {
    pub id: TransitionId,
    #[serde(default)]
    pub source: Option<NodeId>,
    #[serde(default)]
    pub target: Option<NodeId>,
    #[serde(default)]
    pub actor: ActorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GraphSnapshot {
    pub fn capture(graph: &ProcessGraph, viewport: Viewport) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|node| SnapshotNode {
                id: node.id().clone(),
                label: (node.label() != node.id().as_str()).then(|| node.label().to_owned()),
                position: node.position(),
            })
            .collect();
        let transitions = graph
            .transitions()
            .iter()
            .map(|t| SnapshotTransition {
                id: t.id().clone(),
                source: Some(t.source().clone()),
                target: Some(t.target().clone()),
                actor: t.actor(),
                label: (t.label() != t.id().as_str()).then(|| t.label().to_owned()),
            })
            .collect();
        Self { nodes, transitions, viewport: Some(viewport) }
    }

    /// Splits the snapshot into model values. Transitions lacking an endpoint cannot be
    /// represented by the model and are dropped.
    pub fn into_parts(self) -> (Vec<Node>, Vec<Transition>, Viewport) {
        let nodes = self
            .nodes
            .into_iter()
            .map(|node| {
                let label = node.label.unwrap_or_else(|| node.id.to_string());
                Node::with_label(node.id, label, node.position)
            })
            .collect();

        let mut transitions = Vec::with_capacity(self.transitions.len());
        for record in self.transitions {
            let (Some(source), Some(target)) = (record.source, record.target) else {
                warn!(transition = %record.id, "dropping saved transition without both endpoints");
                continue;
            };
            let mut transition = Transition::new(record.id, source, target, record.actor);
            if let Some(label) = record.label {
                transition.set_label(label);
            }
            transitions.push(transition);
        }

        (nodes, transitions, self.viewport.unwrap_or_default())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(blob: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(blob)
    }
}

#[cfg(test)]
mod tests {
    use super::GraphSnapshot;
    use crate::model::{
        ActorKind, Node, NodeId, Position, ProcessGraph, Transition, TransitionId, Viewport,
    };

    #[test]
    fn capture_then_parts_reproduces_the_graph() {
        let mut graph = ProcessGraph::new();
        let a = NodeId::new("a").expect("id");
        graph
            .add_node(Node::with_label(a.clone(), "Alpha", Position::new(10.5, -3.25)))
            .expect("add");
        let mut t = Transition::new(
            TransitionId::new("go").expect("id"),
            NodeId::start(),
            a,
            ActorKind::Automatic,
        );
        t.set_label("Go!");
        graph.add_transition(t);
        let viewport = Viewport { x: 12.0, y: 8.0, zoom: 1.5 };

        let blob = GraphSnapshot::capture(&graph, viewport).to_json().expect("json");
        let (nodes, transitions, restored_viewport) =
            GraphSnapshot::from_json(&blob).expect("parse").into_parts();

        let mut restored = ProcessGraph::new();
        restored.replace_all(nodes, transitions);
        assert_eq!(restored, graph);
        assert_eq!(restored_viewport, viewport);
    }

    #[test]
    fn missing_viewport_defaults_to_origin_and_unit_zoom() {
        let snapshot = GraphSnapshot::from_json(r#"{"nodes":[],"transitions":[]}"#).expect("parse");
        let (_, _, viewport) = snapshot.into_parts();
        assert_eq!(viewport, Viewport::default());

        let partial = GraphSnapshot::from_json(r#"{"viewport":{"x":4}}"#).expect("parse");
        let (_, _, viewport) = partial.into_parts();
        assert_eq!(viewport, Viewport { x: 4.0, y: 0.0, zoom: 1.0 });
    }

    #[test]
    fn transitions_without_endpoints_are_dropped() {
        let blob = r#"{
            "nodes": [{"id": "a"}],
            "transitions": [
                {"id": "dangling", "source": "a"},
                {"id": "ok", "source": "initial", "target": "a", "actor": "provider"}
            ]
        }"#;
        let (nodes, transitions, _) = GraphSnapshot::from_json(blob).expect("parse").into_parts();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].label(), "a");
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].id().as_str(), "ok");
        assert_eq!(transitions[0].actor(), ActorKind::Provider);
    }
}
