// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::{NodeId, TransitionId};

/// Who is responsible for firing a transition. Closed set; drives colour and export actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    #[default]
    Customer,
    Provider,
    Operator,
    Automatic,
}

impl ActorKind {
    pub const ALL: [ActorKind; 4] =
        [ActorKind::Customer, ActorKind::Provider, ActorKind::Operator, ActorKind::Automatic];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Provider => "provider",
            Self::Operator => "operator",
            Self::Automatic => "automatic",
        }
    }

    /// Human-facing name shown in the actor picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Provider => "Provider",
            Self::Operator => "Marketplace Operator",
            Self::Automatic => "Automatic",
        }
    }

    /// Stroke/marker colour of transitions fired by this actor.
    pub fn color(self) -> &'static str {
        match self {
            Self::Customer => "#F5A623",
            Self::Provider => "#BD10E0",
            Self::Operator => "#417505",
            Self::Automatic => "#888888",
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown actor kind: {0:?} (expected customer|provider|operator|automatic)")]
pub struct ParseActorKindError(String);

impl FromStr for ActorKind {
    type Err = ParseActorKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseActorKindError(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pan offset plus zoom of the canvas. Screen = graph * zoom + pan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

fn default_zoom() -> f64 {
    1.0
}

impl Default for Viewport {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, zoom: 1.0 }
    }
}

impl Viewport {
    /// Translates a canvas (screen) point into graph coordinates.
    pub fn to_graph(&self, screen: Position) -> Position {
        let zoom = if self.zoom.abs() < f64::EPSILON { 1.0 } else { self.zoom };
        Position::new((screen.x - self.x) / zoom, (screen.y - self.y) / zoom)
    }
}

/// A process state.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    label: String,
    position: Position,
}

impl Node {
    pub fn new(id: NodeId, position: Position) -> Self {
        let label = id.to_string();
        Self { id, label, position }
    }

    pub fn with_label(id: NodeId, label: impl Into<String>, position: Position) -> Self {
        Self { id, label: label.into(), position }
    }

    pub fn start() -> Self {
        Self::new(NodeId::start(), Position::ORIGIN)
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn is_start(&self) -> bool {
        self.id.is_start()
    }
}

/// A directed, typed edge between two states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    id: TransitionId,
    source: NodeId,
    target: NodeId,
    actor: ActorKind,
    label: String,
}

impl Transition {
    pub fn new(id: TransitionId, source: NodeId, target: NodeId, actor: ActorKind) -> Self {
        let label = id.to_string();
        Self { id, source, target, actor, label }
    }

    /// Id used when no user name was staged: `{actor}-{source}-to-{target}`.
    pub fn derived_id(actor: ActorKind, source: &NodeId, target: &NodeId) -> TransitionId {
        TransitionId::from_name(&format!("{actor}-{source}-to-{target}"))
            .unwrap_or_else(|_| unreachable!("actor names are never empty"))
    }

    pub fn id(&self) -> &TransitionId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn actor(&self) -> ActorKind {
        self.actor
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_endpoints(&mut self, source: NodeId, target: NodeId) {
        self.source = source;
        self.target = target;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node id {0} is reserved for the start state")]
    ReservedStartId(NodeId),
    #[error("the start state cannot be removed")]
    StartNodeRemoval,
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("transition not found: {0}")]
    TransitionNotFound(TransitionId),
}

/// The canonical node and transition sets.
///
/// Both sets keep insertion order: handle ordinals and export order follow it. A colliding
/// insert overwrites in place, so the replaced item keeps its slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessGraph {
    nodes: Vec<Node>,
    transitions: Vec<Transition>,
}

impl Default for ProcessGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessGraph {
    /// A graph holding only the start state at the origin.
    pub fn new() -> Self {
        Self { nodes: vec![Node::start()], transitions: Vec::new() }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == node_id)
    }

    pub fn transition(&self, transition_id: &TransitionId) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id() == transition_id)
    }

    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.node(node_id).is_some()
    }

    /// Inserts or replaces a node. The start id is reserved and always rejected.
    ///
    /// Returns the replaced node, if any.
    pub fn add_node(&mut self, node: Node) -> Result<Option<Node>, GraphError> {
        if node.is_start() {
            return Err(GraphError::ReservedStartId(node.id().clone()));
        }
        Ok(upsert(&mut self.nodes, node, |a, b| a.id() == b.id()))
    }

    /// Inserts or replaces (last write wins) a transition. Endpoints are not validated.
    pub fn add_transition(&mut self, transition: Transition) -> Option<Transition> {
        upsert(&mut self.transitions, transition, |a, b| a.id() == b.id())
    }

    /// Swaps the whole graph. The start state is re-created at the origin when missing and
    /// colliding ids collapse with the later entry winning.
    pub fn replace_all(&mut self, nodes: Vec<Node>, transitions: Vec<Transition>) {
        let mut next_nodes = Vec::with_capacity(nodes.len() + 1);
        for node in nodes {
            upsert(&mut next_nodes, node, |a: &Node, b: &Node| a.id() == b.id());
        }
        if !next_nodes.iter().any(Node::is_start) {
            next_nodes.insert(0, Node::start());
        }

        let mut next_transitions = Vec::with_capacity(transitions.len());
        for transition in transitions {
            upsert(&mut next_transitions, transition, |a: &Transition, b: &Transition| {
                a.id() == b.id()
            });
        }

        self.nodes = next_nodes;
        self.transitions = next_transitions;
    }

    /// Removes a node and every transition touching it.
    pub fn remove_node(&mut self, node_id: &NodeId) -> Result<(Node, Vec<Transition>), GraphError> {
        if node_id.is_start() {
            return Err(GraphError::StartNodeRemoval);
        }
        let index = self
            .nodes
            .iter()
            .position(|node| node.id() == node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.clone()))?;
        let node = self.nodes.remove(index);

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.transitions)
            .into_iter()
            .partition(|t| t.source() == node_id || t.target() == node_id);
        self.transitions = kept;

        Ok((node, removed))
    }

    pub fn remove_transition(
        &mut self,
        transition_id: &TransitionId,
    ) -> Result<Transition, GraphError> {
        let index = self
            .transitions
            .iter()
            .position(|t| t.id() == transition_id)
            .ok_or_else(|| GraphError::TransitionNotFound(transition_id.clone()))?;
        Ok(self.transitions.remove(index))
    }

    pub fn move_node(&mut self, node_id: &NodeId, position: Position) -> Result<(), GraphError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|node| node.id() == node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.clone()))?;
        node.set_position(position);
        Ok(())
    }

    /// Re-points a transition, keeping id, label and actor. Returns the old endpoints.
    pub fn reconnect(
        &mut self,
        transition_id: &TransitionId,
        source: NodeId,
        target: NodeId,
    ) -> Result<(NodeId, NodeId), GraphError> {
        let transition = self
            .transitions
            .iter_mut()
            .find(|t| t.id() == transition_id)
            .ok_or_else(|| GraphError::TransitionNotFound(transition_id.clone()))?;
        let old = (transition.source().clone(), transition.target().clone());
        transition.set_endpoints(source, target);
        Ok(old)
    }

    /// Transitions whose target is `node_id`, in insertion order.
    pub fn incoming<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = &'a Transition> {
        self.transitions.iter().filter(move |t| t.target() == node_id)
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T, &T) -> bool) -> Option<T> {
    match items.iter().position(|existing| same(existing, &item)) {
        Some(index) => Some(std::mem::replace(&mut items[index], item)),
        None => {
            items.push(item);
            None
        }
    }
}
