// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations on the process graph.
//!
//! A batch of ops is applied all-or-nothing and produces a minimal delta that the editor uses
//! to refresh derived state (handles, rendering).

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::model::{GraphError, Node, NodeId, Position, ProcessGraph, Transition, TransitionId};

#[derive(Debug, Clone, PartialEq)]
pub enum GraphOp {
    /// Insert or replace a state. The start id is rejected.
    AddNode { node: Node },
    /// Insert or replace (same id) a transition. Both endpoints must exist.
    AddTransition { transition: Transition },
    /// Re-point a transition, keeping id, label and actor.
    ReconnectTransition { transition_id: TransitionId, source: NodeId, target: NodeId },
    /// Remove a state and every transition touching it.
    RemoveNode { node_id: NodeId },
    RemoveTransition { transition_id: TransitionId },
    MoveNode { node_id: NodeId, position: Position },
    /// Swap the whole graph (restore/import). Endpoints are not validated.
    ReplaceAll { nodes: Vec<Node>, transitions: Vec<Transition> },
}

impl GraphOp {
    pub fn kind(&self) -> OpKind {
        match self {
            Self::AddNode { .. } => OpKind::AddNode,
            Self::AddTransition { .. } => OpKind::AddTransition,
            Self::ReconnectTransition { .. } => OpKind::ReconnectTransition,
            Self::RemoveNode { .. } => OpKind::RemoveNode,
            Self::RemoveTransition { .. } => OpKind::RemoveTransition,
            Self::MoveNode { .. } => OpKind::MoveNode,
            Self::ReplaceAll { .. } => OpKind::ReplaceAll,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    AddNode,
    AddTransition,
    ReconnectTransition,
    RemoveNode,
    RemoveTransition,
    MoveNode,
    ReplaceAll,
}

/// A model object touched by an op.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectRef {
    Node(NodeId),
    Transition(TransitionId),
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node_id) => write!(f, "state/{node_id}"),
            Self::Transition(transition_id) => write!(f, "transition/{transition_id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which objects changed as the result of applying ops.
///
/// Coarse on purpose: only added/removed/updated refs, each sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ObjectRef>,
    pub removed: Vec<ObjectRef>,
    pub updated: Vec<ObjectRef>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.updated.len()
    }

    pub fn touches(&self, object_ref: &ObjectRef) -> bool {
        self.added.contains(object_ref)
            || self.removed.contains(object_ref)
            || self.updated.contains(object_ref)
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<ObjectRef>,
    removed: BTreeSet<ObjectRef>,
    updated: BTreeSet<ObjectRef>,
}

impl DeltaBuilder {
    fn record_added(&mut self, object_ref: ObjectRef) {
        // Remove then add within one batch is a replacement.
        if self.removed.remove(&object_ref) {
            self.updated.insert(object_ref);
            return;
        }
        self.updated.remove(&object_ref);
        self.added.insert(object_ref);
    }

    fn record_removed(&mut self, object_ref: ObjectRef) {
        self.updated.remove(&object_ref);
        if self.added.remove(&object_ref) {
            return;
        }
        self.removed.insert(object_ref);
    }

    fn record_updated(&mut self, object_ref: ObjectRef) {
        if self.added.contains(&object_ref) || self.removed.contains(&object_ref) {
            return;
        }
        self.updated.insert(object_ref);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

/// Applies `ops` in order against a scratch copy and commits only if every op succeeds.
pub fn apply_ops(graph: &mut ProcessGraph, ops: &[GraphOp]) -> Result<ApplyResult, ApplyError> {
    if ops.is_empty() {
        return Ok(ApplyResult { applied: 0, delta: Delta::default() });
    }

    let mut next = graph.clone();
    let mut delta = DeltaBuilder::default();
    for op in ops {
        apply_op(&mut next, op, &mut delta)?;
    }

    *graph = next;
    Ok(ApplyResult { applied: ops.len(), delta: delta.finish() })
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("transition {transition} references missing state {node}")]
    MissingEndpoint { transition: TransitionId, node: NodeId },
}

// Extracted per-op implementation.
include!("ops_impl.rs");
