// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interaction controller.
//!
//! Every gesture funnels into one [`GraphOp`] batch; this is the only place the graph is
//! mutated. A gesture either applies (returning the delta) or is ignored with a reason; invalid
//! input never surfaces as an error. Save/restore and layout commits return explicit results.

pub mod staged;
pub mod viewport;

use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::FlowstateConfig;
use crate::format::edn::{export_process, ProcessDocument};
use crate::layout::{GraphLayout, LayoutDirection, LayoutEngine, LayoutError};
use crate::model::{
    ActorKind, GraphSnapshot, Node, NodeId, Position, ProcessGraph, Transition,
    TransitionId, Viewport,
};
use crate::ops::{apply_ops, ApplyError, Delta, GraphOp};
use crate::query::{Handle, HandleAllocator};
use crate::store::{PersistenceBridge, StoreError};

pub use staged::StagedName;
pub use viewport::{fit_viewport, CanvasSize};

/// Payload carried by a drag from the state palette to the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropPayload {
    pub mime: String,
    /// Raw state name as typed by the user.
    pub data: String,
}

impl DropPayload {
    pub fn new(mime: impl Into<String>, data: impl Into<String>) -> Self {
        Self { mime: mime.into(), data: data.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    UnsupportedPayload { mime: String },
    EmptyName,
    ReservedStartId,
    NoStagedName,
    UnknownNode(NodeId),
    UnknownTransition(TransitionId),
    TargetIsStart,
    StartNodeProtected,
    Rejected(ApplyError),
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPayload { mime } => {
                write!(f, "unsupported drop payload type {mime:?}")
            }
            Self::EmptyName => f.write_str("name is empty after normalization"),
            Self::ReservedStartId => f.write_str("name is reserved for the start state"),
            Self::NoStagedName => f.write_str("no transition name staged"),
            Self::UnknownNode(node_id) => write!(f, "unknown state {node_id}"),
            Self::UnknownTransition(transition_id) => {
                write!(f, "unknown transition {transition_id}")
            }
            Self::TargetIsStart => f.write_str("transitions cannot enter the start state"),
            Self::StartNodeProtected => f.write_str("the start state cannot be deleted"),
            Self::Rejected(err) => write!(f, "rejected: {err}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    Applied(Delta),
    Ignored(IgnoreReason),
}

impl GestureOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn delta(&self) -> Option<&Delta> {
        match self {
            Self::Applied(delta) => Some(delta),
            Self::Ignored(_) => None,
        }
    }

    pub fn ignored_reason(&self) -> Option<&IgnoreReason> {
        match self {
            Self::Applied(_) => None,
            Self::Ignored(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutOutcome {
    Applied { moved: usize },
    /// The graph changed while the layout was computed; the result was dropped.
    Stale { requested: u64, current: u64 },
    /// `mount` already ran.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    NothingSaved,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("cannot encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("saved snapshot is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("saved snapshot cannot be applied: {0}")]
    Rejected(#[source] ApplyError),
}

/// Snapshot handed to the layout engine, tagged with the revision it was taken at.
#[derive(Debug, Clone)]
pub struct PendingLayout {
    revision: u64,
    direction: LayoutDirection,
    nodes: Vec<Node>,
    transitions: Vec<Transition>,
}

impl PendingLayout {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    pub async fn compute(&self, engine: &LayoutEngine) -> Result<GraphLayout, LayoutError> {
        engine.layout(self.nodes.clone(), self.transitions.clone(), self.direction).await
    }
}

/// One editing session over a process graph.
#[derive(Debug)]
pub struct Editor {
    graph: ProcessGraph,
    handles: HandleAllocator,
    viewport: Viewport,
    staged: StagedName,
    actor: ActorKind,
    engine: LayoutEngine,
    revision: u64,
    fit_pending: bool,
    mounted: bool,
    config: FlowstateConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(FlowstateConfig::default())
    }
}

impl Editor {
    /// A fresh session holding only the start state.
    pub fn new(config: FlowstateConfig) -> Self {
        let graph = ProcessGraph::new();
        let mut handles = HandleAllocator::new();
        handles.sync(&graph);
        Self {
            graph,
            handles,
            viewport: Viewport::default(),
            staged: StagedName::default(),
            actor: config.editor.default_actor,
            engine: LayoutEngine::new(config.layout.clone()),
            revision: 0,
            fit_pending: false,
            mounted: false,
            config,
        }
    }

    pub fn graph(&self) -> &ProcessGraph {
        &self.graph
    }

    pub fn handles(&self, node_id: &NodeId) -> &[Handle] {
        self.handles.handles(node_id)
    }

    pub fn handle_allocator(&self) -> &HandleAllocator {
        &self.handles
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn staged_name(&self) -> Option<&str> {
        self.staged.peek()
    }

    pub fn selected_actor(&self) -> ActorKind {
        self.actor
    }

    /// Bumped on every committed mutation, layouts included.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn fit_pending(&self) -> bool {
        self.fit_pending
    }

    pub fn config(&self) -> &FlowstateConfig {
        &self.config
    }

    pub fn layout_engine(&self) -> &LayoutEngine {
        &self.engine
    }

    fn commit(&mut self, ops: Vec<GraphOp>) -> GestureOutcome {
        match apply_ops(&mut self.graph, &ops) {
            Ok(result) => {
                self.revision += 1;
                let changed = self.handles.sync(&self.graph);
                debug!(
                    revision = self.revision,
                    ops = result.applied,
                    handle_nodes = changed.len(),
                    "gesture applied"
                );
                GestureOutcome::Applied(result.delta)
            }
            Err(err) => ignore(IgnoreReason::Rejected(err)),
        }
    }

    // Gestures.

    /// A state name dropped onto the canvas at `screen` (canvas coordinates).
    pub fn drop_state(&mut self, payload: &DropPayload, screen: Position) -> GestureOutcome {
        if payload.mime != self.config.editor.drop_mime {
            return ignore(IgnoreReason::UnsupportedPayload { mime: payload.mime.clone() });
        }
        let Ok(node_id) = NodeId::from_name(&payload.data) else {
            return ignore(IgnoreReason::EmptyName);
        };
        if node_id.is_start() {
            return ignore(IgnoreReason::ReservedStartId);
        }

        let position = self.viewport.to_graph(screen);
        self.commit(vec![GraphOp::AddNode { node: Node::new(node_id, position) }])
    }

    pub fn stage_transition_name(&mut self, text: &str) {
        self.staged.stage(text);
    }

    pub fn select_actor(&mut self, actor: ActorKind) {
        self.actor = actor;
    }

    /// Connect gesture from `source` to `target`.
    ///
    /// The staged name is consumed only when the transition is committed. Without a usable
    /// staged name the gesture is ignored unless `editor.require_transition_name` is off, in
    /// which case the id is derived from actor and endpoints.
    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> GestureOutcome {
        if let Some(reason) = self.check_endpoints(source, target) {
            return ignore(reason);
        }

        let named = self.staged.peek().map(TransitionId::from_name);
        let require_name = self.config.editor.require_transition_name;
        let transition_id = match named {
            Some(Ok(transition_id)) => transition_id,
            Some(Err(_)) | None if !require_name => {
                Transition::derived_id(self.actor, source, target)
            }
            Some(Err(_)) => return ignore(IgnoreReason::EmptyName),
            None => return ignore(IgnoreReason::NoStagedName),
        };

        let transition = Transition::new(transition_id, source.clone(), target.clone(), self.actor);
        let outcome = self.commit(vec![GraphOp::AddTransition { transition }]);
        if outcome.is_applied() {
            self.staged.take();
        }
        outcome
    }

    /// Edge-update gesture: re-point an existing transition.
    pub fn reconnect(
        &mut self,
        transition_id: &TransitionId,
        source: &NodeId,
        target: &NodeId,
    ) -> GestureOutcome {
        if self.graph.transition(transition_id).is_none() {
            return ignore(IgnoreReason::UnknownTransition(transition_id.clone()));
        }
        if let Some(reason) = self.check_endpoints(source, target) {
            return ignore(reason);
        }
        self.commit(vec![GraphOp::ReconnectTransition {
            transition_id: transition_id.clone(),
            source: source.clone(),
            target: target.clone(),
        }])
    }

    /// Manual drag; `position` is in graph coordinates.
    pub fn move_node(&mut self, node_id: &NodeId, position: Position) -> GestureOutcome {
        if !self.graph.contains_node(node_id) {
            return ignore(IgnoreReason::UnknownNode(node_id.clone()));
        }
        self.commit(vec![GraphOp::MoveNode { node_id: node_id.clone(), position }])
    }

    pub fn delete_node(&mut self, node_id: &NodeId) -> GestureOutcome {
        if node_id.is_start() {
            return ignore(IgnoreReason::StartNodeProtected);
        }
        if !self.graph.contains_node(node_id) {
            return ignore(IgnoreReason::UnknownNode(node_id.clone()));
        }
        self.commit(vec![GraphOp::RemoveNode { node_id: node_id.clone() }])
    }

    pub fn delete_transition(&mut self, transition_id: &TransitionId) -> GestureOutcome {
        if self.graph.transition(transition_id).is_none() {
            return ignore(IgnoreReason::UnknownTransition(transition_id.clone()));
        }
        self.commit(vec![GraphOp::RemoveTransition { transition_id: transition_id.clone() }])
    }

    /// Pan/zoom. Zoom is clamped to the configured bounds.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = self.clamped(viewport);
    }

    fn clamped(&self, viewport: Viewport) -> Viewport {
        let bounds = &self.config.viewport;
        let zoom = if viewport.zoom.is_finite() {
            viewport.zoom.clamp(bounds.min_zoom, bounds.max_zoom)
        } else {
            1.0
        };
        Viewport { zoom, ..viewport }
    }

    /// Replaces the graph with the states and transitions of an imported document.
    pub fn import(&mut self, document: &ProcessDocument) -> GestureOutcome {
        let graph = document.to_graph();
        self.commit(vec![GraphOp::ReplaceAll {
            nodes: graph.nodes().to_vec(),
            transitions: graph.transitions().to_vec(),
        }])
    }

    fn check_endpoints(&self, source: &NodeId, target: &NodeId) -> Option<IgnoreReason> {
        for node_id in [source, target] {
            if !self.graph.contains_node(node_id) {
                return Some(IgnoreReason::UnknownNode(node_id.clone()));
            }
        }
        target.is_start().then_some(IgnoreReason::TargetIsStart)
    }

    // Layout.

    /// Snapshots the graph for a layout run. `None` uses the configured direction.
    pub fn begin_layout(&self, direction: Option<LayoutDirection>) -> PendingLayout {
        PendingLayout {
            revision: self.revision,
            direction: direction.unwrap_or(self.config.layout.direction),
            nodes: self.graph.nodes().to_vec(),
            transitions: self.graph.transitions().to_vec(),
        }
    }

    /// Applies a finished layout if the graph did not change since `pending` was taken.
    ///
    /// A failed layout leaves every position untouched and is returned as the error.
    pub fn commit_layout(
        &mut self,
        pending: PendingLayout,
        result: Result<GraphLayout, LayoutError>,
    ) -> Result<LayoutOutcome, LayoutError> {
        let layout = match result {
            Ok(layout) => layout,
            Err(err) => {
                warn!(error = %err, "layout failed; positions unchanged");
                return Err(err);
            }
        };

        if pending.revision != self.revision {
            warn!(
                requested = pending.revision,
                current = self.revision,
                "discarding stale layout result"
            );
            return Ok(LayoutOutcome::Stale { requested: pending.revision, current: self.revision });
        }

        let moved = layout.apply_to(&mut self.graph);
        self.revision += 1;
        self.fit_pending = true;
        info!(moved, direction = %layout.direction(), revision = self.revision, "layout committed");
        Ok(LayoutOutcome::Applied { moved })
    }

    /// Lays out the current graph and commits the result.
    pub async fn relayout(
        &mut self,
        direction: Option<LayoutDirection>,
    ) -> Result<LayoutOutcome, LayoutError> {
        let pending = self.begin_layout(direction);
        let result = pending.compute(&self.engine).await;
        self.commit_layout(pending, result)
    }

    /// First layout of the session; later calls are skipped.
    pub async fn mount(&mut self) -> Result<LayoutOutcome, LayoutError> {
        if self.mounted {
            return Ok(LayoutOutcome::Skipped);
        }
        let outcome = self.relayout(None).await?;
        self.mounted = true;
        Ok(outcome)
    }

    /// Frame boundary: performs a pending viewport fit. Returns the new viewport if it changed.
    pub fn frame(&mut self, canvas: CanvasSize) -> Option<Viewport> {
        if !self.fit_pending {
            return None;
        }
        let layout = &self.config.layout;
        let fitted = fit_viewport(
            self.graph.nodes(),
            layout.node_width,
            layout.node_height,
            canvas,
            &self.config.viewport,
        )?;
        self.fit_pending = false;
        self.viewport = fitted;
        Some(fitted)
    }

    // Persistence.

    pub fn save(&self, bridge: &mut dyn PersistenceBridge) -> Result<(), SaveError> {
        let blob = GraphSnapshot::capture(&self.graph, self.viewport)
            .to_json()
            .map_err(SaveError::Encode)?;
        bridge.save(&self.config.store.key, &blob)?;
        info!(
            key = %self.config.store.key,
            nodes = self.graph.nodes().len(),
            transitions = self.graph.transitions().len(),
            "graph saved"
        );
        Ok(())
    }

    /// Replaces graph and viewport with the saved snapshot.
    ///
    /// Nothing saved leaves the session as is. A corrupt blob is an error and also keeps the
    /// current graph.
    pub fn restore(
        &mut self,
        bridge: &dyn PersistenceBridge,
    ) -> Result<RestoreOutcome, RestoreError> {
        let Some(blob) = bridge.load(&self.config.store.key)? else {
            debug!(key = %self.config.store.key, "nothing saved");
            return Ok(RestoreOutcome::NothingSaved);
        };
        let snapshot = GraphSnapshot::from_json(&blob).map_err(RestoreError::Corrupt)?;
        let (nodes, transitions, viewport) = snapshot.into_parts();

        let ops = vec![GraphOp::ReplaceAll { nodes, transitions }];
        apply_ops(&mut self.graph, &ops).map_err(RestoreError::Rejected)?;
        self.revision += 1;
        self.handles.sync(&self.graph);
        self.set_viewport(viewport);
        self.fit_pending = false;
        info!(
            key = %self.config.store.key,
            nodes = self.graph.nodes().len(),
            transitions = self.graph.transitions().len(),
            "graph restored"
        );
        Ok(RestoreOutcome::Restored)
    }

    // Export.

    pub fn export(&self) -> ProcessDocument {
        export_process(&self.graph)
    }

    pub fn render_export(&self) -> String {
        self.export().render()
    }
}

fn ignore(reason: IgnoreReason) -> GestureOutcome {
    debug!(%reason, "gesture ignored");
    GestureOutcome::Ignored(reason)
}
