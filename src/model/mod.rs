// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A process graph holds states (nodes) and actor-typed transitions; a snapshot is the unit
//! handed to the persistence bridge.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod graph;
pub mod ids;
pub mod snapshot;

pub use graph::{
    ActorKind, GraphError, Node, ParseActorKindError, Position, ProcessGraph, Transition,
    Viewport,
};
pub use ids::{slugify, Id, IdError, NodeId, TransitionId, START_NODE_ID};
pub use snapshot::{GraphSnapshot, SnapshotNode, SnapshotTransition};
