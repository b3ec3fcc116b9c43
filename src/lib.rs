// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowstate: editor core for marketplace transaction processes.
//!
//! A process is a graph of states joined by actor-typed transitions. The crate holds the graph
//! model, per-state connection handles, a layered auto-layout, the interaction controller that
//! turns gestures into graph edits, snapshot persistence, and the EDN process export.

pub mod config;
pub mod editor;
pub mod format;
pub mod layout;
pub mod model;
pub mod ops;
pub mod query;
pub mod render;
pub mod store;
