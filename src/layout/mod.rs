// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layered layout of process graphs.
//!
//! [`layered`] holds the deterministic core; [`engine`] wraps it in an owned, async engine.

pub mod engine;
pub mod layered;

pub use engine::LayoutEngine;
pub use layered::{
    layout_graph, EdgeEndpoint, GraphLayout, LayoutDirection, LayoutError, LayoutOptions,
    ParseLayoutDirectionError,
};
