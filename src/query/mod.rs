// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only projections over a process graph.
//!
//! Queries provide derived views (incoming handles, degrees) that the editor recomputes after
//! every mutation instead of storing them on the model.

pub mod flow;
pub mod handles;

pub use flow::{degrees, reachable_from_start, unreachable_states, NodeDegree};
pub use handles::{incoming_handles, Handle, HandleAllocator, HandleKind, HandleList};
