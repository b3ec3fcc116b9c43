// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only text views of a process graph.
//!
//! The outline lists states with their positions and incoming handles, transitions with the
//! responsible actor, and states that cannot be reached from the start state. Nothing here
//! writes back into the model.

pub mod outline;
mod text;

pub use outline::{render_outline, OutlineOptions};
