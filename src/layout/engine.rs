// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::debug;

use super::layered::{layout_graph, GraphLayout, LayoutDirection, LayoutError, LayoutOptions};
use crate::model::{Node, Transition};

/// Owned layout engine held by an editor session.
///
/// Layout runs on tokio's blocking pool so the caller's task yields while layering is
/// computed. There is no cancellation: callers decide whether a result is still wanted.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    options: LayoutOptions,
}

impl LayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lays out an owned snapshot of nodes and transitions in `direction`.
    pub async fn layout(
        &self,
        nodes: Vec<Node>,
        transitions: Vec<Transition>,
        direction: LayoutDirection,
    ) -> Result<GraphLayout, LayoutError> {
        let options = LayoutOptions { direction, ..self.options.clone() };
        debug!(
            nodes = nodes.len(),
            transitions = transitions.len(),
            %direction,
            "layout requested"
        );

        tokio::task::spawn_blocking(move || layout_graph(&nodes, &transitions, &options))
            .await
            .map_err(|err| LayoutError::Cancelled(err.to_string()))?
    }

    /// Blocking variant for callers without a runtime (benches, sync tools).
    pub fn layout_now(
        &self,
        nodes: &[Node],
        transitions: &[Transition],
        direction: LayoutDirection,
    ) -> Result<GraphLayout, LayoutError> {
        let options = LayoutOptions { direction, ..self.options.clone() };
        layout_graph(nodes, transitions, &options)
    }
}
