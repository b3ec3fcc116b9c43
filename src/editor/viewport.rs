// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::config::ViewportConfig;
use crate::model::{Node, Viewport};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Viewport that centres every node on the canvas.
///
/// Nodes are treated as `node_width` x `node_height` boxes anchored at their position. Zoom is
/// clamped to the configured bounds. `None` for an empty node set or an unusable canvas.
pub fn fit_viewport(
    nodes: &[Node],
    node_width: f64,
    node_height: f64,
    canvas: CanvasSize,
    config: &ViewportConfig,
) -> Option<Viewport> {
    if nodes.is_empty() || !canvas.is_usable() {
        return None;
    }

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for node in nodes {
        let position = node.position();
        min_x = min_x.min(position.x);
        min_y = min_y.min(position.y);
        max_x = max_x.max(position.x + node_width);
        max_y = max_y.max(position.y + node_height);
    }

    let bounds_width = (max_x - min_x).max(1.0);
    let bounds_height = (max_y - min_y).max(1.0);
    let padded = 1.0 + config.fit_padding;
    let zoom = (canvas.width / (bounds_width * padded))
        .min(canvas.height / (bounds_height * padded))
        .clamp(config.min_zoom, config.max_zoom);

    let center_x = min_x + bounds_width / 2.0;
    let center_y = min_y + bounds_height / 2.0;
    Some(Viewport {
        x: canvas.width / 2.0 - center_x * zoom,
        y: canvas.height / 2.0 - center_y * zoom,
        zoom,
    })
}

#[cfg(test)]
mod tests {
    use super::{fit_viewport, CanvasSize};
    use crate::config::ViewportConfig;
    use crate::model::{Node, NodeId, Position, Viewport};

    fn fit(nodes: &[Node], canvas: CanvasSize) -> Option<Viewport> {
        fit_viewport(nodes, 150.0, 50.0, canvas, &ViewportConfig::default())
    }

    #[test]
    fn small_graph_is_centred_at_max_zoom() {
        let nodes = vec![Node::start()];
        let viewport = fit(&nodes, CanvasSize::new(800.0, 600.0));
        assert_eq!(viewport, Some(Viewport { x: 250.0, y: 250.0, zoom: 2.0 }));
    }

    #[test]
    fn wide_graph_is_clamped_to_min_zoom() {
        let far = Node::new(NodeId::new("far").expect("id"), Position::new(10_000.0, 0.0));
        let nodes = vec![Node::start(), far];
        let viewport = fit(&nodes, CanvasSize::new(800.0, 600.0)).expect("viewport");
        assert_eq!(viewport.zoom, 0.5);
    }

    #[test]
    fn zero_sized_canvas_cannot_be_fitted() {
        let nodes = vec![Node::start()];
        assert_eq!(fit(&nodes, CanvasSize::new(0.0, 600.0)), None);
    }
}
