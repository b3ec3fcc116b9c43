// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;

use crate::model::{Node, ProcessGraph, Transition};
use crate::query::{incoming_handles, unreachable_states};

use super::text::{coordinate, truncate_with_ellipsis};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineOptions {
    /// Pixel offset between consecutive handles, as configured for the canvas.
    pub handle_spacing: f64,
    /// Labels longer than this are cut with an ellipsis.
    pub max_label_len: usize,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self { handle_spacing: 20.0, max_label_len: 32 }
    }
}

/// Renders a plain-text outline of `graph`.
///
/// States appear in graph order with their position and incoming handles. Labels are only
/// shown when they differ from the id. Transitions whose endpoints are not states of the graph
/// are marked `dangling`.
pub fn render_outline(graph: &ProcessGraph, options: &OutlineOptions) -> String {
    let mut out = String::new();

    out.push_str("states:\n");
    for node in graph.nodes() {
        write_state(&mut out, graph, node, options);
    }

    out.push_str("transitions:\n");
    if graph.transitions().is_empty() {
        out.push_str("  (none)\n");
    }
    for transition in graph.transitions() {
        write_transition(&mut out, graph, transition, options);
    }

    let unreachable = unreachable_states(graph);
    out.push_str("unreachable: ");
    if unreachable.is_empty() {
        out.push_str("none");
    } else {
        let names = unreachable.iter().map(|id| id.as_str()).collect::<Vec<_>>();
        out.push_str(&names.join(", "));
    }
    out.push('\n');
    out
}

fn write_state(out: &mut String, graph: &ProcessGraph, node: &Node, options: &OutlineOptions) {
    let position = node.position();
    let _ = write!(out, "  {}", node.id());
    write_label(out, node.id().as_str(), node.label(), options);
    let _ = write!(out, " @ ({}, {})", coordinate(position.x), coordinate(position.y));

    let handles = incoming_handles(graph, node.id());
    if !handles.is_empty() {
        let parts = handles
            .iter()
            .map(|handle| {
                format!("{} +{}", handle.id(), coordinate(handle.offset(options.handle_spacing)))
            })
            .collect::<Vec<_>>();
        let _ = write!(out, " handles [{}]", parts.join(", "));
    }
    out.push('\n');
}

fn write_transition(
    out: &mut String,
    graph: &ProcessGraph,
    transition: &Transition,
    options: &OutlineOptions,
) {
    let actor = transition.actor();
    let _ = write!(out, "  {}", transition.id());
    write_label(out, transition.id().as_str(), transition.label(), options);
    let _ = write!(
        out,
        ": {} -> {} ({}, {})",
        transition.source(),
        transition.target(),
        actor.label(),
        actor.color()
    );
    if !graph.contains_node(transition.source()) || !graph.contains_node(transition.target()) {
        out.push_str(" dangling");
    }
    out.push('\n');
}

fn write_label(out: &mut String, id: &str, label: &str, options: &OutlineOptions) {
    if label != id {
        let _ = write!(out, " {:?}", truncate_with_ellipsis(label, options.max_label_len));
    }
}
