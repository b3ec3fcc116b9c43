// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Node, NodeId, Position, ProcessGraph, Transition, TransitionId};

/// Flow direction of the layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    /// Layers stacked top to bottom.
    #[default]
    Down,
    /// Layers placed left to right.
    Right,
}

impl fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Down => f.write_str("down"),
            Self::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown layout direction: {0:?} (expected down|right)")]
pub struct ParseLayoutDirectionError(String);

impl FromStr for LayoutDirection {
    type Err = ParseLayoutDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "down" | "tb" | "td" | "vertical" => Ok(Self::Down),
            "right" | "lr" | "horizontal" => Ok(Self::Right),
            _ => Err(ParseLayoutDirectionError(s.to_owned())),
        }
    }
}

/// Geometry knobs. Node size is a placeholder: real rendered size is unknown before layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub direction: LayoutDirection,
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between consecutive layers.
    pub layer_spacing: f64,
    /// Gap between neighbours inside a layer.
    pub node_spacing: f64,
    /// Upper bound on down+up barycenter sweep pairs.
    pub crossing_sweeps: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::Down,
            node_width: 150.0,
            node_height: 50.0,
            layer_spacing: 100.0,
            node_spacing: 80.0,
            crossing_sweeps: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEndpoint {
    Source,
    Target,
}

impl fmt::Display for EdgeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("transition {transition} references unknown {endpoint} state {node}")]
    UnknownNode { transition: TransitionId, endpoint: EdgeEndpoint, node: NodeId },
    #[error("layout computation was cancelled: {0}")]
    Cancelled(String),
}

/// Result of a layout run: layer membership plus a top-left position per node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphLayout {
    direction: LayoutDirection,
    layers: Vec<Vec<NodeId>>,
    positions: BTreeMap<NodeId, Position>,
    reversed: Vec<TransitionId>,
}

impl GraphLayout {
    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    pub fn layers(&self) -> &[Vec<NodeId>] {
        &self.layers
    }

    pub fn positions(&self) -> &BTreeMap<NodeId, Position> {
        &self.positions
    }

    pub fn position(&self, node_id: &NodeId) -> Option<Position> {
        self.positions.get(node_id).copied()
    }

    /// Transitions laid out against their direction to break cycles.
    pub fn reversed(&self) -> &[TransitionId] {
        &self.reversed
    }

    pub fn layer_of(&self, node_id: &NodeId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.contains(node_id))
    }

    /// Copies of `nodes` carrying their laid-out position.
    pub fn positioned(&self, nodes: &[Node]) -> Vec<Node> {
        nodes
            .iter()
            .map(|node| {
                let mut node = node.clone();
                if let Some(position) = self.position(node.id()) {
                    node.set_position(position);
                }
                node
            })
            .collect()
    }

    /// Writes every computed position into `graph`. Nodes unknown to the layout keep theirs.
    pub fn apply_to(&self, graph: &mut ProcessGraph) -> usize {
        let mut moved = 0usize;
        for (node_id, position) in &self.positions {
            if graph.move_node(node_id, *position).is_ok() {
                moved += 1;
            }
        }
        moved
    }
}

/// Index-based adjacency of the graph being laid out.
struct LayoutGraph {
    ids: Vec<NodeId>,
    /// `(from, to)` pairs after cycle breaking; self-loops removed.
    edges: Vec<(usize, usize)>,
    succ: Vec<Vec<usize>>,
    pred: Vec<Vec<usize>>,
}

impl LayoutGraph {
    fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Orders nodes deterministically: start state first, then by id.
fn node_order(nodes: &[Node]) -> Vec<NodeId> {
    let unique = nodes.iter().map(|node| node.id().clone()).collect::<BTreeSet<_>>();
    let mut ids = unique.into_iter().collect::<Vec<_>>();
    ids.sort_by(|a, b| b.is_start().cmp(&a.is_start()).then_with(|| a.cmp(b)));
    ids
}

fn index_edges(
    ids: &[NodeId],
    transitions: &[Transition],
) -> Result<Vec<(usize, usize, TransitionId)>, LayoutError> {
    let index = ids.iter().enumerate().map(|(idx, id)| (id, idx)).collect::<BTreeMap<_, _>>();

    let mut edges = Vec::with_capacity(transitions.len());
    for transition in transitions {
        let Some(&from) = index.get(transition.source()) else {
            return Err(LayoutError::UnknownNode {
                transition: transition.id().clone(),
                endpoint: EdgeEndpoint::Source,
                node: transition.source().clone(),
            });
        };
        let Some(&to) = index.get(transition.target()) else {
            return Err(LayoutError::UnknownNode {
                transition: transition.id().clone(),
                endpoint: EdgeEndpoint::Target,
                node: transition.target().clone(),
            });
        };
        edges.push((from, to, transition.id().clone()));
    }
    Ok(edges)
}

/// Reverses DFS back edges so the remaining graph is acyclic.
///
/// DFS roots and successor order follow node order, so the same graph always reverses the
/// same transitions.
fn break_cycles(
    n: usize,
    edges: &[(usize, usize, TransitionId)],
) -> (Vec<(usize, usize)>, Vec<TransitionId>) {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Unvisited,
        OnStack,
        Done,
    }

    let mut out = vec![Vec::<(usize, usize)>::new(); n];
    for (edge_idx, (from, to, _)) in edges.iter().enumerate() {
        if from != to {
            out[*from].push((*to, edge_idx));
        }
    }
    for targets in out.iter_mut() {
        targets.sort();
    }

    let mut marks = vec![Mark::Unvisited; n];
    let mut back_edges = BTreeSet::<usize>::new();

    for root in 0..n {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::OnStack;
        let mut stack = vec![(root, 0usize)];
        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            if let Some(&(next, edge_idx)) = out[node].get(cursor) {
                frame.1 += 1;
                match marks[next] {
                    Mark::Unvisited => {
                        marks[next] = Mark::OnStack;
                        stack.push((next, 0));
                    }
                    Mark::OnStack => {
                        back_edges.insert(edge_idx);
                    }
                    Mark::Done => {}
                }
            } else {
                marks[node] = Mark::Done;
                stack.pop();
            }
        }
    }

    let mut acyclic = Vec::with_capacity(edges.len());
    let mut reversed = Vec::new();
    for (edge_idx, (from, to, transition_id)) in edges.iter().enumerate() {
        if from == to {
            continue;
        }
        if back_edges.contains(&edge_idx) {
            acyclic.push((*to, *from));
            reversed.push(transition_id.clone());
        } else {
            acyclic.push((*from, *to));
        }
    }
    (acyclic, reversed)
}

/// Longest-path layering over a deterministic topological order.
fn assign_layers(graph: &LayoutGraph) -> Vec<usize> {
    let n = graph.len();
    let mut indegree = graph.pred.iter().map(Vec::len).collect::<Vec<_>>();
    let mut ready = (0..n).filter(|&v| indegree[v] == 0).collect::<BTreeSet<_>>();
    let mut layers = vec![0usize; n];

    while let Some(next) = ready.pop_first() {
        for &to in &graph.succ[next] {
            layers[to] = layers[to].max(layers[next] + 1);
            indegree[to] = indegree[to].saturating_sub(1);
            if indegree[to] == 0 {
                ready.insert(to);
            }
        }
    }

    layers
}

/// Reorders `layer` by the mean position of each node's neighbours.
///
/// Nodes without placed neighbours sink to the end; ties keep node order.
fn sort_layer_by_barycenter(layer: &mut [usize], positions: &[usize], neighbors: &[Vec<usize>]) {
    let bary = |v: usize| -> Option<(usize, usize)> {
        let (sum, count) = neighbors[v]
            .iter()
            .fold((0usize, 0usize), |(sum, count), &u| (sum + positions[u], count + 1));
        (count > 0).then_some((sum, count))
    };

    layer.sort_by(|&a, &b| match (bary(a), bary(b)) {
        (None, None) => a.cmp(&b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (Some((sum_a, count_a)), Some((sum_b, count_b))) => {
            // Compare sum_a/count_a vs sum_b/count_b without floats.
            let left = (sum_a as u128) * (count_b as u128);
            let right = (sum_b as u128) * (count_a as u128);
            left.cmp(&right).then_with(|| a.cmp(&b))
        }
    });
}

fn positions_in_layers(order: &[Vec<usize>], n: usize) -> Vec<usize> {
    let mut positions = vec![0usize; n];
    for layer in order {
        for (idx, &v) in layer.iter().enumerate() {
            positions[v] = idx;
        }
    }
    positions
}

/// Edge crossings between adjacent layers.
fn count_crossings(order: &[Vec<usize>], layer_of: &[usize], graph: &LayoutGraph) -> usize {
    let positions = positions_in_layers(order, graph.len());
    let mut total = 0usize;
    for layer in 0..order.len().saturating_sub(1) {
        let spans = graph
            .edges
            .iter()
            .filter(|(from, to)| layer_of[*from] == layer && layer_of[*to] == layer + 1)
            .map(|(from, to)| (positions[*from], positions[*to]))
            .collect::<Vec<_>>();
        for i in 0..spans.len() {
            for j in (i + 1)..spans.len() {
                let (a1, b1) = spans[i];
                let (a2, b2) = spans[j];
                if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                    total += 1;
                }
            }
        }
    }
    total
}

/// Alternating down/up barycenter sweeps, keeping the ordering with the fewest crossings.
fn minimize_crossings(
    order: &mut Vec<Vec<usize>>,
    layer_of: &[usize],
    graph: &LayoutGraph,
    max_sweeps: usize,
) {
    if order.len() <= 1 {
        return;
    }

    let mut best = order.clone();
    let mut best_crossings = count_crossings(order, layer_of, graph);

    for _ in 0..max_sweeps {
        if best_crossings == 0 {
            break;
        }
        for layer in 1..order.len() {
            let positions = positions_in_layers(order, graph.len());
            sort_layer_by_barycenter(&mut order[layer], &positions, &graph.pred);
        }
        for layer in (0..order.len() - 1).rev() {
            let positions = positions_in_layers(order, graph.len());
            sort_layer_by_barycenter(&mut order[layer], &positions, &graph.succ);
        }

        let crossings = count_crossings(order, layer_of, graph);
        if crossings < best_crossings {
            best_crossings = crossings;
            best = order.clone();
        } else {
            break;
        }
    }

    *order = best;
}

/// Places every layer on its own row (or column) and centres it against the widest layer.
fn assign_coordinates(order: &[Vec<usize>], n: usize, options: &LayoutOptions) -> Vec<Position> {
    let (rank_span, cross_span) = match options.direction {
        LayoutDirection::Down => (options.node_height, options.node_width),
        LayoutDirection::Right => (options.node_width, options.node_height),
    };
    let rank_step = rank_span + options.layer_spacing;
    let cross_step = cross_span + options.node_spacing;

    let extent = |count: usize| -> f64 {
        if count == 0 {
            0.0
        } else {
            count as f64 * cross_span + (count - 1) as f64 * options.node_spacing
        }
    };
    let widest = order.iter().map(|layer| extent(layer.len())).fold(0.0_f64, f64::max);

    let mut positions = vec![Position::ORIGIN; n];
    for (rank, layer) in order.iter().enumerate() {
        let shift = (widest - extent(layer.len())) / 2.0;
        for (idx, &v) in layer.iter().enumerate() {
            let along = rank as f64 * rank_step;
            let across = shift + idx as f64 * cross_step;
            positions[v] = match options.direction {
                LayoutDirection::Down => Position::new(across, along),
                LayoutDirection::Right => Position::new(along, across),
            };
        }
    }
    positions
}

/// Deterministic layered layout of a process graph.
///
/// - Rejects transitions whose endpoints are not in `nodes`.
/// - Breaks cycles by reversing DFS back edges; self-loops do not affect layering.
/// - Longest-path layering, barycenter crossing reduction, centred coordinates.
pub fn layout_graph(
    nodes: &[Node],
    transitions: &[Transition],
    options: &LayoutOptions,
) -> Result<GraphLayout, LayoutError> {
    let ids = node_order(nodes);
    let indexed = index_edges(&ids, transitions)?;
    let n = ids.len();

    let (edges, reversed) = break_cycles(n, &indexed);
    let mut succ = vec![Vec::<usize>::new(); n];
    let mut pred = vec![Vec::<usize>::new(); n];
    for &(from, to) in &edges {
        succ[from].push(to);
        pred[to].push(from);
    }
    for list in succ.iter_mut().chain(pred.iter_mut()) {
        list.sort();
    }
    let graph = LayoutGraph { ids, edges, succ, pred };

    let layer_of = assign_layers(&graph);
    let layer_count = layer_of.iter().copied().max().map_or(0, |max| max + 1);
    let mut order = vec![Vec::<usize>::new(); layer_count];
    for v in 0..n {
        order[layer_of[v]].push(v);
    }

    minimize_crossings(&mut order, &layer_of, &graph, options.crossing_sweeps);
    let coords = assign_coordinates(&order, n, options);

    let layers = order
        .iter()
        .map(|layer| layer.iter().map(|&v| graph.ids[v].clone()).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let positions = graph.ids.iter().cloned().zip(coords).collect::<BTreeMap<_, _>>();

    Ok(GraphLayout { direction: options.direction, layers, positions, reversed })
}
