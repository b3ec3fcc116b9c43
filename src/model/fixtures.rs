// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::graph::{ActorKind, Node, Position, ProcessGraph, Transition};
use super::ids::{NodeId, TransitionId};

pub(crate) fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

pub(crate) fn tid(value: &str) -> TransitionId {
    TransitionId::new(value).expect("transition id")
}

fn graph_with(states: &[&str], transitions: &[(&str, &str, &str, ActorKind)]) -> ProcessGraph {
    let mut graph = ProcessGraph::new();
    for state in states {
        graph.add_node(Node::new(nid(state), Position::ORIGIN)).expect("add state");
    }
    for (id, from, to, actor) in transitions {
        graph.add_transition(Transition::new(tid(id), nid(from), nid(to), *actor));
    }
    graph
}

/// A small marketplace booking process: linear happy path with one decline branch.
pub(crate) fn booking_process() -> ProcessGraph {
    graph_with(
        &["requested", "accepted", "declined", "completed"],
        &[
            ("request", "initial", "requested", ActorKind::Customer),
            ("accept", "requested", "accepted", ActorKind::Provider),
            ("decline", "requested", "declined", ActorKind::Provider),
            ("complete", "accepted", "completed", ActorKind::Automatic),
        ],
    )
}

/// A process with a retry loop (`pending -> failed -> pending`).
pub(crate) fn retry_loop_process() -> ProcessGraph {
    graph_with(
        &["pending", "failed", "paid"],
        &[
            ("charge", "initial", "pending", ActorKind::Customer),
            ("fail", "pending", "failed", ActorKind::Automatic),
            ("retry", "failed", "pending", ActorKind::Customer),
            ("confirm", "pending", "paid", ActorKind::Operator),
        ],
    )
}

/// Two transitions converge on one state, so its handle list has several real slots.
pub(crate) fn converging_process() -> ProcessGraph {
    graph_with(
        &["a", "b", "done"],
        &[
            ("start-a", "initial", "a", ActorKind::Customer),
            ("start-b", "initial", "b", ActorKind::Provider),
            ("finish-a", "a", "done", ActorKind::Customer),
            ("finish-b", "b", "done", ActorKind::Operator),
        ],
    )
}
