// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use flowstate::model::{
    ActorKind, Node, NodeId, Position, ProcessGraph, Transition, TransitionId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessParams {
    /// Number of rank steps below the start state.
    pub stages: usize,
    pub states_per_stage: usize,
    pub fanout: usize,
    /// Every n-th state gets a transition back to an earlier stage (0 disables).
    pub retry_every: usize,
}

impl ProcessParams {
    pub const fn new(
        stages: usize,
        states_per_stage: usize,
        fanout: usize,
        retry_every: usize,
    ) -> Self {
        Self { stages, states_per_stage, fanout, retry_every }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Small,
    MediumRetries,
    LargeWide,
}

impl Case {
    pub const fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::MediumRetries => "medium_retries",
            Self::LargeWide => "large_wide",
        }
    }

    pub const fn params(self) -> ProcessParams {
        match self {
            Self::Small => ProcessParams::new(4, 3, 2, 0),
            Self::MediumRetries => ProcessParams::new(10, 6, 2, 3),
            Self::LargeWide => ProcessParams::new(20, 16, 3, 5),
        }
    }
}

pub fn fixture(case: Case) -> ProcessGraph {
    process(case.params())
}

fn state_id(stage: usize, idx: usize) -> NodeId {
    NodeId::new(format!("s{stage:02}-{idx:02}")).expect("valid state id")
}

fn transition_id(n: usize) -> TransitionId {
    TransitionId::new(format!("t{n:04}")).expect("valid transition id")
}

fn actor(n: usize) -> ActorKind {
    ActorKind::ALL[n % ActorKind::ALL.len()]
}

pub fn process(params: ProcessParams) -> ProcessGraph {
    assert!(params.stages >= 1, "stages must be >= 1");
    assert!(params.states_per_stage >= 1, "states_per_stage must be >= 1");

    let mut graph = ProcessGraph::new();
    for stage in 0..params.stages {
        for idx in 0..params.states_per_stage {
            graph
                .add_node(Node::new(state_id(stage, idx), Position::ORIGIN))
                .expect("add state");
        }
    }

    let mut next = 0usize;
    let mut connect = |graph: &mut ProcessGraph, from: NodeId, to: NodeId| {
        graph.add_transition(Transition::new(transition_id(next), from, to, actor(next)));
        next += 1;
    };

    for idx in 0..params.states_per_stage {
        connect(&mut graph, NodeId::start(), state_id(0, idx));
    }

    let fanout = params.fanout.clamp(1, params.states_per_stage);
    for stage in 0..params.stages.saturating_sub(1) {
        for idx in 0..params.states_per_stage {
            for k in 0..fanout {
                let to_idx = (idx * 7 + k) % params.states_per_stage;
                connect(&mut graph, state_id(stage, idx), state_id(stage + 1, to_idx));
            }
            if params.retry_every > 0 && stage > 0 && (stage + idx) % params.retry_every == 0 {
                connect(&mut graph, state_id(stage, idx), state_id(stage - 1, idx));
            }
        }
    }

    graph
}

pub fn checksum_positions(graph: &ProcessGraph) -> u64 {
    let mut acc = 0u64;
    for node in graph.nodes() {
        let position = node.position();
        acc = acc.wrapping_mul(131).wrapping_add(position.x.to_bits());
        acc = acc.wrapping_mul(131).wrapping_add(position.y.to_bits());
    }
    acc
}
