// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Per-op mutation helpers used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
fn apply_op(
    graph: &mut ProcessGraph,
    op: &GraphOp,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    match op {
        GraphOp::AddNode { node } => {
            let node_ref = ObjectRef::Node(node.id().clone());
            match graph.add_node(node.clone())? {
                Some(_) => delta.record_updated(node_ref),
                None => delta.record_added(node_ref),
            }
            Ok(())
        }
        GraphOp::AddTransition { transition } => {
            ensure_endpoints(graph, transition.id(), transition.source(), transition.target())?;
            let transition_ref = ObjectRef::Transition(transition.id().clone());
            match graph.add_transition(transition.clone()) {
                Some(_) => delta.record_updated(transition_ref),
                None => delta.record_added(transition_ref),
            }
            Ok(())
        }
        GraphOp::ReconnectTransition { transition_id, source, target } => {
            ensure_endpoints(graph, transition_id, source, target)?;
            graph.reconnect(transition_id, source.clone(), target.clone())?;
            delta.record_updated(ObjectRef::Transition(transition_id.clone()));
            Ok(())
        }
        GraphOp::RemoveNode { node_id } => {
            let (_, cascaded) = graph.remove_node(node_id)?;
            for transition in cascaded {
                delta.record_removed(ObjectRef::Transition(transition.id().clone()));
            }
            delta.record_removed(ObjectRef::Node(node_id.clone()));
            Ok(())
        }
        GraphOp::RemoveTransition { transition_id } => {
            graph.remove_transition(transition_id)?;
            delta.record_removed(ObjectRef::Transition(transition_id.clone()));
            Ok(())
        }
        GraphOp::MoveNode { node_id, position } => {
            graph.move_node(node_id, *position)?;
            delta.record_updated(ObjectRef::Node(node_id.clone()));
            Ok(())
        }
        GraphOp::ReplaceAll { nodes, transitions } => {
            let before = object_refs(graph);
            graph.replace_all(nodes.clone(), transitions.clone());
            let after = object_refs(graph);

            for object_ref in before.difference(&after) {
                delta.record_removed(object_ref.clone());
            }
            for object_ref in after.difference(&before) {
                delta.record_added(object_ref.clone());
            }
            for object_ref in after.intersection(&before) {
                delta.record_updated(object_ref.clone());
            }
            Ok(())
        }
    }
}

fn ensure_endpoints(
    graph: &ProcessGraph,
    transition_id: &TransitionId,
    source: &NodeId,
    target: &NodeId,
) -> Result<(), ApplyError> {
    for node_id in [source, target] {
        if !graph.contains_node(node_id) {
            return Err(ApplyError::MissingEndpoint {
                transition: transition_id.clone(),
                node: node_id.clone(),
            });
        }
    }
    Ok(())
}

fn object_refs(graph: &ProcessGraph) -> BTreeSet<ObjectRef> {
    graph
        .nodes()
        .iter()
        .map(|node| ObjectRef::Node(node.id().clone()))
        .chain(graph.transitions().iter().map(|t| ObjectRef::Transition(t.id().clone())))
        .collect()
}
