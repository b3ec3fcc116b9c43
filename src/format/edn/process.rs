// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;

use super::value::{parse_edn, pretty_print, EdnParseError, EdnValue};
use crate::model::{ActorKind, Node, NodeId, Position, ProcessGraph, Transition, TransitionId};

/// Format tag understood by the downstream workflow engine.
pub const FORMAT_TAG: &str = "v3";

const TRANSITION_NS: &str = "transition";
const STATE_NS: &str = "state";
const ACTOR_NS: &str = "actor";

/// One exported transition. `from`/`to` become `:state/…` references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionRecord {
    pub name: TransitionId,
    pub from: NodeId,
    pub to: NodeId,
    pub actor: ActorKind,
    pub actions: Vec<EdnValue>,
}

impl TransitionRecord {
    pub fn to_edn(&self) -> EdnValue {
        EdnValue::Map(vec![
            ("name".to_owned(), EdnValue::keyword(format!("{TRANSITION_NS}/{}", self.name))),
            ("from".to_owned(), EdnValue::keyword(format!("{STATE_NS}/{}", self.from))),
            ("to".to_owned(), EdnValue::keyword(format!("{STATE_NS}/{}", self.to))),
            ("actor".to_owned(), EdnValue::keyword(format!("{ACTOR_NS}/{}", self.actor))),
            ("actions".to_owned(), EdnValue::Vector(self.actions.clone())),
        ])
    }

    fn from_edn(value: &EdnValue) -> Result<Self, EdnParseError> {
        if value.as_map().is_none() {
            return Err(EdnParseError::WrongShape { field: "transitions", expected: "a map" });
        }

        let name = namespaced(value, "name", TRANSITION_NS)?;
        let from = namespaced(value, "from", STATE_NS)?;
        let to = namespaced(value, "to", STATE_NS)?;
        let actor = namespaced(value, "actor", ACTOR_NS)?;
        let actions = match value.get("actions") {
            None => Vec::new(),
            Some(actions) => actions
                .as_vector()
                .ok_or(EdnParseError::WrongShape { field: "actions", expected: "a vector" })?
                .to_vec(),
        };

        Ok(Self {
            name: TransitionId::new(name)
                .map_err(|source| EdnParseError::InvalidId { field: "name", source })?,
            from: NodeId::new(from)
                .map_err(|source| EdnParseError::InvalidId { field: "from", source })?,
            to: NodeId::new(to)
                .map_err(|source| EdnParseError::InvalidId { field: "to", source })?,
            actor: actor
                .parse::<ActorKind>()
                .map_err(|_| EdnParseError::UnknownActor { actor: actor.to_owned() })?,
            actions,
        })
    }
}

fn namespaced<'a>(
    record: &'a EdnValue,
    field: &'static str,
    namespace: &'static str,
) -> Result<&'a str, EdnParseError> {
    let value = record.get(field).ok_or(EdnParseError::MissingField { field })?;
    let keyword =
        value.as_keyword().ok_or(EdnParseError::WrongShape { field, expected: "a keyword" })?;
    keyword
        .strip_prefix(namespace)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| EdnParseError::WrongNamespace {
            field,
            namespace,
            value: format!(":{keyword}"),
        })
}

/// The exported process document.
///
/// There is no state list: states only exist as transition endpoints, so a state without
/// transitions is not representable here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessDocument {
    pub format: String,
    pub transitions: Vec<TransitionRecord>,
    /// Reserved extension point; always empty on export.
    pub notifications: Vec<EdnValue>,
}

impl Default for ProcessDocument {
    fn default() -> Self {
        Self { format: FORMAT_TAG.to_owned(), transitions: Vec::new(), notifications: Vec::new() }
    }
}

impl ProcessDocument {
    pub fn to_edn(&self) -> EdnValue {
        EdnValue::Map(vec![
            ("format".to_owned(), EdnValue::keyword(self.format.clone())),
            (
                "transitions".to_owned(),
                EdnValue::Vector(self.transitions.iter().map(TransitionRecord::to_edn).collect()),
            ),
            ("notifications".to_owned(), EdnValue::Vector(self.notifications.clone())),
        ])
    }

    /// Pretty-printed EDN text.
    pub fn render(&self) -> String {
        pretty_print(&self.to_edn())
    }

    pub fn from_edn(value: &EdnValue) -> Result<Self, EdnParseError> {
        if value.as_map().is_none() {
            return Err(EdnParseError::WrongShape { field: "document", expected: "a map" });
        }

        let format = value
            .get("format")
            .ok_or(EdnParseError::MissingField { field: "format" })?
            .as_keyword()
            .ok_or(EdnParseError::WrongShape { field: "format", expected: "a keyword" })?;
        if format != FORMAT_TAG {
            return Err(EdnParseError::UnsupportedFormat { format: format.to_owned() });
        }

        let transitions = match value.get("transitions") {
            None => Vec::new(),
            Some(items) => items
                .as_vector()
                .ok_or(EdnParseError::WrongShape { field: "transitions", expected: "a vector" })?
                .iter()
                .map(TransitionRecord::from_edn)
                .collect::<Result<Vec<_>, _>>()?,
        };
        let notifications = match value.get("notifications") {
            None => Vec::new(),
            Some(items) => items
                .as_vector()
                .ok_or(EdnParseError::WrongShape { field: "notifications", expected: "a vector" })?
                .to_vec(),
        };

        Ok(Self { format: format.to_owned(), transitions, notifications })
    }

    /// Rebuilds a graph from the transitions. States appear in first-mention order at the
    /// origin; callers usually run a layout afterwards.
    pub fn to_graph(&self) -> ProcessGraph {
        let mut nodes = Vec::<Node>::new();
        for record in &self.transitions {
            for node_id in [&record.from, &record.to] {
                if node_id.is_start() || nodes.iter().any(|node| node.id() == node_id) {
                    continue;
                }
                nodes.push(Node::new(node_id.clone(), Position::ORIGIN));
            }
        }
        let transitions = self
            .transitions
            .iter()
            .map(|record| {
                Transition::new(
                    record.name.clone(),
                    record.from.clone(),
                    record.to.clone(),
                    record.actor,
                )
            })
            .collect();

        let mut graph = ProcessGraph::new();
        graph.replace_all(nodes, transitions);
        graph
    }
}

/// Projects the graph into the exported document.
///
/// Transitions are visited in model order; one whose source or target is not a known state is
/// skipped without notice.
pub fn export_process(graph: &ProcessGraph) -> ProcessDocument {
    let transitions = graph
        .transitions()
        .iter()
        .filter(|t| graph.contains_node(t.source()) && graph.contains_node(t.target()))
        .map(|t| TransitionRecord {
            name: t.id().clone(),
            from: t.source().clone(),
            to: t.target().clone(),
            actor: t.actor(),
            actions: Vec::new(),
        })
        .collect();

    ProcessDocument { transitions, ..ProcessDocument::default() }
}

pub fn render_process(graph: &ProcessGraph) -> String {
    export_process(graph).render()
}

pub fn parse_process_document(text: &str) -> Result<ProcessDocument, EdnParseError> {
    ProcessDocument::from_edn(&parse_edn(text)?)
}

#[cfg(test)]
mod tests {
    use super::{export_process, parse_process_document, render_process, ProcessDocument};
    use crate::format::edn::EdnParseError;
    use crate::model::fixtures::{booking_process, nid, tid};
    use crate::model::{ActorKind, Node, NodeId, Position, ProcessGraph, Transition};

    fn two_state_graph() -> ProcessGraph {
        let mut graph = ProcessGraph::new();
        graph.add_node(Node::new(nid("a"), Position::ORIGIN)).expect("a");
        graph.add_node(Node::new(nid("b"), Position::new(0.0, 150.0))).expect("b");
        graph.add_transition(Transition::new(tid("go"), nid("a"), nid("b"), ActorKind::Customer));
        graph
    }

    #[test]
    fn renders_the_exact_display_format() {
        let expected = "\
{
 :format :v3,
 :transitions [{
   :name :transition/go,
   :from :state/a,
   :to :state/b,
   :actor :actor/customer,
   :actions []
  }],
 :notifications []
}";
        assert_eq!(render_process(&two_state_graph()), expected);
    }

    #[test]
    fn empty_graph_renders_empty_vectors() {
        assert_eq!(
            render_process(&ProcessGraph::new()),
            "{\n :format :v3,\n :transitions [],\n :notifications []\n}"
        );
    }

    #[test]
    fn multiple_records_are_comma_joined_on_the_closing_line() {
        let mut graph = two_state_graph();
        graph.add_transition(Transition::new(tid("back"), nid("b"), nid("a"), ActorKind::Operator));
        let rendered = render_process(&graph);
        assert!(rendered.contains("  }, {\n   :name :transition/back,"));
        assert!(rendered.contains(":actor :actor/operator"));
    }

    #[test]
    fn export_follows_model_order_and_skips_dangling_transitions() {
        let mut graph = booking_process();
        graph.add_transition(Transition::new(
            tid("vanish"),
            nid("completed"),
            nid("ghost"),
            ActorKind::Customer,
        ));

        let document = export_process(&graph);
        let names = document.transitions.iter().map(|r| r.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["request", "accept", "decline", "complete"]);
        assert!(document.notifications.is_empty());
    }

    #[test]
    fn isolated_states_are_not_exported() {
        let mut graph = two_state_graph();
        graph.add_node(Node::new(nid("lonely"), Position::ORIGIN)).expect("lonely");
        assert!(!render_process(&graph).contains("lonely"));
    }

    #[test]
    fn parsed_document_rebuilds_the_graph() {
        let rendered = render_process(&booking_process());
        let document = parse_process_document(&rendered).expect("parse");
        assert_eq!(document, export_process(&booking_process()));

        let graph = document.to_graph();
        let ids = graph.nodes().iter().map(|n| n.id().as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["initial", "requested", "accepted", "declined", "completed"]);
        assert_eq!(graph.transitions().len(), 4);
        assert_eq!(graph.node(&NodeId::start()).map(Node::position), Some(Position::ORIGIN));
    }

    #[test]
    fn parse_rejects_foreign_formats_and_namespaces() {
        assert_eq!(
            parse_process_document("{:format :v2}"),
            Err(EdnParseError::UnsupportedFormat { format: "v2".to_owned() })
        );
        assert_eq!(
            parse_process_document(
                "{:format :v3 :transitions [{:name :go :from :state/a :to :state/b \
                 :actor :actor/customer}]}"
            ),
            Err(EdnParseError::WrongNamespace {
                field: "name",
                namespace: "transition",
                value: ":go".to_owned(),
            })
        );
        assert_eq!(
            parse_process_document(
                "{:format :v3 :transitions [{:name :transition/go :from :state/a :to :state/b \
                 :actor :actor/robot}]}"
            ),
            Err(EdnParseError::UnknownActor { actor: "robot".to_owned() })
        );
        assert_eq!(
            parse_process_document("{:format :v3 :transitions [{:name :transition/go}]}"),
            Err(EdnParseError::MissingField { field: "from" })
        );
    }

    #[test]
    fn json_form_uses_plain_ids() {
        let json = serde_json::to_value(ProcessDocument::default()).expect("json");
        assert_eq!(json["format"], "v3");

        let document = export_process(&two_state_graph());
        let record = serde_json::to_value(&document.transitions[0]).expect("json");
        assert_eq!(record["name"], "go");
        assert_eq!(record["from"], "a");
        assert_eq!(record["actor"], "customer");
    }
}
