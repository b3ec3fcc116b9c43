// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use flowstate::config::FlowstateConfig;
use flowstate::editor::{CanvasSize, DropPayload, Editor, LayoutOutcome, RestoreOutcome};
use flowstate::format::edn::parse_process_document;
use flowstate::layout::{LayoutDirection, LayoutError};
use flowstate::model::{ActorKind, NodeId, Position};
use flowstate::store::{MemoryBridge, PersistenceBridge};

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read {path:?}: {err}"))
}

fn node(id: &str) -> NodeId {
    NodeId::new(id).expect("node id")
}

fn drop_state(editor: &mut Editor, name: &str, x: f64, y: f64) {
    let payload = DropPayload::new("application/reactflow", name);
    let outcome = editor.drop_state(&payload, Position::new(x, y));
    assert!(outcome.is_applied(), "drop {name}: {outcome:?}");
}

fn connect(editor: &mut Editor, name: &str, actor: ActorKind, from: &str, to: &str) {
    editor.select_actor(actor);
    editor.stage_transition_name(name);
    let outcome = editor.connect(&node(from), &node(to));
    assert!(outcome.is_applied(), "connect {name}: {outcome:?}");
}

struct TempStore {
    path: PathBuf,
}

impl TempStore {
    fn new(name: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let path = std::env::temp_dir()
            .join(format!("flowstate-it-{name}-{}-{nanos}", std::process::id()));
        Self { path }
    }
}

impl Drop for TempStore {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

#[test]
fn two_states_and_one_transition_export_exactly() {
    let mut editor = Editor::default();
    drop_state(&mut editor, "A", 0.0, 0.0);
    drop_state(&mut editor, "B", 0.0, 100.0);
    connect(&mut editor, "go", ActorKind::Customer, "a", "b");

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
    assert_eq!(editor.render_export(), expected);
}

#[test]
fn imported_document_exports_unchanged() {
    let source = fixture("booking.edn");
    let document = parse_process_document(&source).expect("parse fixture");

    let mut editor = Editor::default();
    assert!(editor.import(&document).is_applied());

    assert_eq!(editor.graph().nodes().len(), 5);
    assert_eq!(editor.graph().transitions().len(), 4);
    assert_eq!(editor.render_export(), source.trim_end());
}

#[tokio::test]
async fn file_store_round_trips_a_laid_out_process() {
    let store = TempStore::new("round-trip");
    let mut config = FlowstateConfig::default();
    config.store.dir = store.path.clone();
    let mut bridge = config.store.file_bridge();

    let mut editor = Editor::new(config.clone());
    let document = parse_process_document(&fixture("booking.edn")).expect("parse fixture");
    assert!(editor.import(&document).is_applied());
    let outcome = editor.relayout(Some(LayoutDirection::Right)).await.expect("layout");
    assert!(matches!(outcome, LayoutOutcome::Applied { .. }));
    assert!(editor.frame(CanvasSize::new(1280.0, 800.0)).is_some());
    editor.save(&mut bridge).expect("save");

    let mut restored = Editor::new(config);
    assert_eq!(restored.restore(&bridge).expect("restore"), RestoreOutcome::Restored);

    assert_eq!(restored.graph().nodes(), editor.graph().nodes());
    assert_eq!(restored.graph().transitions(), editor.graph().transitions());
    let (saved, loaded) = (editor.viewport(), restored.viewport());
    assert!((saved.zoom - loaded.zoom).abs() < 1e-9);
    assert!((saved.x - loaded.x).abs() < 1e-6 && (saved.y - loaded.y).abs() < 1e-6);
    assert_eq!(
        restored.graph().node(&node("declined")).map(|n| n.position()),
        Some(Position::new(500.0, 130.0))
    );
    assert_eq!(restored.render_export(), editor.render_export());
}

#[tokio::test]
async fn dangling_snapshot_fails_layout_without_moving_states() {
    let mut bridge = MemoryBridge::new();
    bridge
        .save(
            "flow",
            r#"{
                "nodes": [
                    {"id": "initial", "position": {"x": 0.0, "y": 0.0}},
                    {"id": "paid", "position": {"x": 40.0, "y": 80.0}}
                ],
                "transitions": [
                    {"id": "pay", "source": "initial", "target": "paid", "actor": "customer"},
                    {"id": "refund", "source": "paid", "target": "refunded", "actor": "operator"},
                    {"id": "draft", "source": "paid", "actor": "operator"}
                ]
            }"#,
        )
        .expect("seed");

    let mut editor = Editor::default();
    assert_eq!(editor.restore(&bridge).expect("restore"), RestoreOutcome::Restored);
    // The endpoint-less record is dropped on restore; the dangling one is kept.
    assert_eq!(editor.graph().transitions().len(), 2);

    let err = editor.relayout(None).await.expect_err("dangling target");
    assert!(matches!(err, LayoutError::UnknownNode { .. }), "{err}");
    assert_eq!(
        editor.graph().node(&node("paid")).map(|n| n.position()),
        Some(Position::new(40.0, 80.0))
    );
    assert!(!editor.fit_pending());
    assert!(editor.render_export().contains(":name :transition/pay"));
    assert!(!editor.render_export().contains("refund"));
}
