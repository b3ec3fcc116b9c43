// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowstate CLI entrypoint.
//!
//! Every command restores the editor from the store, applies one gesture and saves the result
//! back. Read-only commands (`export`, `show`) never write.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use flowstate::config::FlowstateConfig;
use flowstate::editor::{DropPayload, Editor, GestureOutcome, LayoutOutcome, RestoreOutcome};
use flowstate::format::edn::parse_process_document;
use flowstate::layout::LayoutDirection;
use flowstate::model::{ActorKind, NodeId, Position, TransitionId};
use flowstate::ops::Delta;
use flowstate::render::{render_outline, OutlineOptions};
use flowstate::store::{FileBridge, PersistenceBridge};

#[derive(Parser)]
#[command(name = "flowstate", version, about = "Edit marketplace transaction processes")]
struct Cli {
    /// Path to config file (defaults to ./flowstate.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Store directory; overrides `store.dir` from the config
    #[arg(short, long, env = "FLOWSTATE_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save an empty process holding only the start state
    Init {
        /// Overwrite an existing process
        #[arg(long)]
        force: bool,
    },
    /// Drop a new state onto the canvas
    AddState {
        /// State name; normalized to a lower-kebab id
        name: String,
        /// Canvas x coordinate
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x: f64,
        /// Canvas y coordinate
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y: f64,
    },
    /// Connect two states with a named transition
    AddTransition {
        /// Transition name; normalized to a lower-kebab id
        name: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// customer, provider, operator or automatic (defaults to `editor.default_actor`)
        #[arg(long)]
        actor: Option<ActorKind>,
    },
    /// Re-point an existing transition
    Reconnect {
        id: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Remove a state and every transition touching it
    RemoveState { id: String },
    /// Remove a single transition
    RemoveTransition { id: String },
    /// Move a state to graph coordinates
    MoveState {
        id: String,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },
    /// Run the layered auto-layout
    Layout {
        /// down or right (defaults to `layout.direction`)
        #[arg(long)]
        direction: Option<LayoutDirection>,
    },
    /// Print the process export
    Export {
        /// Emit JSON instead of EDN
        #[arg(long)]
        json: bool,
    },
    /// Replace the process with an EDN export document
    Import { file: PathBuf },
    /// Print a text outline of states, handles and transitions
    Show,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("flowstate=info,warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = FlowstateConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.store {
        config.store.dir = dir;
    }
    let mut bridge = config.store.file_bridge();
    let mut editor = Editor::new(config);

    if let Commands::Init { force } = cli.command {
        if !force && bridge.load(&editor.config().store.key)?.is_some() {
            return Err(format!(
                "a process already exists in {}; pass --force to overwrite",
                bridge.dir().display()
            )
            .into());
        }
        editor.save(&mut bridge)?;
        info!(dir = %bridge.dir().display(), "initialized");
        return Ok(());
    }

    if editor.restore(&bridge)? == RestoreOutcome::NothingSaved {
        info!("no saved process; starting from the start state");
    }

    let outcome = match cli.command {
        Commands::Init { .. } => unreachable!("handled above"),
        Commands::AddState { name, x, y } => {
            let payload = DropPayload::new(editor.config().editor.drop_mime.clone(), name);
            editor.drop_state(&payload, Position::new(x, y))
        }
        Commands::AddTransition { name, from, to, actor } => {
            editor.select_actor(actor.unwrap_or(editor.config().editor.default_actor));
            editor.stage_transition_name(&name);
            editor.connect(&NodeId::from_name(&from)?, &NodeId::from_name(&to)?)
        }
        Commands::Reconnect { id, from, to } => editor.reconnect(
            &TransitionId::from_name(&id)?,
            &NodeId::from_name(&from)?,
            &NodeId::from_name(&to)?,
        ),
        Commands::RemoveState { id } => editor.delete_node(&NodeId::from_name(&id)?),
        Commands::RemoveTransition { id } => {
            editor.delete_transition(&TransitionId::from_name(&id)?)
        }
        Commands::MoveState { id, x, y } => {
            editor.move_node(&NodeId::from_name(&id)?, Position::new(x, y))
        }
        Commands::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .map_err(|err| format!("cannot read {}: {err}", file.display()))?;
            editor.import(&parse_process_document(&text)?)
        }
        Commands::Layout { direction } => {
            return run_layout(&mut editor, &mut bridge, direction).await;
        }
        Commands::Export { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&editor.export())?);
            } else {
                println!("{}", editor.render_export());
            }
            return Ok(());
        }
        Commands::Show => {
            let options = OutlineOptions {
                handle_spacing: editor.config().handles.spacing,
                ..OutlineOptions::default()
            };
            print!("{}", render_outline(editor.graph(), &options));
            return Ok(());
        }
    };

    match outcome {
        GestureOutcome::Applied(delta) => {
            print_delta(&delta);
            editor.save(&mut bridge)?;
            Ok(())
        }
        GestureOutcome::Ignored(reason) => Err(format!("ignored: {reason}").into()),
    }
}

async fn run_layout(
    editor: &mut Editor,
    bridge: &mut FileBridge,
    direction: Option<LayoutDirection>,
) -> Result<(), Box<dyn Error>> {
    match editor.relayout(direction).await? {
        LayoutOutcome::Applied { moved } => {
            println!("moved {moved} state(s)");
            editor.save(bridge)?;
        }
        LayoutOutcome::Stale { .. } | LayoutOutcome::Skipped => {
            println!("layout not applied");
        }
    }
    Ok(())
}

fn print_delta(delta: &Delta) {
    for object_ref in &delta.added {
        println!("+ {object_ref}");
    }
    for object_ref in &delta.updated {
        println!("~ {object_ref}");
    }
    for object_ref in &delta.removed {
        println!("- {object_ref}");
    }
}
