// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! `flowstate.toml` configuration. Every field has a default, so an empty file is valid.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::LayoutOptions;
use crate::model::ActorKind;
use crate::store::{FileBridge, WriteDurability};

pub const DEFAULT_CONFIG_FILE: &str = "flowstate.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config {path:?}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowstateConfig {
    pub layout: LayoutOptions,
    pub handles: HandleConfig,
    pub editor: EditorConfig,
    pub store: StoreConfig,
    pub viewport: ViewportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleConfig {
    /// Pixel offset between consecutive handles on a node.
    pub spacing: f64,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self { spacing: 20.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub default_actor: ActorKind,
    /// When false, connecting without a staged name derives the id from actor and endpoints.
    pub require_transition_name: bool,
    /// Transfer type accepted by the state drop target.
    pub drop_mime: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_actor: ActorKind::Customer,
            require_transition_name: true,
            drop_mime: "application/reactflow".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub dir: PathBuf,
    pub key: String,
    pub durable: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from(".flowstate"), key: "flow".to_owned(), durable: false }
    }
}

impl StoreConfig {
    pub fn file_bridge(&self) -> FileBridge {
        let durability =
            if self.durable { WriteDurability::Durable } else { WriteDurability::BestEffort };
        FileBridge::new(&self.dir).with_durability(durability)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Fraction of the canvas kept free around the fitted graph.
    pub fit_padding: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { min_zoom: 0.5, max_zoom: 2.0, fit_padding: 0.1 }
    }
}

impl FlowstateConfig {
    /// Loads `path`. A missing file at the default location yields the defaults; a missing
    /// explicitly requested file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !explicit => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.validate().map_err(|reason| ConfigError::Invalid { path, reason })?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn validate(&self) -> Result<(), String> {
        let layout = &self.layout;
        for (name, value) in [
            ("layout.node_width", layout.node_width),
            ("layout.node_height", layout.node_height),
            ("viewport.min_zoom", self.viewport.min_zoom),
            ("viewport.max_zoom", self.viewport.max_zoom),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{name} must be a positive number"));
            }
        }
        for (name, value) in [
            ("layout.layer_spacing", layout.layer_spacing),
            ("layout.node_spacing", layout.node_spacing),
            ("handles.spacing", self.handles.spacing),
            ("viewport.fit_padding", self.viewport.fit_padding),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{name} must be zero or positive"));
            }
        }
        if self.viewport.min_zoom > self.viewport.max_zoom {
            return Err("viewport.min_zoom exceeds viewport.max_zoom".to_owned());
        }
        if self.store.key.trim().is_empty() {
            return Err("store.key must not be empty".to_owned());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{ConfigError, FlowstateConfig};
    use crate::layout::LayoutDirection;
    use crate::model::ActorKind;
    use crate::store::WriteDurability;

    #[test]
    fn empty_document_yields_defaults() {
        let config = FlowstateConfig::from_toml("").expect("parse");
        assert_eq!(config, FlowstateConfig::default());
        assert_eq!(config.layout.node_width, 150.0);
        assert_eq!(config.layout.node_height, 50.0);
        assert_eq!(config.layout.layer_spacing, 100.0);
        assert_eq!(config.layout.node_spacing, 80.0);
        assert_eq!(config.handles.spacing, 20.0);
        assert_eq!(config.editor.default_actor, ActorKind::Customer);
        assert!(config.editor.require_transition_name);
        assert_eq!(config.editor.drop_mime, "application/reactflow");
        assert_eq!(config.store.key, "flow");
        assert_eq!(config.viewport.min_zoom, 0.5);
        assert_eq!(config.viewport.max_zoom, 2.0);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let toml_str = r#"
[layout]
direction = "right"
node_spacing = 40.0

[editor]
default_actor = "operator"
require_transition_name = false

[store]
dir = "/tmp/flows"
durable = true
"#;
        let config = FlowstateConfig::from_toml(toml_str).expect("parse");
        assert_eq!(config.layout.direction, LayoutDirection::Right);
        assert_eq!(config.layout.node_spacing, 40.0);
        assert_eq!(config.layout.node_width, 150.0);
        assert_eq!(config.editor.default_actor, ActorKind::Operator);
        assert!(!config.editor.require_transition_name);
        assert_eq!(config.store.file_bridge().durability(), WriteDurability::Durable);
        assert_eq!(config.store.file_bridge().dir(), Path::new("/tmp/flows"));
    }

    #[test]
    fn unknown_actor_is_a_parse_error() {
        assert!(FlowstateConfig::from_toml("[editor]\ndefault_actor = \"robot\"").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = FlowstateConfig::load(Some(Path::new("/definitely/not/here/flowstate.toml")))
            .expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn inverted_zoom_bounds_are_rejected() {
        let config = FlowstateConfig::from_toml("[viewport]\nmin_zoom = 3.0").expect("parse");
        assert!(config.validate().is_err());
    }
}
