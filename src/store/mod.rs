// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence bridges: opaque key/value blob stores used for save/restore.
//!
//! The editor writes one JSON snapshot under a fixed key and reads it back verbatim. Nothing
//! here interprets the blob.

pub mod file_bridge;

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use file_bridge::{FileBridge, WriteDurability};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid store key {key:?}")]
    InvalidKey { key: String },
    #[error("refusing to write through symlink at {path:?}")]
    SymlinkRefused { path: PathBuf },
}

/// A local, synchronous key/value blob store.
pub trait PersistenceBridge {
    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;

    /// `Ok(None)` when nothing was saved under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// In-process bridge; contents live as long as the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryBridge {
    blobs: BTreeMap<String, String>,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl PersistenceBridge for MemoryBridge {
    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.blobs.insert(key.to_owned(), blob.to_owned());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        Ok(self.blobs.get(key).cloned())
    }
}

pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.trim().is_empty() {
        return Err(StoreError::InvalidKey { key: key.to_owned() });
    }
    Ok(())
}
