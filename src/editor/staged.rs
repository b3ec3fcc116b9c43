// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Transition name typed ahead of a connect gesture.
///
/// Two phases: text is staged, then the next successful connect takes it and leaves the slot
/// empty, so one typed name creates at most one transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StagedName {
    #[default]
    Empty,
    Staged(String),
}

impl StagedName {
    /// Replaces the staged text. Blank text clears the slot.
    pub fn stage(&mut self, text: &str) {
        let trimmed = text.trim();
        *self = if trimmed.is_empty() { Self::Empty } else { Self::Staged(trimmed.to_owned()) };
    }

    pub fn peek(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Staged(text) => Some(text),
        }
    }

    pub fn is_staged(&self) -> bool {
        matches!(self, Self::Staged(_))
    }

    /// Commit phase: hands out the staged text and clears the slot.
    pub fn take(&mut self) -> Option<String> {
        match std::mem::take(self) {
            Self::Empty => None,
            Self::Staged(text) => Some(text),
        }
    }
}
