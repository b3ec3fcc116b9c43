// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smol_str::SmolStr;
use thiserror::Error;

/// Reserved id of the initial/start state. Exactly one node carries it.
pub const START_NODE_ID: &str = "initial";

/// A stable identifier shared by the visual layer and the exported document.
///
/// Ids double as keyword names in the export (`:state/<id>`, `:transition/<id>`), so they
/// must be non-empty and free of whitespace. Everything else is accepted verbatim; the
/// controller feeds user text through [`slugify`] before it gets here.
pub struct Id<T> {
    value: SmolStr,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdError> {
        let value = value.as_ref();
        validate_id(value)?;
        Ok(Self { value: SmolStr::new(value), _marker: PhantomData })
    }

    /// Builds an id from free-form user text (`"Request Payment"` -> `request-payment`).
    pub fn from_name(name: &str) -> Result<Self, IdError> {
        Self::new(slugify(name))
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

// Manual impls: derives would put bounds on the phantom tag type.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self { value: self.value.clone(), _marker: PhantomData }
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({:?})", self.value.as_str())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("id must not be empty")]
    Empty,
    #[error("id must not contain whitespace")]
    ContainsWhitespace,
}

fn validate_id(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.chars().any(char::is_whitespace) {
        return Err(IdError::ContainsWhitespace);
    }
    Ok(())
}

fn non_slug_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\p{Alphabetic}\p{N}]+").expect("static slug regex"))
}

/// Lower-kebab normalization used for every user-typed state and transition name.
///
/// Letters and digits of any script are kept; every other run becomes a single `-`.
///
/// Returns an empty string for input without any alphanumeric character; callers treat
/// that as "no name".
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let dashed = non_slug_run().replace_all(&lowered, "-");
    dashed.trim_matches('-').to_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIdTag {}
pub type NodeId = Id<NodeIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransitionIdTag {}
pub type TransitionId = Id<TransitionIdTag>;

impl NodeId {
    pub fn start() -> Self {
        Self { value: SmolStr::new_static(START_NODE_ID), _marker: PhantomData }
    }

    pub fn is_start(&self) -> bool {
        self.as_str() == START_NODE_ID
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{slugify, IdError, NodeId, TransitionId};

    #[test]
    fn id_rejects_empty() {
        assert_eq!(NodeId::new(""), Err(IdError::Empty));
    }

    #[test]
    fn id_rejects_whitespace() {
        assert_eq!(TransitionId::new("a b"), Err(IdError::ContainsWhitespace));
    }

    #[rstest]
    #[case("Request Payment", "request-payment")]
    #[case("  accepted  ", "accepted")]
    #[case("Pay_Out!!now", "pay-out-now")]
    #[case("--already-kebab--", "already-kebab")]
    #[case("   ", "")]
    #[case("?!", "")]
    #[case("Überprüft", "überprüft")]
    #[case("支付", "支付")]
    #[case("Zahlung Ä2", "zahlung-ä2")]
    fn slugify_produces_lower_kebab(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[test]
    fn from_name_rejects_names_without_alphanumerics() {
        assert_eq!(NodeId::from_name(" - "), Err(IdError::Empty));
        assert_eq!(NodeId::from_name("Paid Out").expect("id").as_str(), "paid-out");
    }

    #[test]
    fn start_id_is_reserved_value() {
        assert!(NodeId::start().is_start());
        assert!(NodeId::new("initial").expect("id").is_start());
        assert!(!NodeId::new("initial-2").expect("id").is_start());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = NodeId::new("paid").expect("id");
        assert_eq!(serde_json::to_string(&id).expect("json"), "\"paid\"");
        let back: NodeId = serde_json::from_str("\"paid\"").expect("parse");
        assert_eq!(back, id);
        assert!(serde_json::from_str::<NodeId>("\"\"").is_err());
    }
}
