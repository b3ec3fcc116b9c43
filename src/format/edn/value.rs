// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::model::IdError;

const MAX_DEPTH: usize = 64;

/// The EDN subset used by process documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdnValue {
    /// `:name` or `:ns/name`; stored without the leading colon.
    Keyword(String),
    Str(String),
    /// Any other bare token (`nil`, `true`, numbers, symbols), kept verbatim.
    Symbol(String),
    Vector(Vec<EdnValue>),
    /// Keyword-keyed map in source order. Keys are stored without the leading colon.
    Map(Vec<(String, EdnValue)>),
}

impl EdnValue {
    pub fn keyword(name: impl Into<String>) -> Self {
        Self::Keyword(name.into())
    }

    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Self::Keyword(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[EdnValue]> {
        match self {
            Self::Vector(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(String, EdnValue)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// First value stored under `key` in a map; `None` for other variants.
    pub fn get(&self, key: &str) -> Option<&EdnValue> {
        self.as_map()?.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl Serialize for EdnValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Keyword(name) => serializer.serialize_str(&format!(":{name}")),
            Self::Str(text) | Self::Symbol(text) => serializer.serialize_str(text),
            Self::Vector(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Renders `value` in the editor's display format.
///
/// Vectors are comma-joined on one line; maps put one `:key value` pair per line indented by
/// depth + 1 spaces with the closing brace at depth; scalars render verbatim.
pub fn pretty_print(value: &EdnValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &EdnValue, indent: usize) {
    match value {
        EdnValue::Keyword(name) => {
            out.push(':');
            out.push_str(name);
        }
        EdnValue::Str(text) => write_string(out, text),
        EdnValue::Symbol(token) => out.push_str(token),
        EdnValue::Vector(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, indent + 1);
            }
            out.push(']');
        }
        EdnValue::Map(entries) => {
            out.push_str("{\n");
            for (idx, (key, item)) in entries.iter().enumerate() {
                if idx > 0 {
                    out.push_str(",\n");
                }
                push_indent(out, indent + 1);
                out.push(':');
                out.push_str(key);
                out.push(' ');
                write_value(out, item, indent + 1);
            }
            out.push('\n');
            push_indent(out, indent);
            out.push('}');
        }
    }
}

fn push_indent(out: &mut String, width: usize) {
    out.extend(std::iter::repeat(' ').take(width));
}

fn write_string(out: &mut String, text: &str) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EdnParseError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("unsupported escape \\{ch} at offset {offset}")]
    InvalidEscape { ch: char, offset: usize },
    #[error("map key at offset {offset} is not a keyword")]
    NonKeywordKey { offset: usize },
    #[error("map starting at offset {offset} has a key without a value")]
    MissingMapValue { offset: usize },
    #[error("duplicate map key :{key}")]
    DuplicateKey { key: String },
    #[error("empty keyword at offset {offset}")]
    EmptyKeyword { offset: usize },
    #[error("nesting deeper than 64 levels")]
    TooDeep,
    #[error("unexpected trailing input at offset {offset}")]
    TrailingInput { offset: usize },
    #[error("expected {expected} for {field}")]
    WrongShape { field: &'static str, expected: &'static str },
    #[error("missing required field :{field}")]
    MissingField { field: &'static str },
    #[error("unsupported document format :{format}")]
    UnsupportedFormat { format: String },
    #[error("{field} must be a :{namespace}/… keyword, got {value}")]
    WrongNamespace { field: &'static str, namespace: &'static str, value: String },
    #[error("invalid id in {field}: {source}")]
    InvalidId {
        field: &'static str,
        #[source]
        source: IdError,
    },
    #[error("unknown actor :actor/{actor}")]
    UnknownActor { actor: String },
}

/// Parses a single EDN value. Commas are whitespace and `;` starts a line comment.
pub fn parse_edn(input: &str) -> Result<EdnValue, EdnParseError> {
    let mut reader = Reader { input, pos: 0 };
    reader.skip_whitespace();
    let value = reader.read_value(0)?;
    reader.skip_whitespace();
    if reader.pos < input.len() {
        return Err(EdnParseError::TrailingInput { offset: reader.pos });
    }
    Ok(value)
}

fn is_delimiter(ch: char) -> bool {
    matches!(ch, ',' | '{' | '}' | '[' | ']' | '(' | ')' | '"' | ';')
}

struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl Reader<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || ch == ',' {
                self.bump();
            } else if ch == ';' {
                while let Some(ch) = self.bump() {
                    if ch == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn read_value(&mut self, depth: usize) -> Result<EdnValue, EdnParseError> {
        if depth > MAX_DEPTH {
            return Err(EdnParseError::TooDeep);
        }
        let start = self.pos;
        match self.peek() {
            None => Err(EdnParseError::UnexpectedEof),
            Some('{') => {
                self.bump();
                self.read_map(start, depth)
            }
            Some('[') => {
                self.bump();
                self.read_seq(']', depth).map(EdnValue::Vector)
            }
            Some('(') => {
                self.bump();
                self.read_seq(')', depth).map(EdnValue::Vector)
            }
            Some('"') => {
                self.bump();
                self.read_string(start).map(EdnValue::Str)
            }
            Some(ch @ ('}' | ']' | ')')) => {
                Err(EdnParseError::UnexpectedChar { ch, offset: start })
            }
            Some(':') => {
                self.bump();
                let token = self.read_token();
                if token.is_empty() {
                    return Err(EdnParseError::EmptyKeyword { offset: start });
                }
                Ok(EdnValue::Keyword(token.to_owned()))
            }
            Some(_) => Ok(EdnValue::Symbol(self.read_token().to_owned())),
        }
    }

    fn read_token(&mut self) -> &str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || is_delimiter(ch) {
                break;
            }
            self.bump();
        }
        &self.input[start..self.pos]
    }

    fn read_seq(&mut self, close: char, depth: usize) -> Result<Vec<EdnValue>, EdnParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(EdnParseError::UnexpectedEof),
                Some(ch) if ch == close => {
                    self.bump();
                    return Ok(items);
                }
                Some(_) => items.push(self.read_value(depth + 1)?),
            }
        }
    }

    fn read_map(&mut self, start: usize, depth: usize) -> Result<EdnValue, EdnParseError> {
        let mut entries = Vec::<(String, EdnValue)>::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(EdnParseError::UnexpectedEof),
                Some('}') => {
                    self.bump();
                    return Ok(EdnValue::Map(entries));
                }
                Some(_) => {}
            }

            let key_offset = self.pos;
            let EdnValue::Keyword(key) = self.read_value(depth + 1)? else {
                return Err(EdnParseError::NonKeywordKey { offset: key_offset });
            };
            self.skip_whitespace();
            if matches!(self.peek(), Some('}') | None) {
                return Err(EdnParseError::MissingMapValue { offset: start });
            }
            let value = self.read_value(depth + 1)?;
            if entries.iter().any(|(existing, _)| *existing == key) {
                return Err(EdnParseError::DuplicateKey { key });
            }
            entries.push((key, value));
        }
    }

    fn read_string(&mut self, start: usize) -> Result<String, EdnParseError> {
        let mut text = String::new();
        loop {
            let Some(ch) = self.bump() else {
                return Err(EdnParseError::UnterminatedString { offset: start });
            };
            match ch {
                '"' => return Ok(text),
                '\\' => {
                    let offset = self.pos;
                    let escaped =
                        self.bump().ok_or(EdnParseError::UnterminatedString { offset: start })?;
                    text.push(match escaped {
                        '"' => '"',
                        '\\' => '\\',
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => return Err(EdnParseError::InvalidEscape { ch: other, offset }),
                    });
                }
                other => text.push(other),
            }
        }
    }
}
