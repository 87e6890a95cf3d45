use serde::{Deserialize, Serialize};

use crate::types::Token;

/// Errors that abort parsing.
///
/// The parser targets a single known page; any deviation from its structure
/// is reported rather than recovered from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Page boundary marker '{marker}' not found")]
    TrimBoundary { marker: &'static str },

    #[error("Expected {expected} not found in: {excerpt}")]
    Structure {
        expected: &'static str,
        excerpt: String,
    },

    #[error("Subsection title '{title}' has no dispatch rule")]
    UnknownSubsection { title: String },

    #[error("Dialogue line {line} is empty")]
    EmptyDialogueLine { line: usize },

    #[error("Unrecognized markup marker '{marker}' at offset {offset}")]
    UnrecognizedMarker { marker: String, offset: usize },

    #[error("Markup marker opened at offset {offset} is never closed")]
    UnterminatedMarker { offset: usize },
}

impl ParseError {
    pub(crate) fn structure(expected: &'static str, input: &str) -> Self {
        ParseError::Structure {
            expected,
            excerpt: excerpt(input),
        }
    }
}

/// Errors raised while turning a document into LaTeX.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Token {token:?} at element {index} has no LaTeX form")]
    InvalidToken { token: Token, index: usize },
}

/// A finding from [`crate::validate::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Index of the offending element in the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

const EXCERPT_CHARS: usize = 80;

fn excerpt(input: &str) -> String {
    let mut out: String = input.chars().take(EXCERPT_CHARS).collect();
    if input.chars().nth(EXCERPT_CHARS).is_some() {
        out.push_str("...");
    }
    out.replace('\n', "\\n")
}
