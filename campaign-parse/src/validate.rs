//! Structural checks on a finished `Document`.
//!
//! The parser upholds these invariants by construction; `validate` re-checks
//! them on any sequence, including ones built or deserialized by hand.

use crate::error::{Diagnostic, Severity};
use crate::types::{Document, Element, Group, Token};

/// Validate a `Document` and return any diagnostics.
///
/// Checked: every group closes in order, sectioning levels are never skipped,
/// quote blocks do not nest, no extra line break directly precedes a quote
/// close, and no raw break survived parsing.
pub fn validate(doc: &Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut open: Vec<(Group, usize)> = Vec::new();
    let mut deepest_heading = 0u8;
    let mut prev: Option<Token> = None;

    for (index, element) in doc.iter().enumerate() {
        match element {
            Element::Token(Token::Open(group)) => {
                if let Some(level) = group.level() {
                    if level > deepest_heading + 1 {
                        diagnostics.push(error(
                            index,
                            "V002",
                            format!("{group:?} heading opened without an enclosing level"),
                        ));
                    }
                    deepest_heading = level;
                }
                if *group == Group::Quote && open.iter().any(|(g, _)| *g == Group::Quote) {
                    diagnostics.push(error(index, "V003", "Quote block opened inside another".into()));
                }
                open.push((*group, index));
            }
            Element::Token(Token::Close(group)) => {
                if *group == Group::Quote
                    && prev == Some(Token::ExtraLineBreak)
                {
                    diagnostics.push(error(
                        index,
                        "V004",
                        "Extra line break directly before quote close".into(),
                    ));
                }
                match open.last() {
                    Some((top, _)) if top == group => {
                        open.pop();
                    }
                    Some((top, _)) => diagnostics.push(error(
                        index,
                        "V001",
                        format!("{group:?} closed while {top:?} is open"),
                    )),
                    None => diagnostics.push(error(
                        index,
                        "V001",
                        format!("{group:?} closed but never opened"),
                    )),
                }
            }
            Element::Token(Token::RawBreak) => {
                diagnostics.push(error(index, "V005", "Raw break marker in document".into()));
            }
            Element::Token(Token::LineBreak | Token::ExtraLineBreak) | Element::Text(_) => {}
        }
        prev = element.as_token();
    }

    for (group, index) in open {
        diagnostics.push(error(index, "V001", format!("{group:?} is never closed")));
    }

    if prev == Some(Token::ExtraLineBreak) {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            message: "Document ends with an extra line break".into(),
            index: Some(doc.len() - 1),
            code: Some("V006".into()),
        });
    }

    diagnostics
}

fn error(index: usize, code: &str, message: String) -> Diagnostic {
    Diagnostic {
        severity: Severity::Error,
        message,
        index: Some(index),
        code: Some(code.into()),
    }
}
