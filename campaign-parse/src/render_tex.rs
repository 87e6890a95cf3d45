//! LaTeX renderer.
//!
//! A single front-to-back pass: every token maps to a fixed markup string and
//! every text run is copied through unchanged. Text is not escaped; the page
//! content is assumed to be LaTeX-safe.

use crate::error::RenderError;
use crate::types::{Document, Element, Group, Token};

/// Separator emitted for [`Token::LineBreak`].
pub const LINE_BREAK: &str = "\\\\\n";
/// Separator emitted for [`Token::ExtraLineBreak`].
pub const EXTRA_LINE_BREAK: &str = "\\\\[0.5em]\n";

/// Document-level settings written before `\begin{document}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    pub author: String,
    /// Base font size in points.
    pub font_size: u32,
    /// Options passed to `\geometry`.
    pub geometry: String,
}

impl Default for Preamble {
    fn default() -> Self {
        Self {
            author: "Blizzard Entertainment".to_string(),
            font_size: 4,
            geometry: "a4paper, left=12mm, right=12mm, top=12mm, bottom=19.5mm, foot=7.5mm"
                .to_string(),
        }
    }
}

/// Render a `Document` as a standalone LaTeX source file.
pub fn to_latex(doc: &Document, preamble: &Preamble) -> Result<String, RenderError> {
    let mut out = String::new();
    write_preamble(&mut out, preamble);
    out.push_str("\\begin{document}\n");

    for (index, element) in doc.iter().enumerate() {
        match element {
            Element::Text(text) => out.push_str(text),
            Element::Token(token) => {
                let markup =
                    token_markup(*token).ok_or(RenderError::InvalidToken { token: *token, index })?;
                out.push_str(markup);
            }
        }
    }

    out.push_str("\n\\end{document}\n");
    Ok(out)
}

fn write_preamble(out: &mut String, preamble: &Preamble) {
    out.push_str(&format!("\\documentclass[{}pt]{{article}}\n", preamble.font_size));
    out.push_str("\\usepackage{csquotes, geometry}\n");
    out.push_str(&format!("\\author{{{}}}\n", preamble.author));
    out.push_str("\\date{}\n");
    out.push_str(&format!("\\geometry{{{}}}\n", preamble.geometry));
}

fn token_markup(token: Token) -> Option<&'static str> {
    let markup = match token {
        Token::Open(group) => match group {
            Group::Part => "\n\\part*{",
            Group::Section => "\n\\section{",
            Group::Subsection => "\n\\subsection{",
            Group::Subsubsection => "\n\\subsubsection*{",
            Group::Quote => "\n\\begin{displayquote}\n",
            Group::Italic => "\\textit{",
            Group::Bold => "\\textbf{",
            Group::Mono => "\\texttt{",
        },
        Token::Close(group) => match group {
            Group::Part | Group::Section | Group::Subsection | Group::Subsubsection => "}\n",
            Group::Quote => "\n\\end{displayquote}\n",
            Group::Italic | Group::Bold | Group::Mono => "}",
        },
        Token::LineBreak => LINE_BREAK,
        Token::ExtraLineBreak => EXTRA_LINE_BREAK,
        Token::RawBreak => return None,
    };
    Some(markup)
}
