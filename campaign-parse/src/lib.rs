//! `campaign-parse` — turns the StarCraft campaign quotations wiki page into
//! LaTeX.
//!
//! Parsing produces a flat [`Document`]: a sequence of payload-free
//! [`Token`]s and literal text runs. Rendering walks that sequence once and
//! maps each element to LaTeX markup.
//!
//! # Quick start
//!
//! ```
//! let html = "<h2><span id=\"T\">Terran</span></h2>\n\
//! <h3><span class=\"mw-headline\" id=\"R\">Rebel Yell</span><span>edit</span></h3>\n\
//! <p>Mar Sara, 2499.</p>\n";
//! let doc = campaign_parse::parse(html).unwrap();
//! let tex = doc.to_latex(&campaign_parse::Preamble::default()).unwrap();
//! assert!(tex.contains("\\section{Rebel Yell}"));
//! ```

pub mod blocks;
pub mod cursor;
pub mod dispatch;
pub mod error;
pub mod inline;
pub mod parse;
pub mod render_tex;
pub mod types;
pub mod validate;

pub use error::*;
pub use parse::{parse, trim_page};
pub use render_tex::Preamble;
pub use types::*;

impl Document {
    /// Render this document as a complete LaTeX source file.
    pub fn to_latex(&self, preamble: &Preamble) -> Result<String, RenderError> {
        render_tex::to_latex(self, preamble)
    }

    /// Serialize the element sequence as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Check the structural invariants and return any diagnostics.
    pub fn validate(&self) -> Vec<Diagnostic> {
        validate::validate(self)
    }
}
