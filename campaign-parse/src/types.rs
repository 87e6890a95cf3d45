use serde::{Deserialize, Serialize};

/// A markup construct that opens and later closes around other elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// Top-level campaign heading (`<h2>` on the page).
    Part,
    /// Chapter heading (`<h3>`).
    Section,
    /// Mission or cinematic heading (`<h4>`).
    Subsection,
    /// Briefing and in-mission labels.
    Subsubsection,
    /// A dialogue block.
    Quote,
    Italic,
    Bold,
    Mono,
}

impl Group {
    /// Nesting depth for the four sectioning groups, `None` for the rest.
    pub fn level(self) -> Option<u8> {
        match self {
            Group::Part => Some(1),
            Group::Section => Some(2),
            Group::Subsection => Some(3),
            Group::Subsubsection => Some(4),
            Group::Quote | Group::Italic | Group::Bold | Group::Mono => None,
        }
    }
}

/// A payload-free structural marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "group", rename_all = "snake_case")]
pub enum Token {
    Open(Group),
    Close(Group),
    /// Plain line separator, used between context lines.
    LineBreak,
    /// Line separator with added vertical space, used between paragraphs
    /// and dialogue lines.
    ExtraLineBreak,
    /// The page's own `<br/>` marker. It has no typeset form and must never
    /// survive parsing.
    RawBreak,
}

/// One entry of a parsed document: a marker or a literal text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    Token(Token),
    Text(String),
}

impl Element {
    pub fn as_token(&self) -> Option<Token> {
        match self {
            Element::Token(t) => Some(*t),
            Element::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Element::Text(s) => Some(s),
            Element::Token(_) => None,
        }
    }
}

impl From<Token> for Element {
    fn from(token: Token) -> Self {
        Element::Token(token)
    }
}

impl From<&str> for Element {
    fn from(text: &str) -> Self {
        Element::Text(text.to_string())
    }
}

impl From<String> for Element {
    fn from(text: String) -> Self {
        Element::Text(text)
    }
}

/// The finished, read-only element sequence handed from parser to renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// Append-only accumulator threaded through every parsing step.
///
/// The only non-append operation is [`DocumentBuilder::drop_trailing_extra_breaks`],
/// used when a dialogue block closes.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    elements: Vec<Element>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&mut self, token: Token) {
        self.elements.push(Element::Token(token));
    }

    pub fn text(&mut self, text: impl Into<String>) {
        self.elements.push(Element::Text(text.into()));
    }

    pub fn open(&mut self, group: Group) {
        self.token(Token::Open(group));
    }

    pub fn close(&mut self, group: Group) {
        self.token(Token::Close(group));
    }

    /// Emit `text` wrapped in an open/close pair of `group`.
    pub fn wrapped(&mut self, group: Group, text: impl Into<String>) {
        self.open(group);
        self.text(text);
        self.close(group);
    }

    pub fn last(&self) -> Option<&Element> {
        self.elements.last()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Remove any [`Token::ExtraLineBreak`]s at the end of the sequence.
    pub fn drop_trailing_extra_breaks(&mut self) {
        while self.last() == Some(&Element::Token(Token::ExtraLineBreak)) {
            self.elements.pop();
        }
    }

    pub fn finish(self) -> Document {
        Document {
            elements: self.elements,
        }
    }
}
