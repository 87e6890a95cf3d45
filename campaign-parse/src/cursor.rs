//! Character cursor that steps over a fixed set of ignored characters.

/// A forward-only reader over `input` that transparently discards any
/// character listed in `skips`.
///
/// Both [`Cursor::peek`] and [`Cursor::advance`] consume a run of skipped
/// characters before reporting the next significant one, so the position
/// may move on a peek.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    skips: &'a [char],
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str, skips: &'a [char]) -> Self {
        Self {
            input,
            pos: 0,
            skips,
        }
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Next significant character without consuming it, or `None` at the end.
    pub fn peek(&mut self) -> Option<char> {
        self.skip_ignored();
        self.input[self.pos..].chars().next()
    }

    /// Consume and return the next significant character, or `None` at the end.
    pub fn advance(&mut self) -> Option<char> {
        self.skip_ignored();
        let c = self.input[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ignored(&mut self) {
        while let Some(c) = self.input[self.pos..].chars().next() {
            if !self.skips.contains(&c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }
}
