//! Inline markup scanner.
//!
//! Walks a fragment of page markup character by character, keeping italic and
//! bold markers as tokens, dropping a whitelist of presentational markers, and
//! collecting everything in between into text runs. Newlines are invisible to
//! the scanner.

use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::types::{DocumentBuilder, Group, Token};

const SKIPS: &[char] = &['\n'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Keep(Token),
    Discard,
}

/// Every marker the scanner accepts, keyed by its normalised form (the name
/// with attributes removed).
const MARKERS: &[(&str, Marker)] = &[
    ("<i>", Marker::Keep(Token::Open(Group::Italic))),
    ("</i>", Marker::Keep(Token::Close(Group::Italic))),
    ("<b>", Marker::Keep(Token::Open(Group::Bold))),
    ("</b>", Marker::Keep(Token::Close(Group::Bold))),
    ("<br/>", Marker::Discard),
    ("<a>", Marker::Discard),
    ("</a>", Marker::Discard),
    ("<p>", Marker::Discard),
    ("</p>", Marker::Discard),
    ("<ul>", Marker::Discard),
    ("</ul>", Marker::Discard),
    ("<li>", Marker::Discard),
    ("</li>", Marker::Discard),
    ("<div>", Marker::Discard),
    ("</div>", Marker::Discard),
    ("<pre>", Marker::Discard),
    ("</pre>", Marker::Discard),
    ("<img>", Marker::Discard),
    ("</img>", Marker::Discard),
    ("<span>", Marker::Discard),
    ("</span>", Marker::Discard),
    ("<svg>", Marker::Discard),
    ("</svg>", Marker::Discard),
    ("<use>", Marker::Discard),
    ("</use>", Marker::Discard),
    ("<dl>", Marker::Discard),
    ("</dl>", Marker::Discard),
    ("<dd>", Marker::Discard),
    ("</dd>", Marker::Discard),
];

fn lookup(marker: &str) -> Option<Marker> {
    MARKERS
        .iter()
        .find(|(name, _)| *name == marker)
        .map(|(_, m)| *m)
}

/// Scan `html` and append its tokens and text runs to `out`.
pub fn parse_inline(html: &str, out: &mut DocumentBuilder) -> Result<(), ParseError> {
    let mut cur = Cursor::new(html, SKIPS);

    while let Some(c) = cur.peek() {
        if c == '<' {
            let offset = cur.position();
            let marker = read_marker(&mut cur).ok_or(ParseError::UnterminatedMarker { offset })?;
            match lookup(&marker) {
                Some(Marker::Keep(token)) => out.token(token),
                Some(Marker::Discard) => {}
                None => return Err(ParseError::UnrecognizedMarker { marker, offset }),
            }
        } else {
            let mut run = String::new();
            while let Some(c) = cur.peek() {
                if c == '<' {
                    break;
                }
                run.push(c);
                cur.advance();
            }
            out.text(run);
        }
    }

    Ok(())
}

/// Read a `<...>` marker starting at the cursor, dropping everything from the
/// first space up to the closing `>`. `<a href="x">` reads as `<a>`.
fn read_marker(cur: &mut Cursor<'_>) -> Option<String> {
    let mut name = String::new();
    let mut in_attrs = false;
    loop {
        match cur.advance()? {
            '>' => {
                name.push('>');
                return Some(name);
            }
            ' ' => in_attrs = true,
            c if !in_attrs => name.push(c),
            _ => {}
        }
    }
}
