//! Structural parser: parts, sections and subsections.
//!
//! The page is cut into blocks at each heading marker, level by level. Each
//! heading emits its title as a group, then hands the body to the content
//! parsers in [`crate::blocks`].

use std::ops::Range;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::blocks::{parse_dialogue, parse_mission, parse_narration};
use crate::dispatch::{self, Action};
use crate::error::ParseError;
use crate::types::{Document, DocumentBuilder, Group};

const PART_MARKER: &str = "<h2>";
const SECTION_MARKER: &str = "<h3>";
const SUBSECTION_MARKER: &str = "<h4>";
const TRIM_END_MARKER: &str = "<!--";

/// Section whose introduction is dialogue rather than narration.
const DIALOGUE_INTRO_SECTION: &str = "Opening Cinematic";

static PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<h2>.+?>(.+?)</span>.+?\n(<h3>.+)").unwrap());

static SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<h3>.+?">(.+?)</span>.+?</h3>\n(.+)"#).unwrap());

static SECTION_INTRO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)(.*?)\n(?:<h4>|\n?\z)").unwrap());

static SUBSECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<h4>.*?"mw-headline".+?">(.+?)</span>.+?</h4>\n(?:<div .*?>.+</div>)*(.*)"#)
        .unwrap()
});

/// Cut a freshly fetched page down to the quotation content: from the first
/// part heading up to the first HTML comment after it.
pub fn trim_page(raw: &str) -> Result<&str, ParseError> {
    let start = raw.find(PART_MARKER).ok_or(ParseError::TrimBoundary {
        marker: PART_MARKER,
    })?;
    let body_start = start + PART_MARKER.len();
    let len = raw[body_start..]
        .find(TRIM_END_MARKER)
        .ok_or(ParseError::TrimBoundary {
            marker: TRIM_END_MARKER,
        })?;
    Ok(&raw[start..body_start + len])
}

/// Parse trimmed page markup into a [`Document`].
pub fn parse(html: &str) -> Result<Document, ParseError> {
    let mut out = DocumentBuilder::new();
    for part in split_at_marker(html, PART_MARKER) {
        parse_part(part, &mut out)?;
    }
    debug!("parsed {} elements", out.len());
    Ok(out.finish())
}

pub(crate) fn parse_part(html: &str, out: &mut DocumentBuilder) -> Result<(), ParseError> {
    let caps = PART
        .captures(html)
        .ok_or_else(|| ParseError::structure("part heading", html))?;
    let title = &caps[1];
    debug!("part: {title}");

    out.wrapped(Group::Part, title);
    for section in split_at_marker(&caps[2], SECTION_MARKER) {
        parse_section(section, out)?;
    }
    Ok(())
}

pub(crate) fn parse_section(html: &str, out: &mut DocumentBuilder) -> Result<(), ParseError> {
    let caps = SECTION
        .captures(html)
        .ok_or_else(|| ParseError::structure("section heading", html))?;
    let title = &caps[1];
    let body = &caps[2];
    debug!("section: {title}");

    out.wrapped(Group::Section, title);

    let intro = SECTION_INTRO
        .captures(body)
        .ok_or_else(|| ParseError::structure("section introduction", body))?;
    if title == DIALOGUE_INTRO_SECTION {
        parse_dialogue(&intro[1], out)?;
    } else {
        parse_narration(&intro[1], out);
    }

    for subsection in split_at_marker(body, SUBSECTION_MARKER) {
        parse_subsection(subsection, out)?;
    }
    Ok(())
}

pub(crate) fn parse_subsection(html: &str, out: &mut DocumentBuilder) -> Result<(), ParseError> {
    let caps = SUBSECTION
        .captures(html)
        .ok_or_else(|| ParseError::structure("subsection heading", html))?;
    let raw_title = &caps[1];

    out.wrapped(Group::Subsection, dispatch::normalize_title(raw_title));

    let rule = dispatch::classify(raw_title)?;
    debug!("subsection: {raw_title} ({:?})", rule.action);
    let body = rule.patch(&caps[2]);
    match rule.action {
        Action::Mission => parse_mission(&body, out)?,
        Action::Dialogue => parse_dialogue(&body, out)?,
        Action::Narration => parse_narration(&body, out),
        Action::Skip => {}
    }
    Ok(())
}

/// Blocks of `text` that each start at an occurrence of `marker` and run to
/// the next one (or the end). Text before the first marker is dropped.
pub(crate) fn split_at_marker<'a>(text: &'a str, marker: &str) -> Vec<&'a str> {
    let heads: Vec<Range<usize>> = text
        .match_indices(marker)
        .map(|(i, m)| i..i + m.len())
        .collect();
    slice_blocks(text, &heads)
}

/// Slice `text` into blocks, one per head range, each running up to the
/// start of the next head. A head with nothing after it yields no block.
pub(crate) fn slice_blocks<'a>(text: &'a str, heads: &[Range<usize>]) -> Vec<&'a str> {
    heads
        .iter()
        .enumerate()
        .filter_map(|(i, head)| {
            let end = heads.get(i + 1).map_or(text.len(), |next| next.start);
            (end > head.end).then(|| &text[head.start..end])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Element, Token};
    use pretty_assertions::assert_eq;

    fn t(token: Token) -> Element {
        Element::Token(token)
    }

    fn s(text: &str) -> Element {
        Element::Text(text.into())
    }

    fn h3(title: &str) -> String {
        format!(
            "<h3><span class=\"mw-headline\" id=\"x\">{title}</span><span class=\"mw-editsection\">edit</span></h3>\n"
        )
    }

    fn h4(title: &str) -> String {
        format!(
            "<h4><span class=\"mw-headline\" id=\"x\">{title}</span><span class=\"mw-editsection\">edit</span></h4>\n"
        )
    }

    #[test]
    fn trim_page_keeps_content_between_markers() {
        let raw = "<html><body><p>nav</p><h2>Terran</h2>\n<p>q</p>\n<!-- NewPP -->tail";
        assert_eq!(trim_page(raw).unwrap(), "<h2>Terran</h2>\n<p>q</p>\n");
    }

    #[test]
    fn trim_page_missing_markers() {
        assert_eq!(
            trim_page("<p>no headings</p><!-- c -->").unwrap_err(),
            ParseError::TrimBoundary { marker: "<h2>" }
        );
        assert_eq!(
            trim_page("<!-- early --><h2>x</h2>").unwrap_err(),
            ParseError::TrimBoundary { marker: "<!--" }
        );
    }

    #[test]
    fn split_at_marker_drops_preamble_and_empty_heads() {
        assert_eq!(
            split_at_marker("junk<h3>a\n<h3>b<h3>", "<h3>"),
            vec!["<h3>a\n", "<h3>b"]
        );
        assert!(split_at_marker("nothing here", "<h3>").is_empty());
    }

    #[test]
    fn subsection_with_narration() {
        let html = format!("{}<p>The base falls.</p>\n<p>Silence.</p>\n", h4("Opening"));
        let mut b = DocumentBuilder::new();
        parse_subsection(&html, &mut b).unwrap();
        assert_eq!(
            b.finish().elements(),
            &[
                t(Token::Open(Group::Subsection)),
                s("Opening"),
                t(Token::Close(Group::Subsection)),
                s("The base falls."),
                t(Token::ExtraLineBreak),
                s("Silence."),
            ]
        );
    }

    #[test]
    fn subsection_skips_leading_divs() {
        let html = format!(
            "{}<div class=\"thumb\"><img src=\"a.png\"/></div><p><b>Zeratul</b>: Hold.</p>\n",
            h4("Introduction Movie")
        );
        let mut b = DocumentBuilder::new();
        parse_subsection(&html, &mut b).unwrap();
        let doc = b.finish();
        assert_eq!(doc.elements()[3], t(Token::Open(Group::Quote)));
        assert_eq!(doc.elements()[6], s("Zeratul"));
        assert!(doc.iter().filter_map(Element::as_text).all(|text| !text.contains("div")));
    }

    #[test]
    fn skipped_subsection_emits_only_heading() {
        let html = format!("{}<p><b>Fenix</b>: ...</p>\n", h4(r#"Cinematic: "The Fall of Fenix""#));
        let mut b = DocumentBuilder::new();
        parse_subsection(&html, &mut b).unwrap();
        assert_eq!(
            b.finish().elements(),
            &[
                t(Token::Open(Group::Subsection)),
                s("Cinematic: The Fall of Fenix"),
                t(Token::Close(Group::Subsection)),
            ]
        );
    }

    #[test]
    fn unknown_subsection_fails() {
        let html = format!("{}<p>x</p>\n", h4("Bonus Level"));
        let mut b = DocumentBuilder::new();
        assert_eq!(
            parse_subsection(&html, &mut b).unwrap_err(),
            ParseError::UnknownSubsection {
                title: "Bonus Level".into()
            }
        );
    }

    #[test]
    fn section_intro_as_narration() {
        let html = format!(
            "{}<p>Episode one.</p>\n{}<p>Dust.</p>\n",
            h3("Rebel Yell"),
            h4("Opening")
        );
        let mut b = DocumentBuilder::new();
        parse_section(&html, &mut b).unwrap();
        assert_eq!(
            b.finish().elements(),
            &[
                t(Token::Open(Group::Section)),
                s("Rebel Yell"),
                t(Token::Close(Group::Section)),
                s("Episode one."),
                t(Token::Open(Group::Subsection)),
                s("Opening"),
                t(Token::Close(Group::Subsection)),
                s("Dust."),
            ]
        );
    }

    #[test]
    fn opening_cinematic_intro_is_dialogue() {
        let html = format!(
            "{}<p><b>Narrator</b>: In the distant future.</p>\n",
            h3("Opening Cinematic")
        );
        let mut b = DocumentBuilder::new();
        parse_section(&html, &mut b).unwrap();
        let doc = b.finish();
        assert_eq!(doc.elements()[3], t(Token::Open(Group::Quote)));
        assert_eq!(doc.elements()[6], s("Narrator"));
        assert_eq!(doc.elements().last(), Some(&t(Token::Close(Group::Quote))));
    }

    #[test]
    fn part_without_sections_fails() {
        let mut b = DocumentBuilder::new();
        let err = parse_part("<h2><span>Lonely</span></h2>\n<p>no h3</p>", &mut b).unwrap_err();
        assert!(matches!(err, ParseError::Structure { expected: "part heading", .. }));
    }

    #[test]
    fn parse_empty_input() {
        assert!(parse("").unwrap().is_empty());
    }
}
