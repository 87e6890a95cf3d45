//! Content parsers for the bodies under a heading: dialogue, narration and
//! the mission layout (intro, context, briefing, in-mission blocks).
//!
//! Optional pieces (mission intro, context lines, in-mission blocks) are
//! skipped silently when their pattern is absent. The briefing is required.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;
use crate::inline::parse_inline;
use crate::types::{DocumentBuilder, Group, Token};

static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"<a .+?>|</a>").unwrap());

static LINK_OR_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<a .+?>|</a>|\n").unwrap());

static NARRATION_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<a .+?>|</a>|\n|<i>|</i>").unwrap());

static PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"<p>([\s\S]+?)</p>").unwrap());

/// `Speaker: utterance`, where the speaker is either bare or wrapped in a
/// run of list/emphasis markers, optionally preceded by paragraph markers.
static SPEAKER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:<(?:p|/p|ul)>)*(?:<(?:li|i|b)+>)+?)?(\w.+?)(?:(?:</.+?>)*?:|:(?:</.+?>)*?) ?(.+?)$",
    )
    .unwrap()
});

static MISSION_INTRO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(<p>[\s\S]+</p>)\n<ul><li><i>Briefing").unwrap());

static MISSION_CONTEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<p>((?:<i>.+</i><br/>\n)+)").unwrap());

static CONTEXT_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<i>(.+)</i><br/>").unwrap());

static BRIEFING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"((?:<.+>)*?<[i|b]>.+?</[i|b]>: .+?\n[\s\S]*?</p>\n)").unwrap()
});

static IN_MISSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<ul><li>(?:<i>)?During Mission[\s\S]*").unwrap());

static IN_MISSION_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"<ul>.+</ul>").unwrap());

static IN_MISSION_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<ul><li>(?:<i>)?(.+?)(?:</i>)?</li></ul>\n([\s\S]+)").unwrap()
});

// ------------------------------------------------------------------
// Dialogue and narration
// ------------------------------------------------------------------

/// Parse a block of dialogue lines into a quote group.
///
/// Each line is either `Speaker: utterance` (speaker set in bold italics) or
/// free inline markup. Lines are separated by extra line breaks and a block
/// never ends in one. An empty line is an error.
pub fn parse_dialogue(html: &str, out: &mut DocumentBuilder) -> Result<(), ParseError> {
    out.open(Group::Quote);

    let stripped = LINK.replace_all(html, "");
    for (i, line) in stripped.lines().enumerate() {
        if line.is_empty() {
            return Err(ParseError::EmptyDialogueLine { line: i + 1 });
        }
        if i != 0 {
            out.token(Token::ExtraLineBreak);
        }

        match SPEAKER_LINE.captures(line) {
            Some(caps) => {
                out.open(Group::Bold);
                out.wrapped(Group::Italic, &caps[1]);
                out.close(Group::Bold);
                out.text(": ");
                parse_inline(&caps[2], out)?;
            }
            None => parse_inline(line, out)?,
        }
    }

    out.drop_trailing_extra_breaks();
    out.close(Group::Quote);
    Ok(())
}

/// Parse descriptive paragraphs. Links, italics and newlines are dropped and
/// each `<p>` becomes one text run.
pub fn parse_narration(html: &str, out: &mut DocumentBuilder) {
    let stripped = NARRATION_NOISE.replace_all(html, "");
    push_paragraphs(&stripped, out);
}

fn push_paragraphs(html: &str, out: &mut DocumentBuilder) {
    for (i, caps) in PARAGRAPH.captures_iter(html).enumerate() {
        if i != 0 {
            out.token(Token::ExtraLineBreak);
        }
        out.text(&caps[1]);
    }
}

// ------------------------------------------------------------------
// Missions
// ------------------------------------------------------------------

/// Parse a mission body: optional intro paragraphs, a "Briefing" heading,
/// optional context lines, the briefing dialogue, then one labelled dialogue
/// block per in-mission section.
pub fn parse_mission(html: &str, out: &mut DocumentBuilder) -> Result<(), ParseError> {
    parse_intro(html, out);
    out.wrapped(Group::Subsubsection, "Briefing");
    parse_context(html, out);
    parse_briefing(html, out)?;
    parse_in_mission(html, out)
}

fn parse_intro(html: &str, out: &mut DocumentBuilder) {
    let Some(caps) = MISSION_INTRO.captures(html) else {
        return;
    };
    let stripped = LINK_OR_NEWLINE.replace_all(&caps[1], "");
    push_paragraphs(&stripped, out);
}

fn parse_context(html: &str, out: &mut DocumentBuilder) {
    let Some(caps) = MISSION_CONTEXT.captures(html) else {
        return;
    };
    let stripped = LINK.replace_all(&caps[1], "");
    for (i, line) in CONTEXT_LINE.captures_iter(&stripped).enumerate() {
        if i != 0 {
            out.token(Token::LineBreak);
        }
        out.wrapped(Group::Mono, &line[1]);
    }
}

fn parse_briefing(html: &str, out: &mut DocumentBuilder) -> Result<(), ParseError> {
    let caps = BRIEFING
        .captures(html)
        .ok_or_else(|| ParseError::structure("mission briefing", html))?;
    parse_dialogue(&caps[1], out)
}

fn parse_in_mission(html: &str, out: &mut DocumentBuilder) -> Result<(), ParseError> {
    let Some(rest) = IN_MISSION.find(html) else {
        return Ok(());
    };

    let headers: Vec<_> = IN_MISSION_HEADER
        .find_iter(rest.as_str())
        .map(|m| m.range())
        .collect();
    for block in crate::parse::slice_blocks(rest.as_str(), &headers) {
        let caps = IN_MISSION_BLOCK
            .captures(block)
            .ok_or_else(|| ParseError::structure("in-mission label", block))?;
        debug!("in-mission block: {}", &caps[1]);
        out.wrapped(Group::Subsubsection, &caps[1]);
        parse_dialogue(&caps[2], out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Element;
    use pretty_assertions::assert_eq;

    fn t(token: Token) -> Element {
        Element::Token(token)
    }

    fn s(text: &str) -> Element {
        Element::Text(text.into())
    }

    fn dialogue(html: &str) -> Result<Vec<Element>, ParseError> {
        let mut b = DocumentBuilder::new();
        parse_dialogue(html, &mut b)?;
        Ok(b.finish().elements().to_vec())
    }

    fn mission(html: &str) -> Result<Vec<Element>, ParseError> {
        let mut b = DocumentBuilder::new();
        parse_mission(html, &mut b)?;
        Ok(b.finish().elements().to_vec())
    }

    #[test]
    fn bare_speaker_line() {
        assert_eq!(
            dialogue("Kerrigan: Get to the extraction point!").unwrap(),
            vec![
                t(Token::Open(Group::Quote)),
                t(Token::Open(Group::Bold)),
                t(Token::Open(Group::Italic)),
                s("Kerrigan"),
                t(Token::Close(Group::Italic)),
                t(Token::Close(Group::Bold)),
                s(": "),
                s("Get to the extraction point!"),
                t(Token::Close(Group::Quote)),
            ]
        );
    }

    #[test]
    fn tagged_speaker_lines_with_links() {
        let html = "<p><b><a href=\"/wiki/Raynor\" title=\"Raynor\">Raynor</a></b>: Move out.\n<b>Duke</b>: Hold it!</p>";
        assert_eq!(
            dialogue(html).unwrap(),
            vec![
                t(Token::Open(Group::Quote)),
                t(Token::Open(Group::Bold)),
                t(Token::Open(Group::Italic)),
                s("Raynor"),
                t(Token::Close(Group::Italic)),
                t(Token::Close(Group::Bold)),
                s(": "),
                s("Move out."),
                t(Token::ExtraLineBreak),
                t(Token::Open(Group::Bold)),
                t(Token::Open(Group::Italic)),
                s("Duke"),
                t(Token::Close(Group::Italic)),
                t(Token::Close(Group::Bold)),
                s(": "),
                s("Hold it!"),
                t(Token::Close(Group::Quote)),
            ]
        );
    }

    #[test]
    fn unattributed_paragraph_markup_stays_unattributed() {
        assert_eq!(
            dialogue("<p>The hatch opens: silence.</p>").unwrap(),
            vec![
                t(Token::Open(Group::Quote)),
                s("The hatch opens: silence."),
                t(Token::Close(Group::Quote)),
            ]
        );
    }

    #[test]
    fn trailing_silent_line_leaves_no_break() {
        let out = dialogue("<p><i>Adjutant</i>: Online.\n</p>").unwrap();
        assert_eq!(out.last(), Some(&t(Token::Close(Group::Quote))));
        assert_ne!(out[out.len() - 2], t(Token::ExtraLineBreak));
    }

    #[test]
    fn empty_dialogue_line_is_rejected() {
        assert_eq!(
            dialogue("<p><b>Tassadar</b>: En taro Adun.\n\n</p>").unwrap_err(),
            ParseError::EmptyDialogueLine { line: 2 }
        );
    }

    #[test]
    fn narration_paragraphs() {
        let mut b = DocumentBuilder::new();
        parse_narration(
            "<p>The <a href=\"/wiki/Zerg\">Zerg</a> swarm\narrives.</p>\n<p><i>Aiur</i> burns.</p>",
            &mut b,
        );
        assert_eq!(
            b.finish().elements(),
            &[
                s("The Zerg swarmarrives."),
                t(Token::ExtraLineBreak),
                s("Aiur burns."),
            ]
        );
    }

    #[test]
    fn narration_without_paragraphs_is_empty() {
        let mut b = DocumentBuilder::new();
        parse_narration("no markup here", &mut b);
        assert!(b.is_empty());
    }

    #[test]
    fn mission_with_every_piece() {
        let html = concat!(
            "<p>The colony is <a href=\"/wiki/Mar_Sara\">under</a> attack.</p>\n",
            "<p>Hold the line.</p>\n",
            "<ul><li><i>Briefing</i></li></ul>\n",
            "<p><i>Mar Sara</i><br/>\n",
            "<i>Backwater Station</i><br/>\n",
            "</p>\n",
            "<p><b>Adjutant</b>: Welcome, Magistrate.\n",
            "<b>Raynor</b>: Howdy.\n",
            "</p>\n",
            "<ul><li><i>During Mission</i></li></ul>\n",
            "<p><b>Raynor</b>: Watch the ridge.</p>\n",
            "<ul><li><i>Victory</i></li></ul>\n",
            "<p><b>Adjutant</b>: Objective complete.</p>\n",
        );
        assert_eq!(
            mission(html).unwrap(),
            vec![
                s("The colony is under attack."),
                t(Token::ExtraLineBreak),
                s("Hold the line."),
                t(Token::Open(Group::Subsubsection)),
                s("Briefing"),
                t(Token::Close(Group::Subsubsection)),
                t(Token::Open(Group::Mono)),
                s("Mar Sara"),
                t(Token::Close(Group::Mono)),
                t(Token::LineBreak),
                t(Token::Open(Group::Mono)),
                s("Backwater Station"),
                t(Token::Close(Group::Mono)),
                t(Token::Open(Group::Quote)),
                t(Token::Open(Group::Bold)),
                t(Token::Open(Group::Italic)),
                s("Adjutant"),
                t(Token::Close(Group::Italic)),
                t(Token::Close(Group::Bold)),
                s(": "),
                s("Welcome, Magistrate."),
                t(Token::ExtraLineBreak),
                t(Token::Open(Group::Bold)),
                t(Token::Open(Group::Italic)),
                s("Raynor"),
                t(Token::Close(Group::Italic)),
                t(Token::Close(Group::Bold)),
                s(": "),
                s("Howdy."),
                t(Token::Close(Group::Quote)),
                t(Token::Open(Group::Subsubsection)),
                s("During Mission"),
                t(Token::Close(Group::Subsubsection)),
                t(Token::Open(Group::Quote)),
                t(Token::Open(Group::Bold)),
                t(Token::Open(Group::Italic)),
                s("Raynor"),
                t(Token::Close(Group::Italic)),
                t(Token::Close(Group::Bold)),
                s(": "),
                s("Watch the ridge."),
                t(Token::Close(Group::Quote)),
                t(Token::Open(Group::Subsubsection)),
                s("Victory"),
                t(Token::Close(Group::Subsubsection)),
                t(Token::Open(Group::Quote)),
                t(Token::Open(Group::Bold)),
                t(Token::Open(Group::Italic)),
                s("Adjutant"),
                t(Token::Close(Group::Italic)),
                t(Token::Close(Group::Bold)),
                s(": "),
                s("Objective complete."),
                t(Token::Close(Group::Quote)),
            ]
        );
    }

    #[test]
    fn mission_without_briefing_fails() {
        let err = mission("<p>Only narration here.</p>\n").unwrap_err();
        assert!(
            matches!(err, ParseError::Structure { expected: "mission briefing", .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn mission_with_only_briefing() {
        let out = mission("<p><b>Fenix</b>: For Aiur!\n</p>\n").unwrap();
        assert_eq!(out[0], t(Token::Open(Group::Subsubsection)));
        assert_eq!(out[3], t(Token::Open(Group::Quote)));
        assert_eq!(out.last(), Some(&t(Token::Close(Group::Quote))));
    }
}
