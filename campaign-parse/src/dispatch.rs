//! Subsection dispatch table.
//!
//! Every `<h4>` heading on the page is matched, in order, against [`RULES`].
//! The first matching rule decides how the body is parsed and which one-off
//! corrections are applied to it first. A title with no rule is an error:
//! the table covers every heading the page has.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;

/// How a subsection body is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Mission,
    Dialogue,
    Narration,
    /// Body intentionally left out of the output.
    Skip,
}

#[derive(Debug)]
pub enum TitleMatch {
    /// Unanchored search against the raw title.
    Pattern(Regex),
    /// Exact comparison with the raw title.
    Literal(&'static str),
}

impl TitleMatch {
    pub fn matches(&self, title: &str) -> bool {
        match self {
            TitleMatch::Pattern(re) => re.is_match(title),
            TitleMatch::Literal(s) => *s == title,
        }
    }
}

/// A textual correction applied to a subsection body before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch {
    /// Replace every occurrence.
    Replace {
        from: &'static str,
        to: &'static str,
    },
    /// Replace the first occurrence only.
    ReplaceFirst {
        from: &'static str,
        to: &'static str,
    },
}

impl Patch {
    pub fn apply(self, body: &str) -> String {
        match self {
            Patch::Replace { from, to } => body.replace(from, to),
            Patch::ReplaceFirst { from, to } => body.replacen(from, to, 1),
        }
    }
}

#[derive(Debug)]
pub struct Rule {
    pub title: TitleMatch,
    pub action: Action,
    pub patches: &'static [Patch],
}

impl Rule {
    fn literal(title: &'static str, action: Action, patches: &'static [Patch]) -> Self {
        Rule {
            title: TitleMatch::Literal(title),
            action,
            patches,
        }
    }

    /// Apply this rule's corrections to `body`, in order.
    pub fn patch<'a>(&self, body: &'a str) -> Cow<'a, str> {
        self.patches
            .iter()
            .fold(Cow::Borrowed(body), |acc, p| Cow::Owned(p.apply(&acc)))
    }
}

const MISSION_FIXES: &[Patch] = &[Patch::Replace {
    from: "During Mision",
    to: "During Mission",
}];

const JOIN_FIRST_LINE: Patch = Patch::ReplaceFirst {
    from: "\n",
    to: " ",
};

const INAUGURATION_FIXES: &[Patch] = &[JOIN_FIRST_LINE];

const VICTORY_REPORT_FIXES: &[Patch] = &[
    JOIN_FIRST_LINE,
    Patch::Replace {
        from: "<dd></dd>\n",
        to: "",
    },
];

const ASCENSION_FIXES: &[Patch] = &[Patch::Replace {
    from: "<br/>By now",
    to: " By now",
}];

/// The ordered dispatch table.
pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    use Action::*;

    vec![
        Rule {
            title: TitleMatch::Pattern(
                Regex::new(r#"Mission [\d\.]+: .+|Tutorial: "Boot Camp"|Cut Mission: .+"#)
                    .unwrap(),
            ),
            action: Mission,
            patches: MISSION_FIXES,
        },
        Rule::literal("Introduction Movie", Dialogue, &[]),
        Rule::literal("Opening", Narration, &[]),
        Rule::literal("Cinematic - Wasteland Patrol", Narration, &[]),
        Rule::literal("Cinematic - Norad II's Downfall", Narration, &[]),
        Rule::literal(r#"Cinematic: "The Dream""#, Dialogue, &[]),
        Rule::literal(r#"Cinematic: "Battle on the Amerigo""#, Dialogue, &[]),
        Rule::literal(r#"Cinematic: "The Warp""#, Dialogue, &[]),
        Rule::literal(r#"Cinematic: "The Invasion of Aiur""#, Dialogue, &[]),
        Rule::literal(r#"Cinematic: "The Ambush""#, Dialogue, &[]),
        Rule::literal("Cinematic - The Inauguration", Dialogue, INAUGURATION_FIXES),
        Rule::literal("Cinematic - Open Rebellion", Dialogue, &[]),
        Rule::literal(r#"Cinematic: "UED Victory Report""#, Dialogue, VICTORY_REPORT_FIXES),
        Rule::literal(r#"Ending Cinematic: "The Ascension""#, Dialogue, ASCENSION_FIXES),
        Rule::literal(r#"Cinematic: "The Fall of Fenix""#, Skip, &[]),
        Rule::literal(r#"Cinematic: "The Return to Aiur""#, Skip, &[]),
        Rule::literal(r#"Cinematic: "The Death of the Overmind""#, Skip, &[]),
        Rule::literal(r#"Cinematic: "Fury of the Xel'Naga""#, Skip, &[]),
    ]
});

/// Find the first rule matching the raw subsection title.
pub fn classify(title: &str) -> Result<&'static Rule, ParseError> {
    RULES
        .iter()
        .find(|rule| rule.title.matches(title))
        .ok_or_else(|| ParseError::UnknownSubsection {
            title: title.to_string(),
        })
}

static LABELLED_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(.+?)[:-] ?"?(.+?)"?$"#).unwrap());

/// Rewrite `Label: "Quote"` and `Label - Quote` titles to `Label: Quote`.
/// Titles without a separator are returned unchanged.
pub fn normalize_title(raw: &str) -> Cow<'_, str> {
    match LABELLED_TITLE.captures(raw) {
        Some(caps) => Cow::Owned(format!("{}: {}", &caps[1], &caps[2])),
        None => Cow::Borrowed(raw),
    }
}
