//! Reader for the `.paths` story format.
//!
//! ```text
//! <story title>
//!
//! ::<opening passage title>
//! <content>
//! [<link text>](<link ref>)
//! {H:-10,I:Sword}
//!
//! ::<passage title>
//! ...
//! ```
//!
//! Optional `@mood <MOOD>` and `@single-visit` lines may sit between a
//! header and its content line.

use std::sync::LazyLock;

use log::{debug, info};
use paths_data::{Action, Link, Mood, Passage, Story, TagError, ValidationError};
use regex::Regex;

static LINK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(?P<text>.+)\]\((?P<reference>.+)\)$").expect("link pattern is valid"));

pub(crate) const HEADER_PREFIX: &str = "::";
pub(crate) const MOOD_ATTRIBUTE: &str = "@mood ";
pub(crate) const SINGLE_VISIT_ATTRIBUTE: &str = "@single-visit";

/// Errors that can happen while reading `.paths` input. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: missing story title")]
    MissingTitle { line: usize },
    #[error("line {line}: story has no opening passage")]
    MissingOpening { line: usize },
    #[error("line {line}: passage '{title}' is missing its content line")]
    MissingContent { line: usize, title: String },
    #[error("line {line}: {reason}: {found:?}")]
    Malformed {
        line: usize,
        found: String,
        reason: &'static str,
    },
    #[error("line {line}: {source}")]
    Action { line: usize, source: TagError },
    #[error("line {line}: {source}")]
    Invalid { line: usize, source: ValidationError },
    #[error("line {line}: passage '{title}' is defined more than once")]
    DuplicatePassage { line: usize, title: String },
}

impl ParseError {
    /// The 1-based line the error points at.
    pub fn line(&self) -> usize {
        match self {
            ParseError::MissingTitle { line }
            | ParseError::MissingOpening { line }
            | ParseError::MissingContent { line, .. }
            | ParseError::Malformed { line, .. }
            | ParseError::Action { line, .. }
            | ParseError::Invalid { line, .. }
            | ParseError::DuplicatePassage { line, .. } => *line,
        }
    }
}

/// Line cursor over the input. Positions are 0-based; reported lines are 1-based.
struct Lines<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(source: &'a str) -> Self {
        Lines {
            lines: source.lines().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let line = self.peek()?;
        self.pos += 1;
        Some((self.pos, line))
    }

    /// Line number the next call to `next_line` would report.
    fn line_no(&self) -> usize {
        self.pos + 1
    }

    fn skip_blank(&mut self) {
        while self.peek().is_some_and(is_blank) {
            self.pos += 1;
        }
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Parse a complete story.
///
/// # Errors
/// - if the input does not follow the `.paths` grammar or builds an invalid entity
pub fn parse_story(source: &str) -> Result<Story, ParseError> {
    let mut lines = Lines::new(source);

    let title = match lines.next_line() {
        Some((_, line)) if !is_blank(line) => line,
        _ => return Err(ParseError::MissingTitle { line: 1 }),
    };
    match lines.next_line() {
        Some((_, line)) if is_blank(line) => {},
        Some((line, found)) => {
            return Err(ParseError::Malformed {
                line,
                found: found.to_string(),
                reason: "expected a blank line after the story title",
            });
        },
        None => return Err(ParseError::MissingOpening { line: 2 }),
    }

    lines.skip_blank();
    if lines.peek().is_none() {
        return Err(ParseError::MissingOpening { line: lines.line_no() });
    }
    let (_, opening) = parse_passage(&mut lines)?;
    let mut story = Story::new(title, opening).map_err(|source| ParseError::Invalid { line: 1, source })?;

    loop {
        lines.skip_blank();
        if lines.peek().is_none() {
            break;
        }
        let (header_line, passage) = parse_passage(&mut lines)?;
        let title = passage.title().to_string();
        if !story.add_passage(passage) {
            return Err(ParseError::DuplicatePassage {
                line: header_line,
                title,
            });
        }
    }

    info!("parsed story '{}' with {} passage(s)", story.title(), story.len());
    Ok(story)
}

/// Parse one passage block, returning the header line number and the passage.
fn parse_passage(lines: &mut Lines<'_>) -> Result<(usize, Passage), ParseError> {
    let (header_line, header) = lines
        .next_line()
        .ok_or(ParseError::MissingOpening { line: lines.line_no() })?;
    let title = header.strip_prefix(HEADER_PREFIX).ok_or_else(|| ParseError::Malformed {
        line: header_line,
        found: header.to_string(),
        reason: "expected a passage header starting with '::'",
    })?;

    let mut mood = Mood::None;
    let mut single_visit = false;
    while let Some(line) = lines.peek() {
        if let Some(key) = line.strip_prefix(MOOD_ATTRIBUTE) {
            let line_no = lines.line_no();
            lines.next_line();
            mood = Mood::from_key(key.trim()).ok_or_else(|| ParseError::Malformed {
                line: line_no,
                found: line.to_string(),
                reason: "unknown mood",
            })?;
        } else if line.trim_end() == SINGLE_VISIT_ATTRIBUTE {
            lines.next_line();
            single_visit = true;
        } else {
            break;
        }
    }

    let content = match lines.peek() {
        Some(line) if !is_blank(line) && !line.starts_with(HEADER_PREFIX) => {
            lines.next_line();
            line
        },
        _ => {
            return Err(ParseError::MissingContent {
                line: header_line,
                title: title.to_string(),
            });
        },
    };

    let mut passage = Passage::new(title, content).map_err(|source| ParseError::Invalid {
        line: header_line,
        source,
    })?;
    passage.set_mood(mood);
    passage.set_single_visit_only(single_visit);

    // the link waiting for its optional action line
    let mut pending: Option<PendingLink> = None;
    while let Some(line) = lines.peek() {
        if is_blank(line) || line.starts_with(HEADER_PREFIX) {
            break;
        }
        let line_no = lines.line_no();
        lines.next_line();
        if line.trim_start().starts_with('{') {
            let link = pending.as_mut().ok_or_else(|| ParseError::Malformed {
                line: line_no,
                found: line.to_string(),
                reason: "action line without a preceding link",
            })?;
            if link.has_action_line {
                return Err(ParseError::Malformed {
                    line: line_no,
                    found: line.to_string(),
                    reason: "a link takes at most one action line",
                });
            }
            let actions = parse_actions(line_no, line)?;
            debug!("line {line_no}: {} action(s) for [{}]", actions.len(), link.link.text());
            for action in actions {
                link.link.add_action(action);
            }
            link.has_action_line = true;
        } else {
            if let Some(done) = pending.take() {
                done.attach(&mut passage)?;
            }
            pending = Some(PendingLink {
                line: line_no,
                link: parse_link(line_no, line)?,
                has_action_line: false,
            });
        }
    }
    if let Some(done) = pending.take() {
        done.attach(&mut passage)?;
    }

    Ok((header_line, passage))
}

struct PendingLink {
    line: usize,
    link: Link,
    has_action_line: bool,
}

impl PendingLink {
    fn attach(self, passage: &mut Passage) -> Result<(), ParseError> {
        passage
            .add_link(self.link)
            .map_err(|source| ParseError::Invalid { line: self.line, source })
    }
}

/// Parse a `[text](ref)` line.
fn parse_link(line_no: usize, line: &str) -> Result<Link, ParseError> {
    let caps = LINK_LINE.captures(line.trim_end()).ok_or_else(|| ParseError::Malformed {
        line: line_no,
        found: line.to_string(),
        reason: "expected a link of the form [text](ref)",
    })?;
    Link::new(&caps["text"], &caps["reference"]).map_err(|source| ParseError::Invalid { line: line_no, source })
}

/// Parse a `{H:-10,I:Sword}` line. `{}` is an empty action list.
fn parse_actions(line_no: usize, line: &str) -> Result<Vec<Action>, ParseError> {
    let inner = line
        .trim()
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| ParseError::Malformed {
            line: line_no,
            found: line.to_string(),
            reason: "action line must be wrapped in '{' and '}'",
        })?;
    inner
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| Action::from_short_form(token).map_err(|source| ParseError::Action { line: line_no, source }))
        .collect()
}

#[cfg(test)]
mod tests {
    use paths_data::LinkKey;

    use super::*;

    const DEMO: &str = "Demo\n\n::Start\nBegin\n[Go north](Forest)\n{H:-10}\n\n::Forest\nTrees\n\n";

    #[test]
    fn parses_minimal_story() {
        let story = parse_story(DEMO).unwrap();
        assert_eq!(story.title(), "Demo");
        let start = story.opening_passage();
        assert_eq!(start.title(), "Start");
        assert_eq!(start.content(), "Begin");
        assert_eq!(start.links()[0].actions(), [Action::Health(-10)]);
        assert_eq!(story.passage_by_title("Forest").unwrap().content(), "Trees");
    }

    #[test]
    fn accepts_crlf_and_missing_trailing_blank() {
        let source = DEMO.replace('\n', "\r\n");
        let story = parse_story(source.trim_end()).unwrap();
        assert_eq!(story.len(), 2);
    }

    #[test]
    fn link_without_action_line_has_no_actions() {
        let story = parse_story("T\n\n::A\nText\n[One](B)\n[Two](C)\n{G:5}\n").unwrap();
        let links = story.opening_passage().links();
        assert!(links[0].actions().is_empty());
        assert_eq!(links[1].actions(), [Action::Gold(5)]);
    }

    #[test]
    fn attributes_are_read() {
        let story = parse_story("T\n\n::A\n@mood dark\n@single-visit\nText\n").unwrap();
        let a = story.opening_passage();
        assert_eq!(a.mood(), Mood::Dark);
        assert!(a.is_single_visit_only());
    }

    #[test]
    fn malformed_link_reports_line() {
        let err = parse_story("T\n\n::A\nText\n[Broken(B)\n").unwrap_err();
        assert_eq!(err.line(), 5);
        assert!(matches!(err, ParseError::Malformed { .. }));
    }

    #[test]
    fn header_without_content_is_an_error() {
        let err = parse_story("T\n\n::A\n\n::B\nText\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingContent {
                line: 3,
                title: "A".into()
            }
        );
    }

    #[test]
    fn orphan_action_line_is_an_error() {
        let err = parse_story("T\n\n::A\nText\n{H:1}\n").unwrap_err();
        assert_eq!(err.line(), 5);
    }

    #[test]
    fn unknown_action_tag_is_named() {
        let err = parse_story("T\n\n::A\nText\n[Go](B)\n{X:1}\n").unwrap_err();
        assert!(err.to_string().contains("'X'"), "{err}");
        assert_eq!(err.line(), 6);
    }

    #[test]
    fn duplicate_passage_is_an_error() {
        let err = parse_story("T\n\n::A\nText\n\n::B\nOne\n\n::B\nTwo\n").unwrap_err();
        assert!(matches!(err, ParseError::DuplicatePassage { line: 9, .. }));
    }

    #[test]
    fn duplicate_link_is_a_validation_error() {
        let err = parse_story("T\n\n::A\nText\n[Go](B)\n[Go](B)\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Invalid {
                line: 6,
                source: ValidationError::DuplicateLink { .. }
            }
        ));
    }

    #[test]
    fn header_ends_link_block() {
        let story = parse_story("T\n\n::A\nText\n[Go](B)\n::B\nMore\n").unwrap();
        assert!(story.opening_passage().has_link(&LinkKey::new("Go", "B")));
        assert!(story.contains_title("B"));
    }

    #[test]
    fn empty_input_is_missing_title() {
        assert_eq!(parse_story(""), Err(ParseError::MissingTitle { line: 1 }));
        assert_eq!(parse_story("Title\n"), Err(ParseError::MissingOpening { line: 2 }));
    }
}
