//! Writer for the `.paths` story format.

use std::fmt;

use paths_data::{Link, Mood, Passage, Story};

use crate::reader::{HEADER_PREFIX, MOOD_ATTRIBUTE, SINGLE_VISIT_ATTRIBUTE};

/// Display adapter rendering a story as a `.paths` document.
///
/// Every passage block, including the last, is followed by a blank line.
pub struct PathsDocument<'a> {
    story: &'a Story,
    with_extras: bool,
}

impl<'a> PathsDocument<'a> {
    pub fn new(story: &'a Story) -> Self {
        PathsDocument {
            story,
            with_extras: true,
        }
    }

    /// Render only titles, content and links: no attribute or action lines.
    pub(crate) fn plain(story: &'a Story) -> Self {
        PathsDocument {
            story,
            with_extras: false,
        }
    }

    fn write_passage(&self, f: &mut fmt::Formatter<'_>, passage: &Passage) -> fmt::Result {
        writeln!(f, "{HEADER_PREFIX}{}", passage.title())?;
        if self.with_extras {
            if passage.mood() != Mood::None {
                writeln!(f, "{MOOD_ATTRIBUTE}{}", passage.mood())?;
            }
            if passage.is_single_visit_only() {
                writeln!(f, "{SINGLE_VISIT_ATTRIBUTE}")?;
            }
        }
        writeln!(f, "{}", passage.content())?;
        for link in passage.links() {
            self.write_link(f, link)?;
        }
        writeln!(f)
    }

    fn write_link(&self, f: &mut fmt::Formatter<'_>, link: &Link) -> fmt::Result {
        writeln!(f, "[{}]({})", link.text(), link.reference())?;
        if self.with_extras && !link.actions().is_empty() {
            let actions: Vec<String> = link.actions().iter().map(ToString::to_string).collect();
            writeln!(f, "{{{}}}", actions.join(","))?;
        }
        Ok(())
    }
}

impl fmt::Display for PathsDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.story.title())?;
        writeln!(f)?;
        for passage in self.story.all_passages() {
            self.write_passage(f, passage)?;
        }
        Ok(())
    }
}

/// Render `story` as `.paths` text.
pub fn write_story(story: &Story) -> String {
    PathsDocument::new(story).to_string()
}
