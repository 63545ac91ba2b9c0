//! Passages: the nodes of a story graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::limits::{PASSAGE_TITLE_LEN, check_content, check_text};
use crate::{Link, LinkKey, ValidationError};

/// Presentation hint for a passage. Has no effect on play.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mood {
    #[default]
    None,
    Calm,
    Happy,
    Sad,
    Tense,
    Dark,
}

impl Mood {
    pub const ALL: [Mood; 6] = [Mood::None, Mood::Calm, Mood::Happy, Mood::Sad, Mood::Tense, Mood::Dark];

    pub fn as_key(self) -> &'static str {
        match self {
            Mood::None => "NONE",
            Mood::Calm => "CALM",
            Mood::Happy => "HAPPY",
            Mood::Sad => "SAD",
            Mood::Tense => "TENSE",
            Mood::Dark => "DARK",
        }
    }

    /// Case-insensitive lookup by key.
    pub fn from_key(key: &str) -> Option<Mood> {
        Mood::ALL.into_iter().find(|mood| mood.as_key().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// One screen of narrative text plus its outgoing choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPassage", into = "RawPassage")]
pub struct Passage {
    title: String,
    content: String,
    mood: Mood,
    single_visit_only: bool,
    links: Vec<Link>,
}

impl Passage {
    /// # Errors
    /// - if the title or content is out of bounds, or the content starts with
    ///   `::` or `@`
    pub fn new(title: &str, content: &str) -> Result<Passage, ValidationError> {
        check_text("passage title", title, &PASSAGE_TITLE_LEN)?;
        check_content("passage content", content)?;
        Ok(Passage {
            title: title.to_string(),
            content: content.to_string(),
            mood: Mood::None,
            single_visit_only: false,
            links: Vec::new(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// # Errors
    /// - if the new content is out of bounds or starts with `::` or `@`
    pub fn set_content(&mut self, content: &str) -> Result<(), ValidationError> {
        check_content("passage content", content)?;
        self.content = content.to_string();
        Ok(())
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
    }

    pub fn is_single_visit_only(&self) -> bool {
        self.single_visit_only
    }

    pub fn set_single_visit_only(&mut self, single_visit_only: bool) {
        self.single_visit_only = single_visit_only;
    }

    /// Outgoing links in display order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn has_links(&self) -> bool {
        !self.links.is_empty()
    }

    pub fn has_link(&self, key: &LinkKey) -> bool {
        self.links.iter().any(|link| link.key() == key)
    }

    pub fn link(&self, key: &LinkKey) -> Option<&Link> {
        self.links.iter().find(|link| link.key() == key)
    }

    /// Append a link.
    ///
    /// # Errors
    /// - if a link with the same text and reference is already present
    pub fn add_link(&mut self, link: Link) -> Result<(), ValidationError> {
        if self.has_link(link.key()) {
            return Err(ValidationError::DuplicateLink {
                text: link.text().to_string(),
                reference: link.reference().to_string(),
            });
        }
        self.links.push(link);
        Ok(())
    }

    /// Remove every link pointing at `title`; returns how many were removed.
    pub fn remove_links_to(&mut self, title: &str) -> usize {
        let before = self.links.len();
        self.links.retain(|link| link.reference() != title);
        before - self.links.len()
    }

    /// Field-by-field comparison including every link's action list.
    pub fn is_identical(&self, other: &Passage) -> bool {
        self == other
            && self
                .links
                .iter()
                .zip(&other.links)
                .all(|(a, b)| a.is_identical(b))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawPassage {
    title: String,
    content: String,
    #[serde(default)]
    mood: Mood,
    #[serde(default)]
    single_visit_only: bool,
    #[serde(default)]
    links: Vec<Link>,
}

impl TryFrom<RawPassage> for Passage {
    type Error = ValidationError;

    fn try_from(raw: RawPassage) -> Result<Self, Self::Error> {
        let mut passage = Passage::new(&raw.title, &raw.content)?;
        passage.mood = raw.mood;
        passage.single_visit_only = raw.single_visit_only;
        for link in raw.links {
            passage.add_link(link)?;
        }
        Ok(passage)
    }
}

impl From<Passage> for RawPassage {
    fn from(passage: Passage) -> Self {
        RawPassage {
            title: passage.title,
            content: passage.content,
            mood: passage.mood,
            single_visit_only: passage.single_visit_only,
            links: passage.links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Action;

    #[test]
    fn duplicate_link_is_an_error() {
        let mut passage = Passage::new("Start", "Begin").unwrap();
        passage.add_link(Link::new("Go north", "Forest").unwrap()).unwrap();
        let dup = Link::new("Go north", "Forest")
            .unwrap()
            .with_actions(vec![Action::Gold(1)]);
        assert!(matches!(
            passage.add_link(dup),
            Err(ValidationError::DuplicateLink { .. })
        ));
        assert_eq!(passage.links().len(), 1);
    }

    #[test]
    fn remove_links_to_only_strips_matching_targets() {
        let mut passage = Passage::new("Start", "Begin").unwrap();
        passage.add_link(Link::new("North", "Forest").unwrap()).unwrap();
        passage.add_link(Link::new("South", "Beach").unwrap()).unwrap();
        passage.add_link(Link::new("Run", "Forest").unwrap()).unwrap();
        assert_eq!(passage.remove_links_to("Forest"), 2);
        assert_eq!(passage.links().len(), 1);
        assert_eq!(passage.links()[0].reference(), "Beach");
    }

    #[test]
    fn content_bounds_are_checked_on_edit() {
        let mut passage = Passage::new("Start", "Begin").unwrap();
        assert!(passage.set_content(&"x".repeat(401)).is_err());
        assert_eq!(passage.content(), "Begin");
        passage.set_content("Later").unwrap();
        assert_eq!(passage.content(), "Later");
    }

    #[test]
    fn content_may_not_look_like_a_header_or_attribute() {
        assert!(matches!(
            Passage::new("A", "::whispers::"),
            Err(ValidationError::ReservedPrefix { prefix: "::", .. })
        ));
        let mut passage = Passage::new("A", "Quiet").unwrap();
        assert!(passage.set_content("@single-visit").is_err());
        assert_eq!(passage.content(), "Quiet");
        let err = serde_json::from_str::<Passage>(r#"{"title":"A","content":"@mood swings"}"#).unwrap_err();
        assert!(err.to_string().contains("must not start with"), "{err}");
    }

    #[test]
    fn mood_keys_are_case_insensitive() {
        assert_eq!(Mood::from_key("tense"), Some(Mood::Tense));
        assert_eq!(Mood::from_key("nope"), None);
    }

    #[test]
    fn json_defaults_optional_fields() {
        let passage: Passage = serde_json::from_str(r#"{"title":"Forest","content":"Trees"}"#).unwrap();
        assert_eq!(passage.mood(), Mood::None);
        assert!(!passage.is_single_visit_only());
        assert!(passage.links().is_empty());

        let err = serde_json::from_str::<Passage>(r#"{"title":"Forest"}"#).unwrap_err();
        assert!(err.to_string().contains("content"), "{err}");
    }
}
