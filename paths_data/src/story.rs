//! Story -- the passage graph.

use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::limits::{STORY_TITLE_LEN, check_text};
use crate::{LinkKey, Passage, ValidationError};

/// A titled graph of passages with one distinguished opening passage.
///
/// The opening passage is held apart from the map; both share one title
/// namespace. Stored passages are keyed by their synthetic self-key
/// ([`LinkKey::to_passage`]), which keeps them in title order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStory", into = "RawStory")]
pub struct Story {
    title: String,
    opening_passage: Passage,
    passages: BTreeMap<LinkKey, Passage>,
}

impl Story {
    /// # Errors
    /// - if the title is out of bounds
    pub fn new(title: &str, opening_passage: Passage) -> Result<Story, ValidationError> {
        check_text("story title", title, &STORY_TITLE_LEN)?;
        Ok(Story {
            title: title.to_string(),
            opening_passage,
            passages: BTreeMap::new(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn opening_passage(&self) -> &Passage {
        &self.opening_passage
    }

    pub fn opening_passage_mut(&mut self) -> &mut Passage {
        &mut self.opening_passage
    }

    /// Returns true if `title` names the opening passage or a stored passage.
    pub fn contains_title(&self, title: &str) -> bool {
        self.opening_passage.title() == title || self.passages.contains_key(&LinkKey::to_passage(title))
    }

    /// Store a passage. Returns `false`, leaving the story untouched, if the
    /// title is already taken (including by the opening passage).
    pub fn add_passage(&mut self, passage: Passage) -> bool {
        if self.contains_title(passage.title()) {
            warn!(
                "story '{}': passage '{}' already exists, not added",
                self.title,
                passage.title()
            );
            return false;
        }
        self.passages.insert(LinkKey::to_passage(passage.title()), passage);
        true
    }

    /// Look up a stored passage by key. The opening passage is not in the map.
    pub fn passage(&self, key: &LinkKey) -> Option<&Passage> {
        self.passages.get(key)
    }

    /// Look up any passage, opening included, by title.
    pub fn passage_by_title(&self, title: &str) -> Option<&Passage> {
        if self.opening_passage.title() == title {
            Some(&self.opening_passage)
        } else {
            self.passages.get(&LinkKey::to_passage(title))
        }
    }

    /// Mutable access to any passage, opening included, by title.
    pub fn passage_mut(&mut self, title: &str) -> Option<&mut Passage> {
        if self.opening_passage.title() == title {
            Some(&mut self.opening_passage)
        } else {
            self.passages.get_mut(&LinkKey::to_passage(title))
        }
    }

    /// Stored passages (opening excluded), in title order.
    pub fn passages(&self) -> impl Iterator<Item = &Passage> {
        self.passages.values()
    }

    /// Every passage, opening first.
    pub fn all_passages(&self) -> impl Iterator<Item = &Passage> {
        std::iter::once(&self.opening_passage).chain(self.passages.values())
    }

    pub(crate) fn all_passages_mut(&mut self) -> impl Iterator<Item = &mut Passage> {
        std::iter::once(&mut self.opening_passage).chain(self.passages.values_mut())
    }

    /// Number of passages, opening included.
    pub fn len(&self) -> usize {
        self.passages.len() + 1
    }

    /// A story always holds its opening passage.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Remove a stored passage.
    ///
    /// Refuses (returns `false`) to remove the opening passage, a passage that
    /// is not stored, or a passage that another passage still links to. Run
    /// [`crate::remove_all_links_to_passage`] first to cascade.
    pub fn remove_passage(&mut self, key: &LinkKey) -> bool {
        let title = key.reference.as_str();
        if title == self.opening_passage.title() {
            warn!("story '{}': refusing to remove the opening passage", self.title);
            return false;
        }
        if !self.passages.contains_key(key) {
            return false;
        }
        let referenced = self
            .all_passages()
            .filter(|passage| passage.title() != title)
            .flat_map(Passage::links)
            .any(|link| link.reference() == title);
        if referenced {
            warn!(
                "story '{}': passage '{title}' is still linked to, not removed",
                self.title
            );
            return false;
        }
        self.passages.remove(key);
        info!("story '{}': removed passage '{title}'", self.title);
        true
    }

    /// Field-by-field comparison including every link's action list.
    pub fn is_identical(&self, other: &Story) -> bool {
        self.title == other.title
            && self.opening_passage.is_identical(&other.opening_passage)
            && self.passages.len() == other.passages.len()
            && self
                .passages
                .iter()
                .all(|(key, passage)| other.passages.get(key).is_some_and(|p| passage.is_identical(p)))
    }
}

/// Serialized shape: stored passages keyed by their own title.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawStory {
    title: String,
    opening_passage: Passage,
    #[serde(default)]
    passages: BTreeMap<String, Passage>,
}

impl TryFrom<RawStory> for Story {
    type Error = ValidationError;

    fn try_from(raw: RawStory) -> Result<Self, Self::Error> {
        let mut story = Story::new(&raw.title, raw.opening_passage)?;
        for (key, passage) in raw.passages {
            if key != passage.title() {
                return Err(ValidationError::PassageKeyMismatch {
                    key,
                    title: passage.title().to_string(),
                });
            }
            if !story.add_passage(passage) {
                return Err(ValidationError::DuplicatePassage { title: key });
            }
        }
        Ok(story)
    }
}

impl From<Story> for RawStory {
    fn from(story: Story) -> Self {
        RawStory {
            title: story.title,
            opening_passage: story.opening_passage,
            passages: story
                .passages
                .into_values()
                .map(|passage| (passage.title().to_string(), passage))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Link;

    fn demo() -> Story {
        let mut start = Passage::new("Start", "Begin").unwrap();
        start.add_link(Link::new("Go north", "Forest").unwrap()).unwrap();
        let mut story = Story::new("Demo", start).unwrap();
        assert!(story.add_passage(Passage::new("Forest", "Trees").unwrap()));
        story
    }

    #[test]
    fn add_passage_refuses_existing_titles() {
        let mut story = demo();
        assert!(!story.add_passage(Passage::new("Forest", "Other trees").unwrap()));
        assert!(!story.add_passage(Passage::new("Start", "Again").unwrap()));
        assert_eq!(story.passage_by_title("Forest").unwrap().content(), "Trees");
        assert_eq!(story.len(), 2);
    }

    #[test]
    fn passages_are_indexed_by_self_key() {
        let story = demo();
        assert!(story.passage(&LinkKey::to_passage("Forest")).is_some());
        assert!(story.passage(&LinkKey::to_passage("Start")).is_none());
        assert!(story.passage_by_title("Start").is_some());
    }

    #[test]
    fn remove_opening_passage_always_fails() {
        let mut story = demo();
        assert!(!story.remove_passage(&LinkKey::to_passage("Start")));
    }

    #[test]
    fn remove_referenced_passage_fails() {
        let mut story = demo();
        assert!(!story.remove_passage(&LinkKey::to_passage("Forest")));
        assert!(story.contains_title("Forest"));
    }

    #[test]
    fn self_links_do_not_block_removal() {
        let mut story = demo();
        let mut loop_passage = Passage::new("Loop", "Round").unwrap();
        loop_passage.add_link(Link::new("Again", "Loop").unwrap()).unwrap();
        story.add_passage(loop_passage);
        assert!(story.remove_passage(&LinkKey::to_passage("Loop")));
    }

    #[test]
    fn json_keys_passages_by_title() {
        let json = serde_json::to_value(demo()).unwrap();
        assert_eq!(json["title"], "Demo");
        assert_eq!(json["openingPassage"]["title"], "Start");
        assert_eq!(json["passages"]["Forest"]["content"], "Trees");
    }

    #[test]
    fn json_rejects_mismatched_keys() {
        let raw = r#"{"title":"Demo","openingPassage":{"title":"Start","content":"Begin"},
            "passages":{"Cave":{"title":"Forest","content":"Trees"}}}"#;
        let err = serde_json::from_str::<Story>(raw).unwrap_err();
        assert!(err.to_string().contains("Cave"), "{err}");
    }

    #[test]
    fn json_rejects_passage_named_like_opening() {
        let raw = r#"{"title":"Demo","openingPassage":{"title":"Start","content":"Begin"},
            "passages":{"Start":{"title":"Start","content":"Again"}}}"#;
        assert!(serde_json::from_str::<Story>(raw).is_err());
    }
}
