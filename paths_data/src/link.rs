//! Links: labeled edges between passages.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::limits::{LINK_REF_LEN, LINK_TEXT_LEN, check_link_part};
use crate::{Action, ValidationError};

/// Identity of a link: its label and target title. Actions are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkKey {
    pub text: String,
    pub reference: String,
}

impl LinkKey {
    pub fn new(text: impl Into<String>, reference: impl Into<String>) -> LinkKey {
        LinkKey {
            text: text.into(),
            reference: reference.into(),
        }
    }

    /// Synthetic self-key used by [`crate::Story`] to index a passage by title.
    pub fn to_passage(title: &str) -> LinkKey {
        LinkKey::new(title, title)
    }
}

/// A choice offered to the player: label, target passage title, and effects.
///
/// Equality and hashing go through [`Link::key`], so two links with the same
/// label and target compare equal whatever their actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawLink", into = "RawLink")]
pub struct Link {
    key: LinkKey,
    actions: Vec<Action>,
}

impl Link {
    /// # Errors
    /// - if the label or reference is out of bounds or contains `](`
    pub fn new(text: &str, reference: &str) -> Result<Link, ValidationError> {
        check_link_part("link text", text, &LINK_TEXT_LEN)?;
        check_link_part("link reference", reference, &LINK_REF_LEN)?;
        Ok(Link {
            key: LinkKey::new(text, reference),
            actions: Vec::new(),
        })
    }

    /// Replace the action list; order is execution order.
    #[must_use]
    pub fn with_actions(mut self, actions: Vec<Action>) -> Link {
        self.actions = actions;
        self
    }

    pub fn text(&self) -> &str {
        &self.key.text
    }

    pub fn reference(&self) -> &str {
        &self.key.reference
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn key(&self) -> &LinkKey {
        &self.key
    }

    /// Field-by-field comparison including the action list.
    pub fn is_identical(&self, other: &Link) -> bool {
        self.key == other.key && self.actions == other.actions
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Link {}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLink {
    text: String,
    #[serde(rename = "ref")]
    reference: String,
    #[serde(default)]
    actions: Vec<Action>,
}

impl TryFrom<RawLink> for Link {
    type Error = ValidationError;

    fn try_from(raw: RawLink) -> Result<Self, Self::Error> {
        Ok(Link::new(&raw.text, &raw.reference)?.with_actions(raw.actions))
    }
}

impl From<Link> for RawLink {
    fn from(link: Link) -> Self {
        RawLink {
            text: link.key.text,
            reference: link.key.reference,
            actions: link.actions,
        }
    }
}
