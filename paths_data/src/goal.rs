//! Goals: predicates over the player evaluated when a session ends.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TagError;
use crate::limits::{GOLD_RANGE, HEALTH_RANGE, SCORE_RANGE, check_counter};
use crate::player::{Player, check_item};
use crate::tagged::{Payload, TaggedEntry};

/// The closed set of goal families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoalKind {
    Health,
    Gold,
    Score,
    Inventory,
}

/// Tag table shared by the factory and the JSON/TOML shape.
const GOAL_TABLE: [(GoalKind, &str); 4] = [
    (GoalKind::Health, "minimumHealth"),
    (GoalKind::Gold, "minimumGold"),
    (GoalKind::Score, "minimumScore"),
    (GoalKind::Inventory, "mandatoryItems"),
];

impl GoalKind {
    pub fn tag(self) -> &'static str {
        GOAL_TABLE
            .iter()
            .find(|(kind, _)| *kind == self)
            .map_or("", |(_, tag)| *tag)
    }

    pub fn from_tag(tag: &str) -> Option<GoalKind> {
        GOAL_TABLE.iter().find(|(_, t)| *t == tag).map(|(kind, _)| *kind)
    }

    fn build(self, payload: &Payload) -> Result<Goal, TagError> {
        let tag = self.tag();
        match self {
            GoalKind::Health => Ok(Goal::Health(check_counter(
                "minimum health",
                payload.as_integer(tag)?,
                &HEALTH_RANGE,
            )?)),
            GoalKind::Gold => Ok(Goal::Gold(check_counter(
                "minimum gold",
                payload.as_integer(tag)?,
                &GOLD_RANGE,
            )?)),
            GoalKind::Score => Ok(Goal::Score(check_counter(
                "minimum score",
                payload.as_integer(tag)?,
                &SCORE_RANGE,
            )?)),
            GoalKind::Inventory => {
                let items = payload.as_items(tag)?;
                for item in &items {
                    check_item(item)?;
                }
                Ok(Goal::Inventory(items.into_iter().collect()))
            },
        }
    }
}

/// A condition on the player's final state, reported at the end of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaggedEntry", into = "TaggedEntry")]
pub enum Goal {
    Health(u32),
    Gold(u32),
    Score(u32),
    Inventory(BTreeSet<String>),
}

impl Goal {
    /// Build a goal from its tag and payload.
    ///
    /// # Errors
    /// - if the tag is unknown or the payload does not fit the goal
    pub fn create(tag: &str, payload: &Payload) -> Result<Goal, TagError> {
        let kind = GoalKind::from_tag(tag).ok_or_else(|| TagError::UnknownTag {
            family: "goal",
            tag: tag.to_string(),
        })?;
        kind.build(payload)
    }

    /// Goal requiring every item in `items` to be held.
    pub fn mandatory_items<I, S>(items: I) -> Goal
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Goal::Inventory(items.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> GoalKind {
        match self {
            Goal::Health(_) => GoalKind::Health,
            Goal::Gold(_) => GoalKind::Gold,
            Goal::Score(_) => GoalKind::Score,
            Goal::Inventory(_) => GoalKind::Inventory,
        }
    }

    /// Returns true if `player` meets this goal. Minimums are inclusive.
    pub fn is_fulfilled(&self, player: &Player) -> bool {
        match self {
            Goal::Health(min) => player.health() >= *min,
            Goal::Gold(min) => player.gold() >= *min,
            Goal::Score(min) => player.score() >= *min,
            Goal::Inventory(required) => {
                let held: BTreeSet<&str> = player.inventory().iter().map(String::as_str).collect();
                required.iter().all(|item| held.contains(item.as_str()))
            },
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Health(min) => write!(f, "health of at least {min}"),
            Goal::Gold(min) => write!(f, "at least {min} gold"),
            Goal::Score(min) => write!(f, "score of at least {min}"),
            Goal::Inventory(items) => {
                let list: Vec<&str> = items.iter().map(String::as_str).collect();
                write!(f, "carry {}", list.join(", "))
            },
        }
    }
}

impl TryFrom<TaggedEntry> for Goal {
    type Error = TagError;

    fn try_from(entry: TaggedEntry) -> Result<Self, Self::Error> {
        let (tag, payload) = entry.into_single("goal")?;
        Goal::create(&tag, &payload)
    }
}

impl From<Goal> for TaggedEntry {
    fn from(goal: Goal) -> Self {
        let tag = goal.kind().tag();
        let payload = match goal {
            Goal::Health(min) | Goal::Gold(min) | Goal::Score(min) => Payload::Number(i64::from(min)),
            Goal::Inventory(items) => Payload::Items(items.into_iter().collect()),
        };
        TaggedEntry::single(tag, payload)
    }
}
