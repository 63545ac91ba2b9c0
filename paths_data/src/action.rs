//! Actions: effects applied to the player when a link is followed.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::player::{Player, check_item};
use crate::tagged::{Payload, TaggedEntry};
use crate::{TagError, ValidationError};

/// The closed set of action families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Health,
    Gold,
    Score,
    Inventory,
}

struct ActionTag {
    kind: ActionKind,
    tag: &'static str,
    short: &'static str,
    aliases: &'static [&'static str],
}

/// Tag table shared by the factory, the JSON shape and the `.paths` short forms.
const ACTION_TABLE: [ActionTag; 4] = [
    ActionTag {
        kind: ActionKind::Health,
        tag: "healthChange",
        short: "H",
        aliases: &[],
    },
    ActionTag {
        kind: ActionKind::Gold,
        tag: "goldChange",
        short: "G",
        aliases: &[],
    },
    ActionTag {
        kind: ActionKind::Score,
        tag: "scoreChange",
        short: "S",
        aliases: &[],
    },
    ActionTag {
        kind: ActionKind::Inventory,
        tag: "inventoryChange",
        short: "I",
        aliases: &["item"],
    },
];

impl ActionKind {
    fn entry(self) -> &'static ActionTag {
        // the table has one row per variant
        match self {
            ActionKind::Health => &ACTION_TABLE[0],
            ActionKind::Gold => &ACTION_TABLE[1],
            ActionKind::Score => &ACTION_TABLE[2],
            ActionKind::Inventory => &ACTION_TABLE[3],
        }
    }

    /// Canonical tag used in JSON.
    pub fn tag(self) -> &'static str {
        self.entry().tag
    }

    /// One-letter form used in `.paths` action lines.
    pub fn short(self) -> &'static str {
        self.entry().short
    }

    /// Look up a kind by its canonical tag or an alias.
    pub fn from_tag(tag: &str) -> Option<ActionKind> {
        ACTION_TABLE
            .iter()
            .find(|row| row.tag == tag || row.aliases.contains(&tag))
            .map(|row| row.kind)
    }

    /// Look up a kind by its short form, falling back to the long tags.
    pub fn from_short(short: &str) -> Option<ActionKind> {
        ACTION_TABLE
            .iter()
            .find(|row| row.short == short)
            .map(|row| row.kind)
            .or_else(|| ActionKind::from_tag(short))
    }

    fn build(self, payload: &Payload) -> Result<Action, TagError> {
        let tag = self.tag();
        let delta = |payload: &Payload| -> Result<i32, TagError> {
            let value = payload.as_integer(tag)?;
            i32::try_from(value).map_err(|e| TagError::InvalidPayload {
                tag,
                payload: value.to_string(),
                reason: e.to_string(),
            })
        };
        match self {
            ActionKind::Health => Ok(Action::Health(delta(payload)?)),
            ActionKind::Gold => Ok(Action::Gold(delta(payload)?)),
            ActionKind::Score => Ok(Action::Score(delta(payload)?)),
            ActionKind::Inventory => {
                let item = payload.as_text(tag)?;
                check_item(&item)?;
                Ok(Action::Inventory(item))
            },
        }
    }
}

/// A mutation applied to the player, in list order, when a link is taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaggedEntry", into = "TaggedEntry")]
pub enum Action {
    Health(i32),
    Gold(i32),
    Score(i32),
    Inventory(String),
}

impl Action {
    /// Build an action from its tag and raw textual value.
    ///
    /// ```
    /// use paths_data::Action;
    ///
    /// assert_eq!(Action::create("healthChange", "-10"), Ok(Action::Health(-10)));
    /// assert_eq!(Action::create("item", "Sword"), Ok(Action::Inventory("Sword".into())));
    /// assert!(Action::create("manaChange", "5").is_err());
    /// ```
    ///
    /// # Errors
    /// - if the tag is unknown or the value does not fit the action
    pub fn create(tag: &str, raw: &str) -> Result<Action, TagError> {
        Action::from_payload(tag, &Payload::from(raw))
    }

    /// Build an action from its tag and a loosely typed payload.
    ///
    /// # Errors
    /// - if the tag is unknown or the payload does not fit the action
    pub fn from_payload(tag: &str, payload: &Payload) -> Result<Action, TagError> {
        let kind = ActionKind::from_tag(tag).ok_or_else(|| TagError::UnknownTag {
            family: "action",
            tag: tag.to_string(),
        })?;
        kind.build(payload)
    }

    /// Parse the `.paths` short form, e.g. `H:-10` or `I:Sword`.
    ///
    /// # Errors
    /// - if the token has no `:` separator, an unknown prefix, or a bad value
    pub fn from_short_form(token: &str) -> Result<Action, TagError> {
        let (prefix, value) = token.split_once(':').ok_or_else(|| TagError::UnknownTag {
            family: "action",
            tag: token.to_string(),
        })?;
        let kind = ActionKind::from_short(prefix.trim()).ok_or_else(|| TagError::UnknownTag {
            family: "action",
            tag: prefix.trim().to_string(),
        })?;
        kind.build(&Payload::from(value.trim()))
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Health(_) => ActionKind::Health,
            Action::Gold(_) => ActionKind::Gold,
            Action::Score(_) => ActionKind::Score,
            Action::Inventory(_) => ActionKind::Inventory,
        }
    }

    /// The payload rendered as text, as stored in JSON.
    pub fn payload_text(&self) -> String {
        match self {
            Action::Health(delta) | Action::Gold(delta) | Action::Score(delta) => delta.to_string(),
            Action::Inventory(item) => item.clone(),
        }
    }

    /// Apply this action to `player`.
    ///
    /// # Errors
    /// - if the resulting player value would leave its bound
    pub fn execute(&self, player: &mut Player) -> Result<(), ValidationError> {
        debug!("└─ action: {self} on player '{}'", player.name());
        match self {
            Action::Health(delta) => player.add_health(*delta),
            Action::Gold(delta) => player.add_gold(*delta),
            Action::Score(delta) => player.add_score(*delta),
            Action::Inventory(item) => player.add_to_inventory(item),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind().short(), self.payload_text())
    }
}

impl TryFrom<TaggedEntry> for Action {
    type Error = TagError;

    fn try_from(entry: TaggedEntry) -> Result<Self, Self::Error> {
        let (tag, payload) = entry.into_single("action")?;
        Action::from_payload(&tag, &payload)
    }
}

impl From<Action> for TaggedEntry {
    fn from(action: Action) -> Self {
        TaggedEntry::single(action.kind().tag(), Payload::Text(action.payload_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new("Tester", 50, 0, 10).unwrap()
    }

    #[test]
    fn short_form_round_trips_through_display() {
        for action in [
            Action::Health(-10),
            Action::Gold(50),
            Action::Score(20),
            Action::Inventory("Sword".into()),
        ] {
            let text = action.to_string();
            assert_eq!(Action::from_short_form(&text), Ok(action));
        }
        assert_eq!(Action::Health(-10).to_string(), "H:-10");
    }

    #[test]
    fn short_form_accepts_long_tags() {
        assert_eq!(Action::from_short_form("goldChange: 5"), Ok(Action::Gold(5)));
    }

    #[test]
    fn unknown_tag_is_named_in_error() {
        let err = Action::create("unknownTag", "5").unwrap_err();
        assert_eq!(
            err,
            TagError::UnknownTag {
                family: "action",
                tag: "unknownTag".into()
            }
        );
        assert!(err.to_string().contains("unknownTag"));
    }

    #[test]
    fn non_numeric_delta_is_rejected() {
        assert!(matches!(
            Action::create("healthChange", "abc"),
            Err(TagError::InvalidPayload { tag: "healthChange", .. })
        ));
    }

    #[test]
    fn execute_mutates_player() {
        let mut p = player();
        Action::Health(-10).execute(&mut p).unwrap();
        Action::Gold(5).execute(&mut p).unwrap();
        Action::Score(3).execute(&mut p).unwrap();
        Action::Inventory("Rope".into()).execute(&mut p).unwrap();
        assert_eq!(p.health(), 40);
        assert_eq!(p.gold(), 15);
        assert_eq!(p.score(), 3);
        assert_eq!(p.inventory(), ["Rope".to_string()]);
    }

    #[test]
    fn execute_refuses_negative_health() {
        let mut p = player();
        assert!(Action::Health(-51).execute(&mut p).is_err());
        assert_eq!(p.health(), 50);
    }

    #[test]
    fn json_shape_is_single_key_object() {
        let json = serde_json::to_string(&Action::Health(-10)).unwrap();
        assert_eq!(json, r#"{"healthChange":"-10"}"#);
        let back: Action = serde_json::from_str(r#"{"item":"Lamp"}"#).unwrap();
        assert_eq!(back, Action::Inventory("Lamp".into()));
    }
}
