//! Player -- the only entity mutated during play.

use serde::{Deserialize, Serialize};

use crate::ValidationError;
use crate::limits::{
    GOLD_RANGE, HEALTH_RANGE, ITEM_LEN, ITEM_RESERVED_CHARS, MAX_INVENTORY_ITEMS, PLAYER_NAME_LEN, SCORE_RANGE,
    apply_delta, check_counter, check_text,
};

/// Check an inventory item name.
///
/// # Errors
/// - if the name is out of bounds, padded with whitespace, or uses a reserved character
pub fn check_item(item: &str) -> Result<(), ValidationError> {
    check_text("inventory item", item, &ITEM_LEN)?;
    if item.trim() != item {
        return Err(ValidationError::Padded {
            field: "inventory item",
        });
    }
    if let Some(ch) = item.chars().find(|ch| ITEM_RESERVED_CHARS.contains(ch)) {
        return Err(ValidationError::ReservedChar {
            field: "inventory item",
            ch,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPlayer", into = "RawPlayer")]
pub struct Player {
    name: String,
    health: u32,
    score: u32,
    gold: u32,
    inventory: Vec<String>,
}

impl Player {
    /// Create a player with an empty inventory.
    ///
    /// # Errors
    /// - if the name or any starting value is out of bounds
    pub fn new(name: &str, health: u32, score: u32, gold: u32) -> Result<Player, ValidationError> {
        check_text("player name", name, &PLAYER_NAME_LEN)?;
        Ok(Player {
            name: name.to_string(),
            health: check_counter("health", i64::from(health), &HEALTH_RANGE)?,
            score: check_counter("score", i64::from(score), &SCORE_RANGE)?,
            gold: check_counter("gold", i64::from(gold), &GOLD_RANGE)?,
            inventory: Vec::new(),
        })
    }

    /// Add every item in `items`, in order.
    ///
    /// # Errors
    /// - if an item is invalid or the inventory overflows
    pub fn with_inventory<I, S>(mut self, items: I) -> Result<Player, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in items {
            self.add_to_inventory(item.as_ref())?;
        }
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    /// # Errors
    /// - if health would leave its bound; health never goes negative
    pub fn add_health(&mut self, delta: i32) -> Result<(), ValidationError> {
        self.health = apply_delta("health", self.health, delta, &HEALTH_RANGE)?;
        Ok(())
    }

    /// # Errors
    /// - if score would leave its bound
    pub fn add_score(&mut self, delta: i32) -> Result<(), ValidationError> {
        self.score = apply_delta("score", self.score, delta, &SCORE_RANGE)?;
        Ok(())
    }

    /// # Errors
    /// - if gold would leave its bound
    pub fn add_gold(&mut self, delta: i32) -> Result<(), ValidationError> {
        self.gold = apply_delta("gold", self.gold, delta, &GOLD_RANGE)?;
        Ok(())
    }

    /// Append an item. Duplicates are allowed; the inventory is a bag.
    ///
    /// # Errors
    /// - if the item name is invalid or the inventory is full
    pub fn add_to_inventory(&mut self, item: &str) -> Result<(), ValidationError> {
        check_item(item)?;
        if self.inventory.len() >= MAX_INVENTORY_ITEMS {
            return Err(ValidationError::InventoryFull {
                max: MAX_INVENTORY_ITEMS,
            });
        }
        self.inventory.push(item.to_string());
        Ok(())
    }
}

/// Serialized shape of a [`Player`], validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPlayer {
    name: String,
    health: u32,
    score: u32,
    gold: u32,
    #[serde(default)]
    inventory: Vec<String>,
}

impl TryFrom<RawPlayer> for Player {
    type Error = ValidationError;

    fn try_from(raw: RawPlayer) -> Result<Self, Self::Error> {
        Player::new(&raw.name, raw.health, raw.score, raw.gold)?.with_inventory(raw.inventory)
    }
}

impl From<Player> for RawPlayer {
    fn from(player: Player) -> Self {
        RawPlayer {
            name: player.name,
            health: player.health,
            score: player.score,
            gold: player.gold,
            inventory: player.inventory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates_name_and_values() {
        assert!(Player::new("", 10, 0, 0).is_err());
        assert!(Player::new("A name that is far too long", 10, 0, 0).is_err());
        assert!(Player::new("Ok", 1001, 0, 0).is_err());
        assert!(Player::new("Ok", 1000, 0, 0).is_ok());
    }

    #[test]
    fn add_health_rejects_going_below_zero() {
        let mut player = Player::new("Tester", 5, 0, 0).unwrap();
        assert!(player.add_health(-6).is_err());
        assert_eq!(player.health(), 5);
        player.add_health(-5).unwrap();
        assert_eq!(player.health(), 0);
    }

    #[test]
    fn inventory_overflow_is_rejected() {
        let mut player = Player::new("Tester", 5, 0, 0).unwrap();
        for i in 0..MAX_INVENTORY_ITEMS {
            player.add_to_inventory(&format!("item{i}")).unwrap();
        }
        assert_eq!(
            player.add_to_inventory("one more"),
            Err(ValidationError::InventoryFull {
                max: MAX_INVENTORY_ITEMS
            })
        );
    }

    #[test]
    fn reserved_characters_are_rejected_in_items() {
        let mut player = Player::new("Tester", 5, 0, 0).unwrap();
        assert!(matches!(
            player.add_to_inventory("a,b"),
            Err(ValidationError::ReservedChar { ch: ',', .. })
        ));
    }

    #[test]
    fn padded_item_names_are_rejected() {
        let mut player = Player::new("Tester", 5, 0, 0).unwrap();
        for item in [" Sword", "Sword ", "\tSword"] {
            assert_eq!(
                player.add_to_inventory(item),
                Err(ValidationError::Padded {
                    field: "inventory item"
                }),
                "{item:?}"
            );
        }
        player.add_to_inventory("Long Sword").unwrap();
        assert_eq!(player.inventory(), ["Long Sword".to_string()]);
    }

    #[test]
    fn deserializing_rechecks_bounds() {
        let err = serde_json::from_str::<Player>(r#"{"name":"X","health":5000,"score":0,"gold":0}"#).unwrap_err();
        assert!(err.to_string().contains("health"));
        let ok: Player = serde_json::from_str(r#"{"name":"X","health":5,"score":0,"gold":0}"#).unwrap();
        assert!(ok.inventory().is_empty());
    }
}
