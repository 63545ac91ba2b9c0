//! Game -- a player, a story, and the goals the player plays towards.

use serde::{Deserialize, Serialize};

use crate::{Goal, Link, Passage, Player, ReferentialError, Story};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Game {
    player: Player,
    story: Story,
    goals: Vec<Goal>,
}

impl Game {
    pub fn new(player: Player, story: Story, goals: Vec<Goal>) -> Game {
        Game { player, story, goals }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The player is the only part of a game that changes during play.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// The passage a new session starts on.
    pub fn begin(&self) -> &Passage {
        self.story.opening_passage()
    }

    /// Resolve the passage `link` leads to.
    ///
    /// # Errors
    /// - if no passage in the story carries the link's reference
    pub fn go(&self, link: &Link) -> Result<&Passage, ReferentialError> {
        self.story
            .passage_by_title(link.reference())
            .ok_or_else(|| ReferentialError::MissingPassage {
                title: link.reference().to_string(),
            })
    }
}
