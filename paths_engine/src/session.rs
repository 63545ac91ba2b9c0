//! Session progression: walking a game's story one chosen link at a time.

use std::collections::BTreeSet;

use log::{info, warn};
use paths_data::{Game, Goal, Link, LinkKey, Passage, Player, ReferentialError, Story, ValidationError, broken_links};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("link [{}]({}) is not available here", .0.text, .0.reference)]
    LinkNotAvailable(LinkKey),
    #[error(transparent)]
    Referential(#[from] ReferentialError),
    #[error("action rejected: {0}")]
    ActionRejected(#[from] ValidationError),
}

/// Links of `passage` the player may choose right now.
///
/// A link is offered unless its target is missing from the story, or the
/// target is a single-visit passage already in `visited`. The opening
/// passage is always offered again.
pub fn available_links<'a>(
    story: &Story,
    passage: &'a Passage,
    visited: &[String],
    broken: &BTreeSet<LinkKey>,
) -> Vec<&'a Link> {
    let opening = story.opening_passage().title();
    passage
        .links()
        .iter()
        .filter(|link| !broken.contains(link.key()))
        .filter(|link| {
            let target = link.reference();
            target == opening
                || !visited.iter().any(|title| title == target)
                || !story
                    .passage_by_title(target)
                    .is_some_and(Passage::is_single_visit_only)
        })
        .collect()
}

/// Whether one goal holds for the current player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalStatus {
    pub goal: Goal,
    pub fulfilled: bool,
}

/// Everything needed to resume a session later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub game: Game,
    pub passage: String,
    pub visited: Vec<String>,
}

/// A game in progress.
///
/// The story is never modified during play, so its broken links are
/// computed once when the session starts.
#[derive(Debug, Clone)]
pub struct Session {
    game: Game,
    current: String,
    visited: Vec<String>,
    broken: BTreeSet<LinkKey>,
}

impl Session {
    /// Start at the opening passage, which also opens the visit history.
    pub fn begin(game: Game) -> Session {
        let opening = game.begin().title().to_string();
        let broken = broken_links(game.story());
        info!(
            "session started: story '{}', player '{}' at '{opening}'",
            game.story().title(),
            game.player().name()
        );
        Session {
            current: opening.clone(),
            visited: vec![opening],
            broken,
            game,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn story(&self) -> &Story {
        self.game.story()
    }

    pub fn player(&self) -> &Player {
        self.game.player()
    }

    /// The passage the player is on.
    pub fn current(&self) -> &Passage {
        // `current` is only ever set to a resolved title of a read-only story
        let found = self.game.story().passage_by_title(&self.current);
        debug_assert!(found.is_some(), "current passage '{}' is not in the story", self.current);
        found.unwrap_or_else(|| {
            warn!(
                "current passage '{}' is missing from story '{}'; showing the opening passage",
                self.current,
                self.game.story().title()
            );
            self.game.begin()
        })
    }

    /// Titles visited so far, in order, starting with the opening passage.
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    pub fn broken_links(&self) -> &BTreeSet<LinkKey> {
        &self.broken
    }

    pub fn available_links(&self) -> Vec<&Link> {
        available_links(self.game.story(), self.current(), &self.visited, &self.broken)
    }

    /// Follow the link `key` from the current passage.
    ///
    /// The link's actions run in order against a copy of the player; the
    /// session only moves on when all of them succeed.
    ///
    /// # Errors
    /// - if the link is not offered on the current passage
    /// - if its target cannot be resolved
    /// - if an action would push the player out of bounds
    pub fn choose(&mut self, key: &LinkKey) -> Result<&Passage, SessionError> {
        let link = self
            .available_links()
            .into_iter()
            .find(|link| link.key() == key)
            .cloned()
            .ok_or_else(|| SessionError::LinkNotAvailable(key.clone()))?;
        let target = self.game.go(&link)?.title().to_string();

        let mut player = self.game.player().clone();
        for action in link.actions() {
            if let Err(err) = action.execute(&mut player) {
                warn!("choice [{}]({}) rejected: {err}", key.text, key.reference);
                return Err(err.into());
            }
        }

        *self.game.player_mut() = player;
        info!("moved '{}' -> '{target}' via [{}]", self.current, key.text);
        self.visited.push(target.clone());
        self.current = target;
        Ok(self.current())
    }

    /// The session ends on a passage with no links at all.
    pub fn is_finished(&self) -> bool {
        !self.current().has_links()
    }

    pub fn goal_report(&self) -> Vec<GoalStatus> {
        let player = self.game.player();
        self.game
            .goals()
            .iter()
            .map(|goal| GoalStatus {
                goal: goal.clone(),
                fulfilled: goal.is_fulfilled(player),
            })
            .collect()
    }

    pub fn goals_fulfilled(&self) -> bool {
        self.goal_report().iter().all(|status| status.fulfilled)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            game: self.game.clone(),
            passage: self.current.clone(),
            visited: self.visited.clone(),
        }
    }

    /// Resume from a snapshot. An empty history restarts it at the current passage.
    ///
    /// # Errors
    /// - if the current passage or any visited title is not in the story
    pub fn restore(snapshot: SessionSnapshot) -> Result<Session, ReferentialError> {
        let SessionSnapshot {
            game,
            passage,
            mut visited,
        } = snapshot;
        let story = game.story();
        if let Some(missing) = std::iter::once(&passage)
            .chain(visited.iter())
            .find(|title| !story.contains_title(title))
        {
            return Err(ReferentialError::MissingPassage { title: missing.clone() });
        }
        if visited.is_empty() {
            visited.push(passage.clone());
        }
        let broken = broken_links(story);
        info!("session restored: story '{}' at '{passage}'", story.title());
        Ok(Session {
            game,
            current: passage,
            visited,
            broken,
        })
    }
}

#[cfg(test)]
mod tests {
    use paths_data::Action;

    use super::*;

    fn game(health: u32) -> Game {
        let mut start = Passage::new("Start", "Begin").unwrap();
        start
            .add_link(Link::new("Go north", "Forest").unwrap().with_actions(vec![Action::Health(-10)]))
            .unwrap();
        start.add_link(Link::new("Jump", "Void").unwrap()).unwrap();
        let mut story = Story::new("Demo", start).unwrap();
        let mut forest = Passage::new("Forest", "Trees").unwrap();
        forest
            .add_link(
                Link::new("Dig", "Cave")
                    .unwrap()
                    .with_actions(vec![Action::Gold(5), Action::Health(-100)]),
            )
            .unwrap();
        forest.add_link(Link::new("Back", "Start").unwrap()).unwrap();
        story.add_passage(forest);
        story.add_passage(Passage::new("Cave", "Dark").unwrap());
        Game::new(Player::new("Tester", health, 0, 0).unwrap(), story, vec![Goal::Gold(5)])
    }

    #[test]
    fn begin_records_opening_and_broken_links() {
        let session = Session::begin(game(50));
        assert_eq!(session.current().title(), "Start");
        assert_eq!(session.visited(), ["Start"]);
        assert!(session.broken_links().contains(&LinkKey::new("Jump", "Void")));
        let offered: Vec<&str> = session.available_links().iter().map(|l| l.text()).collect();
        assert_eq!(offered, ["Go north"]);
    }

    #[test]
    fn choose_applies_actions_and_moves() {
        let mut session = Session::begin(game(50));
        let forest = session.choose(&LinkKey::new("Go north", "Forest")).unwrap();
        assert_eq!(forest.title(), "Forest");
        assert_eq!(session.player().health(), 40);
        assert_eq!(session.visited(), ["Start", "Forest"]);
        assert!(!session.is_finished());
    }

    #[test]
    fn broken_link_cannot_be_chosen() {
        let mut session = Session::begin(game(50));
        let err = session.choose(&LinkKey::new("Jump", "Void")).unwrap_err();
        assert!(matches!(err, SessionError::LinkNotAvailable(_)));
        assert_eq!(session.visited(), ["Start"]);
    }

    #[test]
    fn rejected_action_leaves_session_unchanged() {
        let mut session = Session::begin(game(50));
        session.choose(&LinkKey::new("Go north", "Forest")).unwrap();
        let err = session.choose(&LinkKey::new("Dig", "Cave")).unwrap_err();
        assert!(matches!(err, SessionError::ActionRejected(_)));
        assert_eq!(session.current().title(), "Forest");
        assert_eq!(session.player().gold(), 0, "earlier actions of the link are rolled back");
        assert_eq!(session.visited(), ["Start", "Forest"]);
    }

    #[test]
    fn finishing_reports_goals() {
        let mut session = Session::begin(game(200));
        session.choose(&LinkKey::new("Go north", "Forest")).unwrap();
        assert!(!session.goals_fulfilled());
        session.choose(&LinkKey::new("Dig", "Cave")).unwrap();
        assert!(session.is_finished());
        assert_eq!(session.player().health(), 90);
        assert_eq!(
            session.goal_report(),
            [GoalStatus {
                goal: Goal::Gold(5),
                fulfilled: true
            }]
        );
    }

    #[test]
    fn opening_passage_is_always_offered_again() {
        let mut session = Session::begin(game(50));
        session.choose(&LinkKey::new("Go north", "Forest")).unwrap();
        assert!(session.available_links().iter().any(|l| l.reference() == "Start"));
        session.choose(&LinkKey::new("Back", "Start")).unwrap();
        assert_eq!(session.visited(), ["Start", "Forest", "Start"]);
    }

    #[test]
    fn restore_rejects_unknown_titles() {
        let mut snapshot = Session::begin(game(50)).snapshot();
        snapshot.visited.push("Nowhere".into());
        assert_eq!(
            Session::restore(snapshot).unwrap_err(),
            ReferentialError::MissingPassage { title: "Nowhere".into() }
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "current passage 'Nowhere' is not in the story")]
    fn unresolved_position_is_caught_in_debug_builds() {
        let mut session = Session::begin(game(50));
        session.current = "Nowhere".into();
        let _ = session.current();
    }

    #[test]
    fn restore_round_trips_snapshot() {
        let mut session = Session::begin(game(50));
        session.choose(&LinkKey::new("Go north", "Forest")).unwrap();
        let restored = Session::restore(session.snapshot()).unwrap();
        assert_eq!(restored.snapshot(), session.snapshot());
        assert_eq!(restored.broken_links(), session.broken_links());
    }
}
