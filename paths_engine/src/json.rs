//! JSON encoding of stories and saved sessions.
//!
//! The shapes themselves live on the `paths_data` types as serde impls; this
//! module adds the entry points and the checks serde cannot express.

use log::info;
use paths_data::{Game, ReferentialError, Story};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::{Session, SessionSnapshot};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Referential(#[from] ReferentialError),
}

/// Encode a story as pretty-printed JSON.
///
/// # Errors
/// - if serialization fails
pub fn encode_story(story: &Story) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(story)
}

/// Decode a story from JSON.
///
/// # Errors
/// - on malformed JSON, a missing field, an invalid entity, or a passage
///   stored under a key other than its own title
pub fn decode_story(json: &str) -> Result<Story, DecodeError> {
    let story: Story = serde_json::from_str(json)?;
    info!("decoded story '{}' with {} passage(s)", story.title(), story.len());
    Ok(story)
}

/// On-disk shape of a saved session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SessionFile {
    game: Game,
    passage: String,
    visited_passages: Vec<String>,
}

/// Encode a session's game and progress.
///
/// # Errors
/// - if serialization fails
pub fn encode_session(session: &Session) -> Result<String, serde_json::Error> {
    let snapshot = session.snapshot();
    serde_json::to_string_pretty(&SessionFile {
        game: snapshot.game,
        passage: snapshot.passage,
        visited_passages: snapshot.visited,
    })
}

/// Decode a saved session and restore it.
///
/// # Errors
/// - on malformed JSON, or if the saved position names a passage the story lacks
pub fn decode_session(json: &str) -> Result<Session, DecodeError> {
    let file: SessionFile = serde_json::from_str(json)?;
    let session = Session::restore(SessionSnapshot {
        game: file.game,
        passage: file.passage,
        visited: file.visited_passages,
    })?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use paths_data::{Action, Goal, Link, LinkKey, Passage, Player};

    use super::*;

    fn story() -> Story {
        let mut start = Passage::new("Start", "Begin").unwrap();
        start
            .add_link(Link::new("Go north", "Forest").unwrap().with_actions(vec![Action::Health(-10)]))
            .unwrap();
        let mut story = Story::new("Demo", start).unwrap();
        story.add_passage(Passage::new("Forest", "Trees").unwrap());
        story
    }

    #[test]
    fn story_round_trip_keeps_actions() {
        let json = encode_story(&story()).unwrap();
        assert!(json.contains(r#""healthChange": "-10""#), "{json}");
        let decoded = decode_story(&json).unwrap();
        assert!(decoded.is_identical(&story()));
    }

    #[test]
    fn missing_content_is_named() {
        let json = r#"{"title":"Demo","openingPassage":{"title":"Start"}}"#;
        let err = decode_story(json).unwrap_err();
        assert!(err.to_string().contains("content"), "{err}");
    }

    #[test]
    fn extra_field_is_rejected() {
        let json = r#"{"title":"Demo","openingPassage":{"title":"Start","content":"Begin","colour":"red"}}"#;
        let err = decode_story(json).unwrap_err();
        assert!(err.to_string().contains("colour"), "{err}");
    }

    #[test]
    fn multi_key_action_is_rejected() {
        let json = r#"{"title":"Demo","openingPassage":{"title":"Start","content":"Begin",
            "links":[{"text":"Go","ref":"Start","actions":[{"healthChange":"1","goldChange":"2"}]}]}}"#;
        let err = decode_story(json).unwrap_err();
        assert!(err.to_string().contains("exactly one"), "{err}");
    }

    #[test]
    fn session_round_trip() {
        let player = Player::new("Tester", 50, 0, 0).unwrap();
        let game = Game::new(player, story(), vec![Goal::Health(1)]);
        let mut session = Session::begin(game);
        session.choose(&LinkKey::new("Go north", "Forest")).unwrap();

        let json = encode_session(&session).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["passage"], "Forest");
        assert_eq!(value["visitedPassages"], serde_json::json!(["Start", "Forest"]));
        assert_eq!(value["game"]["goals"][0]["minimumHealth"], 1);

        let restored = decode_session(&json).unwrap();
        assert_eq!(restored.current().title(), "Forest");
        assert_eq!(restored.player().health(), 40);
        assert_eq!(restored.visited(), ["Start", "Forest"]);
    }

    #[test]
    fn session_with_unknown_position_is_referential_error() {
        let game = Game::new(Player::new("Tester", 50, 0, 0).unwrap(), story(), Vec::new());
        let json = serde_json::json!({
            "game": game,
            "passage": "Nowhere",
            "visitedPassages": ["Start"],
        })
        .to_string();
        assert!(matches!(decode_session(&json), Err(DecodeError::Referential(_))));
    }
}
