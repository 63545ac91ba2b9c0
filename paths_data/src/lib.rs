//! Shared story graph model for the Paths engine.

pub mod action;
pub mod error;
pub mod game;
pub mod goal;
pub mod limits;
pub mod link;
pub mod passage;
pub mod player;
pub mod story;
pub mod tagged;
pub mod validate;

pub use action::{Action, ActionKind};
pub use error::{ReferentialError, TagError, ValidationError};
pub use game::Game;
pub use goal::{Goal, GoalKind};
pub use link::{Link, LinkKey};
pub use passage::{Mood, Passage};
pub use player::Player;
pub use story::Story;
pub use tagged::{Payload, TaggedEntry};
pub use validate::{
    Finding, StoryReport, broken_links, dead_ends, reachable_titles, remove_all_links_to_passage,
    unreachable_passages,
};
