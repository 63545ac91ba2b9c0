#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! Session engine, story library and terminal player for Paths gamebooks.

pub const PATHS_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod data_paths;
pub mod input;
pub mod json;
pub mod library;
pub mod repl;
pub mod session;
pub mod slug;
pub mod style;

pub use config::{EngineConfig, load_config};
pub use json::{DecodeError, decode_session, decode_story, encode_session, encode_story};
pub use library::{LibraryError, StoryFormat, StoryLibrary};
pub use repl::run_repl;
pub use session::{GoalStatus, Session, SessionError, SessionSnapshot, available_links};
