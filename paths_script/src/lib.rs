//! paths_script: the `.paths` text format for story graphs.
//!
//! A `.paths` file is a story title, a blank line and then one block per
//! passage, opening passage first:
//!
//! ```text
//! Demo
//!
//! ::Start
//! Begin
//! [Go north](Forest)
//! {H:-10}
//!
//! ::Forest
//! Trees
//! ```
//!
//! [`parse_story`] and [`write_story`] convert between this text and
//! [`paths_data::Story`]; [`export_plain`] renders a proofreading copy.

mod export;
mod reader;
mod writer;

pub use export::export_plain;
pub use reader::{ParseError, parse_story};
pub use writer::{PathsDocument, write_story};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use paths_data::Story;
use thiserror::Error;

/// Failure reading or writing a `.paths` file.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("unable to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Read and parse a `.paths` file.
///
/// # Errors
/// - if the file cannot be read or does not parse
pub fn read_story_file(path: &Path) -> Result<Story, ScriptError> {
    let source = fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_story(&source).map_err(|source| ScriptError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `story` to `path` as `.paths` text, replacing any existing file.
///
/// # Errors
/// - if the file cannot be written
pub fn write_story_file(path: &Path, story: &Story) -> Result<(), ScriptError> {
    fs::write(path, write_story(story)).map_err(|source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("wrote story '{}' to {}", story.title(), path.display());
    Ok(())
}
