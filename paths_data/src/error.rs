//! Error types raised by the story model.

use thiserror::Error;

/// A bound or invariant was violated while constructing or mutating an entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    #[error("{field} must fit on a single line")]
    LineBreak { field: &'static str },
    #[error("{field} must be {min}-{max} characters long (got {actual})")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },
    #[error("{field} would become {value}, outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: u32,
        max: u32,
    },
    #[error("{field} must not contain '{ch}'")]
    ReservedChar { field: &'static str, ch: char },
    #[error("{field} must not contain \"{sequence}\"")]
    ReservedSequence {
        field: &'static str,
        sequence: &'static str,
    },
    #[error("{field} must not start with \"{prefix}\"")]
    ReservedPrefix { field: &'static str, prefix: &'static str },
    #[error("{field} must not start or end with whitespace")]
    Padded { field: &'static str },
    #[error("passage already has a link [{text}]({reference})")]
    DuplicateLink { text: String, reference: String },
    #[error("inventory is full ({max} items)")]
    InventoryFull { max: usize },
    #[error("passage stored under '{key}' is titled '{title}'")]
    PassageKeyMismatch { key: String, title: String },
    #[error("passage title '{title}' is already used in this story")]
    DuplicatePassage { title: String },
}

/// A tagged action or goal could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("unknown {family} tag '{tag}'")]
    UnknownTag { family: &'static str, tag: String },
    #[error("invalid payload '{payload}' for '{tag}': {reason}")]
    InvalidPayload {
        tag: &'static str,
        payload: String,
        reason: String,
    },
    #[error("{family} object must have exactly one tag, found {count}")]
    TagCount { family: &'static str, count: usize },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Navigation targeted a passage that is not part of the story.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferentialError {
    #[error("no passage titled '{title}' in story")]
    MissingPassage { title: String },
}
