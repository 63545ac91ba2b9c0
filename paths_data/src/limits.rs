//! Bounds shared by every constructor and codec.
//!
//! All length bounds count `char`s, not bytes.

use std::ops::RangeInclusive;

use crate::ValidationError;

pub const STORY_TITLE_LEN: RangeInclusive<usize> = 1..=40;
pub const PASSAGE_TITLE_LEN: RangeInclusive<usize> = 1..=20;
pub const PASSAGE_CONTENT_LEN: RangeInclusive<usize> = 1..=400;
pub const LINK_TEXT_LEN: RangeInclusive<usize> = 1..=40;
/// A link reference names a passage, so it shares the passage title bound.
pub const LINK_REF_LEN: RangeInclusive<usize> = PASSAGE_TITLE_LEN;
pub const PLAYER_NAME_LEN: RangeInclusive<usize> = 1..=20;
pub const ITEM_LEN: RangeInclusive<usize> = 1..=30;

pub const HEALTH_RANGE: RangeInclusive<u32> = 0..=1000;
pub const SCORE_RANGE: RangeInclusive<u32> = 0..=100_000;
pub const GOLD_RANGE: RangeInclusive<u32> = 0..=100_000;

pub const MAX_INVENTORY_ITEMS: usize = 20;

/// Characters reserved by the `.paths` action line syntax.
pub const ITEM_RESERVED_CHARS: [char; 3] = [',', '{', '}'];

/// Line prefixes the `.paths` reader treats as headers and attributes.
pub const CONTENT_RESERVED_PREFIXES: [&str; 2] = ["::", "@"];

/// Separator between label and target on a `.paths` link line.
pub const LINK_SEPARATOR: &str = "](";

/// Check a single-line text value against its length bound.
///
/// # Errors
/// - if the value is blank, contains a line break, or its length is out of range
pub fn check_text(field: &'static str, value: &str, bound: &RangeInclusive<usize>) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    if value.contains(['\n', '\r']) {
        return Err(ValidationError::LineBreak { field });
    }
    let len = value.chars().count();
    if !bound.contains(&len) {
        return Err(ValidationError::Length {
            field,
            min: *bound.start(),
            max: *bound.end(),
            actual: len,
        });
    }
    Ok(())
}

/// Check passage content, which may not open with a header or attribute prefix.
///
/// # Errors
/// - if the content fails [`check_text`] or starts with a reserved prefix
pub fn check_content(field: &'static str, value: &str) -> Result<(), ValidationError> {
    check_text(field, value, &PASSAGE_CONTENT_LEN)?;
    match CONTENT_RESERVED_PREFIXES.into_iter().find(|prefix| value.starts_with(prefix)) {
        Some(prefix) => Err(ValidationError::ReservedPrefix { field, prefix }),
        None => Ok(()),
    }
}

/// Check a link label or target, which may not contain the link separator.
///
/// # Errors
/// - if the value fails [`check_text`] or contains `](`
pub fn check_link_part(field: &'static str, value: &str, bound: &RangeInclusive<usize>) -> Result<(), ValidationError> {
    check_text(field, value, bound)?;
    if value.contains(LINK_SEPARATOR) {
        return Err(ValidationError::ReservedSequence {
            field,
            sequence: LINK_SEPARATOR,
        });
    }
    Ok(())
}

/// Apply a signed delta to a bounded counter, rejecting results outside `range`.
///
/// # Errors
/// - if the resulting value would fall outside `range`
pub fn apply_delta(field: &'static str, current: u32, delta: i32, range: &RangeInclusive<u32>) -> Result<u32, ValidationError> {
    let result = i64::from(current) + i64::from(delta);
    check_counter(field, result, range)
}

/// Check an unvalidated numeric value against a counter range.
///
/// # Errors
/// - if `value` is outside `range`
pub fn check_counter(field: &'static str, value: i64, range: &RangeInclusive<u32>) -> Result<u32, ValidationError> {
    match u32::try_from(value) {
        Ok(v) if range.contains(&v) => Ok(v),
        _ => Err(ValidationError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        }),
    }
}
