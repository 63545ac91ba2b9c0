/// Turn a story title or save slot name into a filesystem-safe file stem.
///
/// Letters and digits are kept (lowercased), runs of anything else become a
/// single dash. A name with nothing usable left becomes `"story"`.
pub fn sanitize_slug(raw: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch.to_ascii_lowercase());
            pending_dash = false;
        } else if ch == '_' && !slug.is_empty() {
            slug.push(ch);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    let trimmed = slug.trim_matches(&['-', '_'][..]);
    if trimmed.is_empty() {
        "story".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_become_dashed_lowercase() {
        assert_eq!(sanitize_slug("The Haunted Manor"), "the-haunted-manor");
        assert_eq!(sanitize_slug("  Demo!! Part 2 "), "demo-part-2");
        assert_eq!(sanitize_slug("slot_1"), "slot_1");
    }

    #[test]
    fn unusable_names_fall_back() {
        assert_eq!(sanitize_slug("???"), "story");
        assert_eq!(sanitize_slug(""), "story");
    }
}
