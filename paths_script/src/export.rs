//! Plain review export.

use paths_data::Story;

use crate::writer::PathsDocument;

/// Render `story` for proofreading: the `.paths` block layout with every
/// attribute and action line left out. The output is not meant to be read back.
pub fn export_plain(story: &Story) -> String {
    PathsDocument::plain(story).to_string()
}

#[cfg(test)]
mod tests {
    use paths_data::{Action, Link, Mood, Passage};

    use super::*;

    #[test]
    fn export_drops_actions_and_attributes() {
        let mut start = Passage::new("Start", "Begin").unwrap();
        start.set_mood(Mood::Dark);
        start
            .add_link(Link::new("Go north", "Forest").unwrap().with_actions(vec![Action::Health(-10)]))
            .unwrap();
        let mut story = Story::new("Demo", start).unwrap();
        story.add_passage(Passage::new("Forest", "Trees").unwrap());

        assert_eq!(
            export_plain(&story),
            "Demo\n\n::Start\nBegin\n[Go north](Forest)\n\n::Forest\nTrees\n\n"
        );
    }
}
