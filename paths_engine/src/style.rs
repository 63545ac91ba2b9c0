//! Styling helpers for terminal output.
//!
//! The [`GameStyle`] trait applies ANSI styling via the `colored` crate.
//! Implementations for `&str` and `String` let literals be styled directly.

use colored::{ColoredString, Colorize};
use paths_data::Mood;

/// Convenience trait for applying color and style to text output.
pub trait GameStyle {
    fn story_title_style(&self) -> ColoredString;
    fn passage_title_style(&self) -> ColoredString;
    fn content_style(&self, mood: Mood) -> ColoredString;
    fn link_style(&self) -> ColoredString;
    fn stat_style(&self) -> ColoredString;
    fn goal_active_style(&self) -> ColoredString;
    fn goal_complete_style(&self) -> ColoredString;
    fn subheading_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
    fn denied_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn story_title_style(&self) -> ColoredString {
        self.bold().truecolor(223, 77, 10).underline()
    }
    fn passage_title_style(&self) -> ColoredString {
        self.truecolor(223, 77, 10).underline()
    }
    fn content_style(&self, mood: Mood) -> ColoredString {
        match mood {
            Mood::None => self.normal(),
            Mood::Calm => self.truecolor(102, 208, 250),
            Mood::Happy => self.truecolor(110, 220, 110),
            Mood::Sad => self.italic().truecolor(120, 120, 200),
            Mood::Tense => self.truecolor(230, 230, 30),
            Mood::Dark => self.italic().truecolor(150, 150, 150),
        }
    }
    fn link_style(&self) -> ColoredString {
        self.italic().truecolor(220, 180, 40)
    }
    fn stat_style(&self) -> ColoredString {
        self.bold().bright_blue()
    }
    fn goal_active_style(&self) -> ColoredString {
        self.truecolor(220, 40, 220)
    }
    fn goal_complete_style(&self) -> ColoredString {
        self.truecolor(220, 40, 220).strikethrough()
    }
    fn subheading_style(&self) -> ColoredString {
        self.underline()
    }
    fn error_style(&self) -> ColoredString {
        self.truecolor(230, 30, 30)
    }
    fn denied_style(&self) -> ColoredString {
        self.italic().truecolor(230, 30, 30)
    }
    fn prompt_style(&self) -> ColoredString {
        self.truecolor(75, 180, 255)
    }
}

impl GameStyle for String {
    fn story_title_style(&self) -> ColoredString {
        self.as_str().story_title_style()
    }
    fn passage_title_style(&self) -> ColoredString {
        self.as_str().passage_title_style()
    }
    fn content_style(&self, mood: Mood) -> ColoredString {
        self.as_str().content_style(mood)
    }
    fn link_style(&self) -> ColoredString {
        self.as_str().link_style()
    }
    fn stat_style(&self) -> ColoredString {
        self.as_str().stat_style()
    }
    fn goal_active_style(&self) -> ColoredString {
        self.as_str().goal_active_style()
    }
    fn goal_complete_style(&self) -> ColoredString {
        self.as_str().goal_complete_style()
    }
    fn subheading_style(&self) -> ColoredString {
        self.as_str().subheading_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
    fn denied_style(&self) -> ColoredString {
        self.as_str().denied_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
}
