//! Read-eval-print loop for playing stories from the library.
//!
//! Outside a game the player browses the library (`list`, `play`, `saves`,
//! `load`). Inside a game a number picks one of the offered links.

use anyhow::{Context, Result};
use log::{info, warn};
use paths_data::Game;
use textwrap::{fill, termwidth};

use crate::config::EngineConfig;
use crate::input::{InputEvent, InputManager};
use crate::library::{SessionStatus, StoryLibrary, StoryStatus, format_modified};
use crate::session::Session;
use crate::style::GameStyle;

/// Words offered by tab completion.
pub const COMMAND_WORDS: &[&str] = &[
    "goals", "help", "list", "load", "look", "play", "quit", "save", "saves", "status",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 1-based index into the offered links.
    Choose(usize),
    Look,
    Status,
    Goals,
    List,
    Play(String),
    Save(String),
    Saves,
    Load(String),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    if let Ok(index) = input.parse::<usize>() {
        return Command::Choose(index);
    }
    let (verb, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
    let rest = rest.trim().to_string();
    match (verb.to_lowercase().as_str(), rest.is_empty()) {
        ("look" | "l", true) => Command::Look,
        ("status" | "stats", true) => Command::Status,
        ("goals", true) => Command::Goals,
        ("list" | "ls", true) => Command::List,
        ("saves", true) => Command::Saves,
        ("help" | "?", true) => Command::Help,
        ("quit" | "exit" | "q", true) => Command::Quit,
        ("play", false) => Command::Play(rest),
        ("save", false) => Command::Save(rest),
        ("load", false) => Command::Load(rest),
        _ => Command::Unknown(input.to_string()),
    }
}

/// Whether the loop should keep going after a command.
enum ReplControl {
    Continue,
    Quit,
}

struct Repl {
    library: StoryLibrary,
    config: EngineConfig,
    session: Option<Session>,
    width: usize,
}

/// Run the player loop until the user quits or input ends.
///
/// # Errors
/// - if reading player input fails
pub fn run_repl(library: StoryLibrary, config: EngineConfig, start: Option<&str>) -> Result<()> {
    let width = match config.display.wrap_width {
        0 => termwidth(),
        width => width,
    };
    let mut input_manager = InputManager::new(library.saves_dir());
    let mut repl = Repl {
        library,
        config,
        session: None,
        width,
    };

    if let Some(name) = start {
        repl.play(name);
    } else {
        repl.list_stories();
    }

    loop {
        let prompt = repl.prompt().prompt_style().to_string();
        let line = match input_manager.read_line(&prompt) {
            Ok(InputEvent::Line(line)) => line,
            Ok(InputEvent::Eof) => break,
            Ok(InputEvent::Interrupted) => {
                println!("Command canceled.");
                continue;
            },
            Err(err) => {
                warn!("input failed: {err}");
                return Err(err).context("reading player input");
            },
        };
        if line.trim().is_empty() {
            continue;
        }
        if let ReplControl::Quit = repl.handle(parse_command(&line)) {
            break;
        }
    }
    info!("player loop finished");
    Ok(())
}

impl Repl {
    fn prompt(&self) -> String {
        match &self.session {
            Some(session) => {
                let player = session.player();
                format!(
                    "\n[HP {} | Score {} | Gold {}]>> ",
                    player.health(),
                    player.score(),
                    player.gold()
                )
            },
            None => "\n[library]>> ".to_string(),
        }
    }

    fn handle(&mut self, command: Command) -> ReplControl {
        match command {
            Command::Choose(index) => self.choose(index),
            Command::Look => self.with_session(|repl, session| repl.show_passage(session)),
            Command::Status => self.with_session(|_, session| show_status(session)),
            Command::Goals => self.with_session(|_, session| show_goals(session)),
            Command::List => self.list_stories(),
            Command::Play(name) => self.play(&name),
            Command::Save(slot) => self.save(&slot),
            Command::Saves => self.list_saves(),
            Command::Load(slot) => self.load(&slot),
            Command::Help => show_help(),
            Command::Quit => return ReplControl::Quit,
            Command::Unknown(text) => println!("{}", format!("Didn't catch \"{text}\". Type 'help'.").denied_style()),
        }
        ReplControl::Continue
    }

    fn with_session(&self, show: impl FnOnce(&Repl, &Session)) {
        match &self.session {
            Some(session) => show(self, session),
            None => println!("{}", "No game in progress. Try 'play <story>'.".denied_style()),
        }
    }

    fn list_stories(&self) {
        println!("{}", "Stories".subheading_style());
        match self.library.list_stories() {
            Ok(entries) if entries.is_empty() => {
                println!("  (none in {})", self.library.stories_dir().display());
            },
            Ok(entries) => {
                for entry in entries {
                    let age = entry.modified.map(format_modified).unwrap_or_default();
                    match entry.status {
                        StoryStatus::Ready { report } => {
                            let warning = if report.broken_links.is_empty() {
                                String::new()
                            } else {
                                format!(" ({} broken link(s))", report.broken_links.len())
                            };
                            println!(
                                "  {} - {}, {} passage(s){warning} {age}",
                                entry.name,
                                report.title.story_title_style(),
                                report.passage_count
                            );
                        },
                        StoryStatus::Corrupted { message } => {
                            println!("  {} - {}", entry.name, message.error_style());
                        },
                    }
                }
            },
            Err(err) => println!("{}", err.to_string().error_style()),
        }
    }

    fn play(&mut self, name: &str) {
        let story = match self.library.open_story(name) {
            Ok(story) => story,
            Err(err) => {
                println!("{}", err.to_string().error_style());
                return;
            },
        };
        let player = match self.config.player.to_player() {
            Ok(player) => player,
            Err(err) => {
                println!("{}", format!("invalid player settings: {err}").error_style());
                return;
            },
        };
        println!("\n{}\n", story.title().story_title_style());
        let session = Session::begin(Game::new(player, story, self.config.goals.clone()));
        self.show_passage(&session);
        self.session = Some(session);
    }

    fn choose(&mut self, index: usize) {
        let Some(session) = self.session.as_mut() else {
            println!("{}", "No game in progress. Try 'play <story>'.".denied_style());
            return;
        };
        let key = session
            .available_links()
            .get(index.wrapping_sub(1))
            .map(|link| link.key().clone());
        let Some(key) = key else {
            println!("{}", format!("There is no choice {index}.").denied_style());
            return;
        };
        if let Err(err) = session.choose(&key) {
            println!("{}", err.to_string().error_style());
            return;
        }
        if let Some(session) = self.session.as_ref() {
            self.show_passage(session);
        }
    }

    fn show_passage(&self, session: &Session) {
        let passage = session.current();
        println!("{}", passage.title().passage_title_style());
        println!("{}", fill(passage.content(), self.width).content_style(passage.mood()));
        if session.is_finished() {
            println!("\n{}", "THE END".story_title_style());
            show_goals(session);
            return;
        }
        let links = session.available_links();
        if links.is_empty() {
            println!("{}", "Every way onward is closed.".denied_style());
        }
        for (index, link) in links.iter().enumerate() {
            println!("  {}) {}", index + 1, link.text().link_style());
        }
    }

    fn save(&self, slot: &str) {
        let Some(session) = &self.session else {
            println!("{}", "No game in progress to save.".denied_style());
            return;
        };
        match self.library.save_session(slot, session) {
            Ok(path) => println!("Saved to {}.", path.display()),
            Err(err) => println!("{}", err.to_string().error_style()),
        }
    }

    fn list_saves(&self) {
        println!("{}", "Saved games".subheading_style());
        match self.library.list_sessions() {
            Ok(entries) if entries.is_empty() => println!("  (none)"),
            Ok(entries) => {
                for entry in entries {
                    let age = entry.modified.map(format_modified).unwrap_or_default();
                    match entry.status {
                        SessionStatus::Ready { summary } => println!(
                            "  {} - {} as {} at '{}'{} {age}",
                            entry.slot,
                            summary.story_title,
                            summary.player_name,
                            summary.passage,
                            if summary.finished { " (finished)" } else { "" }
                        ),
                        SessionStatus::Corrupted { message } => {
                            println!("  {} - {}", entry.slot, message.error_style());
                        },
                    }
                }
            },
            Err(err) => println!("{}", err.to_string().error_style()),
        }
    }

    fn load(&mut self, slot: &str) {
        match self.library.load_session(slot) {
            Ok(session) => {
                println!("\n{}\n", session.story().title().story_title_style());
                self.show_passage(&session);
                self.session = Some(session);
            },
            Err(err) => println!("{}", err.to_string().error_style()),
        }
    }
}

fn show_status(session: &Session) {
    let player = session.player();
    println!("{}", player.name().subheading_style());
    println!("  health {}", player.health().to_string().stat_style());
    println!("  score  {}", player.score().to_string().stat_style());
    println!("  gold   {}", player.gold().to_string().stat_style());
    if !player.inventory().is_empty() {
        println!("  carrying {}", player.inventory().join(", "));
    }
}

fn show_goals(session: &Session) {
    println!("{}", "Goals".subheading_style());
    for status in session.goal_report() {
        let text = status.goal.to_string();
        if status.fulfilled {
            println!("  [x] {}", text.goal_complete_style());
        } else {
            println!("  [ ] {}", text.goal_active_style());
        }
    }
}

fn show_help() {
    println!("{}", "Commands".subheading_style());
    println!("  list            stories in the library");
    println!("  play <story>    start a story by name");
    println!("  <number>        follow one of the offered choices");
    println!("  look            show the current passage again");
    println!("  status, goals   player state and goal progress");
    println!("  save <slot>     save the game in progress");
    println!("  saves           list saved games");
    println!("  load <slot>     resume a saved game");
    println!("  quit            leave");
}
