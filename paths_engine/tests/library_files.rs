use std::fs;
use std::path::Path;

use anyhow::Result;
use paths_data::{Game, LinkKey, Player};
use paths_engine::config::{CONFIG_FILE, LibraryConfig, load_config};
use paths_engine::library::{SessionStatus, StoryStatus};
use paths_engine::{LibraryError, Session, StoryFormat, StoryLibrary};
use tempfile::tempdir;

const MANOR: &str = include_str!("../data/stories/the-haunted-manor.paths");
const LIGHTHOUSE: &str = include_str!("../data/stories/the-lighthouse.json");

fn seeded_library(root: &Path) -> Result<StoryLibrary> {
    let library = StoryLibrary::from_config(root, &LibraryConfig::default());
    fs::create_dir_all(library.stories_dir())?;
    fs::write(library.stories_dir().join("the-haunted-manor.paths"), MANOR)?;
    fs::write(library.stories_dir().join("the-lighthouse.json"), LIGHTHOUSE)?;
    Ok(library)
}

#[test]
fn bundled_data_loads() -> Result<()> {
    let config = load_config(&Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(CONFIG_FILE));
    assert_eq!(config.goals.len(), 2);
    assert_eq!(config.player.to_player()?.health(), 100);

    let dir = tempdir()?;
    let library = seeded_library(dir.path())?;
    let entries = library.list_stories()?;
    assert_eq!(entries.len(), 2);
    for entry in &entries {
        match &entry.status {
            StoryStatus::Ready { report } => assert!(report.is_playable(), "{}", report.title),
            StoryStatus::Corrupted { message } => panic!("{} failed to load: {message}", entry.name),
        }
    }
    Ok(())
}

#[test]
fn corrupted_story_is_listed_not_fatal() -> Result<()> {
    let dir = tempdir()?;
    let library = seeded_library(dir.path())?;
    fs::write(library.stories_dir().join("broken.paths"), "Broken\n\n::Start\n")?;

    let entries = library.list_stories()?;
    assert_eq!(entries.len(), 3);
    let broken = entries.iter().find(|entry| entry.name == "broken").expect("listed");
    assert!(matches!(broken.status, StoryStatus::Corrupted { .. }));
    assert!(matches!(library.open_story("broken"), Err(LibraryError::Parse { .. })));
    Ok(())
}

#[test]
fn open_by_title_or_stem() -> Result<()> {
    let dir = tempdir()?;
    let library = seeded_library(dir.path())?;
    assert_eq!(library.open_story("The Haunted Manor")?.title(), "The Haunted Manor");
    assert_eq!(library.open_story("the-lighthouse")?.title(), "The Lighthouse");
    assert!(matches!(library.open_story("Nothing"), Err(LibraryError::NotFound { .. })));
    Ok(())
}

#[test]
fn save_story_in_both_formats() -> Result<()> {
    let dir = tempdir()?;
    let source = seeded_library(dir.path())?;
    let story = source.open_story("The Lighthouse")?;

    let target = StoryLibrary::new(dir.path().join("copy"), dir.path().join("copy-saves"));
    let paths_file = target.save_story(&story, StoryFormat::Paths)?;
    assert!(paths_file.ends_with("the-lighthouse.paths"));
    let json_file = target.save_story(&story, StoryFormat::Json)?;
    assert!(json_file.ends_with("the-lighthouse.json"));
    assert!(!paths_file.exists(), "the older .paths copy is removed");

    assert!(target.open_story("The Lighthouse")?.is_identical(&story));
    // saving the same story again replaces it
    target.save_story(&story, StoryFormat::Paths)?;
    Ok(())
}

#[test]
fn session_save_and_load() -> Result<()> {
    let dir = tempdir()?;
    let library = seeded_library(dir.path())?;
    let story = library.open_story("The Lighthouse")?;
    let player = Player::new("Keeper", 20, 0, 0)?;
    let mut session = Session::begin(Game::new(player, story, Vec::new()));
    session.choose(&LinkKey::new("Climb the cliff path", "Stairs"))?;

    library.save_session("Slot 1", &session)?;
    let loaded = library.load_session("slot 1")?;
    assert_eq!(loaded.current().title(), "Stairs");
    assert_eq!(loaded.player().health(), 15);
    assert_eq!(loaded.visited(), ["Shore", "Stairs"]);

    let entries = library.list_sessions()?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].slot, "slot-1");
    match &entries[0].status {
        SessionStatus::Ready { summary } => {
            assert_eq!(summary.story_title, "The Lighthouse");
            assert_eq!(summary.passage, "Stairs");
            assert!(!summary.finished);
        },
        SessionStatus::Corrupted { message } => panic!("save failed to load: {message}"),
    }

    assert!(matches!(library.load_session("missing"), Err(LibraryError::NotFound { .. })));
    Ok(())
}

#[test]
fn corrupted_save_is_listed() -> Result<()> {
    let dir = tempdir()?;
    let library = seeded_library(dir.path())?;
    fs::create_dir_all(library.saves_dir())?;
    fs::write(library.saves_dir().join("bad.json"), "{ not json")?;
    let entries = library.list_sessions()?;
    assert!(matches!(entries[0].status, SessionStatus::Corrupted { .. }));
    assert!(matches!(library.load_session("bad"), Err(LibraryError::Decode { .. })));
    Ok(())
}
