//! Story and save-slot storage on disk.
//!
//! Stories live in one directory as `<slug>.paths` or `<slug>.json`, where
//! the slug is derived from the story title. Saved sessions live in another
//! directory as `<slot>.json`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use log::{info, warn};
use paths_data::{Story, StoryReport};
use paths_script::{ParseError, parse_story, write_story};
use thiserror::Error;

use crate::config::LibraryConfig;
use crate::json::{DecodeError, decode_session, decode_story, encode_session, encode_story};
use crate::session::Session;
use crate::slug::sanitize_slug;

#[derive(Debug, Error)]
pub enum LibraryError {
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
    #[error("{path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
    #[error("unable to encode '{path}': {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no {kind} named '{name}'")]
    NotFound { kind: &'static str, name: String },
    #[error("'{path}' already holds the story '{existing}', not '{title}'")]
    TitleConflict {
        path: PathBuf,
        existing: String,
        title: String,
    },
}

impl LibraryError {
    fn io(path: &Path, source: io::Error) -> Self {
        LibraryError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// On-disk encoding of a story file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryFormat {
    Paths,
    Json,
}

impl StoryFormat {
    /// Lookup order when opening a story by name.
    pub const ALL: [StoryFormat; 2] = [StoryFormat::Paths, StoryFormat::Json];

    pub fn extension(self) -> &'static str {
        match self {
            StoryFormat::Paths => "paths",
            StoryFormat::Json => "json",
        }
    }

    pub fn from_path(path: &Path) -> Option<StoryFormat> {
        let ext = path.extension()?.to_str()?;
        StoryFormat::ALL.into_iter().find(|format| format.extension() == ext)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryStatus {
    Ready { report: StoryReport },
    Corrupted { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryEntry {
    /// File stem; pass it to [`StoryLibrary::open_story`].
    pub name: String,
    pub path: PathBuf,
    pub format: StoryFormat,
    pub modified: Option<SystemTime>,
    pub status: StoryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub story_title: String,
    pub player_name: String,
    pub passage: String,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Ready { summary: SessionSummary },
    Corrupted { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub slot: String,
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryLibrary {
    stories_dir: PathBuf,
    saves_dir: PathBuf,
}

impl StoryLibrary {
    pub fn new(stories_dir: impl Into<PathBuf>, saves_dir: impl Into<PathBuf>) -> Self {
        StoryLibrary {
            stories_dir: stories_dir.into(),
            saves_dir: saves_dir.into(),
        }
    }

    /// Library rooted at `root` using the configured directory names.
    pub fn from_config(root: &Path, config: &LibraryConfig) -> Self {
        StoryLibrary::new(root.join(&config.stories_dir), root.join(&config.saves_dir))
    }

    pub fn stories_dir(&self) -> &Path {
        &self.stories_dir
    }

    pub fn saves_dir(&self) -> &Path {
        &self.saves_dir
    }

    /// Path a story with `title` is stored under in `format`.
    pub fn story_path(&self, title: &str, format: StoryFormat) -> PathBuf {
        self.stories_dir
            .join(format!("{}.{}", sanitize_slug(title), format.extension()))
    }

    pub fn session_path(&self, slot: &str) -> PathBuf {
        self.saves_dir.join(format!("{}.json", sanitize_slug(slot)))
    }

    /// Every story file in the library, sorted by name. A file that fails to
    /// load is listed as corrupted rather than failing the listing.
    ///
    /// # Errors
    /// - if the stories directory exists but cannot be read
    pub fn list_stories(&self) -> Result<Vec<StoryEntry>, LibraryError> {
        let mut entries: Vec<StoryEntry> = collect_files(&self.stories_dir)?
            .into_iter()
            .filter_map(|(path, modified)| {
                let format = StoryFormat::from_path(&path)?;
                let name = path.file_stem()?.to_str()?.to_string();
                let status = match read_story(&path, format) {
                    Ok(story) => StoryStatus::Ready {
                        report: StoryReport::analyze(&story),
                    },
                    Err(err) => {
                        warn!("story file '{}' failed to load: {err}", path.display());
                        StoryStatus::Corrupted {
                            message: trim_error(&err),
                        }
                    },
                };
                Some(StoryEntry {
                    name,
                    path,
                    format,
                    modified,
                    status,
                })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then(a.path.cmp(&b.path)));
        Ok(entries)
    }

    /// Open a story by name (a title or file stem). `.paths` is tried before `.json`.
    ///
    /// # Errors
    /// - if no file exists for the name, or the file fails to load
    pub fn open_story(&self, name: &str) -> Result<Story, LibraryError> {
        for format in StoryFormat::ALL {
            let path = self.story_path(name, format);
            if path.is_file() {
                let story = read_story(&path, format)?;
                info!("opened story '{}' from {}", story.title(), path.display());
                return Ok(story);
            }
        }
        Err(LibraryError::NotFound {
            kind: "story",
            name: name.to_string(),
        })
    }

    /// Save `story` under its title, replacing an older version of the same
    /// story in either format. The new file is the only copy left behind, so
    /// [`StoryLibrary::open_story`] cannot pick up a stale one.
    ///
    /// # Errors
    /// - if a file for the title's slug holds a different story, or the
    ///   story cannot be encoded or written
    pub fn save_story(&self, story: &Story, format: StoryFormat) -> Result<PathBuf, LibraryError> {
        let mut stale = Vec::new();
        for existing_format in StoryFormat::ALL {
            let existing_path = self.story_path(story.title(), existing_format);
            if !existing_path.is_file() {
                continue;
            }
            match read_story(&existing_path, existing_format) {
                Ok(existing) if existing.title() != story.title() => {
                    return Err(LibraryError::TitleConflict {
                        path: existing_path,
                        existing: existing.title().to_string(),
                        title: story.title().to_string(),
                    });
                },
                Ok(_) => {},
                Err(err) => warn!("replacing unreadable story file '{}': {err}", existing_path.display()),
            }
            if existing_format != format {
                stale.push(existing_path);
            }
        }

        let path = self.story_path(story.title(), format);
        let text = match format {
            StoryFormat::Paths => write_story(story),
            StoryFormat::Json => encode_story(story).map_err(|source| LibraryError::Encode {
                path: path.clone(),
                source,
            })?,
        };
        write_file(&path, &text)?;
        for old in stale {
            fs::remove_file(&old).map_err(|source| LibraryError::io(&old, source))?;
            info!("removed older copy {}", old.display());
        }
        info!("saved story '{}' to {}", story.title(), path.display());
        Ok(path)
    }

    /// # Errors
    /// - if the session cannot be encoded or written
    pub fn save_session(&self, slot: &str, session: &Session) -> Result<PathBuf, LibraryError> {
        let path = self.session_path(slot);
        let json = encode_session(session).map_err(|source| LibraryError::Encode {
            path: path.clone(),
            source,
        })?;
        write_file(&path, &json)?;
        info!("saved session '{slot}' to {}", path.display());
        Ok(path)
    }

    /// # Errors
    /// - if the slot does not exist or the save fails to load
    pub fn load_session(&self, slot: &str) -> Result<Session, LibraryError> {
        let path = self.session_path(slot);
        if !path.is_file() {
            return Err(LibraryError::NotFound {
                kind: "saved session",
                name: slot.to_string(),
            });
        }
        let session = read_session(&path)?;
        info!("loaded session '{slot}' from {}", path.display());
        Ok(session)
    }

    /// Saved sessions, most recently modified first.
    ///
    /// # Errors
    /// - if the saves directory exists but cannot be read
    pub fn list_sessions(&self) -> Result<Vec<SessionEntry>, LibraryError> {
        let mut entries: Vec<SessionEntry> = collect_files(&self.saves_dir)?
            .into_iter()
            .filter(|(path, _)| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .filter_map(|(path, modified)| {
                let slot = path.file_stem()?.to_str()?.to_string();
                let status = match read_session(&path) {
                    Ok(session) => SessionStatus::Ready {
                        summary: SessionSummary {
                            story_title: session.story().title().to_string(),
                            player_name: session.player().name().to_string(),
                            passage: session.current().title().to_string(),
                            finished: session.is_finished(),
                        },
                    },
                    Err(err) => {
                        warn!("failed to load save '{slot}' ({}): {err}", path.display());
                        SessionStatus::Corrupted {
                            message: trim_error(&err),
                        }
                    },
                };
                Some(SessionEntry {
                    slot,
                    path,
                    modified,
                    status,
                })
            })
            .collect();
        entries.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.slot.cmp(&b.slot)));
        Ok(entries)
    }
}

fn read_story(path: &Path, format: StoryFormat) -> Result<Story, LibraryError> {
    let raw = fs::read_to_string(path).map_err(|source| LibraryError::io(path, source))?;
    match format {
        StoryFormat::Paths => parse_story(&raw).map_err(|source| LibraryError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        StoryFormat::Json => decode_story(&raw).map_err(|source| LibraryError::Decode {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_session(path: &Path) -> Result<Session, LibraryError> {
    let raw = fs::read_to_string(path).map_err(|source| LibraryError::io(path, source))?;
    decode_session(&raw).map_err(|source| LibraryError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), LibraryError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| LibraryError::io(dir, source))?;
    }
    fs::write(path, contents).map_err(|source| LibraryError::io(path, source))
}

/// Regular files directly inside `dir`, with their modification times.
/// A missing directory holds no files.
fn collect_files(dir: &Path) -> Result<Vec<(PathBuf, Option<SystemTime>)>, LibraryError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|source| LibraryError::io(dir, source))? {
        let entry = entry.map_err(|source| LibraryError::io(dir, source))?;
        let path = entry.path();
        if path.is_file() {
            let modified = entry.metadata().ok().and_then(|meta| meta.modified().ok());
            files.push((path, modified));
        }
    }
    Ok(files)
}

/// Format a human-friendly modified time relative to now.
pub fn format_modified(modified: SystemTime) -> String {
    match SystemTime::now().duration_since(modified) {
        Ok(delta) => format_duration(delta),
        Err(_) => "in the future".to_string(),
    }
}

fn format_duration(duration: Duration) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = MINUTE * 60;
    const DAY: u64 = HOUR * 24;

    let secs = duration.as_secs();
    if secs < MINUTE {
        "just now".to_string()
    } else if secs < HOUR {
        format!("{}m ago", secs / MINUTE)
    } else if secs < DAY {
        format!("{}h ago", secs / HOUR)
    } else {
        format!("{}d ago", secs / DAY)
    }
}

/// Clamp verbose error messages to a readable length.
fn trim_error(err: &impl ToString) -> String {
    let message = err.to_string();
    if message.chars().count() <= 120 {
        return message;
    }
    let mut trimmed: String = message.chars().take(117).collect();
    trimmed.push_str("...");
    trimmed
}
