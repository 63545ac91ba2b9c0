#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! Terminal player for Paths gamebooks.
//! Usage: paths_engine [story name]

use std::env;

use anyhow::Result;
use colored::Colorize;
use log::info;

use paths_engine::config::CONFIG_FILE;
use paths_engine::data_paths::{data_path, data_root};
use paths_engine::{PATHS_VERSION, StoryLibrary, load_config, run_repl};

fn main() -> Result<()> {
    env_logger::init();
    info!("Start: paths_engine {PATHS_VERSION}");
    let config = load_config(&data_path(CONFIG_FILE));
    let library = StoryLibrary::from_config(data_root(), &config.library);
    info!(
        "library: stories in {}, saves in {}",
        library.stories_dir().display(),
        library.saves_dir().display()
    );

    let start = env::args().skip(1).collect::<Vec<_>>().join(" ");
    println!("{:^60}", "PATHS".bright_yellow().underline());
    println!("{:^60}\n", "type 'help' for commands");

    run_repl(library, config, Some(start.as_str()).filter(|name| !name.is_empty()))
}
