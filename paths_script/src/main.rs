//! CLI entry point for paths_script.
//! Usage: cargo run -p paths_script -- check stories/demo.paths

use std::path::Path;
use std::{env, fs, process};

use paths_data::StoryReport;
use paths_script::{ScriptError, export_plain, read_story_file, write_story};

const USAGE: &str = "Usage:\n  paths_script check <file.paths> [--deny-broken]\n  paths_script fmt <file.paths> [--out <out.paths>]\n  paths_script export <file.paths> [--out <out.txt>]";

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    // Accept both `<bin> -- <cmd> ...` and `<bin> <cmd> ...`
    let rest: &[String] = match args.as_slice() {
        [_, flag, tail @ ..] if flag == "--" => tail,
        [_, tail @ ..] => tail,
        [] => &[],
    };
    let Some((cmd, tail)) = rest.split_first() else {
        eprintln!("{USAGE}");
        process::exit(2);
    };
    match cmd.as_str() {
        "check" => run_check(tail),
        "fmt" => run_render(tail, write_story),
        "export" => run_render(tail, export_plain),
        other => {
            eprintln!("unknown command: {other}\n{USAGE}");
            process::exit(2);
        },
    }
}

struct Args {
    path: String,
    out: Option<String>,
    deny_broken: bool,
}

fn parse_args(args: &[String]) -> Args {
    let mut path: Option<String> = None;
    let mut out: Option<String> = None;
    let mut deny_broken = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--out" => {
                let Some(target) = args.get(i + 1) else {
                    eprintln!("--out requires a filepath");
                    process::exit(2);
                };
                out = Some(target.clone());
                i += 2;
                continue;
            },
            "--deny-broken" => deny_broken = true,
            s => {
                if path.is_none() {
                    path = Some(s.to_string());
                }
            },
        }
        i += 1;
    }
    let Some(path) = path else {
        eprintln!("{USAGE}");
        process::exit(2);
    };
    Args { path, out, deny_broken }
}

fn load(path: &str) -> paths_data::Story {
    read_story_file(Path::new(path)).unwrap_or_else(|e| {
        match &e {
            ScriptError::Io { .. } => eprintln!("error: {e}"),
            ScriptError::Parse { .. } => eprintln!("parse error: {e}"),
        }
        process::exit(1);
    })
}

fn run_check(args: &[String]) {
    let args = parse_args(args);
    let story = load(&args.path);
    let report = StoryReport::analyze(&story);
    println!("{}: '{}' with {} passage(s)", args.path, report.title, report.passage_count);
    for finding in report.findings() {
        println!("  - {finding}");
    }
    if args.deny_broken && !report.broken_links.is_empty() {
        eprintln!("check failed: {} broken link(s)", report.broken_links.len());
        process::exit(1);
    }
}

fn run_render(args: &[String], render: fn(&paths_data::Story) -> String) {
    let args = parse_args(args);
    let story = load(&args.path);
    let text = render(&story);
    if let Some(out) = args.out {
        fs::write(&out, text).unwrap_or_else(|e| {
            eprintln!("error: writing '{out}': {e}");
            process::exit(1);
        });
    } else {
        print!("{text}");
    }
}
