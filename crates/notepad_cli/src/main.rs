//! `notepad` terminal front end.
//!
//! # Responsibility
//! - Turn command-line arguments into note store intents.
//! - Render the store's display list; never mutate notes directly.

mod args;
mod render;

use args::{parse_args, Command, Invocation};
use log::info;
use notepad_core::{
    default_log_level, init_logging, BlobStore, FileBlobStore, NoteStore, NoteStoreError,
    SqliteBlobStore, StoreConfig,
};
use std::error::Error;
use std::path::{Path, PathBuf};

const DATA_DIR_ENV: &str = "NOTEPAD_DIR";
const BACKEND_ENV: &str = "NOTEPAD_BACKEND";
const LOG_LEVEL_ENV: &str = "NOTEPAD_LOG";
const SQLITE_FILE_NAME: &str = "notepad.sqlite3";

const HELP: &str = "\
Usage: notepad [--dir <path>] <command>

Commands:
  list [-t <tag|all>] [-s <text>]          Show notes, newest first
  add <title> <content> [-t <tag>]         Create a note
  edit <id> [--title T] [--content C] [-t <tag>]
                                           Change a note
  delete <id>                              Remove a note
  tags                                     Show note count per tag
  ping | version                           Diagnostics

Tags: Ideas, Personal, Work, Shopping List

Environment:
  NOTEPAD_DIR       data directory (default: ~/.notepad)
  NOTEPAD_BACKEND   file | sqlite (default: file)
  NOTEPAD_LOG       trace | debug | info | warn | error
";

fn main() {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let Invocation { data_dir, command } = parse_args(args)?;
    match command {
        Command::Help => {
            print!("{HELP}");
            return Ok(());
        }
        Command::Ping => {
            println!("notepad_core ping={}", notepad_core::ping());
            return Ok(());
        }
        Command::Version => {
            println!("notepad_core version={}", notepad_core::core_version());
            return Ok(());
        }
        _ => {}
    }

    let data_dir = resolve_data_dir(data_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    start_logging(&data_dir);

    let backend = std::env::var(BACKEND_ENV)
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_else(|_| "file".to_string());
    info!("event=cli_start module=cli status=ok backend={backend}");
    match backend.as_str() {
        "file" => execute(FileBlobStore::open(&data_dir)?, command),
        "sqlite" => execute(
            SqliteBlobStore::open(data_dir.join(SQLITE_FILE_NAME))?,
            command,
        ),
        other => Err(format!("Unknown {BACKEND_ENV} `{other}`; expected file or sqlite").into()),
    }
}

fn execute<S: BlobStore>(store: S, command: Command) -> Result<(), Box<dyn Error>> {
    let mut notes = NoteStore::from_config(store, StoreConfig::default());
    // A seed that could not be written still serves this run; any later
    // successful write saves it along with the change.
    let unsaved_seed = match notes.initialize() {
        Ok(_) => None,
        Err(err) if err.applied().is_some() => Some(report_unsaved(err)),
        Err(err) => return Err(Box::new(err)),
    };

    let saved = match command {
        Command::List { tag, search } => {
            notes.set_active_tag(tag);
            if let Some(text) = search {
                notes.set_search_text(text);
            }
            print!("{}", render::render_list(&notes.visible_notes()));
            false
        }
        Command::Add {
            title,
            content,
            tag,
        } => {
            let tag = tag.unwrap_or_else(|| notes.suggested_tag());
            let note = notes
                .create(title, content, tag)
                .map_err(report_unsaved)?;
            println!("Created {}", note.id);
            true
        }
        Command::Edit {
            id,
            title,
            content,
            tag,
        } => {
            let current = notes.get(&id).cloned();
            let (title, content, tag) = match current {
                Some(note) => (
                    title.unwrap_or(note.title),
                    content.unwrap_or(note.content),
                    tag.unwrap_or(note.tag),
                ),
                None => (
                    title.unwrap_or_default(),
                    content.unwrap_or_default(),
                    tag.unwrap_or_default(),
                ),
            };
            let note = notes
                .update(&id, title, content, tag)
                .map_err(report_unsaved)?;
            println!("Updated {}", note.id);
            true
        }
        Command::Delete { id } => {
            let removed = notes.delete(&id).map_err(report_unsaved)?;
            if removed {
                println!("Deleted {id}");
            } else {
                println!("No note with id {id}");
            }
            removed
        }
        Command::Tags => {
            print!("{}", render::render_tag_counts(&notes.tag_counts()));
            false
        }
        Command::Help | Command::Ping | Command::Version => false,
    };

    match unsaved_seed {
        Some(err) if !saved => Err(err),
        _ => Ok(()),
    }
}

/// Warns when a change is held only in memory.
fn report_unsaved(err: NoteStoreError) -> Box<dyn Error> {
    if err.applied().is_some() {
        eprintln!("warning: the change was applied but could not be saved");
    }
    Box::new(err)
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf, Box<dyn Error>> {
    let dir = match flag.or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from)) {
        Some(dir) => dir,
        None => {
            let home = std::env::var_os("HOME")
                .ok_or("Cannot locate home directory; set NOTEPAD_DIR or pass --dir")?;
            Path::new(&home).join(".notepad")
        }
    };

    if dir.is_absolute() {
        Ok(dir)
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}

fn start_logging(data_dir: &Path) {
    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_log_level().to_string());
    let log_dir = data_dir.join("logs");
    if let Err(err) = init_logging(&level, &log_dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }
}
