//! Command-line parsing for the `notepad` binary.

use notepad_core::{NoteId, NoteTag, TagFilter};
use std::error::Error;
use std::path::PathBuf;

/// One parsed user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List {
        tag: TagFilter,
        search: Option<String>,
    },
    Add {
        title: String,
        content: String,
        tag: Option<NoteTag>,
    },
    Edit {
        id: NoteId,
        title: Option<String>,
        content: Option<String>,
        tag: Option<NoteTag>,
    },
    Delete {
        id: NoteId,
    },
    Tags,
    Ping,
    Version,
    Help,
}

/// Parsed command plus global flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub data_dir: Option<PathBuf>,
    pub command: Command,
}

struct ArgParser {
    iter: std::vec::IntoIter<String>,
    command_name: String,
}

impl ArgParser {
    fn new(args: Vec<String>, command_name: &str) -> Self {
        Self {
            iter: args.into_iter(),
            command_name: command_name.to_string(),
        }
    }

    fn extract_value(&mut self, flag: &str) -> Result<String, Box<dyn Error>> {
        self.iter.next().ok_or_else(|| {
            format!("Provide a value after {} for {}", flag, self.command_name).into()
        })
    }

    fn extract_tag(&mut self, flag: &str) -> Result<NoteTag, Box<dyn Error>> {
        let value = self.extract_value(flag)?;
        NoteTag::parse(&value).ok_or_else(|| unknown_tag(&value))
    }

    fn next_positional(&mut self, what: &str) -> Result<String, Box<dyn Error>> {
        self.iter
            .next()
            .ok_or_else(|| format!("Provide {} for {}", what, self.command_name).into())
    }

    #[allow(clippy::should_implement_trait)]
    fn next(&mut self) -> Option<String> {
        self.iter.next()
    }
}

fn unknown_tag(value: &str) -> Box<dyn Error> {
    let known = NoteTag::ALL
        .iter()
        .map(|tag| tag.label())
        .collect::<Vec<_>>()
        .join(", ");
    format!("Unknown tag `{value}`; expected one of: {known}").into()
}

/// Parses process arguments (without the program name).
pub fn parse_args(args: Vec<String>) -> Result<Invocation, Box<dyn Error>> {
    let mut data_dir = None;
    let mut rest = args.into_iter();
    let command_name = loop {
        match rest.next() {
            Some(flag) if flag == "--dir" => {
                let value = rest
                    .next()
                    .ok_or("Provide a directory after --dir")?;
                data_dir = Some(PathBuf::from(value));
            }
            Some(name) => break Some(name),
            None => break None,
        }
    };

    let Some(command_name) = command_name else {
        return Ok(Invocation {
            data_dir,
            command: Command::Help,
        });
    };

    let mut parser = ArgParser::new(rest.collect(), &command_name);
    let command = match command_name.as_str() {
        "list" | "ls" => parse_list(&mut parser)?,
        "add" | "new" => parse_add(&mut parser)?,
        "edit" => parse_edit(&mut parser)?,
        "delete" | "rm" => {
            let id = parser.next_positional("a note id")?;
            reject_extra(&mut parser)?;
            Command::Delete { id: id.into() }
        }
        "tags" => Command::Tags,
        "ping" => Command::Ping,
        "version" | "--version" => Command::Version,
        "help" | "-h" | "--help" => Command::Help,
        other => return Err(format!("Unknown command: {other}").into()),
    };

    Ok(Invocation { data_dir, command })
}

fn parse_list(parser: &mut ArgParser) -> Result<Command, Box<dyn Error>> {
    let mut tag = TagFilter::All;
    let mut search = None;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "-t" | "--tag" => {
                let value = parser.extract_value(&arg)?;
                tag = TagFilter::parse(&value).ok_or_else(|| unknown_tag(&value))?;
            }
            "-s" | "--search" => search = Some(parser.extract_value(&arg)?),
            other => return Err(format!("Unexpected argument: {other}").into()),
        }
    }
    Ok(Command::List { tag, search })
}

fn parse_add(parser: &mut ArgParser) -> Result<Command, Box<dyn Error>> {
    let mut positional = Vec::new();
    let mut tag = None;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "-t" | "--tag" => tag = Some(parser.extract_tag(&arg)?),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let (Some(title), Some(content), None) =
        (positional.next(), positional.next(), positional.next())
    else {
        return Err("Usage: notepad add <title> <content> [-t <tag>]".into());
    };
    Ok(Command::Add {
        title,
        content,
        tag,
    })
}

fn parse_edit(parser: &mut ArgParser) -> Result<Command, Box<dyn Error>> {
    let id = parser.next_positional("a note id")?;
    let mut title = None;
    let mut content = None;
    let mut tag = None;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "--title" => title = Some(parser.extract_value(&arg)?),
            "--content" => content = Some(parser.extract_value(&arg)?),
            "-t" | "--tag" => tag = Some(parser.extract_tag(&arg)?),
            other => return Err(format!("Unexpected argument: {other}").into()),
        }
    }
    Ok(Command::Edit {
        id: id.into(),
        title,
        content,
        tag,
    })
}

fn reject_extra(parser: &mut ArgParser) -> Result<(), Box<dyn Error>> {
    match parser.next() {
        Some(extra) => Err(format!("Unexpected argument: {extra}").into()),
        None => Ok(()),
    }
}
