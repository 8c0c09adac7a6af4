//! Parsing of input lines into commands.

use thiserror::Error;
use weekboard_model::{CloudId, SortMode, TaskId, Weekday};

/// A line typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add { day: Weekday, title: String },
    Move { task: TaskId, day: Weekday },
    Delete(TaskId),
    Pin(TaskId),
    Sort(SortMode),
    Clear,
    Open(TaskId),
    Close,
    Cloud,
    Text { cloud: CloudId, text: String },
    Drag { cloud: CloudId, dx: f64, dy: f64 },
    Group(Vec<CloudId>),
    Ungroup(Vec<CloudId>),
    ZoomIn,
    ZoomOut,
    History,
    Preview(usize),
    Exit,
    Rollback(usize),
    Undo,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid {what}: {value}")]
    Invalid { what: &'static str, value: String },
}

pub const HELP: &str = "\
add <day> <title>      add a task
move <task> <day>      move a task to another day
delete <task>          delete a task and its board
pin <task>             toggle pinning
sort created|alpha     change task order
clear                  delete all unpinned tasks
open <task> / close    show or hide a task's board
cloud                  add a cloud to the open board
text <cloud> <text>    set a cloud's text
drag <cloud> <dx> <dy> drag a cloud (and its group) by screen pixels
group <cloud>...       group clouds
ungroup <cloud>...     ungroup clouds
zoom in|out            zoom the open board
history                list history entries
preview <n> / exit     inspect an entry read-only / leave preview
rollback <n>           return to an entry, discarding later ones
undo                   step back one entry
quit                   leave";

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));
        let mut args = rest.split_whitespace();

        let command = match name.to_lowercase().as_str() {
            "" => return Err(ParseError::Empty),
            "add" => {
                let (day, title) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(ParseError::Usage("add <day> <title>"))?;
                Self::Add {
                    day: parse_day(day)?,
                    title: title.trim().to_owned(),
                }
            }
            "move" => {
                let usage = ParseError::Usage("move <task> <day>");
                let task = number(args.next().ok_or_else(|| usage.clone())?, "task id")?;
                let day = parse_day(args.next().ok_or(usage)?)?;
                Self::Move { task, day }
            }
            "delete" => Self::Delete(single(&mut args, "delete <task>", "task id")?),
            "pin" => Self::Pin(single(&mut args, "pin <task>", "task id")?),
            "sort" => {
                let mode = args.next().ok_or(ParseError::Usage("sort created|alpha"))?;
                Self::Sort(mode.parse().map_err(|_| ParseError::Invalid {
                    what: "sort mode",
                    value: mode.to_owned(),
                })?)
            }
            "clear" => Self::Clear,
            "open" => Self::Open(single(&mut args, "open <task>", "task id")?),
            "close" => Self::Close,
            "cloud" => Self::Cloud,
            "text" => {
                let (cloud, text) = rest
                    .split_once(char::is_whitespace)
                    .map_or((rest, ""), |(cloud, text)| (cloud, text.trim()));
                if cloud.is_empty() {
                    return Err(ParseError::Usage("text <cloud> <text>"));
                }
                Self::Text {
                    cloud: number(cloud, "cloud id")?,
                    text: text.to_owned(),
                }
            }
            "drag" => {
                let usage = ParseError::Usage("drag <cloud> <dx> <dy>");
                let cloud = number(args.next().ok_or_else(|| usage.clone())?, "cloud id")?;
                let dx = offset(args.next().ok_or_else(|| usage.clone())?)?;
                let dy = offset(args.next().ok_or(usage)?)?;
                Self::Drag { cloud, dx, dy }
            }
            "group" => Self::Group(list(args, "cloud id")?),
            "ungroup" => Self::Ungroup(list(args, "cloud id")?),
            "zoom" => match args.next() {
                Some("in" | "+") => Self::ZoomIn,
                Some("out" | "-") => Self::ZoomOut,
                _ => return Err(ParseError::Usage("zoom in|out")),
            },
            "history" | "log" => Self::History,
            "preview" => Self::Preview(single(&mut args, "preview <n>", "history index")?),
            "exit" => Self::Exit,
            "rollback" => Self::Rollback(single(&mut args, "rollback <n>", "history index")?),
            "undo" | "z" => Self::Undo,
            "help" | "?" => Self::Help,
            "quit" | "q" => Self::Quit,
            other => return Err(ParseError::Unknown(other.to_owned())),
        };
        Ok(command)
    }
}

fn parse_day(value: &str) -> Result<Weekday, ParseError> {
    value.parse().map_err(|_| ParseError::Invalid {
        what: "day",
        value: value.to_owned(),
    })
}

fn number<T: core::str::FromStr>(value: &str, what: &'static str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::Invalid {
        what,
        value: value.to_owned(),
    })
}

/// A pixel offset; `NaN` and `inf` parse as `f64` but are not offsets.
fn offset(value: &str) -> Result<f64, ParseError> {
    let offset: f64 = number(value, "offset")?;
    if offset.is_finite() {
        Ok(offset)
    } else {
        Err(ParseError::Invalid {
            what: "offset",
            value: value.to_owned(),
        })
    }
}

fn single<'a, T: core::str::FromStr>(
    args: &mut impl Iterator<Item = &'a str>,
    usage: &'static str,
    what: &'static str,
) -> Result<T, ParseError> {
    number(args.next().ok_or(ParseError::Usage(usage))?, what)
}

fn list<'a, T: core::str::FromStr>(
    args: impl Iterator<Item = &'a str>,
    what: &'static str,
) -> Result<Vec<T>, ParseError> {
    args.map(|arg| number(arg, what)).collect()
}
