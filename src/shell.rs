//! Dashboard shell command parser.
//!
//! One command per stdin line:
//!
//! ```text
//! connect | disconnect | drop
//! toggle <pump|fan|light>
//! theme
//! ask <question...>
//! export
//! chart [svg]
//! status | help | quit
//! ```
//!
//! Parsing is pure; the binary maps [`ShellCommand::App`] straight onto
//! the dashboard service.  Everything after `ask ` is the question, kept
//! byte for byte.

use core::fmt;

use crate::app::commands::AppCommand;
use crate::reading::ControlName;

pub const HELP: &str = "\
Commands:
  connect              pair a SOIL-ESP32 sensor
  disconnect           drop the device link
  drop                 simulate a lost device link
  toggle <control>     flip pump, fan or light
  theme                switch light/dark
  ask <question>       ask the agronomy assistant
  export               write the recent readings to CSV
  chart [svg]          chart summary, or the SVG document
  status               redraw the dashboard
  help                 this text
  quit                 exit";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    App(AppCommand),
    Status,
    Chart { svg: bool },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
    BadControl(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::Unknown(word) => write!(f, "unknown command '{word}' (try 'help')"),
            Self::MissingArgument(what) => write!(f, "missing {what}"),
            Self::BadControl(name) => write!(f, "unknown control '{name}' (pump, fan, light)"),
        }
    }
}

impl std::error::Error for ParseError {}

pub fn parse(line: &str) -> Result<ShellCommand, ParseError> {
    let line = line.trim_start();
    let (word, raw_rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r),
        None => (line, ""),
    };
    let rest = raw_rest.trim();
    if word.is_empty() {
        return Err(ParseError::Empty);
    }

    let cmd = match word.to_ascii_lowercase().as_str() {
        "connect" => ShellCommand::App(AppCommand::Connect),
        "disconnect" => ShellCommand::App(AppCommand::Disconnect),
        "drop" => ShellCommand::App(AppCommand::ConnectionLost),
        "toggle" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument("control name"));
            }
            let control = rest
                .parse::<ControlName>()
                .map_err(|_| ParseError::BadControl(rest.to_string()))?;
            ShellCommand::App(AppCommand::ToggleControl(control))
        }
        "theme" => ShellCommand::App(AppCommand::ToggleTheme),
        "ask" => {
            if raw_rest.is_empty() {
                return Err(ParseError::MissingArgument("question"));
            }
            ShellCommand::App(AppCommand::AskAdvice(raw_rest.to_string()))
        }
        "export" => ShellCommand::App(AppCommand::ExportCsv),
        "chart" => ShellCommand::Chart {
            svg: rest.eq_ignore_ascii_case("svg"),
        },
        "status" | "s" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(cmd)
}
