//! Fuzz target: shell command parser
//!
//! Feeds arbitrary UTF-8 lines to `shell::parse` and checks:
//! - No panics
//! - Blank lines are always `ParseError::Empty`
//! - `ask` questions are never empty
//!
//! cargo fuzz run fuzz_shell_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use soil_dashboard::app::commands::AppCommand;
use soil_dashboard::shell::{self, ParseError, ShellCommand};

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    match shell::parse(line) {
        Ok(ShellCommand::App(AppCommand::AskAdvice(q))) => assert!(!q.is_empty()),
        Err(ParseError::Empty) => assert!(line.trim().is_empty()),
        _ => {}
    }
});
