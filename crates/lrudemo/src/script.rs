//! Command script parser using nom
//!
//! Script format:
//! ```text
//! put 1 1; put 2 2
//! get 1
//! ```
//!
//! Commands are separated by `;` or newlines. Verbs are case-insensitive,
//! keys and values are signed 64-bit integers. Blank commands are skipped.

use std::fmt;

use anyhow::{anyhow, Result};
use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{i64 as integer, space1},
    combinator::{all_consuming, map},
    sequence::{preceded, tuple},
    IResult,
};

/// A single cache operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Read a key
    Get(i64),
    /// Write a key-value pair
    Put(i64, i64),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Get(key) => write!(f, "get {}", key),
            Command::Put(key, value) => write!(f, "put {} {}", key, value),
        }
    }
}

fn get_command(input: &str) -> IResult<&str, Command> {
    map(preceded(tuple((tag_no_case("get"), space1)), integer), Command::Get)(input)
}

fn put_command(input: &str) -> IResult<&str, Command> {
    map(
        tuple((tag_no_case("put"), space1, integer, space1, integer)),
        |(_, _, key, _, value)| Command::Put(key, value),
    )(input)
}

/// Parse one trimmed command
pub fn parse_command(input: &str) -> IResult<&str, Command> {
    all_consuming(alt((get_command, put_command)))(input)
}

/// Parse a whole script into commands, in order
pub fn parse_script(script: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();

    for (n, raw) in script.split(|c| c == ';' || c == '\n').enumerate() {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let (_, command) = parse_command(raw)
            .map_err(|e| anyhow!("invalid command #{} {:?}: {}", n + 1, raw, e))?;
        commands.push(command);
    }

    Ok(commands)
}
