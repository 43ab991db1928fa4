//! Coloured user-facing output
//!
//! Diagnostics go through `log`; these helpers are for the messages the user
//! is meant to read at the prompt.

use crossterm::style::Stylize;
use std::fmt::Display;
use std::io::{self, Write};

const SEPARATOR: &str = "===================================================";

pub fn success(message: impl Display) {
    println!("{}", message.to_string().green());
}

pub fn warning(message: impl Display) {
    println!("{}", message.to_string().yellow());
}

pub fn error(message: impl Display) {
    eprintln!("{}", message.to_string().red());
}

pub fn info(message: impl Display) {
    println!("{}", message.to_string().cyan());
}

pub fn plain(message: impl Display) {
    println!("{}", message);
}

/// Print `message` without a newline, ahead of reading an answer
pub fn prompt(message: impl Display) -> io::Result<()> {
    print!("{}", message);
    io::stdout().flush()
}

pub fn separator() {
    println!("{}", SEPARATOR.magenta());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_flushes_without_error() {
        assert!(prompt("").is_ok());
    }
}
