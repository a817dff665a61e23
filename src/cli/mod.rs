//! CLI command definitions and argument parsing.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use std::io::{BufRead, Write};

/// Prompt on stdout and read an affirmative answer from stdin.
///
/// Only `y`/`yes` (any case) count as yes; anything else, including an
/// empty line or EOF, is a no.
pub fn confirm(prompt: &str) -> std::io::Result<bool> {
    let mut out = std::io::stdout();
    out.write_all(prompt.as_bytes())?;
    out.flush()?;

    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(false);
    }
    Ok(is_affirmative(&line))
}

fn is_affirmative(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}
