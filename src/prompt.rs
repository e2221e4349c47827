// The operator seam: everything the flows ask of or tell the person at the
// terminal. `ui::TerminalOperator` is the dialoguer-backed implementation.

use crate::error::{CliError, CliResult};
use crate::store::{Cid, ListEntry};
use std::path::PathBuf;

pub trait Operator {
    /// Offer `items` and return the index of the chosen one.
    fn select(&mut self, prompt: &str, items: &[String]) -> CliResult<usize>;

    /// Ask for a line of free text.
    fn input(&mut self, prompt: &str) -> CliResult<String>;

    fn info(&mut self, message: &str);
    fn warn(&mut self, message: &str);
    fn error(&mut self, message: &str);
    fn success(&mut self, message: &str);

    /// Plain scrolling output, such as file contents.
    fn log(&mut self, message: &str);

    /// One row of a store listing.
    fn list_entry(&mut self, entry: &ListEntry);

    /// Replace the live progress line.
    fn progress(&mut self, line: &str);

    /// Remove the live progress line, if any.
    fn finish_progress(&mut self);
}

/// Prompt until the operator types something that parses as a CID.
pub fn ask_cid(operator: &mut dyn Operator, prompt: &str) -> CliResult<Cid> {
    loop {
        let raw = operator.input(prompt)?;
        match Cid::parse(&raw) {
            Ok(cid) => return Ok(cid),
            Err(CliError::InvalidInput(reason)) => operator.warn(&reason),
            Err(other) => return Err(other),
        }
    }
}

/// Prompt until the operator names a path that exists locally.
pub fn ask_existing_path(operator: &mut dyn Operator, prompt: &str) -> CliResult<PathBuf> {
    loop {
        let raw = operator.input(prompt)?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            operator.warn("Please enter a valid path");
            continue;
        }
        let path = PathBuf::from(trimmed);
        // Follows symlinks, so a dangling link is rejected.
        if path.exists() {
            return Ok(path);
        }
        operator.warn(&format!("Please enter a valid path ({} does not exist)", path.display()));
    }
}

/// Prompt until the operator names a non-empty destination path.
pub fn ask_save_path(operator: &mut dyn Operator, prompt: &str) -> CliResult<PathBuf> {
    loop {
        let raw = operator.input(prompt)?;
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
        operator.warn("Please enter a path to save to");
    }
}
