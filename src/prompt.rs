use crate::page_range::{invalid_input_report, parse_page_ranges};
use anyhow::{Context, Result};
use log::debug;
use std::io::{BufRead, Write};

/// Ask for a page specification until a valid, non-empty one is entered.
///
/// `reject` gets a final say over a parsed selection; returning a message
/// shows it and asks again.
///
/// Returns the zero-based page indices, or `None` if input ends first.
pub fn prompt_for_pages<R, W, F>(
    mut input: R,
    mut output: W,
    num_pages: u32,
    help: &str,
    reject: F,
) -> Result<Option<Vec<u32>>>
where
    R: BufRead,
    W: Write,
    F: Fn(&[u32]) -> Option<String>,
{
    loop {
        writeln!(output, "{}", help)?;
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("Failed to read page selection")?;
        if read == 0 {
            writeln!(output)?;
            return Ok(None);
        }

        let selection = parse_page_ranges(&line, num_pages);
        if !selection.is_valid() {
            debug!("rejected page selection {:?}", line.trim_end());
            writeln!(output, "{}\n", invalid_input_report(&selection.errors))?;
            continue;
        }
        if selection.indices.is_empty() {
            writeln!(output, "No valid pages specified.\n")?;
            continue;
        }
        if let Some(message) = reject(&selection.indices) {
            writeln!(output, "{}\n", message)?;
            continue;
        }

        return Ok(Some(selection.indices));
    }
}
