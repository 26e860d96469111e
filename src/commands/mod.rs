use crate::page_range::{invalid_input_report, parse_page_ranges};
use anyhow::Result;
use std::path::Path;

pub mod delete;
pub mod extract;
pub mod info;
pub mod merge;
pub mod ranges;

/// Refuse to clobber an existing output file unless forced.
pub fn ensure_writable<P: AsRef<Path>>(output: P, force: bool) -> Result<()> {
    let output = output.as_ref();
    if output.exists() && !force {
        anyhow::bail!(
            "Output file already exists: {} (use --force to overwrite)",
            output.display()
        );
    }
    Ok(())
}

/// Parse a page specification given up front, where there is no chance to
/// re-prompt: any rejected token fails the whole selection.
pub fn select_pages(spec: &str, num_pages: u32) -> Result<Vec<u32>> {
    let selection = parse_page_ranges(spec, num_pages);
    if !selection.is_valid() {
        anyhow::bail!("{}", invalid_input_report(&selection.errors));
    }
    Ok(selection.indices)
}
