use crate::commands::ensure_writable;
use crate::pdf::merge::merge_files;
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(inputs: &[P], output: Q, force: bool) -> Result<()> {
    ensure_writable(&output, force)?;

    let mut summary = merge_files(inputs)?;
    PdfDocument::save(&mut summary.document, &output)?;

    println!(
        "Merged {} file(s) ({} pages) into {}",
        summary.files.len(),
        summary.total_pages,
        output.as_ref().display()
    );

    Ok(())
}
