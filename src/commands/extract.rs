use crate::commands::{ensure_writable, select_pages};
use crate::pdf::PdfDocument;
use anyhow::Result;
use log::info;
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    pages: &str,
    output: Q,
    force: bool,
) -> Result<()> {
    ensure_writable(&output, force)?;

    let doc = PdfDocument::open(&input)?;
    let indices = select_pages(pages, doc.page_count())?;

    if indices.is_empty() {
        anyhow::bail!("No pages specified");
    }

    let mut new_doc = doc.keep_pages(&indices)?;
    PdfDocument::save(&mut new_doc, &output)?;
    info!("extracted pages {:?} from {}", indices, doc.path);

    println!(
        "Extracted {} page(s) to {}",
        indices.len(),
        output.as_ref().display()
    );

    Ok(())
}
