use crate::commands::{ensure_writable, select_pages};
use crate::page_range::format_help;
use crate::pdf::PdfDocument;
use crate::prompt::prompt_for_pages;
use anyhow::Result;
use log::info;
use std::io;
use std::path::Path;

/// Remove pages from `input` and write the rest to `output`.
///
/// Without a page specification the user is asked for one on the terminal,
/// and asked again until the answer is usable.
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    pages: Option<&str>,
    output: Q,
    force: bool,
) -> Result<()> {
    ensure_writable(&output, force)?;

    let doc = PdfDocument::open(&input)?;
    let total = doc.page_count();

    let indices = match pages {
        Some(spec) => {
            let indices = select_pages(spec, total)?;
            if indices.is_empty() {
                anyhow::bail!("No valid pages specified for deletion");
            }
            indices
        }
        None => {
            let help = delete_help(total);
            let prompt = prompt_for_pages(
                io::stdin().lock(),
                io::stdout().lock(),
                total,
                &help,
                |indices| refuse_all_pages(indices, total),
            )?;
            match prompt {
                Some(indices) => indices,
                None => {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
        }
    };

    let mut new_doc = doc.delete_pages(&indices)?;
    PdfDocument::save(&mut new_doc, &output)?;
    info!("deleted pages {:?} from {}", indices, doc.path);

    println!(
        "Deleted {} of {} page(s); saved {}",
        indices.len(),
        total,
        output.as_ref().display()
    );

    Ok(())
}

fn delete_help(num_pages: u32) -> String {
    format!(
        "{}\nAt least one page must remain.\nEnter pages to REMOVE:",
        format_help(num_pages)
    )
}

/// Selections are deduplicated, so covering every page means one index per page.
fn refuse_all_pages(indices: &[u32], num_pages: u32) -> Option<String> {
    (indices.len() as u32 >= num_pages).then(|| {
        format!("Cannot delete all {num_pages} page(s); at least one must remain.")
    })
}
