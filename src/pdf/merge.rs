use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A merged document along with what went into it.
pub struct MergeSummary {
    pub document: Document,
    pub files: Vec<PathBuf>,
    pub total_pages: usize,
}

/// Expand the merge inputs: files are taken as given, a directory contributes
/// the PDFs directly inside it, sorted by file name.
pub fn collect_inputs<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        if !input.is_dir() {
            files.push(input.to_path_buf());
            continue;
        }

        let before = files.len();
        for entry in WalkDir::new(input)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry =
                entry.with_context(|| format!("Failed to read directory: {}", input.display()))?;
            if entry.file_type().is_file() && is_pdf(entry.path()) {
                files.push(entry.into_path());
            }
        }
        debug!(
            "found {} PDF(s) in {}",
            files.len() - before,
            input.display()
        );
    }

    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Load and concatenate the given files, in order.
pub fn merge_files<P: AsRef<Path>>(inputs: &[P]) -> Result<MergeSummary> {
    let files = collect_inputs(inputs)?;
    if files.is_empty() {
        anyhow::bail!("No input files specified");
    }

    let mut documents = Vec::with_capacity(files.len());
    for path in &files {
        let doc = Document::load(path)
            .with_context(|| format!("Failed to load PDF: {}", path.display()))?;
        info!("loaded {} ({} pages)", path.display(), doc.get_pages().len());
        documents.push(doc);
    }

    let document = merge_documents(documents)?;
    let total_pages = document.get_pages().len();

    Ok(MergeSummary {
        document,
        files,
        total_pages,
    })
}

/// Concatenate documents. The first document's catalog is kept; each later
/// document's page tree is grafted under it as a subtree, so attributes its
/// pages inherit (media box, resources) stay intact.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    let mut documents = documents.into_iter();
    let mut merged = documents
        .next()
        .ok_or_else(|| anyhow!("No documents to merge"))?;

    let mut grafted = 0;
    for mut doc in documents {
        doc.renumber_objects_with(merged.max_id + 1);
        merged.max_id = doc.max_id;

        let subtree_id = pages_root(&doc)?;
        let page_count = doc.get_pages().len() as i64;

        merged.objects.extend(doc.objects);
        graft_page_tree(&mut merged, subtree_id, page_count)?;
        grafted += 1;
    }

    if grafted > 0 {
        // Catalogs and info dictionaries of the grafted documents are now unreachable
        merged.prune_objects();
        merged.renumber_objects();
    }

    Ok(merged)
}

fn pages_root(doc: &Document) -> Result<ObjectId> {
    let pages_id = doc
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .context("Document has no page tree")?;
    Ok(pages_id)
}

fn graft_page_tree(merged: &mut Document, subtree_id: ObjectId, page_count: i64) -> Result<()> {
    let root_id = pages_root(merged)?;

    merged
        .get_dictionary_mut(subtree_id)
        .context("Page tree root is not a dictionary")?
        .set("Parent", Object::Reference(root_id));

    let root = merged
        .get_dictionary_mut(root_id)
        .context("Page tree root is not a dictionary")?;

    root.get_mut(b"Kids")
        .and_then(Object::as_array_mut)
        .context("Pages dictionary missing Kids array")?
        .push(Object::Reference(subtree_id));

    let count = root.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    root.set("Count", Object::Integer(count + page_count));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::{page_markers, sample_document};
    use std::fs;

    #[test]
    fn test_merge_two_documents() {
        let merged = merge_documents(vec![sample_document(2), sample_document(3)]).unwrap();
        assert_eq!(merged.get_pages().len(), 5);
        assert_eq!(page_markers(&merged), vec![1, 2, 1, 2, 3]);
    }

    #[test]
    fn test_merge_keeps_order() {
        let merged = merge_documents(vec![
            sample_document(1),
            sample_document(3),
            sample_document(2),
        ])
        .unwrap();
        assert_eq!(page_markers(&merged), vec![1, 1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_merge_single_document() {
        let merged = merge_documents(vec![sample_document(4)]).unwrap();
        assert_eq!(merged.get_pages().len(), 4);
    }

    #[test]
    fn test_merge_nothing() {
        assert!(merge_documents(Vec::new()).is_err());
    }

    #[test]
    fn test_merged_pages_can_be_deleted() {
        let merged = merge_documents(vec![sample_document(2), sample_document(2)]).unwrap();
        let pdf = crate::pdf::PdfDocument::from_document(merged, "merged.pdf");
        let doc = pdf.delete_pages(&[2]).unwrap();
        assert_eq!(page_markers(&doc), vec![1, 2, 2]);
    }

    #[test]
    fn test_collect_inputs_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.pdf"), b"").unwrap();

        let extra = PathBuf::from("extra.pdf");
        let files = collect_inputs(&[dir.path().to_path_buf(), extra.clone()]).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.PDF"), dir.path().join("b.pdf"), extra]
        );
    }

    #[test]
    fn test_merge_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.pdf");
        let second = dir.path().join("second.pdf");
        sample_document(2).save(&first).unwrap();
        sample_document(3).save(&second).unwrap();

        let summary = merge_files(&[&first, &second]).unwrap();
        assert_eq!(summary.files, vec![first, second]);
        assert_eq!(summary.total_pages, 5);
    }

    #[test]
    fn test_merge_files_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = merge_files(&[dir.path()]).err().unwrap();
        assert_eq!(err.to_string(), "No input files specified");
    }
}
