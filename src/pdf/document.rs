use anyhow::{Context, Result};
use log::debug;
use lopdf::{Document, Object};
use std::path::Path;

#[derive(Debug)]
pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let doc =
            Document::load(&path).with_context(|| format!("Failed to open PDF: {}", path_str))?;
        debug!("opened {} ({} pages)", path_str, doc.get_pages().len());
        Ok(Self::from_document(doc, path_str))
    }

    /// Wrap an already-loaded document.
    pub fn from_document(doc: Document, path: impl Into<String>) -> Self {
        PdfDocument {
            doc,
            path: path.into(),
        }
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get metadata from the document info dictionary
    pub fn get_info(&self) -> PdfInfo {
        let mut info = PdfInfo::default();

        if let Ok(Object::Reference(info_ref)) = self.doc.trailer.get(b"Info") {
            if let Ok(Object::Dictionary(dict)) = self.doc.get_object(*info_ref) {
                info.title = get_string_from_dict(dict, b"Title");
                info.author = get_string_from_dict(dict, b"Author");
                info.creator = get_string_from_dict(dict, b"Creator");
                info.producer = get_string_from_dict(dict, b"Producer");
                info.creation_date = get_string_from_dict(dict, b"CreationDate");
                info.mod_date = get_string_from_dict(dict, b"ModDate");
                info.subject = get_string_from_dict(dict, b"Subject");
                info.keywords = get_string_from_dict(dict, b"Keywords");
            }
        }

        info.page_count = self.page_count();
        info
    }

    /// Copy of the document without the given zero-based pages.
    ///
    /// Removing every page is refused; a PDF needs at least one.
    pub fn delete_pages(&self, indices: &[u32]) -> Result<Document> {
        let total = self.page_count();
        self.check_indices(indices)?;

        let mut doomed: Vec<u32> = indices.iter().map(|idx| idx + 1).collect();
        doomed.sort_unstable();
        doomed.dedup();

        if doomed.len() as u32 >= total {
            anyhow::bail!("Cannot delete all {} page(s) of {}", total, self.path);
        }

        debug!(
            "deleting {} of {} page(s) from {}",
            doomed.len(),
            total,
            self.path
        );

        let mut new_doc = self.doc.clone();
        if !doomed.is_empty() {
            new_doc.delete_pages(&doomed);
            new_doc.prune_objects();
        }
        Ok(new_doc)
    }

    /// Copy of the document containing only the given zero-based pages, in
    /// document order.
    pub fn keep_pages(&self, indices: &[u32]) -> Result<Document> {
        self.check_indices(indices)?;
        if indices.is_empty() {
            anyhow::bail!("No pages specified");
        }

        let complement: Vec<u32> = (0..self.page_count())
            .filter(|idx| !indices.contains(idx))
            .collect();
        self.delete_pages(&complement)
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }

    fn check_indices(&self, indices: &[u32]) -> Result<()> {
        let total = self.page_count();
        if let Some(bad) = indices.iter().find(|&&idx| idx >= total) {
            anyhow::bail!("Page {} is out of range (1-{})", bad + 1, total);
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub page_count: u32,
}

fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        _ => None,
    })
}

fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
    // UTF-16BE with BOM, otherwise treat as Latin-1 (close enough to PDFDocEncoding)
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let u16_chars: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        String::from_utf16(&u16_chars).ok()
    } else {
        Some(bytes.iter().map(|&b| b as char).collect())
    }
}
