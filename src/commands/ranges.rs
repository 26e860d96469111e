use crate::page_range::{invalid_input_report, parse_page_ranges, PageSelection, RangeErrorCategory};
use anyhow::Result;
use serde::Serialize;

/// Serializable view of a parsed page specification.
#[derive(Debug, Serialize)]
pub struct SelectionReport {
    /// 1-based page numbers
    pub pages: Vec<u32>,
    /// Zero-based page indices
    pub indices: Vec<u32>,
    pub errors: Vec<ErrorReport>,
}

#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub token: String,
    pub category: RangeErrorCategory,
    pub message: String,
}

impl From<&PageSelection> for SelectionReport {
    fn from(selection: &PageSelection) -> Self {
        SelectionReport {
            pages: selection.page_numbers(),
            indices: selection.indices.clone(),
            errors: selection
                .errors
                .iter()
                .map(|e| ErrorReport {
                    token: e.token().to_string(),
                    category: e.category(),
                    message: e.to_string(),
                })
                .collect(),
        }
    }
}

/// Show how a specification resolves against a document of `num_pages`
/// pages. Fails if any token was rejected.
pub fn run(spec: &str, num_pages: u32, json: bool) -> Result<()> {
    let selection = parse_page_ranges(spec, num_pages);

    if json {
        let report = SelectionReport::from(&selection);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if selection.is_valid() {
        if selection.is_empty() {
            println!("No pages selected.");
        } else {
            println!("Pages: {}", compact_pages(&selection.page_numbers()));
        }
    } else {
        eprintln!("{}", invalid_input_report(&selection.errors));
    }

    if !selection.is_valid() {
        anyhow::bail!("{} invalid token(s)", selection.errors.len());
    }
    Ok(())
}

/// Collapse sorted page numbers into runs, e.g. [1, 2, 3, 7] -> "1-3,7".
pub fn compact_pages(pages: &[u32]) -> String {
    let mut runs: Vec<(u32, u32)> = Vec::new();
    for &page in pages {
        match runs.last_mut() {
            Some((_, end)) if *end + 1 == page => *end = page,
            _ => runs.push((page, page)),
        }
    }

    runs.iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{}-{}", start, end)
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
