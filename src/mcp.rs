use anyhow::Result;
use log::info;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};

use crate::commands::ranges::SelectionReport;
use crate::commands::{ensure_writable, select_pages};
use crate::page_range::parse_page_ranges;
use crate::pdf::merge::merge_files;
use crate::pdf::PdfDocument;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseRangesRequest {
    #[schemars(description = "Page specification (e.g., '-4,15,19,40-65,90-')")]
    pub pages: String,
    #[schemars(description = "Number of pages to validate against")]
    pub page_count: Option<u32>,
    #[schemars(description = "PDF file whose page count to validate against (instead of page_count)")]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfMergeRequest {
    #[schemars(description = "PDF files or directories of PDFs, in merge order")]
    pub inputs: Vec<String>,
    #[schemars(description = "Output file path")]
    pub output: String,
    #[schemars(description = "Overwrite the output file if it exists (default: false)")]
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfPagesRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page specification (e.g., '-4,15,19,40-65,90-')")]
    pub pages: String,
    #[schemars(description = "Output file path")]
    pub output: String,
    #[schemars(description = "Overwrite the output file if it exists (default: false)")]
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get PDF metadata including title, author, creator, producer, creation date, and page count")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match PdfDocument::open(&path) {
            Ok(doc) => {
                let info = doc.get_info();
                let result = PdfInfoResult {
                    path,
                    page_count: info.page_count,
                    title: info.title,
                    author: info.author,
                    creator: info.creator,
                    producer: info.producer,
                    creation_date: info.creation_date,
                    subject: info.subject,
                    keywords: info.keywords,
                };
                to_json(&result)
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Validate a page specification like '-4,15,19,40-65,90-' against a page count or a PDF file. \
                          Returns the selected pages and one error per invalid part.")]
    fn pdf_parse_ranges(&self, Parameters(req): Parameters<ParseRangesRequest>) -> String {
        let page_count = match (req.page_count, &req.path) {
            (Some(count), _) => count,
            (None, Some(path)) => match PdfDocument::open(path) {
                Ok(doc) => doc.page_count(),
                Err(e) => return format!("Error: {}", e),
            },
            (None, None) => return "Error: either page_count or path is required".to_string(),
        };

        let selection = parse_page_ranges(&req.pages, page_count);
        to_json(&SelectionReport::from(&selection))
    }

    #[tool(description = "Combine multiple PDFs into one file, in the order given")]
    fn pdf_merge(&self, Parameters(req): Parameters<PdfMergeRequest>) -> String {
        if let Err(e) = ensure_writable(&req.output, req.overwrite) {
            return format!("Error: {}", e);
        }

        let mut summary = match merge_files(req.inputs.as_slice()) {
            Ok(s) => s,
            Err(e) => return format!("Error: {:#}", e),
        };

        if let Err(e) = PdfDocument::save(&mut summary.document, &req.output) {
            return format!("Error: {}", e);
        }
        info!("merged {} file(s) into {}", summary.files.len(), req.output);

        let result = MergeResult {
            output_path: req.output,
            files_merged: summary.files.len(),
            page_count: summary.total_pages,
        };
        to_json(&result)
    }

    #[tool(description = "Delete pages from a PDF and save the remaining pages to a new file. \
                          Use page syntax like '-4,15,19,40-65,90-'.")]
    fn pdf_delete_pages(&self, Parameters(req): Parameters<PdfPagesRequest>) -> String {
        match edit_pages(&req, PageEdit::Delete) {
            Ok(result) => to_json(&result),
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Extract specific pages from a PDF and save them to a new file. \
                          Use page syntax like '1-5,10,20-'.")]
    fn pdf_extract(&self, Parameters(req): Parameters<PdfPagesRequest>) -> String {
        match edit_pages(&req, PageEdit::Keep) {
            Ok(result) => to_json(&result),
            Err(e) => format!("Error: {}", e),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PageEdit {
    Delete,
    Keep,
}

fn edit_pages(req: &PdfPagesRequest, edit: PageEdit) -> Result<PageEditResult> {
    ensure_writable(&req.output, req.overwrite)?;

    let doc = PdfDocument::open(&req.path)?;
    let indices = select_pages(&req.pages, doc.page_count())?;
    if indices.is_empty() {
        anyhow::bail!("No valid pages specified");
    }

    let mut new_doc = match edit {
        PageEdit::Delete => doc.delete_pages(&indices)?,
        PageEdit::Keep => doc.keep_pages(&indices)?,
    };
    PdfDocument::save(&mut new_doc, &req.output)?;
    info!("{:?} pages {:?} of {} -> {}", edit, indices, req.path, req.output);

    Ok(PageEditResult {
        output_path: req.output.clone(),
        pages_affected: indices.iter().map(|idx| idx + 1).collect(),
        page_count: new_doc.get_pages().len() as u32,
    })
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error: {}", e))
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub path: String,
    pub page_count: u32,
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MergeResult {
    pub output_path: String,
    pub files_merged: usize,
    pub page_count: usize,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PageEditResult {
    pub output_path: String,
    /// 1-based page numbers that were deleted or extracted
    pub pages_affected: Vec<u32>,
    /// Pages in the saved file
    pub page_count: u32,
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Local PDF merging and page deletion. Use pdf_info for page count and metadata, \
                 pdf_parse_ranges to check a page specification, pdf_merge to combine files, \
                 pdf_delete_pages to remove pages, and pdf_extract to keep only some pages."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();
    info!("serving MCP on stdio");

    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
