use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "privy-pdf")]
#[command(about = "Merge PDFs and delete pages, locally, with MCP server support")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run as MCP server on stdin/stdout
    Mcp,

    /// Display PDF metadata and page count
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Combine multiple PDFs into one
    #[command(alias = "cat")]
    Merge {
        /// PDF files (or directories of PDFs) to merge, in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// Delete pages from a PDF
    #[command(alias = "rm")]
    Delete {
        /// PDF file to delete pages from
        path: PathBuf,

        /// Pages to remove (e.g., "-4,15,19,40-65,90-"); prompts if omitted
        #[arg(short, long, allow_hyphen_values = true)]
        pages: Option<String>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// Extract page ranges to a new PDF
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Pages to keep (e.g., "-5,10,20-")
        #[arg(short, long, allow_hyphen_values = true)]
        pages: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// Check a page specification against a page count
    Ranges {
        /// Page specification (e.g., "-4,15,19,40-65,90-")
        #[arg(short = 'p', long = "pages", allow_hyphen_values = true)]
        spec: String,

        /// Number of pages in the document
        #[arg(short = 'n', long = "page-count")]
        num_pages: u32,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}
