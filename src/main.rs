mod cli;
mod commands;
mod mcp;
mod page_range;
mod pdf;
mod prompt;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path } => {
            commands::info::run(&path)?;
        }
        Commands::Merge {
            inputs,
            output,
            force,
        } => {
            commands::merge::run(inputs.as_slice(), &output, force)?;
        }
        Commands::Delete {
            path,
            pages,
            output,
            force,
        } => {
            commands::delete::run(&path, pages.as_deref(), &output, force)?;
        }
        Commands::Extract {
            path,
            pages,
            output,
            force,
        } => {
            commands::extract::run(&path, &pages, &output, force)?;
        }
        Commands::Ranges {
            spec,
            num_pages,
            json,
        } => {
            commands::ranges::run(&spec, num_pages, json)?;
        }
    }

    Ok(())
}
