//! Docsplice command-line entry point.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use docsplice::cli::{self, Cli, Commands};
use docsplice::config::Config;
use docsplice::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Inject { dry, .. } => cli::inject::inject_all(&Config::load(&cli)?, *dry),
        Commands::Plan {
            page,
            krate,
            pretty,
        } => cli::plan::print_plan(&Config::load(&cli)?, page, krate, *pretty),
        Commands::Describe {
            manifest_path,
            git_url,
            rev,
        } => cli::describe::describe(manifest_path, git_url.as_deref(), rev.as_deref()),
        Commands::Toc => {
            cli::toc::print_toc(&Config::load(&cli)?);
            Ok(())
        }
    }
}
