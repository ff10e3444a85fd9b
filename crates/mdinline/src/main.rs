//! mdinline CLI - render diagram blocks in Markdown documents and inline the images.
//!
//! Provides commands for:
//! - `inline`: Render diagram blocks and rewrite documents to embed the images
//! - `scan`: List diagram blocks without changing anything

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{InlineArgs, ScanArgs};
use output::Output;

/// mdinline - Markdown diagram inliner.
#[derive(Parser)]
#[command(name = "mdinline", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render diagram blocks to images and replace them with image embeds.
    Inline(InlineArgs),
    /// List diagram blocks without rendering or modifying documents.
    Scan(ScanArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Inline(args) => args.common.verbose,
            Self::Scan(args) => args.common.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Inline(args) => args.execute(),
        Commands::Scan(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_inline_args() {
        let cli = Cli::try_parse_from([
            "mdinline", "inline", "a.md", "b.md", "-w", "/docs", "-j", "2", "-v",
        ])
        .unwrap();

        let Commands::Inline(args) = cli.command else {
            panic!("Expected inline command");
        };
        assert_eq!(args.common.documents, vec!["a.md", "b.md"]);
        assert_eq!(
            args.common.working_dir.as_deref(),
            Some(std::path::Path::new("/docs"))
        );
        assert!(args.common.verbose);
    }

    #[test]
    fn test_parse_scan_without_documents() {
        let cli = Cli::try_parse_from(["mdinline", "scan", "--config", "mdinline.toml"]).unwrap();

        assert!(matches!(cli.command, Commands::Scan(_)));
        assert!(!cli.command.verbose());
    }
}
