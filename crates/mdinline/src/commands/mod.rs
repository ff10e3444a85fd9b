//! CLI command implementations.

pub(crate) mod inline;
pub(crate) mod scan;

pub(crate) use inline::InlineArgs;
pub(crate) use scan::ScanArgs;

use std::path::PathBuf;

use clap::Args;
use mdinline_config::{CliSettings, Config};
use mdinline_diagrams::{DiagramFormat, DiagramLanguage, InlineConfig};

use crate::error::CliError;

/// Arguments shared by every command that reads documents.
#[derive(Args, Debug)]
pub(crate) struct DocumentArgs {
    /// Documents to process, relative to the working directory (overrides config).
    pub documents: Vec<String>,

    /// Path to configuration file (default: auto-discover mdinline.toml).
    #[arg(short, long, env = "MDINLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory containing the documents and the image directory (overrides config).
    #[arg(short, long)]
    pub working_dir: Option<PathBuf>,

    /// Enable verbose output (per-diagram progress logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl DocumentArgs {
    /// Load and validate configuration with these arguments applied.
    pub(crate) fn load_config(
        &self,
        jobs: Option<usize>,
        renderer: Option<String>,
    ) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            working_dir: self.working_dir.clone(),
            documents: (!self.documents.is_empty()).then(|| self.documents.clone()),
            jobs,
            renderer,
        };

        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build the inliner configuration from validated settings.
pub(crate) fn inline_config_from_config(config: &Config) -> Result<InlineConfig, CliError> {
    let language = DiagramLanguage::parse(&config.diagrams.language).ok_or_else(|| {
        CliError::Validation(format!(
            "unsupported diagram language '{}'",
            config.diagrams.language
        ))
    })?;
    let format = DiagramFormat::parse(&config.diagrams.format).ok_or_else(|| {
        CliError::Validation(format!(
            "unsupported image format '{}'",
            config.diagrams.format
        ))
    })?;

    Ok(InlineConfig::new(
        config.working_dir_resolved.clone(),
        config.documents.clone(),
    )
    .language(language)
    .format(format)
    .image_dir(config.diagrams.image_dir.clone())
    .caption(config.diagrams.caption.clone())
    .jobs(config.run.jobs))
}
