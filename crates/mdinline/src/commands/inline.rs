//! `mdinline inline` command implementation.

use clap::Args;
use mdinline_diagrams::{CommandRenderer, DiagramInliner};

use super::{DocumentArgs, inline_config_from_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the inline command.
#[derive(Args, Debug)]
pub(crate) struct InlineArgs {
    #[command(flatten)]
    pub common: DocumentArgs,

    /// Number of documents processed in parallel (overrides config).
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Renderer program, e.g. a path to mmdc (overrides config).
    #[arg(long, env = "MDINLINE_RENDERER")]
    renderer: Option<String>,
}

impl InlineArgs {
    /// Execute the inline command.
    ///
    /// Per-diagram render failures are reported but do not fail the command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or a filesystem operation fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.common.load_config(self.jobs, self.renderer)?;
        let inline_config = inline_config_from_config(&config)?;

        if let Some(path) = &config.config_path {
            output.info(&format!("Configuration: {}", path.display()));
        }
        output.info(&format!(
            "Working directory: {}",
            config.working_dir_resolved.display()
        ));
        output.info(&format!("Renderer: {}", config.renderer.command.join(" ")));

        let renderer = CommandRenderer::new(config.renderer.command.iter().cloned())
            .args(config.renderer.args.iter().cloned())
            .background(config.renderer.background.clone());
        let progress = Output::new();
        let inliner = DiagramInliner::new(inline_config, Box::new(renderer))
            .on_progress(move |event| progress.progress(event));

        let summary = inliner.run()?;
        output.summary(&summary);

        Ok(())
    }
}
