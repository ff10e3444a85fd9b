//! `mdinline scan` command implementation.

use clap::Args;
use mdinline_diagrams::scan_documents;

use super::{DocumentArgs, inline_config_from_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the scan command.
#[derive(Args, Debug)]
pub(crate) struct ScanArgs {
    #[command(flatten)]
    pub common: DocumentArgs,
}

impl ScanArgs {
    /// Execute the scan command: list diagram blocks without rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or a document cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.common.load_config(None, None)?;
        let inline_config = inline_config_from_config(&config)?;

        let reports = scan_documents(&inline_config)?;
        for report in &reports {
            output.scan(report);
        }

        let total: usize = reports
            .iter()
            .filter_map(|r| r.blocks.as_ref())
            .map(Vec::len)
            .sum();
        output.info(&format!(
            "{total} {} blocks in {} documents",
            inline_config.language.tag(),
            reports.len()
        ));

        Ok(())
    }
}
