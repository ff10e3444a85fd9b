//! CLI error types.

use mdinline_config::ConfigError;
use mdinline_diagrams::InlineError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Inline(#[from] InlineError),

    #[error("{0}")]
    Validation(String),
}
