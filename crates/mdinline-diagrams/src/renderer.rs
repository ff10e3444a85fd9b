//! External diagram renderers.
//!
//! [`Renderer`] is the seam between the inliner and the tool that turns a
//! definition file into an image. [`CommandRenderer`] runs a command-line
//! tool (Mermaid CLI by default) as a blocking subprocess with inherited
//! standard streams, so the tool's own output stays visible.

use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use crate::consts::{
    BACKGROUND_PLACEHOLDER, DEFAULT_ARGS, DEFAULT_BACKGROUND, DEFAULT_PROGRAM, INPUT_PLACEHOLDER,
    OUTPUT_PLACEHOLDER,
};
use crate::job::RenderJob;

/// Single diagram rendering error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The renderer process could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The renderer exited unsuccessfully.
    #[error("{program} exited with {status}")]
    Status { program: String, status: ExitStatus },
    /// The renderer reported success but produced no image.
    #[error("renderer produced no image at {}", .0.display())]
    MissingOutput(PathBuf),
    /// Renderer-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Converts a definition file into an image file.
///
/// Implementations block until the image is written or rendering failed.
pub trait Renderer: Send + Sync {
    /// Render `job.definition_path` into `job.output_path`.
    fn render(&self, job: &RenderJob<'_>) -> Result<(), RenderError>;
}

/// Renderer backed by an external command.
///
/// # Example
///
/// ```ignore
/// use mdinline_diagrams::CommandRenderer;
///
/// let renderer = CommandRenderer::new(["npx", "-y", "@mermaid-js/mermaid-cli"])
///     .background("white");
/// ```
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    /// Program followed by leading arguments.
    command: Vec<String>,
    /// Argument template with `{input}`, `{output}` and `{background}` placeholders.
    args: Vec<String>,
    /// Background requested from the tool.
    background: String,
}

impl Default for CommandRenderer {
    fn default() -> Self {
        Self::new([DEFAULT_PROGRAM])
    }
}

impl CommandRenderer {
    /// Create a renderer running `command` with the Mermaid CLI argument layout.
    #[must_use]
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into_iter().map(Into::into).collect(),
            args: DEFAULT_ARGS.iter().map(|&a| a.to_owned()).collect(),
            background: DEFAULT_BACKGROUND.to_owned(),
        }
    }

    /// Replace the argument template.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the background requested from the tool (default: `transparent`).
    #[must_use]
    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Program name for error messages.
    fn program(&self) -> &str {
        self.command.first().map_or("", String::as_str)
    }

    /// Expand the argument template for `job`.
    fn expand_args(&self, job: &RenderJob<'_>) -> Vec<String> {
        let input = job.definition_path.to_string_lossy();
        let output = job.output_path.to_string_lossy();

        self.args
            .iter()
            .map(|arg| {
                arg.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
                    .replace(BACKGROUND_PLACEHOLDER, &self.background)
            })
            .collect()
    }
}

impl Renderer for CommandRenderer {
    fn render(&self, job: &RenderJob<'_>) -> Result<(), RenderError> {
        let Some((program, leading)) = self.command.split_first() else {
            return Err(RenderError::Other("renderer command is empty".to_owned()));
        };

        let args = self.expand_args(job);
        tracing::debug!(program = %program, ?leading, ?args, "Running renderer");

        let status = Command::new(program)
            .args(leading)
            .args(&args)
            .status()
            .map_err(|source| RenderError::Spawn {
                program: self.program().to_owned(),
                source,
            })?;

        if !status.success() {
            return Err(RenderError::Status {
                program: self.program().to_owned(),
                status,
            });
        }

        Ok(())
    }
}
