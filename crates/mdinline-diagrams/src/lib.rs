//! Diagram inlining for Markdown documents.
//!
//! This crate replaces fenced diagram blocks with rendered image embeds:
//! - [`extract_blocks`] finds fenced blocks of a [`DiagramLanguage`]
//! - [`CommandRenderer`] renders each block through an external tool (Mermaid CLI by default)
//! - [`DiagramInliner`] drives the per-document pass and rewrites documents
//! - [`scan_documents`] lists diagram blocks without touching anything
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - [`language`]: Diagram type definitions (`DiagramLanguage`, `DiagramFormat`)
//! - [`extract`]: Block extraction (`DiagramBlock`)
//! - [`consts`]: Defaults shared with the configuration crate
//! - [`job`]: Image layout, document conflicts and render jobs (`ImageDir`, `RenderJob`)
//! - [`renderer`]: The `Renderer` seam and the subprocess implementation
//! - [`replacements`]: Positional substitution of rendered blocks
//! - [`inliner`]: Document processing and run driver
//!
//! # Example
//!
//! ```ignore
//! use mdinline_diagrams::{CommandRenderer, DiagramInliner, InlineConfig};
//!
//! let config = InlineConfig::new("/docs", vec!["guide.md".to_owned()]);
//! let inliner = DiagramInliner::new(config, Box::new(CommandRenderer::default()));
//! let summary = inliner.run()?;
//! println!("{} diagrams inlined", summary.rendered());
//! ```

pub mod consts;
mod error;
pub mod extract;
pub mod inliner;
pub mod job;
pub mod language;
pub mod renderer;
pub mod replacements;
mod report;

pub use error::InlineError;
pub use extract::{DiagramBlock, extract_blocks};
pub use inliner::{DiagramInliner, InlineConfig, Progress, ProgressFn, scan_documents};
pub use job::{DocumentConflict, ImageDir, RenderJob, check_documents};
pub use language::{DiagramFormat, DiagramLanguage};
pub use renderer::{CommandRenderer, RenderError, Renderer};
pub use replacements::Substitutions;
pub use report::{
    DiagramFailure, DocumentReport, DocumentStatus, RunSummary, ScanReport, ScannedBlock,
};
