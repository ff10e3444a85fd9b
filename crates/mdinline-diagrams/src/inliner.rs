//! Document processing: extract, render, substitute, write back.
//!
//! [`DiagramInliner`] processes each configured document independently:
//!
//! 1. Read the document (missing documents are reported and skipped)
//! 2. Extract diagram blocks for the configured language
//! 3. Render each block through the [`Renderer`], one at a time
//! 4. Replace successfully rendered blocks with image embeds, by position
//! 5. Write the document back only if something was replaced
//!
//! Render failures are isolated per diagram. Filesystem errors abort the run.
//! Progress is reported while the run is in flight through an optional
//! [`ProgressFn`] callback.

use std::fs;
use std::path::PathBuf;

use rayon::prelude::*;

use crate::consts::{DEFAULT_CAPTION, DEFAULT_IMAGE_DIR, DEFAULT_JOBS};
use crate::error::InlineError;
use crate::extract::extract_blocks;
use crate::job::{ImageDir, RenderJob, check_documents, timestamp_millis};
use crate::language::{DiagramFormat, DiagramLanguage};
use crate::renderer::{RenderError, Renderer};
use crate::replacements::Substitutions;
use crate::report::{
    DiagramFailure, DocumentReport, DocumentStatus, RunSummary, ScanReport, ScannedBlock,
};

/// Configuration for an inliner run.
///
/// # Example
///
/// ```ignore
/// let config = InlineConfig::new("/docs", vec!["guide.md".to_owned()])
///     .caption("Diagram")
///     .jobs(4);
/// ```
#[derive(Debug, Clone)]
pub struct InlineConfig {
    /// Base directory for documents and images.
    pub working_dir: PathBuf,
    /// Documents relative to `working_dir` (absolute paths are used as-is).
    pub documents: Vec<String>,
    pub language: DiagramLanguage,
    pub format: DiagramFormat,
    /// Image directory relative to `working_dir`.
    pub image_dir: String,
    /// Alt text of the image embeds.
    pub caption: String,
    /// Number of documents processed in parallel.
    pub jobs: usize,
}

impl InlineConfig {
    /// Create a configuration with default language, format, image dir and caption.
    #[must_use]
    pub fn new(working_dir: impl Into<PathBuf>, documents: Vec<String>) -> Self {
        Self {
            working_dir: working_dir.into(),
            documents,
            language: DiagramLanguage::default(),
            format: DiagramFormat::default(),
            image_dir: DEFAULT_IMAGE_DIR.to_owned(),
            caption: DEFAULT_CAPTION.to_owned(),
            jobs: DEFAULT_JOBS,
        }
    }

    #[must_use]
    pub fn language(mut self, language: DiagramLanguage) -> Self {
        self.language = language;
        self
    }

    #[must_use]
    pub fn format(mut self, format: DiagramFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn image_dir(mut self, image_dir: impl Into<String>) -> Self {
        self.image_dir = image_dir.into();
        self
    }

    #[must_use]
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Set the number of documents processed in parallel (minimum 1).
    #[must_use]
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    fn document_path(&self, document: &str) -> PathBuf {
        self.working_dir.join(document)
    }
}

/// Event reported while a run is in flight.
#[derive(Debug)]
pub enum Progress<'a> {
    /// Diagram `diagram` of `document` is about to be rendered.
    Rendering { document: &'a str, diagram: usize },
    /// A document has been processed.
    Finished(&'a DocumentReport),
}

/// Progress callback. Called from worker threads when `jobs > 1`.
pub type ProgressFn = dyn Fn(&Progress<'_>) + Send + Sync;

/// Replaces diagram blocks in Markdown documents with rendered image embeds.
pub struct DiagramInliner {
    config: InlineConfig,
    renderer: Box<dyn Renderer>,
    progress: Option<Box<ProgressFn>>,
}

impl DiagramInliner {
    /// Create an inliner rendering through `renderer`.
    #[must_use]
    pub fn new(config: InlineConfig, renderer: Box<dyn Renderer>) -> Self {
        Self {
            config,
            renderer,
            progress: None,
        }
    }

    /// Report [`Progress`] events to `callback` as documents are processed.
    #[must_use]
    pub fn on_progress(
        mut self,
        callback: impl Fn(&Progress<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// The configuration this inliner runs with.
    #[must_use]
    pub fn config(&self) -> &InlineConfig {
        &self.config
    }

    /// Process every configured document.
    ///
    /// Documents run sequentially unless `jobs > 1`, in which case they are
    /// spread over a bounded thread pool. Diagrams of one document are always
    /// rendered in order. Reports keep the configured document order.
    ///
    /// # Errors
    ///
    /// Returns `InlineError::Conflict` before touching anything if two entries
    /// name the same file or share an image directory. Otherwise returns the
    /// first filesystem error; remaining documents may not have been processed.
    pub fn run(&self) -> Result<RunSummary, InlineError> {
        let documents = &self.config.documents;
        check_documents(&self.config.working_dir, &self.config.image_dir, documents)?;

        let reports = if self.config.jobs <= 1 || documents.len() <= 1 {
            documents
                .iter()
                .map(|document| self.process_document(document))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.jobs)
                .build()?;
            pool.install(|| {
                documents
                    .par_iter()
                    .map(|document| self.process_document(document))
                    .collect::<Result<Vec<_>, _>>()
            })?
        };

        Ok(RunSummary { documents: reports })
    }

    /// Process a single document.
    ///
    /// # Errors
    ///
    /// Returns `InlineError::Io` if the document cannot be read or written, or
    /// if the image directory or a definition file cannot be created.
    pub fn process_document(&self, document: &str) -> Result<DocumentReport, InlineError> {
        let path = self.config.document_path(document);
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Document not found");
            let report = DocumentReport::missing(document, path);
            self.report(&Progress::Finished(&report));
            return Ok(report);
        }

        let content = fs::read_to_string(&path).map_err(|e| InlineError::io(&path, e))?;
        let blocks = extract_blocks(&content, self.config.language);
        tracing::debug!(document, blocks = blocks.len(), "Extracted diagram blocks");

        let mut substitutions = Substitutions::with_capacity(blocks.len());
        let mut failures = Vec::new();

        if !blocks.is_empty() {
            let images =
                ImageDir::for_document(&self.config.working_dir, &self.config.image_dir, &path);
            images
                .create()
                .map_err(|e| InlineError::io(&images.path, e))?;

            for block in &blocks {
                let job = RenderJob::new(
                    &images,
                    block,
                    self.config.language,
                    self.config.format,
                    timestamp_millis(),
                );
                fs::write(&job.definition_path, job.source)
                    .map_err(|e| InlineError::io(&job.definition_path, e))?;

                tracing::info!(document, diagram = block.seq, "Generating image");
                self.report(&Progress::Rendering {
                    document,
                    diagram: block.seq,
                });
                match self.render(&job) {
                    Ok(()) => {
                        substitutions.add(block, job.embed(&self.config.caption));
                        if let Err(e) = fs::remove_file(&job.definition_path) {
                            tracing::warn!(
                                path = %job.definition_path.display(),
                                error = %e,
                                "Failed to remove definition file"
                            );
                        }
                    }
                    Err(error) => {
                        tracing::error!(
                            document,
                            diagram = block.seq,
                            error = %error,
                            "Failed to render diagram"
                        );
                        failures.push(DiagramFailure {
                            seq: block.seq,
                            error,
                        });
                    }
                }
            }
        }

        let status = if substitutions.is_empty() {
            tracing::info!(document, "No diagrams updated");
            DocumentStatus::Unchanged
        } else {
            let diagrams = substitutions.len();
            let updated = substitutions.apply(&content);
            fs::write(&path, updated).map_err(|e| InlineError::io(&path, e))?;
            tracing::info!(document, diagrams, "Updated document");
            DocumentStatus::Updated { diagrams }
        };

        let report = DocumentReport {
            document: document.to_owned(),
            path,
            blocks: blocks.len(),
            status,
            failures,
        };
        self.report(&Progress::Finished(&report));
        Ok(report)
    }

    fn report(&self, event: &Progress<'_>) {
        if let Some(callback) = &self.progress {
            callback(event);
        }
    }

    /// Render `job` and confirm the image exists.
    fn render(&self, job: &RenderJob<'_>) -> Result<(), RenderError> {
        self.renderer.render(job)?;
        if !job.output_path.exists() {
            return Err(RenderError::MissingOutput(job.output_path.clone()));
        }
        Ok(())
    }
}

/// List the diagram blocks of every configured document without changing anything.
///
/// # Errors
///
/// Returns `InlineError::Io` if an existing document cannot be read.
pub fn scan_documents(config: &InlineConfig) -> Result<Vec<ScanReport>, InlineError> {
    config
        .documents
        .iter()
        .map(|document| -> Result<ScanReport, InlineError> {
            let path = config.document_path(document);
            if !path.exists() {
                return Ok(ScanReport {
                    document: document.clone(),
                    path,
                    blocks: None,
                });
            }

            let content = fs::read_to_string(&path).map_err(|e| InlineError::io(&path, e))?;
            let blocks = extract_blocks(&content, config.language)
                .iter()
                .map(|block| ScannedBlock {
                    seq: block.seq,
                    line: block.line_in(&content),
                    summary: block
                        .source
                        .lines()
                        .map(str::trim)
                        .find(|l| !l.is_empty())
                        .unwrap_or_default()
                        .to_owned(),
                })
                .collect();

            Ok(ScanReport {
                document: document.clone(),
                path,
                blocks: Some(blocks),
            })
        })
        .collect()
}
