//! Render jobs and image path layout.
//!
//! Images for a document live in `<working_dir>/<image_dir>/<document stem>/`
//! and are named `<tag>_<millis>_<seq>.<ext>`. The temporary definition file
//! sits next to the image with the language's definition extension.

use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::extract::DiagramBlock;
use crate::language::{DiagramFormat, DiagramLanguage};

/// Image directory of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDir {
    /// Absolute (or working-dir based) directory path.
    pub path: PathBuf,
    /// Directory relative to the working directory, `/`-separated.
    pub relative: String,
}

impl ImageDir {
    /// Derive the image directory for `document`.
    #[must_use]
    pub fn for_document(working_dir: &Path, image_dir: &str, document: &Path) -> Self {
        let stem = document
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let image_dir = image_dir.trim_end_matches(['/', '\\']);

        Self {
            path: working_dir.join(image_dir).join(&stem),
            relative: format!("{image_dir}/{stem}"),
        }
    }

    /// Create the directory and its parents; succeeds if it already exists.
    pub fn create(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.path)
    }
}

/// Two configured documents that cannot be processed in the same run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentConflict {
    /// Both entries name the same file.
    #[error("document '{second}' is the same file as '{first}'")]
    Duplicate { first: String, second: String },
    /// Both documents would write images into the same directory.
    #[error("documents '{first}' and '{second}' share the image directory {dir}")]
    SharedImageDir {
        first: String,
        second: String,
        dir: String,
    },
}

/// Reject document lists that name one file twice or whose documents share an image directory.
///
/// Images are keyed by document stem, so `a/guide.md` and `b/guide.md` would
/// overwrite each other's images.
///
/// # Errors
///
/// Returns the first conflict in list order.
pub fn check_documents(
    working_dir: &Path,
    image_dir: &str,
    documents: &[String],
) -> Result<(), DocumentConflict> {
    let mut seen: Vec<(&str, PathBuf, ImageDir)> = Vec::with_capacity(documents.len());

    for document in documents {
        let path = normalize_path(&working_dir.join(document));
        let images = ImageDir::for_document(working_dir, image_dir, &path);

        for (first, first_path, first_images) in &seen {
            if *first_path == path {
                return Err(DocumentConflict::Duplicate {
                    first: (*first).to_owned(),
                    second: document.clone(),
                });
            }
            if first_images.relative == images.relative {
                return Err(DocumentConflict::SharedImageDir {
                    first: (*first).to_owned(),
                    second: document.clone(),
                    dir: images.relative,
                });
            }
        }
        seen.push((document.as_str(), path, images));
    }

    Ok(())
}

/// Canonical form of `path`, or a lexically cleaned one if it does not exist.
fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !clean.pop() {
                    clean.push("..");
                }
            }
            other => clean.push(other),
        }
    }
    clean
}

/// Everything needed to render one diagram block.
#[derive(Debug)]
pub struct RenderJob<'a> {
    /// Diagram source written to the definition file.
    pub source: &'a str,
    /// Temporary definition file passed to the renderer.
    pub definition_path: PathBuf,
    /// Image file the renderer must produce.
    pub output_path: PathBuf,
    /// Image path relative to the working directory, used in the embed.
    pub relative_path: String,
}

impl<'a> RenderJob<'a> {
    /// Build the job for `block`, naming files with `timestamp` and the block's sequence number.
    #[must_use]
    pub fn new(
        images: &ImageDir,
        block: &DiagramBlock<'a>,
        language: DiagramLanguage,
        format: DiagramFormat,
        timestamp: u128,
    ) -> Self {
        let basename = format!("{}_{timestamp}_{}", language.tag(), block.seq);
        let image_name = format!("{basename}.{}", format.extension());

        Self {
            source: block.source,
            definition_path: images
                .path
                .join(format!("{basename}.{}", language.definition_extension())),
            output_path: images.path.join(&image_name),
            relative_path: format!("{}/{image_name}", images.relative),
        }
    }

    /// Markdown line embedding the rendered image.
    #[must_use]
    pub fn embed(&self, caption: &str) -> String {
        format!("![{caption}]({})", self.relative_path)
    }
}

/// Milliseconds since the Unix epoch.
pub(crate) fn timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
