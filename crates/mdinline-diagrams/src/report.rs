//! Outcomes of inliner and scanner runs.

use std::path::PathBuf;

use crate::renderer::RenderError;

/// What happened to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    /// The document does not exist; it was skipped.
    Missing,
    /// No diagram was replaced; the file was not written.
    Unchanged,
    /// The file was rewritten with `diagrams` blocks replaced.
    Updated { diagrams: usize },
}

/// A diagram that could not be rendered.
#[derive(Debug)]
pub struct DiagramFailure {
    /// 1-based position of the block within its document.
    pub seq: usize,
    /// Why rendering failed.
    pub error: RenderError,
}

/// Result of processing one document.
#[derive(Debug)]
pub struct DocumentReport {
    /// Document as listed in the configuration.
    pub document: String,
    /// Resolved document path.
    pub path: PathBuf,
    /// Number of diagram blocks found.
    pub blocks: usize,
    pub status: DocumentStatus,
    pub failures: Vec<DiagramFailure>,
}

impl DocumentReport {
    pub(crate) fn missing(document: &str, path: PathBuf) -> Self {
        Self {
            document: document.to_owned(),
            path,
            blocks: 0,
            status: DocumentStatus::Missing,
            failures: Vec::new(),
        }
    }

    /// Number of diagrams replaced in this document.
    #[must_use]
    pub fn rendered(&self) -> usize {
        match self.status {
            DocumentStatus::Updated { diagrams } => diagrams,
            DocumentStatus::Missing | DocumentStatus::Unchanged => 0,
        }
    }
}

/// Reports of a whole run, in configured document order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub documents: Vec<DocumentReport>,
}

impl RunSummary {
    /// Documents that were rewritten.
    #[must_use]
    pub fn updated(&self) -> usize {
        self.count(|r| matches!(r.status, DocumentStatus::Updated { .. }))
    }

    /// Documents that were not found.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.count(|r| r.status == DocumentStatus::Missing)
    }

    /// Diagrams replaced across all documents.
    #[must_use]
    pub fn rendered(&self) -> usize {
        self.documents.iter().map(DocumentReport::rendered).sum()
    }

    /// Diagrams that failed to render across all documents.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.documents.iter().map(|r| r.failures.len()).sum()
    }

    fn count(&self, pred: impl Fn(&DocumentReport) -> bool) -> usize {
        self.documents.iter().filter(|r| pred(r)).count()
    }
}

/// A diagram block listed by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedBlock {
    /// 1-based position of the block within its document.
    pub seq: usize,
    /// 1-based line of the opening fence.
    pub line: usize,
    /// First non-empty line of the diagram source.
    pub summary: String,
}

/// Diagram blocks of one document, or `None` if it is missing.
#[derive(Debug)]
pub struct ScanReport {
    pub document: String,
    pub path: PathBuf,
    pub blocks: Option<Vec<ScannedBlock>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: DocumentStatus, failures: usize) -> DocumentReport {
        DocumentReport {
            document: "doc.md".to_owned(),
            path: PathBuf::from("/work/doc.md"),
            blocks: 0,
            status,
            failures: (1..=failures)
                .map(|seq| DiagramFailure {
                    seq,
                    error: RenderError::MissingOutput(PathBuf::from("x.png")),
                })
                .collect(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let summary = RunSummary {
            documents: vec![
                report(DocumentStatus::Updated { diagrams: 3 }, 1),
                report(DocumentStatus::Unchanged, 2),
                report(DocumentStatus::Missing, 0),
                report(DocumentStatus::Updated { diagrams: 1 }, 0),
            ],
        };

        assert_eq!(summary.updated(), 2);
        assert_eq!(summary.missing(), 1);
        assert_eq!(summary.rendered(), 4);
        assert_eq!(summary.failed(), 3);
    }

    #[test]
    fn test_empty_summary() {
        let summary = RunSummary::default();
        assert_eq!(summary.updated(), 0);
        assert_eq!(summary.rendered(), 0);
    }
}
