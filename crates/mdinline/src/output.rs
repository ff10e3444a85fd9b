//! Colored terminal reporting of inliner and scan results.
//!
//! Everything goes to stderr so renderer output on stdout stays separate.

use console::{Style, Term};
use mdinline_diagrams::{DocumentReport, DocumentStatus, Progress, RunSummary, ScanReport};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        self.styled(&self.red, msg);
    }

    /// Report the outcome of one document.
    pub(crate) fn document(&self, report: &DocumentReport) {
        for failure in &report.failures {
            self.error(&format!(
                "Error processing diagram {} in {}: {}",
                failure.seq, report.document, failure.error
            ));
        }

        match report.status {
            DocumentStatus::Missing => {
                self.styled(
                    &self.yellow,
                    &format!("File not found: {}", report.path.display()),
                );
            }
            DocumentStatus::Unchanged => {
                self.info(&format!("No diagrams updated for {}.", report.document));
            }
            DocumentStatus::Updated { diagrams } => {
                self.styled(
                    &self.green,
                    &format!("Updated {} with {diagrams} diagrams.", report.document),
                );
            }
        }
    }

    /// Report an in-flight event of an inliner run.
    pub(crate) fn progress(&self, event: &Progress<'_>) {
        match event {
            Progress::Rendering { document, diagram } => {
                self.info(&format!("Generating image for {document} - Diagram {diagram}..."));
            }
            Progress::Finished(report) => self.document(report),
        }
    }

    /// Report a whole inliner run.
    pub(crate) fn summary(&self, summary: &RunSummary) {
        self.separator();
        let line = format!(
            "{} of {} documents updated, {} diagrams inlined, {} failed, {} documents missing",
            summary.updated(),
            summary.documents.len(),
            summary.rendered(),
            summary.failed(),
            summary.missing(),
        );
        if summary.failed() > 0 || summary.missing() > 0 {
            self.styled(&self.yellow, &line);
        } else {
            self.styled(&self.green, &line);
        }
    }

    /// Report the diagram blocks of one scanned document.
    pub(crate) fn scan(&self, report: &ScanReport) {
        let Some(blocks) = &report.blocks else {
            self.styled(
                &self.yellow,
                &format!("File not found: {}", report.path.display()),
            );
            return;
        };

        self.styled(
            &self.cyan_bold,
            &format!("{} ({} diagrams)", report.document, blocks.len()),
        );
        for block in blocks {
            self.info(&format!(
                "  #{} line {}: {}",
                block.seq, block.line, block.summary
            ));
        }
    }

    /// Print a separator line.
    fn separator(&self) {
        let _ = self.term.write_line(&"=".repeat(70));
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}
