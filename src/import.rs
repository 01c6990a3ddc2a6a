//! Batch import with per-document recovery
//!
//! One unusable document never blocks the others: every failure is logged,
//! recorded in the [`ImportSummary`], and the batch continues.

use tracing::{info, warn};

use crate::session::{parse_session_document, SessionStore};
use crate::Error;

/// A document that could not be imported.
#[derive(Debug)]
pub struct ImportFailure {
    /// File name or other label of the document
    pub source_label: String,
    /// Why it was rejected
    pub error: Error,
}

/// Outcome of a batch import.
#[derive(Debug, Default)]
pub struct ImportSummary {
    /// Store positions of the sessions that were added, in input order
    pub imported: Vec<usize>,
    /// Documents that were rejected, in input order
    pub failures: Vec<ImportFailure>,
}

impl ImportSummary {
    /// Number of sessions added.
    #[must_use]
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    /// Whether every document was imported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, store: &mut SessionStore, source_label: String, text: &str) {
        match parse_session_document(text, &source_label) {
            Ok(session) => self.imported.push(store.add(session)),
            Err(error) => {
                warn!(source = %source_label, error = %error, "document rejected");
                self.failures.push(ImportFailure {
                    source_label,
                    error,
                });
            }
        }
    }
}

/// Parse, validate and store `(source_label, text)` documents in order.
pub fn import_documents<I, L, T>(store: &mut SessionStore, documents: I) -> ImportSummary
where
    I: IntoIterator<Item = (L, T)>,
    L: Into<String>,
    T: AsRef<str>,
{
    let mut summary = ImportSummary::default();
    for (label, text) in documents {
        summary.record(store, label.into(), text.as_ref());
    }
    info!(
        imported = summary.imported_count(),
        rejected = summary.failures.len(),
        "batch import finished"
    );
    summary
}

/// Read session files and store the valid ones. Each session is labelled
/// with its file name.
#[cfg(feature = "tokio")]
pub async fn import_files<P: AsRef<std::path::Path>>(
    store: &mut SessionStore,
    paths: &[P],
) -> ImportSummary {
    let mut summary = ImportSummary::default();
    for path in paths {
        let path = path.as_ref();
        let label = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        match tokio::fs::read(path).await {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => summary.record(store, label, &text),
                Err(e) => {
                    warn!(source = %label, error = %e, "file is not UTF-8");
                    let error = Error::ParseError(format!("{label}: file is not UTF-8: {e}"));
                    summary.failures.push(ImportFailure {
                        source_label: label,
                        error,
                    });
                }
            },
            Err(e) => {
                warn!(source = %label, error = %e, "file unreadable");
                summary.failures.push(ImportFailure {
                    source_label: label,
                    error: e.into(),
                });
            }
        }
    }
    info!(
        imported = summary.imported_count(),
        rejected = summary.failures.len(),
        "file import finished"
    );
    summary
}
