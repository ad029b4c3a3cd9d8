//! Document loading and per-airline ingestion.
//!
//! Layout: `<base>/<airline>/<doc>.{md,txt}`. Each document is split and
//! indexed in its own call, so one bad file never aborts the airline.
//! Documents are identified as `<airline>/<file stem>`, so equal file names
//! under different airlines never share point ids.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::ExtractionError;
use crate::indexer::Indexer;
use crate::progress::Progress;
use crate::splitter::{DocumentMeta, Splitter};

/// Extensions accepted by [`load_document`].
pub const SUPPORTED_FORMATS: &[&str] = &["md", "txt"];

/// Reads a UTF-8 policy document.
///
/// # Errors
/// - [`ExtractionError::NotFound`] when the file is missing
/// - [`ExtractionError::UnsupportedFormat`] for other extensions
/// - [`ExtractionError::Empty`] for blank documents
/// - [`ExtractionError::Io`] for any other read failure
pub async fn load_document(path: &Path) -> Result<String, ExtractionError> {
    if !is_supported(path) {
        return Err(ExtractionError::UnsupportedFormat(path.to_path_buf()));
    }
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExtractionError::NotFound(path.to_path_buf())
        } else {
            ExtractionError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    if text.trim().is_empty() {
        return Err(ExtractionError::Empty(path.to_path_buf()));
    }
    Ok(text)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| SUPPORTED_FORMATS.contains(&e.as_str()))
}

/// An airline name must be a single plain folder name under the policies
/// directory: no separators, no `.`/`..`, not absolute.
pub fn is_valid_airline(airline: &str) -> bool {
    let mut components = Path::new(airline).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !airline.contains(['/', '\\'])
}

/// Stable document id: `<airline>/<file stem>`.
pub fn document_id(airline: &str, path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{airline}/{stem}")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IngestFailure {
    pub doc_id: String,
    pub reason: String,
}

/// Outcome of ingesting one airline folder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub airline: String,
    pub documents_indexed: usize,
    pub chunks_indexed: usize,
    pub skipped: usize,
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    fn empty(airline: &str) -> Self {
        Self {
            airline: airline.to_string(),
            ..Self::default()
        }
    }
}

pub struct Ingestor {
    splitter: Splitter,
    indexer: Arc<Indexer>,
    progress: Arc<dyn Progress>,
}

impl Ingestor {
    pub fn new(splitter: Splitter, indexer: Arc<Indexer>, progress: Arc<dyn Progress>) -> Self {
        Self {
            splitter,
            indexer,
            progress,
        }
    }

    /// Ingests every supported file of `<base>/<airline>`, sorted by name.
    ///
    /// A missing folder is logged and yields an empty report. A name that is
    /// not a plain folder name (see [`is_valid_airline`]) is never read and is
    /// reported as a failure.
    pub async fn ingest_airline(
        &self,
        base: &Path,
        airline: &str,
        locale: &str,
        policy_version: &str,
    ) -> IngestReport {
        let mut report = IngestReport::empty(airline);
        if !is_valid_airline(airline) {
            error!(airline, "refusing airline name outside the policies directory");
            report.failures.push(IngestFailure {
                doc_id: airline.to_string(),
                reason: format!("invalid airline name: {airline:?}"),
            });
            return report;
        }
        let dir = base.join(airline);

        let files = match list_files(&dir).await {
            Ok(files) => files,
            Err(e) => {
                error!(airline, dir = %dir.display(), error = %e, "airline folder not readable");
                return report;
            }
        };
        self.progress.set_total(files.len() as u64);

        for path in files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.progress.step(&format!("{airline}: {name}"));

            if !is_supported(&path) {
                warn!(airline, file = %name, "skipping unsupported file format");
                report.skipped += 1;
                continue;
            }

            let doc_id = document_id(airline, &path);

            let text = match load_document(&path).await {
                Ok(t) => t,
                Err(ExtractionError::Empty(_)) => {
                    warn!(airline, file = %name, "no valid text extracted");
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!(airline, file = %name, error = %e, "failed to load document");
                    report.failures.push(IngestFailure {
                        doc_id,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let meta = DocumentMeta {
                airline: airline.to_string(),
                locale: locale.to_string(),
                policy_version: policy_version.to_string(),
                doc_id: doc_id.clone(),
                source: path.display().to_string(),
            };
            let chunks = self.splitter.split(&text, &meta);

            match self.indexer.index(&chunks).await {
                Ok(written) => {
                    info!(airline, file = %name, chunks = written, "document indexed");
                    report.documents_indexed += 1;
                    report.chunks_indexed += written;
                }
                Err(e) => {
                    error!(airline, file = %name, error = %e, "failed to index document");
                    report.failures.push(IngestFailure {
                        doc_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            airline,
            documents = report.documents_indexed,
            chunks = report.chunks_indexed,
            skipped = report.skipped,
            failures = report.failures.len(),
            "airline ingestion finished"
        );
        report
    }

    /// Runs [`Ingestor::ingest_airline`] for each airline in order.
    pub async fn ingest_all(
        &self,
        base: &Path,
        airlines: &[String],
        locale: &str,
        policy_version: &str,
    ) -> Vec<IngestReport> {
        let mut reports = Vec::with_capacity(airlines.len());
        for airline in airlines {
            reports.push(
                self.ingest_airline(base, airline, locale, policy_version)
                    .await,
            );
        }
        self.progress.finish("ingestion finished");
        reports
    }
}

async fn list_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
