use std::path::PathBuf;

use eds_core::aggregate::{ResultAggregator, ResultView};
use eds_core::config::ClientConfig;
use eds_core::documents::DocumentLedger;
use eds_core::domain::{DocumentRecord, HealthResponse, QueryRequest, SearchResponse};
use eds_core::error::AppError;
use eds_core::validate::normalize_query;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::counter::DocumentCounter;
use crate::indexing::{IndexOutcome, IndexRun, IndexingBatchRunner};
use crate::query::{QueryState, QuerySubmissionController};
use crate::upload::{UploadCandidate, UploadCoordinator, UploadReport};

/// Everything one user session drives against a backend: document lifecycle, the
/// global count and the active query.
///
/// Every operation takes `&mut self`, so two user actions can never interleave their
/// mutations; a caller wanting overlap has to wait for the first to settle.
pub struct DesignSession<B> {
    backend: B,
    ledger: DocumentLedger,
    uploads: UploadCoordinator,
    indexing: IndexingBatchRunner,
    query: QuerySubmissionController,
    counter: DocumentCounter,
    aggregator: ResultAggregator,
}

impl<B: Backend> DesignSession<B> {
    pub fn new(backend: B, config: &ClientConfig) -> Self {
        Self {
            backend,
            ledger: DocumentLedger::new(),
            uploads: UploadCoordinator::new(config.upload.clone()),
            indexing: IndexingBatchRunner::new(config.index.outcome_ttl()),
            query: QuerySubmissionController::new(),
            counter: DocumentCounter::new(),
            aggregator: ResultAggregator::new(config.results.reference_preview_limit),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn ledger(&self) -> &DocumentLedger {
        &self.ledger
    }

    pub fn document_count(&self) -> Option<u64> {
        self.counter.total_indexed()
    }

    /// Why the last recount failed, if it did.
    pub fn count_error(&self) -> Option<&AppError> {
        self.counter.last_error()
    }

    pub fn index_outcome(&self) -> Option<IndexOutcome> {
        self.indexing.outcome()
    }

    pub fn query_state(&self) -> &QueryState {
        self.query.state()
    }

    /// View model of the latest successful query.
    pub fn result_view(&self, show_all: bool) -> Option<ResultView> {
        self.query
            .result()
            .map(|r| self.aggregator.aggregate(r, show_all))
    }

    /// Load the server's pending/indexed lists and the global count.
    pub async fn sync(&mut self) {
        if let Err(e) = self.refresh_status().await {
            debug!(error = %e, "initial status refresh failed");
        }
        self.counter.recount(&self.backend).await;
    }

    pub async fn upload(&mut self, candidates: Vec<UploadCandidate>) -> UploadReport {
        let report = self
            .uploads
            .upload_batch(&self.backend, &mut self.ledger, candidates)
            .await;
        if !report.uploaded.is_empty() {
            self.counter.recount(&self.backend).await;
        }
        report
    }

    /// Read files from disk and upload them; see [`UploadCoordinator::upload_paths`].
    pub async fn upload_paths(&mut self, paths: &[PathBuf]) -> UploadReport {
        let report = self
            .uploads
            .upload_paths(&self.backend, &mut self.ledger, paths)
            .await;
        if !report.uploaded.is_empty() {
            self.counter.recount(&self.backend).await;
        }
        report
    }

    pub async fn index_pending(&mut self) -> IndexRun {
        let run = self.indexing.run(&self.backend, &mut self.ledger).await;
        if matches!(run, IndexRun::Indexed { .. }) {
            self.counter.recount(&self.backend).await;
        }
        run
    }

    pub async fn submit_query(&mut self, query: &str, user_materials: Option<String>) -> Option<&QueryState> {
        self.query.submit(&self.backend, query, user_materials).await
    }

    /// Replace local document state with the server's lists. On failure the local state
    /// is kept and the error is returned for display only.
    pub async fn refresh_status(&mut self) -> Result<(), AppError> {
        match self.backend.document_status().await {
            Ok(resp) => {
                debug!(
                    pending = resp.pending.len(),
                    indexed = resp.indexed.len(),
                    "document status refreshed"
                );
                self.ledger.replace_from_server(resp.pending, resp.indexed);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "document status refresh failed; keeping local state");
                Err(e)
            }
        }
    }

    /// `Ok(None)` when the server removed a file this session had not seen yet.
    pub async fn remove_pending(&mut self, filename: &str) -> Result<Option<DocumentRecord>, AppError> {
        match self.backend.remove_pending(filename).await {
            Ok(()) => {
                info!(filename, "removed pending document");
                Ok(self.ledger.remove_pending(filename))
            }
            Err(e) if e.is_not_found() => {
                // The server no longer holds it; stop showing it.
                self.ledger.remove_pending(filename);
                Err(AppError::new("DOCUMENTS_NOT_FOUND", "File not found in pending queue")
                    .with_details(format!("filename={filename}"))
                    .with_http_status(404))
            }
            Err(e) => {
                warn!(filename, error = %e, "failed to remove pending document");
                Err(e)
            }
        }
    }

    /// Drop every document server-side. Local collections are emptied only after the
    /// server confirms; a failure leaves them untouched.
    pub async fn clear_documents(&mut self) -> Result<(), AppError> {
        match self.backend.clear_documents().await {
            Ok(()) => {
                info!(
                    pending = self.ledger.pending().len(),
                    indexed = self.ledger.indexed().len(),
                    "cleared all documents"
                );
                self.ledger.clear();
                self.counter.recount(&self.backend).await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to clear documents; keeping local state");
                Err(e)
            }
        }
    }

    /// Passage search over the indexed corpus. Blank text is refused without a request.
    pub async fn search(&self, text: &str) -> Result<SearchResponse, AppError> {
        let query = normalize_query(text)
            .ok_or_else(|| AppError::new("QUERY_EMPTY", "Search text is empty"))?;
        self.backend.search(&QueryRequest::new(query, None)).await
    }

    pub async fn recount(&mut self) -> Option<u64> {
        self.counter.recount(&self.backend).await
    }

    pub async fn health(&self) -> Result<HealthResponse, AppError> {
        self.backend.health().await
    }
}
