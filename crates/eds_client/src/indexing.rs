use std::time::Duration;

use eds_core::documents::{DocumentLedger, IndexCommit};
use eds_core::error::AppError;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::outcome::ExpiringSlot;

/// Transient banner shown after an indexing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexOutcome {
    Indexed {
        count: u32,
        total_chunks: u64,
        message: String,
    },
    Failed {
        message: String,
    },
}

impl IndexOutcome {
    pub fn message(&self) -> &str {
        match self {
            Self::Indexed { message, .. } | Self::Failed { message } => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndexRun {
    /// Nothing was pending; no request was made.
    Skipped,
    Indexed {
        commit: IndexCommit,
        outcome: IndexOutcome,
    },
    Failed(AppError),
}

/// Drains the pending queue into the indexed collection through one backend call.
#[derive(Debug)]
pub struct IndexingBatchRunner {
    outcome: ExpiringSlot<IndexOutcome>,
    ttl: Duration,
}

impl IndexingBatchRunner {
    pub fn new(ttl: Duration) -> Self {
        Self {
            outcome: ExpiringSlot::new(),
            ttl,
        }
    }

    /// The banner of the latest run, until it expires.
    pub fn outcome(&self) -> Option<IndexOutcome> {
        self.outcome.current()
    }

    pub async fn run(&mut self, backend: &dyn Backend, ledger: &mut DocumentLedger) -> IndexRun {
        if ledger.pending().is_empty() {
            debug!("index requested with an empty pending queue; skipping");
            return IndexRun::Skipped;
        }

        // A new run retires whatever the previous one was still showing.
        self.outcome.clear();
        let pending = ledger.pending().len();
        debug!(pending, "indexing pending documents");

        match backend.index_pending().await {
            Ok(resp) => {
                let commit = ledger.commit_index(resp.indexed_files);
                let count = if resp.indexed_count > 0 {
                    resp.indexed_count
                } else {
                    commit.indexed.len() as u32
                };
                let message = if resp.message.trim().is_empty() {
                    format!(
                        "Successfully indexed {count} document(s) with {} chunks",
                        resp.total_chunks
                    )
                } else {
                    resp.message
                };
                if !commit.unconfirmed.is_empty() {
                    warn!(
                        files = ?commit.unconfirmed,
                        "server did not report these pending files as indexed"
                    );
                }
                info!(count, total_chunks = resp.total_chunks, "indexing finished");

                let outcome = IndexOutcome::Indexed {
                    count,
                    total_chunks: resp.total_chunks,
                    message,
                };
                self.outcome.show(outcome.clone(), self.ttl);
                IndexRun::Indexed { commit, outcome }
            }
            Err(e) => {
                warn!(error = %e, details = ?e.details, "indexing failed; pending queue left unchanged");
                self.outcome.show(
                    IndexOutcome::Failed {
                        message: e.message.clone(),
                    },
                    self.ttl,
                );
                IndexRun::Failed(e)
            }
        }
    }
}
