use eds_core::error::AppError;
use tracing::{debug, warn};

use crate::backend::Backend;

/// Global indexed-document count as last reported by the server.
///
/// Nothing increments it locally; the only writer is [`recount`].
///
/// [`recount`]: DocumentCounter::recount
#[derive(Debug, Clone, Default)]
pub struct DocumentCounter {
    total_indexed: Option<u64>,
    last_error: Option<AppError>,
}

impl DocumentCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first successful recount.
    pub fn total_indexed(&self) -> Option<u64> {
        self.total_indexed
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    /// Re-fetch the count. On failure the previous value stays displayed.
    pub async fn recount(&mut self, backend: &dyn Backend) -> Option<u64> {
        match backend.document_count().await {
            Ok(resp) => {
                debug!(total_indexed = resp.total_indexed, "document count refreshed");
                self.total_indexed = Some(resp.total_indexed);
                self.last_error = None;
            }
            Err(e) => {
                warn!(error = %e, "document count refresh failed; keeping stale count");
                self.last_error = Some(e);
            }
        }
        self.total_indexed
    }
}
