use eds_core::domain::{QueryRequest, QueryResult};
use eds_core::error::AppError;
use eds_core::validate::normalize_query;
use tracing::{debug, info, warn};

use crate::backend::Backend;

/// Lifecycle of the single active query.
///
/// `Succeeded` and `Failed` stay visible until the next submission; both accept a new
/// submission just like `Idle`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    Idle,
    Submitting { ticket: u64 },
    Succeeded(QueryResult),
    Failed(AppError),
}

/// Proof that a submission was accepted. Hand it back to [`QuerySubmissionController::finish`].
#[derive(Debug)]
pub struct SubmissionTicket {
    id: u64,
    request: QueryRequest,
}

impl SubmissionTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn request(&self) -> &QueryRequest {
        &self.request
    }
}

#[derive(Debug)]
pub struct QuerySubmissionController {
    state: QueryState,
    next_ticket: u64,
}

impl Default for QuerySubmissionController {
    fn default() -> Self {
        Self {
            state: QueryState::Idle,
            next_ticket: 0,
        }
    }
}

impl QuerySubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, QueryState::Submitting { .. })
    }

    pub fn result(&self) -> Option<&QueryResult> {
        match &self.state {
            QueryState::Succeeded(r) => Some(r),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match &self.state {
            QueryState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Enter `Submitting`, discarding the previous result or error.
    ///
    /// Returns `None` without touching state when the query is blank or another
    /// submission is still in flight.
    pub fn begin(&mut self, query: &str, user_materials: Option<String>) -> Option<SubmissionTicket> {
        let query = normalize_query(query)?;
        if self.is_submitting() {
            debug!("query submission rejected: another query is in flight");
            return None;
        }

        self.next_ticket += 1;
        self.state = QueryState::Submitting {
            ticket: self.next_ticket,
        };
        Some(SubmissionTicket {
            id: self.next_ticket,
            request: QueryRequest::new(query, user_materials),
        })
    }

    /// Settle the submission `ticket` belongs to. A ticket that is no longer current is
    /// ignored and `false` is returned.
    pub fn finish(&mut self, ticket: SubmissionTicket, outcome: Result<QueryResult, AppError>) -> bool {
        match self.state {
            QueryState::Submitting { ticket: current } if current == ticket.id => {}
            _ => {
                debug!(ticket = ticket.id, "ignoring completion of a superseded query");
                return false;
            }
        }

        self.state = match outcome {
            Ok(result) => {
                info!(
                    plans = result.experiment_plans.len(),
                    agents = result.agent_responses.len(),
                    processing_time = result.processing_time_seconds,
                    "query succeeded"
                );
                QueryState::Succeeded(result)
            }
            Err(e) => {
                warn!(error = %e, details = ?e.details, "query failed");
                QueryState::Failed(e)
            }
        };
        true
    }

    /// Run one full cycle against `backend`. Returns `None` when the submission was
    /// not accepted (blank query or one already in flight).
    pub async fn submit(
        &mut self,
        backend: &dyn Backend,
        query: &str,
        user_materials: Option<String>,
    ) -> Option<&QueryState> {
        let ticket = self.begin(query, user_materials)?;
        let outcome = backend.submit_query(ticket.request()).await;
        self.finish(ticket, outcome);
        Some(&self.state)
    }
}
