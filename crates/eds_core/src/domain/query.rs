use serde::{Deserialize, Serialize};

use super::agent::AgentResponse;
use super::de::null_as_default;
use super::plan::ExperimentPlan;

/// Body of `POST /api/query`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
    pub user_materials: Option<String>,
}

impl QueryRequest {
    /// Blank material text is sent as absent.
    pub fn new(query: impl Into<String>, user_materials: Option<String>) -> Self {
        Self {
            query: query.into(),
            user_materials: user_materials.filter(|m| !m.trim().is_empty()),
        }
    }
}

/// One completed query. Replaced wholesale by the next submission, never patched.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QueryResult {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(rename = "processing_time", default)]
    pub processing_time_seconds: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub agent_responses: Vec<AgentResponse>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experiment_plans: Vec<ExperimentPlan>,
}
