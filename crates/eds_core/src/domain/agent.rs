use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de::{null_as_default, opt_text};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Orchestrator,
    LiteratureRag,
    PropertyCompatibility,
    PerformancePrediction,
    ExperimentPlanning,
    Unknown,
}

impl AgentType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "orchestrator" => Self::Orchestrator,
            "literature_rag" => Self::LiteratureRag,
            "property_compatibility" => Self::PropertyCompatibility,
            "performance_prediction" => Self::PerformancePrediction,
            "experiment_planning" => Self::ExperimentPlanning,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Orchestrator => "Orchestrator",
            Self::LiteratureRag => "Literature search",
            Self::PropertyCompatibility => "Property & compatibility",
            Self::PerformancePrediction => "Performance prediction",
            Self::ExperimentPlanning => "Experiment planning",
            Self::Unknown => "Other agent",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSource {
    UploadedDocument,
    KnowledgeBase,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A retrieved passage used to ground an answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReferenceItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: ReferenceSource,
    #[serde(default)]
    pub relevance_score: Option<f64>,
    #[serde(default, deserialize_with = "opt_text")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub authors: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub journal: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_findings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct OrchestratorPayload {
    #[serde(default)]
    pub response_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LiteraturePayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<ReferenceItem>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub sources_count: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PropertyCompatibilityPayload {
    #[serde(default)]
    pub is_compatible: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub compatibility_issues: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PerformancePredictionPayload {
    #[serde(default)]
    pub average_confidence: Option<f64>,
    #[serde(default)]
    pub total_plans_evaluated: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ExperimentPlanningPayload {
    #[serde(default)]
    pub total_plans: Option<u32>,
}

/// Payload keyed by `agent_type`; each tag has exactly one shape.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentPayload {
    Orchestrator(OrchestratorPayload),
    LiteratureRag(LiteraturePayload),
    PropertyCompatibility(PropertyCompatibilityPayload),
    PerformancePrediction(PerformancePredictionPayload),
    ExperimentPlanning(ExperimentPlanningPayload),
    Unknown { agent_type: String, data: Value },
}

impl AgentPayload {
    pub fn agent_type(&self) -> AgentType {
        match self {
            Self::Orchestrator(_) => AgentType::Orchestrator,
            Self::LiteratureRag(_) => AgentType::LiteratureRag,
            Self::PropertyCompatibility(_) => AgentType::PropertyCompatibility,
            Self::PerformancePrediction(_) => AgentType::PerformancePrediction,
            Self::ExperimentPlanning(_) => AgentType::ExperimentPlanning,
            Self::Unknown { .. } => AgentType::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawAgentResponse")]
pub struct AgentResponse {
    pub status: Option<String>,
    pub message: Option<String>,
    pub payload: AgentPayload,
}

impl AgentResponse {
    pub fn agent_type(&self) -> AgentType {
        self.payload.agent_type()
    }
}

#[derive(Debug, Deserialize)]
struct RawAgentResponse {
    agent_type: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Value,
}

fn decode_payload<T: DeserializeOwned + Default>(agent_type: &str, data: Value) -> Result<T, AppError> {
    if data.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(data).map_err(|e| {
        AppError::new("AGENT_PAYLOAD_INVALID", "Failed to decode agent payload")
            .with_details(format!("agent_type={agent_type}; err={e}"))
    })
}

impl TryFrom<RawAgentResponse> for AgentResponse {
    type Error = AppError;

    fn try_from(raw: RawAgentResponse) -> Result<Self, Self::Error> {
        let tag = raw.agent_type.as_str();
        let payload = match AgentType::from_tag(tag) {
            AgentType::Orchestrator => AgentPayload::Orchestrator(decode_payload(tag, raw.data)?),
            AgentType::LiteratureRag => AgentPayload::LiteratureRag(decode_payload(tag, raw.data)?),
            AgentType::PropertyCompatibility => {
                AgentPayload::PropertyCompatibility(decode_payload(tag, raw.data)?)
            }
            AgentType::PerformancePrediction => {
                AgentPayload::PerformancePrediction(decode_payload(tag, raw.data)?)
            }
            AgentType::ExperimentPlanning => {
                AgentPayload::ExperimentPlanning(decode_payload(tag, raw.data)?)
            }
            AgentType::Unknown => AgentPayload::Unknown {
                agent_type: raw.agent_type.clone(),
                data: raw.data,
            },
        };
        Ok(Self {
            status: raw.status,
            message: raw.message,
            payload,
        })
    }
}
