//! Turns a completed [`QueryResult`] into the view model the shell renders.
//!
//! Backend ordering is authoritative: references keep their relative order within each
//! partition and experiment plans are ranked by arrival, never by priority score.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    AgentPayload, AgentType, ExperimentPlan, LiteraturePayload, QueryResult, ReferenceItem,
    ReferenceSource,
};

pub const DEFAULT_REFERENCE_PREVIEW: usize = 5;
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    pub fn for_score(score: f64) -> Self {
        if score >= 0.8 {
            Self::High
        } else if score >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedPlan {
    /// 1-based arrival position.
    pub rank: usize,
    pub tier: PriorityTier,
    pub plan: ExperimentPlan,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentSummary {
    pub agent_type: AgentType,
    pub label: &'static str,
    pub status: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ReferenceView {
    pub uploaded_documents: Vec<ReferenceItem>,
    pub knowledge_base: Vec<ReferenceItem>,
    /// Leading slice of the combined list, or all of it when expanded.
    pub visible: Vec<ReferenceItem>,
    pub total: usize,
    pub hidden: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResultView {
    pub summary: String,
    pub processing_time_seconds: f64,
    pub agents: Vec<AgentSummary>,
    pub references: ReferenceView,
    pub plans: Vec<RankedPlan>,
}

#[derive(Debug, Clone, Copy)]
pub struct ResultAggregator {
    preview_limit: usize,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_PREVIEW)
    }
}

impl ResultAggregator {
    pub fn new(preview_limit: usize) -> Self {
        Self { preview_limit }
    }

    pub fn aggregate(&self, result: &QueryResult, show_all: bool) -> ResultView {
        ResultView {
            summary: result.summary.clone(),
            processing_time_seconds: result.processing_time_seconds,
            agents: summarize_agents(result),
            references: self.references(result, show_all),
            plans: rank_plans(&result.experiment_plans),
        }
    }

    pub fn references(&self, result: &QueryResult, show_all: bool) -> ReferenceView {
        let Some(lit) = literature_payload(result) else {
            return ReferenceView::default();
        };

        let mut view = ReferenceView {
            total: lit.results.len(),
            ..ReferenceView::default()
        };
        for item in lit.results.iter() {
            match item.source {
                ReferenceSource::UploadedDocument => view.uploaded_documents.push(item.clone()),
                ReferenceSource::KnowledgeBase => view.knowledge_base.push(item.clone()),
                ReferenceSource::Unknown => {}
            }
        }

        let shown = if show_all {
            view.total
        } else {
            view.total.min(self.preview_limit)
        };
        view.visible = lit.results.iter().take(shown).cloned().collect();
        view.hidden = view.total - shown;
        view
    }
}

/// The first `literature_rag` payload, if the backend ran that agent at all.
pub fn literature_payload(result: &QueryResult) -> Option<&LiteraturePayload> {
    result.agent_responses.iter().find_map(|r| match &r.payload {
        AgentPayload::LiteratureRag(p) => Some(p),
        _ => None,
    })
}

pub fn summarize_agents(result: &QueryResult) -> Vec<AgentSummary> {
    result
        .agent_responses
        .iter()
        .map(|r| AgentSummary {
            agent_type: r.agent_type(),
            label: r.agent_type().label(),
            status: r.status.clone(),
            message: r.message.clone(),
        })
        .collect()
}

pub fn rank_plans(plans: &[ExperimentPlan]) -> Vec<RankedPlan> {
    plans
        .iter()
        .enumerate()
        .map(|(i, plan)| RankedPlan {
            rank: i + 1,
            tier: PriorityTier::for_score(plan.priority_score),
            plan: plan.clone(),
        })
        .collect()
}

pub fn display_or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_AVAILABLE,
    }
}

/// Render one predicted-performance value; absent and null both read as not available.
pub fn format_metric(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => display_or_na(Some(s.as_str())).to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| format_metric(Some(v)))
            .collect::<Vec<_>>()
            .join(" to "),
        Some(other) => other.to_string(),
    }
}
