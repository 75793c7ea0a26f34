//! Value types shared by every layer, plus the JSON shapes of the backend contract.

mod agent;
mod de;
mod document;
mod plan;
mod query;
mod wire;

pub use agent::{
    AgentPayload, AgentResponse, AgentType, ExperimentPlanningPayload, LiteraturePayload,
    OrchestratorPayload, PerformancePredictionPayload, PropertyCompatibilityPayload, ReferenceItem,
    ReferenceSource,
};
pub use document::{DocumentRecord, DocumentStatus};
pub use plan::{ExperimentPlan, FormulationComponent};
pub use query::{QueryRequest, QueryResult};
pub use wire::{
    DocumentCountResponse, DocumentStatusResponse, HealthResponse, IndexResponse, SearchHit,
    SearchResponse, UploadAck, UploadAckStatus,
};
