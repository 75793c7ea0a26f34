//! Text rendering and JSON response shapes for each command.

use std::fmt::Write as _;

use eds_client::indexing::{IndexOutcome, IndexRun};
use eds_client::upload::UploadReport;
use eds_core::aggregate::{
    display_or_na, format_metric, PriorityTier, RankedPlan, ReferenceView, ResultView, NOT_AVAILABLE,
};
use eds_core::documents::DocumentLedger;
use eds_core::domain::{DocumentRecord, HealthResponse, ReferenceItem, ReferenceSource, SearchResponse};
use eds_core::error::AppError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndexSummary {
    /// True when nothing was pending and no request was made.
    pub skipped: bool,
    pub outcome: Option<IndexOutcome>,
    pub indexed: Vec<String>,
    pub unconfirmed: Vec<String>,
}

impl IndexSummary {
    pub fn from_run(run: IndexRun) -> Result<Self, AppError> {
        match run {
            IndexRun::Skipped => Ok(Self {
                skipped: true,
                outcome: None,
                indexed: Vec::new(),
                unconfirmed: Vec::new(),
            }),
            IndexRun::Indexed { commit, outcome } => Ok(Self {
                skipped: false,
                outcome: Some(outcome),
                indexed: commit.indexed,
                unconfirmed: commit.unconfirmed,
            }),
            IndexRun::Failed(e) => Err(e),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusSummary {
    pub pending: Vec<DocumentRecord>,
    pub indexed: Vec<DocumentRecord>,
    pub total_chunks: u64,
    /// Global count across all sessions; `None` when it could not be fetched.
    pub total_indexed: Option<u64>,
}

impl StatusSummary {
    pub fn new(ledger: &DocumentLedger, total_indexed: Option<u64>) -> Self {
        Self {
            pending: ledger.pending().records().to_vec(),
            indexed: ledger.indexed().records().to_vec(),
            total_chunks: ledger.indexed().total_chunks(),
            total_indexed,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RemoveResponse {
    pub ok: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClearResponse {
    pub ok: bool,
    /// Count after the clear; `None` when the recount failed.
    pub total_indexed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CountResponse {
    pub total_indexed: u64,
}

fn source_label(source: ReferenceSource) -> &'static str {
    match source {
        ReferenceSource::UploadedDocument => "uploaded",
        ReferenceSource::KnowledgeBase => "knowledge base",
        ReferenceSource::Unknown => "other",
    }
}

fn tier_label(tier: PriorityTier) -> &'static str {
    match tier {
        PriorityTier::High => "high priority",
        PriorityTier::Medium => "medium priority",
        PriorityTier::Low => "low priority",
    }
}

fn number_or_na(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn result_text(view: &ResultView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "  {}", display_or_na(Some(view.summary.as_str())));
    let _ = writeln!(out, "Processing time: {:.1}s", view.processing_time_seconds);

    if !view.agents.is_empty() {
        let _ = writeln!(out, "\nAgents");
        for a in &view.agents {
            let _ = write!(out, "  - {}: {}", a.label, display_or_na(a.status.as_deref()));
            if let Some(msg) = a.message.as_deref().filter(|m| !m.trim().is_empty()) {
                let _ = write!(out, " ({msg})");
            }
            out.push('\n');
        }
    }

    out.push_str(&references_text(&view.references));
    out.push_str(&plans_text(&view.plans));
    out
}

fn reference_line(item: &ReferenceItem) -> String {
    let mut line = format!(
        "  [{}] {} (relevance {})",
        source_label(item.source),
        display_or_na(Some(item.title.as_str())),
        number_or_na(item.relevance_score, 2)
    );
    if let Some(year) = item.year.as_deref() {
        let _ = write!(line, ", {year}");
    }
    line
}

fn references_text(refs: &ReferenceView) -> String {
    if refs.total == 0 {
        return "\nReferences\n  none retrieved\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nReferences (showing {} of {}; {} uploaded, {} knowledge base)",
        refs.visible.len(),
        refs.total,
        refs.uploaded_documents.len(),
        refs.knowledge_base.len()
    );
    for item in &refs.visible {
        let _ = writeln!(out, "{}", reference_line(item));
    }
    if refs.hidden > 0 {
        let _ = writeln!(out, "  ... {} more; pass --show-all to list them", refs.hidden);
    }
    out
}

fn plans_text(plans: &[RankedPlan]) -> String {
    let mut out = String::from("\nExperiment plans\n");
    if plans.is_empty() {
        out.push_str("  none proposed\n");
        return out;
    }
    for ranked in plans {
        let p = &ranked.plan;
        let _ = writeln!(
            out,
            "  {}. {} [{}, {:.2}]",
            ranked.rank,
            display_or_na(Some(p.title.as_str())),
            tier_label(ranked.tier),
            p.priority_score
        );
        let _ = writeln!(
            out,
            "     Cost: {}  Time: {}  Confidence: {}",
            display_or_na(p.estimated_cost.as_deref()),
            display_or_na(p.estimated_time.as_deref()),
            number_or_na(p.prediction_confidence, 2)
        );
        if !p.formulation.is_empty() {
            let _ = writeln!(out, "     Formulation:");
            for c in &p.formulation {
                let _ = writeln!(
                    out,
                    "       - {}: {} ({}) {} {}",
                    display_or_na(Some(c.role.as_str())),
                    display_or_na(Some(c.name.as_str())),
                    display_or_na(c.abbreviation.as_deref()),
                    number_or_na(c.concentration, 2),
                    display_or_na(c.unit.as_deref())
                );
            }
        }
        if !p.predicted_performance.is_empty() {
            let _ = writeln!(out, "     Predicted performance:");
            for (metric, value) in &p.predicted_performance {
                let _ = writeln!(out, "       {metric}: {}", format_metric(value.as_ref()));
            }
        }
        if !p.rationale.trim().is_empty() {
            let _ = writeln!(out, "     Rationale: {}", p.rationale.trim());
        }
    }
    out
}

pub fn upload_text(report: &UploadReport) -> String {
    let mut out = String::new();
    for name in &report.uploaded {
        let _ = writeln!(out, "uploaded  {name}");
    }
    for skip in &report.skipped {
        let _ = writeln!(
            out,
            "skipped   {} ({})",
            skip.filename,
            skip.message.as_deref().unwrap_or("already known to the server")
        );
    }
    for f in report.rejected.iter().chain(report.failed.iter()) {
        let _ = writeln!(out, "failed    {}: {}", f.filename, f.error.message);
    }
    let _ = write!(
        out,
        "{} uploaded, {} skipped, {} failed",
        report.uploaded.len(),
        report.skipped.len(),
        report.failed.len() + report.rejected.len()
    );
    out
}

pub fn index_text(summary: &IndexSummary) -> String {
    if summary.skipped {
        return "No pending documents to index.".to_string();
    }
    let mut out = summary
        .outcome
        .as_ref()
        .map(|o| o.message().to_string())
        .unwrap_or_default();
    if !summary.unconfirmed.is_empty() {
        let _ = write!(
            out,
            "\nNot reported as indexed by the server: {}",
            summary.unconfirmed.join(", ")
        );
    }
    out
}

fn document_line(doc: &DocumentRecord) -> String {
    let mut line = format!("  {}  {}  {} bytes", doc.filename, display_or_na(Some(doc.file_type.as_str())), doc.file_size);
    if let Some(chunks) = doc.chunks_created {
        let _ = write!(line, "  {chunks} chunks");
    }
    line
}

pub fn status_text(summary: &StatusSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pending ({})", summary.pending.len());
    for doc in &summary.pending {
        let _ = writeln!(out, "{}", document_line(doc));
    }
    let _ = writeln!(
        out,
        "Indexed ({}, {} chunks)",
        summary.indexed.len(),
        summary.total_chunks
    );
    for doc in &summary.indexed {
        let _ = writeln!(out, "{}", document_line(doc));
    }
    let total = summary
        .total_indexed
        .map(|n| n.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let _ = write!(out, "Total indexed documents: {total}");
    out
}

pub fn health_text(health: &HealthResponse) -> String {
    let docs = health
        .documents_indexed
        .map(|n| n.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    format!(
        "Backend status: {} ({docs} documents indexed)",
        display_or_na(Some(health.status.as_str()))
    )
}

pub fn search_text(found: &SearchResponse) -> String {
    if found.results.is_empty() {
        return format!("No indexed passages match \"{}\".", found.query);
    }
    let mut out = String::new();
    for (i, hit) in found.results.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {}  score {}",
            i + 1,
            display_or_na(Some(hit.source.as_str())),
            number_or_na(hit.score, 2)
        );
        let _ = writeln!(out, "   {}", display_or_na(Some(hit.content.trim())));
    }
    let noun = if found.count == 1 { "passage" } else { "passages" };
    let _ = write!(out, "{} {noun}", found.count);
    out
}
