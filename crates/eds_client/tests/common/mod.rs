#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;
use eds_client::backend::Backend;
use eds_core::domain::{
    DocumentCountResponse, DocumentRecord, DocumentStatus, DocumentStatusResponse, HealthResponse,
    IndexResponse, QueryRequest, QueryResult, SearchHit, SearchResponse, UploadAck,
    UploadAckStatus,
};
use eds_core::error::AppError;
use eds_core::validate::normalize_extension;
use parking_lot::Mutex;
use serde_json::json;

/// In-memory backend with scripted answers. Unscripted calls behave like a healthy server.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    events: Mutex<Vec<String>>,
    upload_errors: Mutex<HashMap<String, AppError>>,
    upload_acks: Mutex<HashMap<String, UploadAck>>,
    server_pending: Mutex<Vec<String>>,
    server_indexed: Mutex<u64>,
    index_result: Mutex<Option<Result<IndexResponse, AppError>>>,
    query_result: Mutex<Option<Result<QueryResult, AppError>>>,
    count_result: Mutex<Option<Result<u64, AppError>>>,
    status_result: Mutex<Option<Result<DocumentStatusResponse, AppError>>>,
    remove_errors: Mutex<HashMap<String, AppError>>,
    clear_error: Mutex<Option<AppError>>,
    queries: Mutex<Vec<QueryRequest>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn queries(&self) -> Vec<QueryRequest> {
        self.queries.lock().clone()
    }

    pub fn fail_upload(&self, filename: &str, err: AppError) {
        self.upload_errors.lock().insert(filename.to_string(), err);
    }

    pub fn ack_upload(&self, filename: &str, ack: UploadAck) {
        self.upload_acks.lock().insert(filename.to_string(), ack);
    }

    pub fn set_index(&self, result: Result<IndexResponse, AppError>) {
        *self.index_result.lock() = Some(result);
    }

    pub fn set_query(&self, result: Result<QueryResult, AppError>) {
        *self.query_result.lock() = Some(result);
    }

    pub fn set_count(&self, result: Result<u64, AppError>) {
        *self.count_result.lock() = Some(result);
    }

    pub fn set_status(&self, result: Result<DocumentStatusResponse, AppError>) {
        *self.status_result.lock() = Some(result);
    }

    pub fn fail_remove(&self, filename: &str, err: AppError) {
        self.remove_errors.lock().insert(filename.to_string(), err);
    }

    pub fn fail_clear(&self, err: AppError) {
        *self.clear_error.lock() = Some(err);
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn submit_query(&self, request: &QueryRequest) -> Result<QueryResult, AppError> {
        self.record("query".to_string());
        self.queries.lock().push(request.clone());
        tokio::task::yield_now().await;
        self.query_result
            .lock()
            .clone()
            .unwrap_or_else(|| Err(AppError::new("QUERY_FAILED", "no scripted query result")))
    }

    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<UploadAck, AppError> {
        self.record(format!("upload:{filename}"));
        self.events.lock().push(format!("start:{filename}"));
        tokio::task::yield_now().await;
        self.events.lock().push(format!("end:{filename}"));

        if let Some(err) = self.upload_errors.lock().get(filename).cloned() {
            return Err(err);
        }
        if let Some(ack) = self.upload_acks.lock().get(filename).cloned() {
            return Ok(ack);
        }
        self.server_pending.lock().push(filename.to_string());
        Ok(UploadAck {
            status: UploadAckStatus::Uploaded,
            filename: Some(filename.to_string()),
            file_type: normalize_extension(filename).unwrap_or_default(),
            file_size: bytes.len() as u64,
            message: None,
        })
    }

    async fn index_pending(&self) -> Result<IndexResponse, AppError> {
        self.record("index".to_string());
        tokio::task::yield_now().await;
        if let Some(result) = self.index_result.lock().clone() {
            return result;
        }
        let names = std::mem::take(&mut *self.server_pending.lock());
        *self.server_indexed.lock() += names.len() as u64;
        Ok(IndexResponse {
            status: "success".to_string(),
            indexed_count: names.len() as u32,
            total_chunks: names.len() as u64,
            indexed_files: names.iter().map(|n| indexed_record(n, 1)).collect(),
            message: String::new(),
        })
    }

    async fn document_status(&self) -> Result<DocumentStatusResponse, AppError> {
        self.record("status".to_string());
        self.status_result
            .lock()
            .clone()
            .unwrap_or_else(|| Ok(DocumentStatusResponse::default()))
    }

    async fn document_count(&self) -> Result<DocumentCountResponse, AppError> {
        self.record("count".to_string());
        let scripted = self.count_result.lock().clone();
        match scripted {
            Some(r) => r.map(|total_indexed| DocumentCountResponse { total_indexed }),
            None => Ok(DocumentCountResponse {
                total_indexed: *self.server_indexed.lock(),
            }),
        }
    }

    async fn remove_pending(&self, filename: &str) -> Result<(), AppError> {
        self.record(format!("remove:{filename}"));
        if let Some(err) = self.remove_errors.lock().get(filename).cloned() {
            return Err(err);
        }
        self.server_pending.lock().retain(|n| n != filename);
        Ok(())
    }

    async fn clear_documents(&self) -> Result<(), AppError> {
        self.record("clear".to_string());
        if let Some(err) = self.clear_error.lock().clone() {
            return Err(err);
        }
        self.server_pending.lock().clear();
        *self.server_indexed.lock() = 0;
        Ok(())
    }

    async fn search(&self, request: &QueryRequest) -> Result<SearchResponse, AppError> {
        self.record(format!("search:{}", request.query));
        let results = vec![SearchHit {
            content: format!("passage about {}", request.query),
            source: "cell.pdf".to_string(),
            score: Some(0.85),
        }];
        Ok(SearchResponse {
            query: request.query.clone(),
            count: results.len() as u32,
            results,
        })
    }

    async fn health(&self) -> Result<HealthResponse, AppError> {
        self.record("health".to_string());
        Ok(HealthResponse {
            status: "healthy".to_string(),
            documents_indexed: Some(*self.server_indexed.lock()),
        })
    }
}

pub fn indexed_record(filename: &str, chunks: u32) -> DocumentRecord {
    DocumentRecord {
        filename: filename.to_string(),
        file_type: normalize_extension(filename).unwrap_or_default(),
        file_size: 0,
        status: DocumentStatus::Indexed,
        chunks_created: Some(chunks),
        uploaded_at: None,
        indexed_at: Some("2026-10-19T12:00:00".to_string()),
    }
}

pub fn sample_result(summary: &str) -> QueryResult {
    serde_json::from_value(json!({
        "query": "design",
        "summary": summary,
        "processing_time": 3.5,
        "agent_responses": [
            { "agent_type": "literature_rag", "status": "success", "message": "Found 2 relevant sources",
              "data": { "results": [
                  { "title": "Uploaded: cell.pdf", "content": "...", "source": "uploaded_document", "relevance_score": 0.81 },
                  { "title": "Solvent: Ethylene Carbonate (EC)", "content": "...", "source": "knowledge_base", "relevance_score": 0.9 }
              ] } }
        ],
        "experiment_plans": [
            { "plan_id": "p1", "title": "Baseline", "priority_score": 0.95 },
            { "plan_id": "p2", "title": "Variant", "priority_score": 0.6 }
        ]
    }))
    .expect("sample result")
}
