//! The backend contract consumed by the client. Every suspension point of the client
//! is one of these calls.

use async_trait::async_trait;
use eds_core::domain::{
    DocumentCountResponse, DocumentStatusResponse, HealthResponse, IndexResponse, QueryRequest,
    QueryResult, SearchResponse, UploadAck,
};
use eds_core::error::AppError;

pub mod http;

#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /api/query`
    async fn submit_query(&self, request: &QueryRequest) -> Result<QueryResult, AppError>;

    /// `POST /api/upload` with the file as the only multipart field.
    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<UploadAck, AppError>;

    /// `POST /api/index`; indexes everything pending server-side.
    async fn index_pending(&self) -> Result<IndexResponse, AppError>;

    /// `GET /api/documents/pending`
    async fn document_status(&self) -> Result<DocumentStatusResponse, AppError>;

    /// `GET /api/documents`
    async fn document_count(&self) -> Result<DocumentCountResponse, AppError>;

    /// `DELETE /api/documents/pending/{filename}`
    async fn remove_pending(&self, filename: &str) -> Result<(), AppError>;

    /// `DELETE /api/documents`; drops every pending and indexed document server-side.
    async fn clear_documents(&self) -> Result<(), AppError>;

    /// `POST /api/search`; raw passage search over the indexed corpus, no agents involved.
    async fn search(&self, request: &QueryRequest) -> Result<SearchResponse, AppError>;

    /// `GET /api/health`
    async fn health(&self) -> Result<HealthResponse, AppError>;
}
