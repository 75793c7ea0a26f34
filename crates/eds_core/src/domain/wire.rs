use serde::{Deserialize, Serialize};

use super::de::null_as_default;
use super::document::DocumentRecord;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UploadAckStatus {
    Uploaded,
    AlreadyPending,
    AlreadyIndexed,
    #[serde(other)]
    Other,
}

/// Response of `POST /api/upload`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadAck {
    pub status: UploadAckStatus,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_size: u64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `POST /api/index`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct IndexResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub indexed_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub indexed_files: Vec<DocumentRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_chunks: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// Response of `GET /api/documents/pending`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DocumentStatusResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pending: Vec<DocumentRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub indexed: Vec<DocumentRecord>,
}

/// Response of `GET /api/documents`; only the global count is consumed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentCountResponse {
    pub total_indexed: u64,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HealthResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub documents_indexed: Option<u64>,
}

/// One passage returned by `POST /api/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchHit {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Response of `POST /api/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub query: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<SearchHit>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u32,
}
