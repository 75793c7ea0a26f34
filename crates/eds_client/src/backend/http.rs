use std::time::Duration;

use async_trait::async_trait;
use eds_core::domain::{
    DocumentCountResponse, DocumentStatusResponse, HealthResponse, IndexResponse, QueryRequest,
    QueryResult, SearchResponse, UploadAck,
};
use eds_core::error::AppError;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

use super::Backend;

const DETAIL_MAX_CHARS: usize = 300;

/// Error code and wording for one backend call.
#[derive(Debug, Clone, Copy)]
struct Call {
    code: &'static str,
    what: &'static str,
}

const QUERY: Call = Call {
    code: "QUERY_FAILED",
    what: "Query",
};
const UPLOAD: Call = Call {
    code: "UPLOAD_FAILED",
    what: "Upload",
};
const INDEX: Call = Call {
    code: "INDEX_FAILED",
    what: "Indexing",
};
const STATUS: Call = Call {
    code: "DOCUMENTS_STATUS_FAILED",
    what: "Document status",
};
const COUNT: Call = Call {
    code: "DOCUMENTS_COUNT_FAILED",
    what: "Document count",
};
const REMOVE: Call = Call {
    code: "DOCUMENTS_REMOVE_FAILED",
    what: "Pending document removal",
};
const CLEAR: Call = Call {
    code: "DOCUMENTS_CLEAR_FAILED",
    what: "Document clear",
};
const SEARCH: Call = Call {
    code: "SEARCH_FAILED",
    what: "Search",
};
const HEALTH: Call = Call {
    code: "BACKEND_UNREACHABLE",
    what: "Health check",
};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Client without a request timeout: a hung call stays in flight until it settles.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, AppError> {
        let base_url = parse_base_url(base_url)?;
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder.build().map_err(|e| {
            AppError::new("BACKEND_CLIENT_FAILED", "Failed to build HTTP client")
                .with_details(e.to_string())
        })?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Base URL joined with percent-encoded path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, call: Call, req: RequestBuilder) -> Result<reqwest::Response, AppError> {
        let resp = req.send().await.map_err(|e| {
            AppError::new(call.code, format!("Failed to reach backend for {}", call.what.to_lowercase()))
                .with_details(e.to_string())
                .with_retryable(true)
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let mut err = AppError::new(
            call.code,
            format!("{} failed with HTTP status {}", call.what, status.as_u16()),
        )
        .with_http_status(status.as_u16())
        .with_retryable(status.is_server_error());
        if let Some(detail) = error_detail(&body) {
            err = err.with_details(detail);
        }
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(&self, call: Call, req: RequestBuilder) -> Result<T, AppError> {
        let resp = self.send(call, req).await?;
        let bytes = resp.bytes().await.map_err(|e| {
            AppError::new(call.code, format!("Failed to read {} response", call.what.to_lowercase()))
                .with_details(e.to_string())
                .with_retryable(true)
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::new(call.code, format!("Failed to decode {} response", call.what.to_lowercase()))
                .with_details(e.to_string())
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |why: &str| {
        AppError::new("BACKEND_URL_INVALID", format!("Backend base URL {why}"))
            .with_details(format!("base_url={trimmed}"))
    };

    let url = Url::parse(trimmed).map_err(|_| invalid("is not a valid URL"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid("must use http or https"));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("must include a host"));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid("must not carry credentials"));
    }
    if url.port() == Some(0) {
        return Err(invalid("has an invalid port"));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not include a path, query or fragment"));
    }
    Ok(url)
}

/// FastAPI-style `{"detail": ...}` when present, otherwise a bounded slice of the body.
fn error_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        match v.get("detail") {
            Some(serde_json::Value::String(s)) => return Some(s.clone()),
            Some(other) => return Some(other.to_string()),
            None => {}
        }
    }
    Some(body.chars().take(DETAIL_MAX_CHARS).collect())
}

#[async_trait]
impl Backend for HttpBackend {
    async fn submit_query(&self, request: &QueryRequest) -> Result<QueryResult, AppError> {
        let url = self.endpoint(&["api", "query"]);
        self.send_json(QUERY, self.http.post(url).json(request)).await
    }

    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<UploadAck, AppError> {
        let url = self.endpoint(&["api", "upload"]);
        let part = Part::bytes(bytes.to_vec()).file_name(filename.to_string());
        let form = Form::new().part("file", part);
        self.send_json(UPLOAD, self.http.post(url).multipart(form)).await
    }

    async fn index_pending(&self) -> Result<IndexResponse, AppError> {
        let url = self.endpoint(&["api", "index"]);
        self.send_json(INDEX, self.http.post(url).json(&serde_json::json!({})))
            .await
    }

    async fn document_status(&self) -> Result<DocumentStatusResponse, AppError> {
        let url = self.endpoint(&["api", "documents", "pending"]);
        self.send_json(STATUS, self.http.get(url)).await
    }

    async fn document_count(&self) -> Result<DocumentCountResponse, AppError> {
        let url = self.endpoint(&["api", "documents"]);
        self.send_json(COUNT, self.http.get(url)).await
    }

    async fn remove_pending(&self, filename: &str) -> Result<(), AppError> {
        let url = self.endpoint(&["api", "documents", "pending", filename]);
        self.send(REMOVE, self.http.delete(url)).await.map(|_| ())
    }

    async fn clear_documents(&self) -> Result<(), AppError> {
        let url = self.endpoint(&["api", "documents"]);
        self.send(CLEAR, self.http.delete(url)).await.map(|_| ())
    }

    async fn search(&self, request: &QueryRequest) -> Result<SearchResponse, AppError> {
        let url = self.endpoint(&["api", "search"]);
        self.send_json(SEARCH, self.http.post(url).json(request)).await
    }

    async fn health(&self) -> Result<HealthResponse, AppError> {
        let url = self.endpoint(&["api", "health"]);
        self.send_json(HEALTH, self.http.get(url)).await
    }
}
