use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Indexed,
}

/// One uploaded reference document. `filename` is the key within a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRecord {
    pub filename: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub status: DocumentStatus,
    // Only present once indexed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks_created: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed_at: Option<String>,
}

impl DocumentRecord {
    pub fn pending(filename: impl Into<String>, file_type: impl Into<String>, file_size: u64) -> Self {
        Self {
            filename: filename.into(),
            file_type: file_type.into(),
            file_size,
            status: DocumentStatus::Pending,
            chunks_created: None,
            uploaded_at: None,
            indexed_at: None,
        }
    }

    pub fn with_uploaded_at(mut self, uploaded_at: impl Into<String>) -> Self {
        self.uploaded_at = Some(uploaded_at.into());
        self
    }

    pub fn is_indexed(&self) -> bool {
        self.status == DocumentStatus::Indexed
    }

    /// Flip to `indexed`, taking the server-reported record as authoritative and
    /// filling only the fields the server left blank from the local pending record.
    pub fn indexed_from_server(server: DocumentRecord, local: Option<&DocumentRecord>) -> Self {
        let mut rec = server;
        if let Some(local) = local {
            if rec.file_type.is_empty() {
                rec.file_type = local.file_type.clone();
            }
            if rec.file_size == 0 {
                rec.file_size = local.file_size;
            }
            if rec.uploaded_at.is_none() {
                rec.uploaded_at = local.uploaded_at.clone();
            }
        }
        rec.status = DocumentStatus::Indexed;
        rec.chunks_created = Some(rec.chunks_created.unwrap_or(0));
        rec
    }
}
