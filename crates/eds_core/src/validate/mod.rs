use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 4] = [".pdf", ".txt", ".doc", ".docx"];

/// Allow-list applied to every candidate before it reaches the upload coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UploadPolicy {
    pub allowed_extensions: Vec<String>,
    pub max_file_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            max_file_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

/// Lowercased extension with its leading dot (`"Paper.PDF"` -> `".pdf"`).
pub fn normalize_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
}

impl UploadPolicy {
    fn allows(&self, ext: &str) -> bool {
        self.allowed_extensions.iter().any(|a| {
            let a = a.trim().to_ascii_lowercase();
            a == ext || a.trim_start_matches('.') == ext.trim_start_matches('.')
        })
    }

    /// Returns the normalized file type when the candidate is acceptable.
    pub fn check(&self, filename: &str, size: u64) -> Result<String, AppError> {
        if filename.trim().is_empty() {
            return Err(AppError::new("UPLOAD_FILE_REJECTED", "File name is empty"));
        }
        let Some(ext) = normalize_extension(filename) else {
            return Err(AppError::new(
                "UPLOAD_FILE_REJECTED",
                "File has no extension; allowed types are listed in the upload policy",
            )
            .with_details(format!("filename={filename}")));
        };
        if !self.allows(&ext) {
            return Err(AppError::new("UPLOAD_FILE_REJECTED", "File type not supported")
                .with_details(format!(
                    "filename={filename}; type={ext}; allowed={}",
                    self.allowed_extensions.join(",")
                )));
        }
        if size > self.max_file_bytes {
            return Err(AppError::new("UPLOAD_FILE_REJECTED", "File exceeds the size limit")
                .with_details(format!(
                    "filename={filename}; size={size}; max={}",
                    self.max_file_bytes
                )));
        }
        Ok(ext)
    }
}

/// Trimmed query text, or `None` when nothing would be worth sending.
pub fn normalize_query(text: &str) -> Option<&str> {
    let t = text.trim();
    (!t.is_empty()).then_some(t)
}
