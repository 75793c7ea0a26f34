use std::path::{Path, PathBuf};

use eds_core::documents::DocumentLedger;
use eds_core::domain::{DocumentRecord, UploadAckStatus};
use eds_core::error::AppError;
use eds_core::validate::UploadPolicy;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::backend::Backend;

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadCandidate {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk. The policy is checked against the file's metadata first, so
    /// a disallowed or oversized file is never loaded.
    pub async fn from_path(path: &Path, policy: &UploadPolicy) -> Result<Self, AppError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AppError::new("UPLOAD_FILE_READ_FAILED", "Upload path has no usable file name")
                    .with_details(format!("path={}", path.display()))
            })?
            .to_string();
        let read_failed = |e: std::io::Error| {
            AppError::new("UPLOAD_FILE_READ_FAILED", "Failed to read file for upload")
                .with_details(format!("path={}; err={}", path.display(), e))
        };

        let meta = tokio::fs::metadata(path).await.map_err(read_failed)?;
        if !meta.is_file() {
            return Err(AppError::new("UPLOAD_FILE_READ_FAILED", "Upload path is not a regular file")
                .with_details(format!("path={}", path.display())));
        }
        policy.check(&filename, meta.len())?;

        let bytes = tokio::fs::read(path).await.map_err(read_failed)?;
        Ok(Self { filename, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadFailure {
    pub filename: String,
    pub error: AppError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadSkip {
    pub filename: String,
    pub status: UploadAckStatus,
    pub message: Option<String>,
}

/// Per-file results of one batch, in selection order within each list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UploadReport {
    pub uploaded: Vec<String>,
    pub skipped: Vec<UploadSkip>,
    pub failed: Vec<UploadFailure>,
    /// Refused by the upload policy; never sent.
    pub rejected: Vec<UploadFailure>,
}

impl UploadReport {
    pub fn attempted(&self) -> usize {
        self.uploaded.len() + self.skipped.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.rejected.is_empty()
    }
}

fn now_rfc3339_utc() -> Option<String> {
    OffsetDateTime::now_utc().format(&Rfc3339).ok()
}

/// Sends accepted files one at a time and queues every acknowledged upload.
#[derive(Debug, Clone)]
pub struct UploadCoordinator {
    policy: UploadPolicy,
}

impl UploadCoordinator {
    pub fn new(policy: UploadPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Split candidates into accepted ones (with their normalized file type) and rejections.
    pub fn screen(&self, candidates: Vec<UploadCandidate>) -> (Vec<(UploadCandidate, String)>, Vec<UploadFailure>) {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for c in candidates {
            match self.policy.check(&c.filename, c.size()) {
                Ok(file_type) => accepted.push((c, file_type)),
                Err(error) => {
                    debug!(filename = %c.filename, error = %error, "upload candidate rejected");
                    rejected.push(UploadFailure {
                        filename: c.filename,
                        error,
                    });
                }
            }
        }
        (accepted, rejected)
    }

    /// Load `paths` and upload the readable ones as one batch. Files refused by the policy
    /// land in `rejected`, unreadable ones in `failed`; neither is sent.
    pub async fn upload_paths(
        &self,
        backend: &dyn Backend,
        ledger: &mut DocumentLedger,
        paths: &[PathBuf],
    ) -> UploadReport {
        let mut candidates = Vec::with_capacity(paths.len());
        let mut rejected = Vec::new();
        let mut unreadable = Vec::new();
        for path in paths {
            match UploadCandidate::from_path(path, &self.policy).await {
                Ok(c) => candidates.push(c),
                Err(error) => {
                    let failure = UploadFailure {
                        filename: path.display().to_string(),
                        error,
                    };
                    if failure.error.code == "UPLOAD_FILE_REJECTED" {
                        debug!(path = %path.display(), "upload candidate rejected before reading");
                        rejected.push(failure);
                    } else {
                        warn!(path = %path.display(), error = %failure.error, "upload candidate unreadable");
                        unreadable.push(failure);
                    }
                }
            }
        }

        let mut report = self.upload_batch(backend, ledger, candidates).await;
        rejected.append(&mut report.rejected);
        report.rejected = rejected;
        report.failed.extend(unreadable);
        report
    }

    /// Each request, including its queue mutation, completes before the next starts, so
    /// queue order matches selection order. A failed file never stops the rest.
    pub async fn upload_batch(
        &self,
        backend: &dyn Backend,
        ledger: &mut DocumentLedger,
        candidates: Vec<UploadCandidate>,
    ) -> UploadReport {
        let (accepted, rejected) = self.screen(candidates);
        let mut report = UploadReport {
            rejected,
            ..UploadReport::default()
        };

        for (candidate, file_type) in accepted {
            match backend.upload(&candidate.filename, &candidate.bytes).await {
                Ok(ack) if ack.status == UploadAckStatus::Uploaded => {
                    let filename = ack
                        .filename
                        .filter(|f| !f.trim().is_empty())
                        .unwrap_or(candidate.filename);
                    let file_type = if ack.file_type.is_empty() {
                        file_type
                    } else {
                        ack.file_type
                    };
                    let file_size = if ack.file_size == 0 {
                        candidate.bytes.len() as u64
                    } else {
                        ack.file_size
                    };
                    let mut record = DocumentRecord::pending(filename.clone(), file_type, file_size);
                    if let Some(ts) = now_rfc3339_utc() {
                        record = record.with_uploaded_at(ts);
                    }
                    if ledger.stage_pending(record).is_some() {
                        debug!(filename = %filename, "replaced existing pending entry");
                    }
                    report.uploaded.push(filename);
                }
                Ok(ack) => {
                    info!(
                        filename = %candidate.filename,
                        status = ?ack.status,
                        message = ack.message.as_deref().unwrap_or(""),
                        "upload acknowledged without queuing"
                    );
                    report.skipped.push(UploadSkip {
                        filename: candidate.filename,
                        status: ack.status,
                        message: ack.message,
                    });
                }
                Err(error) => {
                    warn!(
                        filename = %candidate.filename,
                        error = %error,
                        details = ?error.details,
                        "upload failed; continuing with remaining files"
                    );
                    report.failed.push(UploadFailure {
                        filename: candidate.filename,
                        error,
                    });
                }
            }
        }

        info!(
            uploaded = report.uploaded.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            rejected = report.rejected.len(),
            "upload batch finished"
        );
        report
    }
}
