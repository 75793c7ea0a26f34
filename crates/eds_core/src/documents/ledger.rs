use crate::domain::{DocumentRecord, DocumentStatus};

use super::{IndexedCollection, PendingQueueStore};

/// What one successful batch-index response did to the local collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexCommit {
    /// Filenames now in the indexed collection, in server order.
    pub indexed: Vec<String>,
    /// Locally pending filenames the server did not report as indexed. They leave the
    /// pending queue; the next status refresh restores them if the server still holds them.
    pub unconfirmed: Vec<String>,
}

/// Owns both collections so a filename is never pending and indexed at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentLedger {
    pending: PendingQueueStore,
    indexed: IndexedCollection,
}

impl DocumentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &PendingQueueStore {
        &self.pending
    }

    pub fn indexed(&self) -> &IndexedCollection {
        &self.indexed
    }

    /// Queue a freshly acknowledged upload. Returns the pending entry it replaced.
    pub fn stage_pending(&mut self, mut record: DocumentRecord) -> Option<DocumentRecord> {
        record.status = DocumentStatus::Pending;
        record.chunks_created = None;
        record.indexed_at = None;
        self.indexed.remove(&record.filename);
        self.pending.add(record)
    }

    pub fn remove_pending(&mut self, filename: &str) -> Option<DocumentRecord> {
        self.pending.remove_by_filename(filename)
    }

    /// Apply a successful batch-index response. The pending queue is drained in one step
    /// and the server's file list decides what becomes indexed.
    pub fn commit_index(&mut self, server_files: Vec<DocumentRecord>) -> IndexCommit {
        let drained = self.pending.drain_all();
        let mut commit = IndexCommit::default();

        for server in server_files {
            let local = drained.iter().find(|d| d.filename == server.filename);
            let record = DocumentRecord::indexed_from_server(server, local);
            commit.indexed.push(record.filename.clone());
            self.indexed.upsert(record);
        }

        commit.unconfirmed = drained
            .into_iter()
            .filter(|d| !commit.indexed.contains(&d.filename))
            .map(|d| d.filename)
            .collect();
        commit
    }

    /// Forget every pending and indexed document.
    pub fn clear(&mut self) {
        self.pending.drain_all();
        self.indexed.replace_all(Vec::new());
    }

    /// Replace both collections with the server's view. A name the server lists in both
    /// is kept as indexed.
    pub fn replace_from_server(&mut self, pending: Vec<DocumentRecord>, indexed: Vec<DocumentRecord>) {
        let indexed = indexed
            .into_iter()
            .map(|r| DocumentRecord::indexed_from_server(r, None))
            .collect::<Vec<_>>();
        let pending = pending
            .into_iter()
            .filter(|p| !indexed.iter().any(|i| i.filename == p.filename))
            .map(|mut p| {
                p.status = DocumentStatus::Pending;
                p.chunks_created = None;
                p
            })
            .collect();
        self.indexed.replace_all(indexed);
        self.pending.replace_all(pending);
    }
}
