use crate::domain::DocumentRecord;

/// Documents the server reports as chunked into the corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexedCollection {
    records: Vec<DocumentRecord>,
}

impl IndexedCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace in place by filename.
    pub fn upsert(&mut self, record: DocumentRecord) {
        match self.records.iter_mut().find(|r| r.filename == record.filename) {
            Some(slot) => *slot = record,
            None => self.records.push(record),
        }
    }

    pub fn remove(&mut self, filename: &str) -> Option<DocumentRecord> {
        let pos = self.records.iter().position(|r| r.filename == filename)?;
        Some(self.records.remove(pos))
    }

    pub(crate) fn replace_all(&mut self, records: Vec<DocumentRecord>) {
        self.records.clear();
        for r in records {
            self.upsert(r);
        }
    }

    pub fn get(&self, filename: &str) -> Option<&DocumentRecord> {
        self.records.iter().find(|r| r.filename == filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.get(filename).is_some()
    }

    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }

    pub fn total_chunks(&self) -> u64 {
        self.records
            .iter()
            .map(|r| u64::from(r.chunks_created.unwrap_or(0)))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
