use crate::domain::DocumentRecord;

/// Documents uploaded but not yet indexed, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingQueueStore {
    records: Vec<DocumentRecord>,
}

impl PendingQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record`. An existing entry with the same filename is dropped first
    /// (last write wins) and returned.
    pub fn add(&mut self, record: DocumentRecord) -> Option<DocumentRecord> {
        let replaced = self.remove_by_filename(&record.filename);
        self.records.push(record);
        replaced
    }

    /// `None` means the filename was not queued.
    pub fn remove_by_filename(&mut self, filename: &str) -> Option<DocumentRecord> {
        let pos = self.records.iter().position(|r| r.filename == filename)?;
        Some(self.records.remove(pos))
    }

    /// Empty the queue, returning its prior contents in insertion order.
    pub(crate) fn drain_all(&mut self) -> Vec<DocumentRecord> {
        std::mem::take(&mut self.records)
    }

    pub(crate) fn replace_all(&mut self, records: Vec<DocumentRecord>) {
        self.records.clear();
        for r in records {
            self.add(r);
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

    pub fn filenames(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.filename.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
