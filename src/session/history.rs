use super::record::AnalysisRecord;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Ordered collection of analysis records, newest first
///
/// New records are inserted at the head; storage order is display order.
/// The store never deduplicates by content and relies only on unique ids.
/// Growth is bounded by a retention cap; the oldest records are evicted
/// from the tail once the cap is exceeded.
#[derive(Clone)]
pub struct HistoryStore {
    records: Arc<RwLock<Vec<AnalysisRecord>>>,
    max_records: usize,
}

impl HistoryStore {
    pub fn new(max_records: usize) -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            max_records: max_records.max(1),
        }
    }

    /// Insert a record at the head, evicting past the retention cap
    ///
    /// Returns the ids of evicted records so callers can release any
    /// per-record state they hold.
    pub async fn append(&self, record: AnalysisRecord) -> Vec<String> {
        let mut records = self.records.write().await;
        records.insert(0, record);
        let keep = self.max_records.min(records.len());
        let evicted: Vec<String> = records
            .drain(keep..)
            .map(|r| r.id)
            .collect();
        debug!("History now holds {} record(s)", records.len());
        evicted
    }

    /// Delete the record with the matching id
    ///
    /// Returns whether a record was removed; a missing id is a no-op, not
    /// an error. Relative order of the remainder is unchanged.
    pub async fn remove(&self, id: &str) -> bool {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        records.len() != before
    }

    pub async fn get(&self, id: &str) -> Option<AnalysisRecord> {
        let records = self.records.read().await;
        records.iter().find(|r| r.id == id).cloned()
    }

    /// Consistent snapshot of the full log, newest first
    pub async fn snapshot(&self) -> Vec<AnalysisRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(100)
    }
}
