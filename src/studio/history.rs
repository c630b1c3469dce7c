use crate::{
    config::DEFAULT_HISTORY_CAPACITY,
    models::{GeneratedImage, GenerationRequest},
};

/// Newest-first record of generated images. Appending past capacity evicts
/// the oldest entries; nothing survives the process.
#[derive(Debug, Clone)]
pub struct HistoryCache {
    entries: Vec<GeneratedImage>,
    capacity: usize,
}

impl Default for HistoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Prepends `items` in their given order. Returns the number evicted.
    pub fn append(&mut self, items: Vec<GeneratedImage>) -> usize {
        let mut next = items;
        next.append(&mut self.entries);

        let evicted = next.len().saturating_sub(self.capacity);
        next.truncate(self.capacity);
        self.entries = next;

        if evicted > 0 {
            log::debug!("History full; evicted {} oldest entries", evicted);
        }
        evicted
    }

    pub fn wipe(&mut self) {
        self.entries.clear();
    }

    /// The stored request behind an entry, for a quick retry.
    pub fn replay_prerequisites(&self, id: &str) -> Option<&GenerationRequest> {
        self.get(id).map(|entry| &entry.originating_request)
    }

    pub fn get(&self, id: &str) -> Option<&GeneratedImage> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entries(&self) -> &[GeneratedImage] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&GeneratedImage> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
