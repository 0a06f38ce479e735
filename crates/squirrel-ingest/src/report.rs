use std::fmt;

/// A row or feature that was dropped during loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Zero-based position in the source collection.
    pub index: usize,
    pub reason: String,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry {}: {}", self.index, self.reason)
    }
}

/// Outcome of loading one source.
#[derive(Debug, Clone)]
pub struct LoadReport<T> {
    pub items: Vec<T>,
    pub skipped: Vec<SkippedEntry>,
}

impl<T> Default for LoadReport<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> LoadReport<T> {
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn skip(&mut self, index: usize, reason: impl Into<String>) {
        let entry = SkippedEntry {
            index,
            reason: reason.into(),
        };
        tracing::warn!(index = entry.index, reason = %entry.reason, "skipping malformed entry");
        self.skipped.push(entry);
    }

    pub fn total(&self) -> usize {
        self.items.len() + self.skipped.len()
    }
}
