use chrono::Local;

use crate::types::{HistoryCategory, HistoryStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub category: HistoryCategory,
    pub timestamp: String,
    pub status: HistoryStatus,
}

/// Append-only record of submitted requests. Survives home-reset.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    items: Vec<HistoryItem>,
}

impl HistoryLog {
    pub fn record(&mut self, category: HistoryCategory) -> &HistoryItem {
        let timestamp = Local::now().format("%b %-d, %H:%M").to_string();
        self.items.push(HistoryItem {
            category,
            timestamp,
            status: HistoryStatus::Sent,
        });
        &self.items[self.items.len() - 1]
    }

    /// Oldest first.
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
