use log::warn;
use std::{
    fs,
    path::PathBuf,
    sync::{Arc, RwLock},
};
use thiserror::Error;

use crate::models::WalkReport;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no walk report with id {id}")]
    NotFound { id: String },

    #[error("failed to access walk history file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode walk history: {0}")]
    Serialization(#[from] serde_json::Error),
}

struct HistoryInner {
    path: PathBuf,
    reports: RwLock<Vec<WalkReport>>,
}

/// Append-only store of completed walks, newest-first, backed by one JSON
/// file. The full list is rewritten on every mutation.
#[derive(Clone)]
pub struct HistoryStore {
    inner: Arc<HistoryInner>,
}

impl HistoryStore {
    pub fn new(path: PathBuf) -> Result<Self, HistoryError> {
        let reports = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            match serde_json::from_str(&contents) {
                Ok(reports) => reports,
                Err(err) => {
                    warn!(
                        "Corrupt walk history {}; starting with an empty list: {err}",
                        path.display()
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Ok(Self {
            inner: Arc::new(HistoryInner {
                path,
                reports: RwLock::new(reports),
            }),
        })
    }

    /// Prepends a completed walk and persists the whole list.
    pub fn append(&self, report: WalkReport) -> Result<(), HistoryError> {
        let mut guard = self.inner.reports.write().unwrap();
        guard.insert(0, report);
        self.persist(&guard)
    }

    /// Newest-first snapshot of all recorded walks.
    pub fn list(&self) -> Vec<WalkReport> {
        self.inner.reports.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.reports.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the memo of the report matching `id`. Every other field and
    /// every other report is left untouched.
    pub fn update_memo(&self, id: &str, memo: &str) -> Result<(), HistoryError> {
        let mut guard = self.inner.reports.write().unwrap();
        let report = guard
            .iter_mut()
            .find(|report| report.id == id)
            .ok_or_else(|| HistoryError::NotFound { id: id.to_string() })?;

        report.memo = memo.to_string();
        self.persist(&guard)
    }

    pub fn cursor(&self) -> HistoryCursor {
        HistoryCursor::new(self.list())
    }

    fn persist(&self, reports: &[WalkReport]) -> Result<(), HistoryError> {
        let serialized = serde_json::to_string_pretty(reports)?;
        fs::write(&self.inner.path, serialized)?;
        Ok(())
    }
}

/// Pure index cursor over a snapshot of the history list. Position 0 is the
/// newest walk; moving "older" walks toward the end of the list. Independent
/// of storage: mutations after the snapshot are not reflected.
pub struct HistoryCursor {
    reports: Vec<WalkReport>,
    index: usize,
}

impl HistoryCursor {
    pub fn new(reports: Vec<WalkReport>) -> Self {
        Self { reports, index: 0 }
    }

    pub fn current(&self) -> Option<&WalkReport> {
        self.reports.get(self.index)
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Moves toward older walks; clamps at the end. Returns whether the
    /// position changed.
    pub fn older(&mut self) -> bool {
        if self.index + 1 < self.reports.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Moves toward newer walks; clamps at the start. Returns whether the
    /// position changed.
    pub fn newer(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }
}
