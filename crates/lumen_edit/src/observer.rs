//! Notification channel between an [`EditHistory`](crate::EditHistory) and
//! its single observer.

use std::sync::Arc;

use lumen_engine::{Operation, Result};
use parking_lot::Mutex;

/// Messages published by the edit history.
#[derive(Debug)]
pub enum HistoryEvent<'a> {
    /// `op` was appended to the log, which now holds `log_len` entries.
    /// Observer errors are logged, the operation stays applied.
    Extended { op: &'a Operation, log_len: usize },

    /// `op` is about to be undone. Returning an error aborts the undo.
    Undoing { op: &'a Operation },

    /// `op` is about to be redone. Returning an error aborts the redo.
    Redoing { op: &'a Operation },

    /// An image was opened or closed; the log starts over.
    Reset,
}

impl HistoryEvent<'_> {
    /// Whether an observer error cancels the request that published the event.
    pub fn is_vetoable(&self) -> bool {
        matches!(self, HistoryEvent::Undoing { .. } | HistoryEvent::Redoing { .. })
    }
}

pub trait HistoryObserver: Send {
    fn on_event(&mut self, event: &HistoryEvent<'_>) -> Result<()>;
}

/// Observer handle shared between the history and the code that attached it.
pub type SharedObserver = Arc<Mutex<dyn HistoryObserver>>;
