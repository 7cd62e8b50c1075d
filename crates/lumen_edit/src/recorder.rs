//! Builds macros from live edits.
//!
//! The recorder mirrors every operation appended to the history it observes.
//! Undo and redo would make the recording diverge from the log, so both are
//! refused while a recorder is attached.

use std::sync::Arc;

use lumen_engine::{EngineError, Macro, Operation, Result};
use parking_lot::Mutex;

use crate::observer::{HistoryEvent, HistoryObserver, SharedObserver};
use crate::EditHistory;

#[derive(Debug, Default)]
pub struct OperationRecorder {
    recorded: Vec<Operation>,
    /// Log length seen with the last `Extended` message.
    observed_len: usize,
}

impl OperationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder and attaches it to `history`.
    ///
    /// # Errors
    ///
    /// `RecordingInProgress` if the history already has an observer.
    pub fn attach(history: &mut EditHistory) -> Result<Arc<Mutex<OperationRecorder>>> {
        let recorder = Arc::new(Mutex::new(OperationRecorder::new()));
        let shared: SharedObserver = recorder.clone();
        history.attach_observer(shared)?;
        log::info!("recording started");
        Ok(recorder)
    }

    /// Detaches the observer of `history` and turns the recording into a macro.
    ///
    /// # Errors
    ///
    /// `RecordingInProgress` if the attached observer isn't a recorder
    /// started with [`OperationRecorder::attach`], the observer is left in
    /// place then.
    pub fn finish(history: &mut EditHistory, recorder: &Arc<Mutex<OperationRecorder>>, name: impl Into<String>) -> Result<Macro> {
        let Some(observer) = history.detach_observer() else {
            return Err(EngineError::RecordingInProgress);
        };
        let expected: SharedObserver = recorder.clone();
        if !Arc::ptr_eq(&observer, &expected) {
            history.attach_observer(observer)?;
            return Err(EngineError::RecordingInProgress);
        }
        let m = recorder.lock().to_macro(name);
        log::info!("recording finished: {m}");
        Ok(m)
    }

    pub fn recorded_ops(&self) -> &[Operation] {
        &self.recorded
    }

    pub fn to_macro(&self, name: impl Into<String>) -> Macro {
        Macro::from_operations(name, self.recorded.clone())
    }

    pub fn clear(&mut self) {
        self.recorded.clear();
    }
}

impl HistoryObserver for OperationRecorder {
    fn on_event(&mut self, event: &HistoryEvent<'_>) -> Result<()> {
        match event {
            HistoryEvent::Extended { op, log_len } => {
                if *log_len > self.observed_len {
                    self.recorded.push((*op).clone());
                }
                self.observed_len = *log_len;
                Ok(())
            }
            HistoryEvent::Undoing { .. } | HistoryEvent::Redoing { .. } => Err(EngineError::RecordingInProgress),
            HistoryEvent::Reset => {
                self.observed_len = 0;
                Ok(())
            }
        }
    }
}
