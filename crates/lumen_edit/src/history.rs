//! Non-destructive edit history.
//!
//! The history owns the original image and the ordered log of applied
//! operations. The current image is always the original with the log
//! replayed over it:
//!
//! - `apply` extends the log and clears the redo log,
//! - `undo` moves the last entry to the redo log and replays from the
//!   original (operations are never inverted),
//! - `redo` re-applies the most recent redo entry and keeps the rest,
//! - saved state is tracked by operation identity, so only an actual save
//!   makes the history clean again.

use std::fmt;

use lumen_engine::{EngineError, Operation, PixelBuffer, Result};

use crate::observer::{HistoryEvent, SharedObserver};

/// Replays `ops` over a copy of `original`.
///
/// # Errors
///
/// Returns the error of the first operation that fails.
pub fn replay(original: &PixelBuffer, ops: &[Operation]) -> Result<PixelBuffer> {
    let mut buffer = original.clone();
    for op in ops {
        buffer = op.apply(&buffer)?;
    }
    log::debug!("replayed {} operations", ops.len());
    Ok(buffer)
}

pub trait UndoState {
    fn undo_description(&self) -> Option<String>;
    fn can_undo(&self) -> bool;
    /// Returns whether the undone operation changed the canvas size.
    ///
    /// # Errors
    ///
    /// Fails if there is nothing to undo or an observer vetoes it.
    fn undo(&mut self) -> Result<bool>;

    fn redo_description(&self) -> Option<String>;
    fn can_redo(&self) -> bool;
    /// Returns whether the redone operation changed the canvas size.
    ///
    /// # Errors
    ///
    /// Fails if there is nothing to redo, an observer vetoes it or the
    /// operation no longer applies.
    fn redo(&mut self) -> Result<bool>;
}

#[derive(Default)]
pub struct EditHistory {
    original: Option<PixelBuffer>,
    current: Option<PixelBuffer>,
    ops: Vec<Operation>,
    redo_ops: Vec<Operation>,
    saved_ops: Vec<Operation>,
    observer: Option<SharedObserver>,
}

impl fmt::Debug for EditHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditHistory")
            .field("size", &self.original.as_ref().map(PixelBuffer::size))
            .field("ops", &self.ops.len())
            .field("redo_ops", &self.redo_ops.len())
            .field("saved_ops", &self.saved_ops.len())
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    // === Lifecycle ===

    /// Starts a new session on `buffer`. All logs are reset.
    pub fn open(&mut self, buffer: PixelBuffer) {
        log::info!("opening {} image", buffer.size());
        self.current = Some(buffer.clone());
        self.original = Some(buffer);
        self.ops.clear();
        self.redo_ops.clear();
        self.saved_ops.clear();
        self.publish(&HistoryEvent::Reset);
    }

    /// Opens `buffer` and replays a previously saved log over it. The loaded
    /// log counts as saved.
    ///
    /// # Errors
    ///
    /// Fails if an operation of the log doesn't apply; the history is closed
    /// in that case.
    pub fn open_with_log(&mut self, buffer: PixelBuffer, ops: Vec<Operation>) -> Result<()> {
        let current = match replay(&buffer, &ops) {
            Ok(current) => current,
            Err(err) => {
                log::warn!("operation log doesn't replay: {err}");
                self.close();
                return Err(err);
            }
        };
        log::info!("opening {} image with {} logged operations", buffer.size(), ops.len());
        self.original = Some(buffer);
        self.current = Some(current);
        self.saved_ops = ops.clone();
        self.ops = ops;
        self.redo_ops.clear();
        self.publish(&HistoryEvent::Reset);
        Ok(())
    }

    pub fn close(&mut self) {
        self.original = None;
        self.current = None;
        self.ops.clear();
        self.redo_ops.clear();
        self.saved_ops.clear();
        self.publish(&HistoryEvent::Reset);
    }

    // === Editing ===

    /// Applies `op` to the current image and appends it to the log.
    ///
    /// # Errors
    ///
    /// `NoImage` without an open image, otherwise the operation's own error.
    /// The history is unchanged on error.
    pub fn apply(&mut self, op: Operation) -> Result<()> {
        let current = self.current.as_ref().ok_or(EngineError::NoImage)?;
        let output = op.apply(current)?;
        self.redo_ops.clear();
        self.push_applied(op, output);
        Ok(())
    }

    fn push_applied(&mut self, op: Operation, output: PixelBuffer) {
        log::debug!("applied {op} ({})", op.id());
        self.current = Some(output);
        self.ops.push(op);
        if let Some(op) = self.ops.last() {
            self.publish(&HistoryEvent::Extended { op, log_len: self.ops.len() });
        }
    }

    /// Undoes the last operation by replaying the remaining log.
    ///
    /// # Errors
    ///
    /// `EmptyHistory` if the log is empty; an observer error if it vetoes.
    pub fn undo(&mut self) -> Result<bool> {
        let op = self.ops.last().ok_or(EngineError::EmptyHistory)?;
        self.veto(&HistoryEvent::Undoing { op })?;

        let Some(op) = self.ops.pop() else {
            return Err(EngineError::EmptyHistory);
        };
        if let Err(err) = self.refresh() {
            self.ops.push(op);
            return Err(err);
        }
        log::debug!("undid {op}");
        let affects_geometry = op.affects_geometry();
        self.redo_ops.push(op);
        Ok(affects_geometry)
    }

    /// Undoes the whole log with a single replay. Returns whether any undone
    /// operation changed the canvas size.
    ///
    /// # Errors
    ///
    /// `EmptyHistory` if the log is empty; an observer veto stops at that
    /// operation, the ones undone before it stay undone.
    pub fn undo_all(&mut self) -> Result<bool> {
        if self.ops.is_empty() {
            return Err(EngineError::EmptyHistory);
        }
        let mut affects_geometry = false;
        let mut result = Ok(());
        while let Some(op) = self.ops.last() {
            if let Err(err) = self.veto(&HistoryEvent::Undoing { op }) {
                result = Err(err);
                break;
            }
            if let Some(op) = self.ops.pop() {
                affects_geometry |= op.affects_geometry();
                self.redo_ops.push(op);
            }
        }
        self.refresh()?;
        result.map(|()| affects_geometry)
    }

    /// Re-applies the most recently undone operation. Remaining redo entries
    /// are kept.
    ///
    /// # Errors
    ///
    /// `EmptyRedo` if there is nothing to redo, an observer veto or the
    /// operation's own error (the entry stays redoable then).
    pub fn redo(&mut self) -> Result<bool> {
        let op = self.redo_ops.last().ok_or(EngineError::EmptyRedo)?;
        self.veto(&HistoryEvent::Redoing { op })?;

        let Some(op) = self.redo_ops.pop() else {
            return Err(EngineError::EmptyRedo);
        };
        let output = match self.current.as_ref().ok_or(EngineError::NoImage).and_then(|cur| op.apply(cur)) {
            Ok(output) => output,
            Err(err) => {
                self.redo_ops.push(op);
                return Err(err);
            }
        };
        let affects_geometry = op.affects_geometry();
        self.push_applied(op, output);
        Ok(affects_geometry)
    }

    /// Recomputes the current image from the original and the log.
    ///
    /// # Errors
    ///
    /// Fails if an operation of the log fails; the current image is kept.
    pub fn refresh(&mut self) -> Result<()> {
        if let Some(original) = &self.original {
            self.current = Some(replay(original, &self.ops)?);
        }
        Ok(())
    }

    // === Saved state ===

    /// `false` only if the log consists of exactly the operations that were
    /// saved last, compared by identity.
    pub fn is_dirty(&self) -> bool {
        self.ops.len() != self.saved_ops.len() || self.ops.iter().zip(&self.saved_ops).any(|(a, b)| !a.is_same(b))
    }

    pub fn mark_saved(&mut self) {
        self.saved_ops = self.ops.clone();
    }

    /// Independent copy for previews. Buffers are copied, operation ids are
    /// kept and the observer isn't carried over.
    pub fn deep_copy(&self) -> EditHistory {
        EditHistory {
            original: self.original.clone(),
            current: self.current.clone(),
            ops: self.ops.clone(),
            redo_ops: self.redo_ops.clone(),
            saved_ops: self.saved_ops.clone(),
            observer: None,
        }
    }

    // === Queries ===

    pub fn has_image(&self) -> bool {
        self.original.is_some()
    }

    pub fn has_ops(&self) -> bool {
        !self.ops.is_empty()
    }

    pub fn has_redo_ops(&self) -> bool {
        !self.redo_ops.is_empty()
    }

    pub fn original(&self) -> Option<&PixelBuffer> {
        self.original.as_ref()
    }

    pub fn current(&self) -> Option<&PixelBuffer> {
        self.current.as_ref()
    }

    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    pub fn redo_ops(&self) -> &[Operation] {
        &self.redo_ops
    }

    pub fn saved_ops(&self) -> &[Operation] {
        &self.saved_ops
    }

    // === Observer ===

    /// Attaches the single observer.
    ///
    /// # Errors
    ///
    /// `RecordingInProgress` if an observer is already attached.
    pub fn attach_observer(&mut self, observer: SharedObserver) -> Result<()> {
        if self.observer.is_some() {
            return Err(EngineError::RecordingInProgress);
        }
        self.observer = Some(observer);
        Ok(())
    }

    pub fn detach_observer(&mut self) -> Option<SharedObserver> {
        self.observer.take()
    }

    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    fn publish(&self, event: &HistoryEvent<'_>) {
        if let Some(observer) = &self.observer {
            if let Err(err) = observer.lock().on_event(event) {
                log::warn!("history observer failed on {event:?}: {err}");
            }
        }
    }

    fn veto(&self, event: &HistoryEvent<'_>) -> Result<()> {
        match &self.observer {
            Some(observer) => observer.lock().on_event(event),
            None => Ok(()),
        }
    }
}

impl UndoState for EditHistory {
    fn undo_description(&self) -> Option<String> {
        self.ops.last().map(Operation::description)
    }

    fn can_undo(&self) -> bool {
        self.has_ops()
    }

    fn undo(&mut self) -> Result<bool> {
        EditHistory::undo(self)
    }

    fn redo_description(&self) -> Option<String> {
        self.redo_ops.last().map(Operation::description)
    }

    fn can_redo(&self) -> bool {
        self.has_redo_ops()
    }

    fn redo(&mut self) -> Result<bool> {
        EditHistory::redo(self)
    }
}
