//! Named operation sequences usable as a single operation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Operation, PixelBuffer, Result};

/// An ordered list of operations applied left to right. An empty macro is
/// the identity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Macro {
    name: String,
    operations: Vec<Operation>,
}

impl Macro {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
        }
    }

    pub fn from_operations(name: impl Into<String>, operations: Vec<Operation>) -> Self {
        Self {
            name: name.into(),
            operations,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn add_op(&mut self, op: Operation) {
        self.operations.push(op);
    }

    /// Removes the operation with the identity of `op`. Value-equal
    /// operations created elsewhere are left alone.
    pub fn remove_op(&mut self, op: &Operation) -> bool {
        match self.operations.iter().position(|o| o.is_same(op)) {
            Some(idx) => {
                self.operations.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn affects_geometry(&self) -> bool {
        self.operations.iter().any(Operation::affects_geometry)
    }

    /// Folds the operations over `input`.
    ///
    /// # Errors
    ///
    /// Returns the first failing operation's error; `input` is never modified.
    pub fn apply(&self, input: &PixelBuffer) -> Result<PixelBuffer> {
        let mut buffer = input.clone();
        for op in &self.operations {
            buffer = op.apply(&buffer)?;
        }
        Ok(buffer)
    }

    /// `"<name>: op1, op2"`, `"<name>: (empty)"` without operations.
    pub fn description(&self) -> String {
        if self.operations.is_empty() {
            return format!("{}: (empty)", self.name);
        }
        let ops: Vec<String> = self.operations.iter().map(Operation::description).collect();
        format!("{}: {}", self.name, ops.join(", "))
    }
}

impl fmt::Display for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}
