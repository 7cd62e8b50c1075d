#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::must_use_candidate, clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub use lumen_engine::{EngineError, Result};

mod history;
pub use history::*;

mod observer;
pub use observer::*;

mod recorder;
pub use recorder::*;

mod persistence;
pub use persistence::{ImageStore, LOG_VERSION};

mod settings;
pub use settings::*;
