#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::too_many_lines,
    clippy::cast_lossless,
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]
mod error;
pub use error::*;

mod position;
pub use position::*;

mod color;
pub use color::*;

mod pixel_buffer;
pub use pixel_buffer::*;

mod float_buffer;
pub use float_buffer::*;

pub mod convolution;
pub use convolution::EmbossDirection;

pub mod draw;
pub use draw::{Brush, MAX_COORDINATE, MAX_STROKE};

mod operations;
pub use operations::*;
