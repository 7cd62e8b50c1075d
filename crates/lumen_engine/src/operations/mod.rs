//! Replayable image operations.
//!
//! An [`Operation`] wraps an [`OperationKind`] with a process unique
//! [`OperationId`] and the cached canvas geometry flag. Operations are
//! immutable; `apply` borrows its input and always returns a new buffer, so
//! replaying a log over the same original always yields the same image.
//!
//! Two ids are only equal if one operation is a clone of the other. The edit
//! history tracks saved state by id; value comparison (`==`) compares the
//! kind and is what a round trip through an operation log preserves.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::convolution::EmbossDirection;
use crate::draw::{check_position, Brush};
use crate::{EngineError, PixelBuffer, Position, Rectangle, Result};

mod filters;
mod geometry;
mod macro_op;
mod point;
mod shapes;

pub use filters::MAX_FILTER_RADIUS;
pub use geometry::{scaled_size, Rotation};
pub use macro_op::Macro;
pub use point::contrast_factor;

/// Range accepted by brightness and contrast.
pub const MAX_ADJUSTMENT: i32 = 255;
pub const MAX_RESIZE_PERCENT: u32 = 1000;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(u64);

impl OperationId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OperationKind {
    Brightness { amount: i32 },
    Contrast { amount: i32 },
    Greyscale,

    FlipHorizontal,
    FlipVertical,
    Rotate { rotation: Rotation },
    Resize { percent: u32 },
    Crop { rect: Rectangle },

    MeanFilter { radius: u32 },
    GaussianFilter { radius: u32 },
    MedianFilter { radius: u32 },
    Sharpen,
    SobelHorizontal { denoise: bool },
    SobelVertical { denoise: bool },
    SobelOrientation { denoise: bool },
    Emboss { direction: EmbossDirection, denoise: bool },

    DrawLine { from: Position, to: Position, brush: Brush },
    DrawRectangle { p0: Position, p1: Position, brush: Brush, filled: bool },
    DrawEllipse { p0: Position, p1: Position, brush: Brush, filled: bool },

    Macro(Macro),
}

impl OperationKind {
    /// Checks the parameters.
    ///
    /// # Errors
    ///
    /// `Parameter` naming the first out of range value.
    pub fn validate(&self) -> Result<()> {
        match self {
            OperationKind::Brightness { amount } | OperationKind::Contrast { amount } => {
                if !(-MAX_ADJUSTMENT..=MAX_ADJUSTMENT).contains(amount) {
                    return Err(EngineError::parameter(
                        "amount",
                        format!("{amount} is outside -{MAX_ADJUSTMENT}..={MAX_ADJUSTMENT}"),
                    ));
                }
            }
            OperationKind::Resize { percent } => {
                if !(1..=MAX_RESIZE_PERCENT).contains(percent) {
                    return Err(EngineError::parameter(
                        "percent",
                        format!("{percent}% is outside 1..={MAX_RESIZE_PERCENT}"),
                    ));
                }
            }
            OperationKind::Crop { rect } => {
                if rect.is_empty() {
                    return Err(EngineError::parameter("rect", format!("{rect} is empty")));
                }
            }
            OperationKind::MeanFilter { radius } | OperationKind::GaussianFilter { radius } | OperationKind::MedianFilter { radius } => {
                filters::check_radius(*radius)?;
            }
            OperationKind::DrawLine { from, to, brush } => {
                check_position("from", *from)?;
                check_position("to", *to)?;
                brush.validate()?;
            }
            OperationKind::DrawRectangle { p0, p1, brush, .. } | OperationKind::DrawEllipse { p0, p1, brush, .. } => {
                check_position("p0", *p0)?;
                check_position("p1", *p1)?;
                brush.validate()?;
            }
            OperationKind::Macro(m) => {
                for op in m.operations() {
                    op.kind().validate()?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Whether applying this kind can change the canvas size.
    pub fn affects_geometry(&self) -> bool {
        match self {
            OperationKind::Rotate { .. } | OperationKind::Resize { .. } | OperationKind::Crop { .. } => true,
            OperationKind::Macro(m) => m.affects_geometry(),
            _ => false,
        }
    }

    pub fn description(&self) -> String {
        fn denoised(name: &str, denoise: bool) -> String {
            if denoise {
                format!("{name} (denoised)")
            } else {
                name.to_string()
            }
        }
        fn filled(name: &str, filled: bool) -> String {
            if filled {
                format!("{name} (filled)")
            } else {
                name.to_string()
            }
        }

        match self {
            OperationKind::Brightness { amount } => format!("Brightness {amount:+}"),
            OperationKind::Contrast { amount } => format!("Contrast {amount:+}"),
            OperationKind::Greyscale => "Greyscale".to_string(),
            OperationKind::FlipHorizontal => "Flip horizontal".to_string(),
            OperationKind::FlipVertical => "Flip vertical".to_string(),
            OperationKind::Rotate { rotation } => format!("Rotate {}", rotation.name()),
            OperationKind::Resize { percent } => format!("Resize {percent}%"),
            OperationKind::Crop { rect } => format!("Crop {rect}"),
            OperationKind::MeanFilter { radius } => format!("Mean filter (radius {radius})"),
            OperationKind::GaussianFilter { radius } => format!("Gaussian filter (radius {radius})"),
            OperationKind::MedianFilter { radius } => format!("Median filter (radius {radius})"),
            OperationKind::Sharpen => "Sharpen".to_string(),
            OperationKind::SobelHorizontal { denoise } => denoised("Sobel horizontal", *denoise),
            OperationKind::SobelVertical { denoise } => denoised("Sobel vertical", *denoise),
            OperationKind::SobelOrientation { denoise } => denoised("Sobel orientation", *denoise),
            OperationKind::Emboss { direction, denoise } => denoised(&format!("Emboss {}", direction.name()), *denoise),
            OperationKind::DrawLine { from, to, .. } => format!("Draw line {from} - {to}"),
            OperationKind::DrawRectangle { p0, p1, filled: f, .. } => filled(&format!("Draw rectangle {p0} - {p1}"), *f),
            OperationKind::DrawEllipse { p0, p1, filled: f, .. } => filled(&format!("Draw ellipse {p0} - {p1}"), *f),
            OperationKind::Macro(m) => m.description(),
        }
    }

    /// Computes the output for `input` without touching it.
    ///
    /// # Errors
    ///
    /// `Parameter` for out of range parameters (e.g. from a hand edited
    /// log), `Geometry` if the operation doesn't fit the input.
    pub fn apply(&self, input: &PixelBuffer) -> Result<PixelBuffer> {
        self.validate()?;
        let output = match self {
            OperationKind::Brightness { amount } => point::brightness(input, *amount),
            OperationKind::Contrast { amount } => point::contrast(input, *amount),
            OperationKind::Greyscale => point::greyscale(input),
            OperationKind::FlipHorizontal => geometry::flip_horizontal(input),
            OperationKind::FlipVertical => geometry::flip_vertical(input),
            OperationKind::Rotate { rotation } => geometry::rotate(input, *rotation),
            OperationKind::Resize { percent } => geometry::resize(input, *percent)?,
            OperationKind::Crop { rect } => geometry::crop(input, *rect)?,
            OperationKind::MeanFilter { radius } => filters::mean(input, *radius),
            OperationKind::GaussianFilter { radius } => filters::gaussian(input, *radius),
            OperationKind::MedianFilter { radius } => filters::median(input, *radius),
            OperationKind::Sharpen => filters::sharpen(input),
            OperationKind::SobelHorizontal { denoise } => filters::sobel_horizontal(input, *denoise),
            OperationKind::SobelVertical { denoise } => filters::sobel_vertical(input, *denoise),
            OperationKind::SobelOrientation { denoise } => filters::sobel_orientation(input, *denoise),
            OperationKind::Emboss { direction, denoise } => filters::emboss(input, *direction, *denoise),
            OperationKind::DrawLine { from, to, brush } => shapes::line(input, *from, *to, brush),
            OperationKind::DrawRectangle { p0, p1, brush, filled } => shapes::rectangle(input, *p0, *p1, brush, *filled),
            OperationKind::DrawEllipse { p0, p1, brush, filled } => shapes::ellipse(input, *p0, *p1, brush, *filled),
            OperationKind::Macro(m) => m.apply(input)?,
        };
        Ok(output)
    }
}

/// A single entry of an operation log.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "OperationKind", into = "OperationKind")]
pub struct Operation {
    id: OperationId,
    kind: OperationKind,
    affects_geometry: bool,
}

impl From<OperationKind> for Operation {
    /// Wraps a kind without validating it; invalid parameters surface when
    /// the operation is applied.
    fn from(kind: OperationKind) -> Self {
        Self {
            id: OperationId::next(),
            affects_geometry: kind.affects_geometry(),
            kind,
        }
    }
}

impl From<Operation> for OperationKind {
    fn from(op: Operation) -> Self {
        op.kind
    }
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Operation {
    /// # Errors
    ///
    /// `Parameter` if the kind carries an out of range parameter.
    pub fn new(kind: OperationKind) -> Result<Self> {
        kind.validate()?;
        Ok(Self::from(kind))
    }

    pub fn brightness(amount: i32) -> Result<Self> {
        Self::new(OperationKind::Brightness { amount })
    }

    pub fn contrast(amount: i32) -> Result<Self> {
        Self::new(OperationKind::Contrast { amount })
    }

    pub fn greyscale() -> Self {
        Self::from(OperationKind::Greyscale)
    }

    pub fn flip_horizontal() -> Self {
        Self::from(OperationKind::FlipHorizontal)
    }

    pub fn flip_vertical() -> Self {
        Self::from(OperationKind::FlipVertical)
    }

    pub fn rotate(rotation: Rotation) -> Self {
        Self::from(OperationKind::Rotate { rotation })
    }

    pub fn resize(percent: u32) -> Result<Self> {
        Self::new(OperationKind::Resize { percent })
    }

    pub fn resize_50() -> Self {
        Self::from(OperationKind::Resize { percent: 50 })
    }

    pub fn resize_150() -> Self {
        Self::from(OperationKind::Resize { percent: 150 })
    }

    /// Crops to `rect`, which has to lie inside the image when applied. Use
    /// [`Rectangle::clamped_to`] to fit a selection to the canvas first.
    pub fn crop(rect: Rectangle) -> Result<Self> {
        Self::new(OperationKind::Crop { rect })
    }

    pub fn mean_filter(radius: u32) -> Result<Self> {
        Self::new(OperationKind::MeanFilter { radius })
    }

    pub fn gaussian_filter(radius: u32) -> Result<Self> {
        Self::new(OperationKind::GaussianFilter { radius })
    }

    pub fn median_filter(radius: u32) -> Result<Self> {
        Self::new(OperationKind::MedianFilter { radius })
    }

    pub fn sharpen() -> Self {
        Self::from(OperationKind::Sharpen)
    }

    pub fn sobel_horizontal(denoise: bool) -> Self {
        Self::from(OperationKind::SobelHorizontal { denoise })
    }

    pub fn sobel_vertical(denoise: bool) -> Self {
        Self::from(OperationKind::SobelVertical { denoise })
    }

    pub fn sobel_orientation(denoise: bool) -> Self {
        Self::from(OperationKind::SobelOrientation { denoise })
    }

    pub fn emboss(direction: EmbossDirection, denoise: bool) -> Self {
        Self::from(OperationKind::Emboss { direction, denoise })
    }

    pub fn draw_line(from: Position, to: Position, brush: Brush) -> Result<Self> {
        Self::new(OperationKind::DrawLine { from, to, brush })
    }

    pub fn draw_rectangle(p0: Position, p1: Position, brush: Brush, filled: bool) -> Result<Self> {
        Self::new(OperationKind::DrawRectangle { p0, p1, brush, filled })
    }

    pub fn draw_ellipse(p0: Position, p1: Position, brush: Brush, filled: bool) -> Result<Self> {
        Self::new(OperationKind::DrawEllipse { p0, p1, brush, filled })
    }

    pub fn from_macro(m: Macro) -> Self {
        Self::from(OperationKind::Macro(m))
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    pub fn affects_geometry(&self) -> bool {
        self.affects_geometry
    }

    /// Identity comparison: true only for clones of the same operation.
    pub fn is_same(&self, other: &Operation) -> bool {
        self.id == other.id
    }

    pub fn description(&self) -> String {
        self.kind.description()
    }

    /// # Errors
    ///
    /// See [`OperationKind::apply`].
    pub fn apply(&self, input: &PixelBuffer) -> Result<PixelBuffer> {
        self.kind.apply(input)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}
