//! Shape rasterisation for the draw operations.
//!
//! Shapes are first turned into a list of points; [`Brush::paint`] then stamps
//! a square of side `stroke` on every point and composites the brush colour
//! once per covered pixel, so overlapping stamps never darken translucent
//! strokes.
//!
//! The point generators take a clip rectangle (see [`Brush::reach`]) and only
//! enumerate the part of a shape that can touch the canvas, so a shape far
//! larger than the image costs no more than one covering the image.

use serde::{Deserialize, Serialize};

use crate::{Color, EngineError, PixelBuffer, Position, Rectangle, Result, Size};

mod ellipse;
mod line;
mod rectangle;

pub use ellipse::{get_ellipse_points, get_ellipse_points_from_rect, get_filled_ellipse_points, get_filled_ellipse_points_from_rect};
pub use line::get_line_points;
pub use rectangle::get_rectangle_points;

/// Widest stroke a brush accepts.
pub const MAX_STROKE: u32 = 64;

/// Shape coordinates must lie within `-MAX_COORDINATE..=MAX_COORDINATE`.
pub const MAX_COORDINATE: i32 = 1 << 20;

/// # Errors
///
/// `Parameter` named `name` if `pos` is outside the drawable coordinate range.
pub fn check_position(name: &'static str, pos: Position) -> Result<()> {
    let range = -MAX_COORDINATE..=MAX_COORDINATE;
    if !range.contains(&pos.x) || !range.contains(&pos.y) {
        return Err(EngineError::parameter(
            name,
            format!("{pos} is outside -{MAX_COORDINATE}..={MAX_COORDINATE}"),
        ));
    }
    Ok(())
}

/// Anything the brush can paint on.
pub trait DrawTarget {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    fn color_at(&self, pos: Position) -> Option<Color>;

    fn put_color(&mut self, pos: Position, color: Color);

    fn is_valid(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width() && pos.y < self.height()
    }
}

impl DrawTarget for PixelBuffer {
    fn width(&self) -> i32 {
        PixelBuffer::width(self)
    }

    fn height(&self) -> i32 {
        PixelBuffer::height(self)
    }

    fn color_at(&self, pos: Position) -> Option<Color> {
        self.get_pixel(pos)
    }

    fn put_color(&mut self, pos: Position, color: Color) {
        self.set_pixel(pos, color);
    }
}

/// Colour and stroke width of a draw operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Brush {
    pub color: Color,
    pub stroke: u32,
}

impl Brush {
    /// # Errors
    ///
    /// Fails if `stroke` is outside `1..=MAX_STROKE`.
    pub fn new(color: Color, stroke: u32) -> Result<Self> {
        let brush = Self { color, stroke };
        brush.validate()?;
        Ok(brush)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_STROKE).contains(&self.stroke) {
            return Err(EngineError::parameter(
                "stroke",
                format!("stroke {} is outside 1..={MAX_STROKE}", self.stroke),
            ));
        }
        Ok(())
    }

    /// Offsets of the square stamp around a point. Even strokes extend one
    /// pixel further to the top left.
    fn stamp_range(&self) -> std::ops::RangeInclusive<i32> {
        let stroke = self.stroke.clamp(1, MAX_STROKE) as i32;
        let before = stroke / 2;
        -before..=(stroke - 1 - before)
    }

    /// Points whose stamp can cover a pixel of a `canvas` sized image.
    pub fn reach(&self, canvas: Size) -> Rectangle {
        let range = self.stamp_range();
        let (before, after) = (-*range.start(), *range.end());
        Rectangle::new(
            Position::new(-after, -after),
            Size::new(
                canvas.width.saturating_add(before + after),
                canvas.height.saturating_add(before + after),
            ),
        )
    }

    /// Stamps the brush on every point and composites the covered pixels.
    pub fn paint<T: DrawTarget>(&self, target: &mut T, points: &[Position]) {
        let (width, height) = (target.width(), target.height());
        if width <= 0 || height <= 0 {
            return;
        }
        let mut mask = vec![false; width as usize * height as usize];
        let range = self.stamp_range();
        for pt in points {
            for dy in range.clone() {
                for dx in range.clone() {
                    let pos = Position::new(pt.x.saturating_add(dx), pt.y.saturating_add(dy));
                    if target.is_valid(pos) {
                        mask[pos.y as usize * width as usize + pos.x as usize] = true;
                    }
                }
            }
        }

        for (idx, _) in mask.iter().enumerate().filter(|(_, covered)| **covered) {
            let pos = Position::new(idx as i32 % width, idx as i32 / width);
            if let Some(dst) = target.color_at(pos) {
                target.put_color(pos, self.color.over(dst));
            }
        }
    }
}
