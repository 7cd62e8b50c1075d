//! Coordinate remaps that may change the canvas size.

use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

use crate::{EngineError, PixelBuffer, Rectangle, Result, Size};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    /// 90° clockwise
    Right90,
    /// 90° counter clockwise
    Left90,
    Half,
}

impl Rotation {
    pub fn name(&self) -> &'static str {
        match self {
            Rotation::Right90 => "90° right",
            Rotation::Left90 => "90° left",
            Rotation::Half => "180°",
        }
    }
}

pub fn flip_horizontal(src: &PixelBuffer) -> PixelBuffer {
    let w = src.width();
    src.remap(src.size(), |x, y| (w - 1 - x, y))
}

pub fn flip_vertical(src: &PixelBuffer) -> PixelBuffer {
    let h = src.height();
    src.remap(src.size(), |x, y| (x, h - 1 - y))
}

pub fn rotate(src: &PixelBuffer, rotation: Rotation) -> PixelBuffer {
    let (w, h) = (src.width(), src.height());
    match rotation {
        Rotation::Right90 => src.remap(src.size().transposed(), |x, y| (y, h - 1 - x)),
        Rotation::Left90 => src.remap(src.size().transposed(), |x, y| (w - 1 - y, x)),
        Rotation::Half => src.remap(src.size(), |x, y| (w - 1 - x, h - 1 - y)),
    }
}

/// Size of `size` scaled by `percent`, rounded to the nearest pixel.
pub fn scaled_size(size: Size, percent: u32) -> Size {
    let scale = |v: i32| (f64::from(v) * f64::from(percent) / 100.0).round() as i32;
    Size::new(scale(size.width), scale(size.height))
}

pub fn resize(src: &PixelBuffer, percent: u32) -> Result<PixelBuffer> {
    let target = scaled_size(src.size(), percent);
    if target.is_empty() {
        return Err(EngineError::geometry(
            "percent",
            format!("scaling {} by {percent}% leaves no pixels", src.size()),
        ));
    }
    if target == src.size() {
        return Ok(src.clone());
    }
    let scaled = imageops::resize(&src.to_rgba_image(), target.width as u32, target.height as u32, FilterType::Triangle);
    Ok(PixelBuffer::from_rgba_image(&scaled))
}

pub fn crop(src: &PixelBuffer, rect: Rectangle) -> Result<PixelBuffer> {
    if !rect.is_inside(src.size()) {
        return Err(EngineError::geometry(
            "rect",
            format!("{rect} is not inside the {} image", src.size()),
        ));
    }
    Ok(src.remap(rect.size, |x, y| (x + rect.left(), y + rect.top())))
}
