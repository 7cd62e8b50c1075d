//! Signed floating point working format used by the filters.
//!
//! Channel values live on the 0..=255 scale but are neither clamped nor
//! rounded until [`FloatBuffer::to_pixels`], so intermediate results may be
//! negative or exceed 255.

use crate::{Color, PixelBuffer, Size};

/// r, g, b, a
pub type Channels = [f32; 4];

#[derive(Clone, Debug, PartialEq)]
pub struct FloatBuffer {
    size: Size,
    data: Vec<Channels>,
}

impl FloatBuffer {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            data: vec![[0.0; 4]; size.area()],
        }
    }

    pub fn from_pixels(buffer: &PixelBuffer) -> Self {
        Self {
            size: buffer.size(),
            data: buffer.pixels().iter().map(|c| [c.r as f32, c.g as f32, c.b as f32, c.a as f32]).collect(),
        }
    }

    /// Rounds and clamps every channel back into 8 bit pixels.
    pub fn to_pixels(&self) -> PixelBuffer {
        let pixels = self
            .data
            .iter()
            .map(|[r, g, b, a]| Color::new(to_u8(*r), to_u8(*g), to_u8(*b), to_u8(*a)))
            .collect();
        // data always holds size.area() entries
        PixelBuffer::from_pixels(self.size, pixels).unwrap_or_else(|_| PixelBuffer::new(self.size))
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> i32 {
        self.size.width
    }

    pub fn height(&self) -> i32 {
        self.size.height
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Channels {
        self.data[y as usize * self.size.width as usize + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: Channels) {
        let idx = y as usize * self.size.width as usize + x as usize;
        self.data[idx] = value;
    }

    pub fn data(&self) -> &[Channels] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [Channels] {
        &mut self.data
    }

    /// Smallest and largest colour channel value (alpha excluded).
    pub fn color_range(&self) -> Option<(f32, f32)> {
        let mut iter = self.data.iter().flat_map(|px| px[..3].iter().copied());
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Min/max normalises all colour channels into 0..=255.
    ///
    /// Returns `false` and leaves the data untouched when the range is
    /// degenerate (every value equal).
    pub fn rescale(&mut self) -> bool {
        let Some((lo, hi)) = self.color_range() else {
            return false;
        };
        let span = hi - lo;
        if span <= f32::EPSILON {
            return false;
        }
        let scale = 255.0 / span;
        for px in &mut self.data {
            for c in &mut px[..3] {
                *c = (*c - lo) * scale;
            }
        }
        true
    }
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
