//! Per-pixel channel remaps. Alpha is never touched.

use crate::{Color, PixelBuffer};

fn clamp_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn map_rgb(src: &PixelBuffer, f: impl Fn(u8) -> u8) -> PixelBuffer {
    src.map_pixels(|c| Color::new(f(c.r), f(c.g), f(c.b), c.a))
}

pub fn brightness(src: &PixelBuffer, amount: i32) -> PixelBuffer {
    map_rgb(src, |v| (i32::from(v) + amount).clamp(0, 255) as u8)
}

/// Contrast correction factor for `amount` in -255..=255.
pub fn contrast_factor(amount: i32) -> f32 {
    let a = amount as f32;
    (259.0 * (a + 255.0)) / (255.0 * (259.0 - a))
}

pub fn contrast(src: &PixelBuffer, amount: i32) -> PixelBuffer {
    let factor = contrast_factor(amount);
    map_rgb(src, |v| clamp_channel(factor * (f32::from(v) - 128.0) + 128.0))
}

pub fn greyscale(src: &PixelBuffer) -> PixelBuffer {
    src.map_pixels(|c| {
        let y = c.luma();
        Color::new(y, y, y, c.a)
    })
}
