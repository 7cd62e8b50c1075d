//! Gradient orientation rendered as hue.
//!
//! The angle `theta = atan2(gy, gx) + π` is mapped onto a fixed colour wheel:
//!
//! | theta | gradient | colour |
//! |-------|----------|--------|
//! | 0     | -x       | green  |
//! | π/2   | -y       | blue   |
//! | π     | +x       | red    |
//! | 3π/2  | +y       | yellow |
//!
//! Colours between two anchors are interpolated linearly, the gradient
//! magnitude relative to the strongest gradient in the image scales the
//! brightness. Saved macros depend on this convention, it must not change.

use std::f32::consts::{FRAC_PI_2, TAU};

use rayon::prelude::*;

use crate::{luma, FloatBuffer, PixelBuffer};

use super::{convolve_float, prepare, Kernel};

const ANCHORS: [[f32; 3]; 5] = [
    [0.0, 255.0, 0.0],   // 0: green
    [0.0, 0.0, 255.0],   // π/2: blue
    [255.0, 0.0, 0.0],   // π: red
    [255.0, 255.0, 0.0], // 3π/2: yellow
    [0.0, 255.0, 0.0],   // 2π: green
];

/// Full brightness hue for an angle in radians, wrapped into `[0, 2π)`.
pub fn orientation_color(theta: f32) -> [f32; 3] {
    let theta = theta.rem_euclid(TAU);
    let pos = theta / FRAC_PI_2;
    let idx = (pos.floor() as usize).min(3);
    let t = pos - idx as f32;
    let (a, b) = (ANCHORS[idx], ANCHORS[idx + 1]);
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t, a[2] + (b[2] - a[2]) * t]
}

/// Sobel orientation filter.
pub fn orientation(src: &PixelBuffer, denoise: bool) -> PixelBuffer {
    if src.size().is_empty() {
        return src.clone();
    }
    let base = prepare(src, denoise);
    let gx = convolve_float(&base, &Kernel::sobel_horizontal());
    let gy = convolve_float(&base, &Kernel::sobel_vertical());

    // (gx, gy) of the luma channel per pixel
    let gradients: Vec<(f32, f32)> = gx
        .data()
        .par_iter()
        .zip(gy.data().par_iter())
        .map(|(x, y)| (luma(x[0], x[1], x[2]), luma(y[0], y[1], y[2])))
        .collect();

    let max_mag = gradients.iter().fold(0.0f32, |m, (x, y)| m.max(x.hypot(*y)));
    if max_mag <= f32::EPSILON {
        log::debug!("orientation filter found no gradient, keeping source pixels");
        return src.clone();
    }

    let mut out = FloatBuffer::new(src.size());
    out.data_mut()
        .par_iter_mut()
        .zip(gradients.par_iter())
        .zip(src.pixels().par_iter())
        .for_each(|((dst, (x, y)), px)| {
            let brightness = x.hypot(*y) / max_mag;
            let hue = orientation_color(y.atan2(*x) + std::f32::consts::PI);
            *dst = [hue[0] * brightness, hue[1] * brightness, hue[2] * brightness, px.a as f32];
        });
    out.to_pixels()
}
