//! Convolution engine shared by every pixel level filter.
//!
//! All filters run the same pipeline:
//!
//! 1. the source is converted to a [`FloatBuffer`] and padded by the kernel
//!    radius with [`extend_edges`] (nearest pixel replication),
//! 2. the kernel is accumulated in `f32`, so negative intermediate values
//!    survive until the final write,
//! 3. gradient filters min/max rescale the whole result into 0..=255 instead
//!    of clamping it,
//! 4. the orientation filter maps the gradient angle to a hue,
//! 5. only the region under the unpadded source is produced, so every filter
//!    preserves the image dimensions.
//!
//! Rows are computed in parallel; each row only writes its own output slice.
//!
//! When a rescaling filter finds no response at all (every output value
//! equal) the source is returned unchanged, which keeps flat regions flat for
//! every filter.

use rayon::prelude::*;

use crate::{FloatBuffer, PixelBuffer, Size};

mod edges;
mod kernel;
mod median;
mod orientation;

pub use edges::extend_edges;
pub use kernel::{EmbossDirection, Kernel};
pub use median::median;
pub use orientation::{orientation, orientation_color};

/// Radius of the pre-blur used by the `denoise` option of edge filters.
pub const DENOISE_RADIUS: usize = 1;

/// Accumulates `kernel` over a buffer that was padded by `kernel.radius()`.
///
/// The result has the size of the unpadded source. Colour channels are
/// convolved, alpha is taken from the centre pixel.
pub fn convolve(padded: &FloatBuffer, kernel: &Kernel) -> FloatBuffer {
    let r = kernel.radius() as i32;
    let out_size = Size::new(padded.width() - 2 * r, padded.height() - 2 * r);
    let mut out = FloatBuffer::new(out_size);
    if out_size.is_empty() {
        return out;
    }

    let row_len = out_size.width as usize;
    out.data_mut().par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        let y = y as i32;
        for (x, dst) in row.iter_mut().enumerate() {
            let x = x as i32;
            let mut acc = [0.0f32; 3];
            for ky in -r..=r {
                for kx in -r..=r {
                    let w = kernel.weight(kx, ky);
                    if w == 0.0 {
                        continue;
                    }
                    let px = padded.get(x + r + kx, y + r + ky);
                    acc[0] += w * px[0];
                    acc[1] += w * px[1];
                    acc[2] += w * px[2];
                }
            }
            let alpha = padded.get(x + r, y + r)[3];
            *dst = [acc[0], acc[1], acc[2], alpha];
        }
    });
    out
}

/// Pads and convolves in the float domain.
pub fn convolve_float(src: &FloatBuffer, kernel: &Kernel) -> FloatBuffer {
    convolve(&extend_edges(src, kernel.radius()), kernel)
}

/// Smoothing and sharpening: convolve and clamp at the final write.
pub fn filter(src: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    if src.size().is_empty() {
        return src.clone();
    }
    convolve_float(&FloatBuffer::from_pixels(src), kernel).to_pixels()
}

/// Source in float format, optionally pre-blurred with the radius 1 Gaussian.
pub(crate) fn prepare(src: &PixelBuffer, denoise: bool) -> FloatBuffer {
    let float = FloatBuffer::from_pixels(src);
    if denoise {
        convolve_float(&float, &Kernel::gaussian(DENOISE_RADIUS))
    } else {
        float
    }
}

/// Signed response filters (Sobel, emboss): convolve, then min/max rescale.
pub fn gradient(src: &PixelBuffer, kernel: &Kernel, denoise: bool) -> PixelBuffer {
    if src.size().is_empty() {
        return src.clone();
    }
    let mut response = convolve_float(&prepare(src, denoise), kernel);
    if !response.rescale() {
        log::debug!("gradient filter found a flat response, keeping source pixels");
        return src.clone();
    }
    response.to_pixels()
}
