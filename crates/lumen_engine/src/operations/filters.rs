//! Neighbourhood filters routed through the convolution engine.

use crate::convolution::{self, EmbossDirection, Kernel};
use crate::{EngineError, PixelBuffer, Result};

/// Largest radius accepted by mean, Gaussian and median filters.
pub const MAX_FILTER_RADIUS: u32 = 25;

pub(crate) fn check_radius(radius: u32) -> Result<()> {
    if !(1..=MAX_FILTER_RADIUS).contains(&radius) {
        return Err(EngineError::parameter(
            "radius",
            format!("radius {radius} is outside 1..={MAX_FILTER_RADIUS}"),
        ));
    }
    Ok(())
}

pub fn mean(src: &PixelBuffer, radius: u32) -> PixelBuffer {
    convolution::filter(src, &Kernel::mean(radius as usize))
}

pub fn gaussian(src: &PixelBuffer, radius: u32) -> PixelBuffer {
    convolution::filter(src, &Kernel::gaussian(radius as usize))
}

pub fn median(src: &PixelBuffer, radius: u32) -> PixelBuffer {
    convolution::median(src, radius as usize)
}

pub fn sharpen(src: &PixelBuffer) -> PixelBuffer {
    convolution::filter(src, &Kernel::sharpen())
}

pub fn sobel_horizontal(src: &PixelBuffer, denoise: bool) -> PixelBuffer {
    convolution::gradient(src, &Kernel::sobel_horizontal(), denoise)
}

pub fn sobel_vertical(src: &PixelBuffer, denoise: bool) -> PixelBuffer {
    convolution::gradient(src, &Kernel::sobel_vertical(), denoise)
}

pub fn sobel_orientation(src: &PixelBuffer, denoise: bool) -> PixelBuffer {
    convolution::orientation(src, denoise)
}

pub fn emboss(src: &PixelBuffer, direction: EmbossDirection, denoise: bool) -> PixelBuffer {
    convolution::gradient(src, &Kernel::emboss(direction), denoise)
}
