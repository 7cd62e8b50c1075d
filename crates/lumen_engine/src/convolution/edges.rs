//! Edge extension by replication.

use crate::{FloatBuffer, Size};

/// Pads `src` by `radius` pixels on every side. Each padding pixel repeats
/// the nearest source pixel, corners repeat the corner pixel.
pub fn extend_edges(src: &FloatBuffer, radius: usize) -> FloatBuffer {
    let r = radius as i32;
    let size = src.size();
    let padded_size = Size::new(size.width + 2 * r, size.height + 2 * r);
    let mut padded = FloatBuffer::new(padded_size);
    if size.is_empty() {
        return padded;
    }

    for y in 0..padded_size.height {
        let sy = (y - r).clamp(0, size.height - 1);
        for x in 0..padded_size.width {
            let sx = (x - r).clamp(0, size.width - 1);
            padded.set(x, y, src.get(sx, sy));
        }
    }
    padded
}
