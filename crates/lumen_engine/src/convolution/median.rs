use rayon::prelude::*;

use crate::{FloatBuffer, PixelBuffer};

use super::extend_edges;

/// Per-channel rank filter over the `(2r+1)²` neighbourhood of the padded source.
pub fn median(src: &PixelBuffer, radius: usize) -> PixelBuffer {
    if src.size().is_empty() {
        return src.clone();
    }
    let padded = extend_edges(&FloatBuffer::from_pixels(src), radius);
    let r = radius as i32;
    let mut out = FloatBuffer::new(src.size());
    let row_len = src.width() as usize;
    let window = (2 * radius + 1) * (2 * radius + 1);
    let mid = window / 2;

    out.data_mut().par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        let y = y as i32;
        let mut samples: [Vec<f32>; 3] = [Vec::with_capacity(window), Vec::with_capacity(window), Vec::with_capacity(window)];
        for (x, dst) in row.iter_mut().enumerate() {
            let x = x as i32;
            for s in &mut samples {
                s.clear();
            }
            for ky in -r..=r {
                for kx in -r..=r {
                    let px = padded.get(x + r + kx, y + r + ky);
                    for (c, s) in samples.iter_mut().enumerate() {
                        s.push(px[c]);
                    }
                }
            }
            let mut value = padded.get(x + r, y + r);
            for (c, s) in samples.iter_mut().enumerate() {
                let (_, m, _) = s.select_nth_unstable_by(mid, f32::total_cmp);
                value[c] = *m;
            }
            *dst = value;
        }
    });
    out.to_pixels()
}
