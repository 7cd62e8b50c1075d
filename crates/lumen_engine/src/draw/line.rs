//! Integer line rasterisation.

use crate::{Position, Rectangle};

/// Points of the line from `p0` to `p1` (both ends included) that lie in
/// `clip`, in drawing order.
///
/// The walk advances one pixel per step along the major axis and carries the
/// minor axis with an integer error term, all in `i64`.
pub fn get_line_points(p0: Position, p1: Position, clip: Rectangle) -> Vec<Position> {
    let bounds = (p0.x.min(p1.x), p0.y.min(p1.y), p0.x.max(p1.x), p0.y.max(p1.y));
    if bounds.2 < clip.left() || bounds.0 >= clip.right() || bounds.3 < clip.top() || bounds.1 >= clip.bottom() {
        return Vec::new();
    }

    let dx = i64::from(p1.x) - i64::from(p0.x);
    let dy = i64::from(p1.y) - i64::from(p0.y);
    let x_major = dx.abs() >= dy.abs();
    let (major, minor) = if x_major { (dx.abs(), dy.abs()) } else { (dy.abs(), dx.abs()) };

    let mut points = Vec::new();
    let (mut x, mut y) = (i64::from(p0.x), i64::from(p0.y));
    let mut err = major / 2;
    for _ in 0..=major {
        if let (Ok(px), Ok(py)) = (i32::try_from(x), i32::try_from(y)) {
            let pos = Position::new(px, py);
            if clip.contains(pos) {
                points.push(pos);
            }
        }

        err -= minor;
        if err < 0 {
            err += major;
            if x_major {
                y += dy.signum();
            } else {
                x += dx.signum();
            }
        }
        if x_major {
            x += dx.signum();
        } else {
            y += dy.signum();
        }
    }
    points
}
