use crate::draw::{get_ellipse_points_from_rect, get_filled_ellipse_points_from_rect, get_line_points, get_rectangle_points, Brush};
use crate::{PixelBuffer, Position};

fn painted(src: &PixelBuffer, brush: &Brush, points: &[Position]) -> PixelBuffer {
    let mut out = src.clone();
    brush.paint(&mut out, points);
    out
}

pub fn line(src: &PixelBuffer, from: Position, to: Position, brush: &Brush) -> PixelBuffer {
    painted(src, brush, &get_line_points(from, to, brush.reach(src.size())))
}

pub fn rectangle(src: &PixelBuffer, p0: Position, p1: Position, brush: &Brush, filled: bool) -> PixelBuffer {
    painted(src, brush, &get_rectangle_points(p0, p1, filled, brush.reach(src.size())))
}

pub fn ellipse(src: &PixelBuffer, p0: Position, p1: Position, brush: &Brush, filled: bool) -> PixelBuffer {
    let clip = brush.reach(src.size());
    let points = if filled {
        get_filled_ellipse_points_from_rect(p0, p1, clip)
    } else {
        get_ellipse_points_from_rect(p0, p1, clip)
    };
    painted(src, brush, &points)
}
