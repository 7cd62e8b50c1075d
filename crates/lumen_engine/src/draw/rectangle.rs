use crate::{Position, Rectangle};

/// Points of the rectangle spanned by the corners `p0` and `p1` (inclusive)
/// that lie in `clip`. Without `filled` only the border is returned.
pub fn get_rectangle_points(p0: Position, p1: Position, filled: bool, clip: Rectangle) -> Vec<Position> {
    let min = p0.min(p1);
    let max = p0.max(p1);

    // visible span, empty if the ranges don't overlap
    let (x0, x1) = (min.x.max(clip.left()), max.x.min(clip.right().saturating_sub(1)));
    let (y0, y1) = (min.y.max(clip.top()), max.y.min(clip.bottom().saturating_sub(1)));
    if x0 > x1 || y0 > y1 {
        return Vec::new();
    }
    let visible_column = |x: i32| (x0..=x1).contains(&x);

    let mut points = Vec::new();
    for y in y0..=y1 {
        if filled || y == min.y || y == max.y {
            points.extend((x0..=x1).map(|x| Position::new(x, y)));
            continue;
        }
        if visible_column(min.x) {
            points.push(Position::new(min.x, y));
        }
        if max.x != min.x && visible_column(max.x) {
            points.push(Position::new(max.x, y));
        }
    }
    points
}
