//! Midpoint ellipse rasterisation.

use crate::{Position, Rectangle};

/// Collects the points that fall into the clip rectangle.
struct Plotter {
    clip: Rectangle,
    points: Vec<Position>,
}

impl Plotter {
    fn new(clip: Rectangle) -> Self {
        Self { clip, points: Vec::new() }
    }

    fn plot(&mut self, center: Position, dx: i32, dy: i32) {
        let pos = Position::new(center.x.saturating_add(dx), center.y.saturating_add(dy));
        if self.clip.contains(pos) {
            self.points.push(pos);
        }
    }

    fn plot_symmetric(&mut self, center: Position, x: i32, y: i32) {
        if x == 0 {
            self.plot(center, 0, -y);
            self.plot(center, 0, y);
        } else if y == 0 {
            self.plot(center, x, 0);
            self.plot(center, -x, 0);
        } else {
            self.plot(center, x, -y);
            self.plot(center, -x, -y);
            self.plot(center, -x, y);
            self.plot(center, x, y);
        }
    }

    /// Horizontal run `-extent..=extent` around the centre on row `dy`,
    /// limited to the clip columns.
    fn plot_row(&mut self, center: Position, dy: i32, extent: i32) {
        let y = center.y.saturating_add(dy);
        if y < self.clip.top() || y >= self.clip.bottom() {
            return;
        }
        let x0 = center.x.saturating_sub(extent).max(self.clip.left());
        let x1 = center.x.saturating_add(extent).min(self.clip.right().saturating_sub(1));
        self.points.extend((x0..=x1).map(|x| Position::new(x, y)));
    }

    /// Rows `-radius_y..=radius_y` that are visible.
    fn visible_rows(&self, center: Position, radius_y: i32) -> std::ops::RangeInclusive<i32> {
        let first = (-radius_y).max(self.clip.top().saturating_sub(center.y));
        let last = radius_y.min(self.clip.bottom().saturating_sub(1).saturating_sub(center.y));
        first..=last
    }
}

/// Points on an ellipse outline (midpoint algorithm) that lie in `clip`.
/// Degenerate radii collapse to a line or the centre point.
pub fn get_ellipse_points(center: Position, radius_x: i32, radius_y: i32, clip: Rectangle) -> Vec<Position> {
    if radius_x <= 0 || radius_y <= 0 {
        return degenerate(center, radius_x.max(0), radius_y.max(0), clip);
    }

    let mut plotter = Plotter::new(clip);

    // decision terms grow with r⁴
    let rx2 = i128::from(radius_x) * i128::from(radius_x);
    let ry2 = i128::from(radius_y) * i128::from(radius_y);
    let two_rx2 = 2 * rx2;
    let two_ry2 = 2 * ry2;

    let mut x = 0i32;
    let mut y = radius_y;
    let mut px = 0i128;
    let mut py = two_rx2 * i128::from(y);

    plotter.plot_symmetric(center, x, y);

    // region 1: |slope| < 1
    let mut p = (ry2 - rx2 * i128::from(radius_y)) + rx2 / 4;
    while px < py {
        x += 1;
        px += two_ry2;
        if p < 0 {
            p += ry2 + px;
        } else {
            y -= 1;
            py -= two_rx2;
            p += ry2 + px - py;
        }
        plotter.plot_symmetric(center, x, y);
    }

    // region 2: |slope| >= 1
    p = (ry2 * (i128::from(x) * 2 + 1).pow(2)) / 4 + rx2 * (i128::from(y) - 1).pow(2) - rx2 * ry2;
    while y > 0 {
        y -= 1;
        py -= two_rx2;
        if p > 0 {
            p += rx2 - py;
        } else {
            x += 1;
            px += two_ry2;
            p += rx2 - py + px;
        }
        plotter.plot_symmetric(center, x, y);
    }

    plotter.points
}

fn degenerate(center: Position, radius_x: i32, radius_y: i32, clip: Rectangle) -> Vec<Position> {
    let mut plotter = Plotter::new(clip);
    for dy in plotter.visible_rows(center, radius_y) {
        plotter.plot_row(center, dy, radius_x);
    }
    plotter.points
}

/// All points inside the ellipse that lie in `clip`, one scanline per row.
pub fn get_filled_ellipse_points(center: Position, radius_x: i32, radius_y: i32, clip: Rectangle) -> Vec<Position> {
    if radius_x <= 0 || radius_y <= 0 {
        return degenerate(center, radius_x.max(0), radius_y.max(0), clip);
    }

    let rx = f64::from(radius_x);
    let ry = f64::from(radius_y);
    let mut plotter = Plotter::new(clip);
    for dy in plotter.visible_rows(center, radius_y) {
        // (x/rx)² + (y/ry)² = 1
        let extent = (rx * (1.0 - (f64::from(dy) / ry).powi(2)).sqrt()).round() as i32;
        plotter.plot_row(center, dy, extent);
    }
    plotter.points
}

fn bounding_box(p0: Position, p1: Position) -> (Position, i32, i32) {
    let min = p0.min(p1);
    let max = p0.max(p1);
    let mid = |a: i32, b: i32| ((i64::from(a) + i64::from(b)) / 2) as i32;
    let half = |a: i32, b: i32| ((i64::from(b) - i64::from(a)) / 2) as i32;
    (Position::new(mid(min.x, max.x), mid(min.y, max.y)), half(min.x, max.x), half(min.y, max.y))
}

/// Outline of the ellipse inscribed in the box spanned by `p0` and `p1`.
pub fn get_ellipse_points_from_rect(p0: Position, p1: Position, clip: Rectangle) -> Vec<Position> {
    let (center, rx, ry) = bounding_box(p0, p1);
    get_ellipse_points(center, rx, ry, clip)
}

pub fn get_filled_ellipse_points_from_rect(p0: Position, p1: Position, clip: Rectangle) -> Vec<Position> {
    let (center, rx, ry) = bounding_box(p0, p1);
    get_filled_ellipse_points(center, rx, ry, clip)
}
