use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(x: {}, y: {})", self.x, self.y)
    }
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn min(self, other: Self) -> Self {
        Position::new(self.x.min(other.x), self.y.min(other.y))
    }

    pub fn max(self, other: Self) -> Self {
        Position::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl Add<Position> for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl AddAssign<Position> for Position {
    fn add_assign(&mut self, rhs: Position) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub<Position> for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl SubAssign<Position> for Position {
    fn sub_assign(&mut self, rhs: Position) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl From<(i32, i32)> for Position {
    fn from(value: (i32, i32)) -> Self {
        Position { x: value.0, y: value.1 }
    }
}

/// Canvas dimensions in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Size { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Number of pixels covered, zero for degenerate sizes.
    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }

    /// Width and height exchanged, as produced by a quarter turn.
    pub fn transposed(&self) -> Self {
        Size::new(self.height, self.width)
    }
}

impl From<(i32, i32)> for Size {
    fn from(value: (i32, i32)) -> Self {
        Size {
            width: value.0,
            height: value.1,
        }
    }
}

impl From<(u32, u32)> for Size {
    fn from(value: (u32, u32)) -> Self {
        Size {
            width: value.0 as i32,
            height: value.1 as i32,
        }
    }
}

/// An axis aligned pixel rectangle. `start` is inclusive, the far edge
/// (`start + size`) is exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub start: Position,
    pub size: Size,
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(x:{}, y:{}, width: {}, height: {})",
            self.start.x, self.start.y, self.size.width, self.size.height
        )
    }
}

impl Rectangle {
    pub fn new(start: Position, size: Size) -> Self {
        Self { start, size }
    }

    pub fn from(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            start: Position::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Rectangle spanned by two corner points, both corners included.
    pub fn from_pt(p1: Position, p2: Position) -> Self {
        let start = p1.min(p2);
        let end = p1.max(p2);
        Rectangle {
            start,
            size: Size::new(end.x - start.x + 1, end.y - start.y + 1),
        }
    }

    pub fn left(&self) -> i32 {
        self.start.x
    }

    pub fn top(&self) -> i32 {
        self.start.y
    }

    /// Exclusive right edge, saturating at `i32::MAX`.
    pub fn right(&self) -> i32 {
        self.start.x.saturating_add(self.size.width)
    }

    /// Exclusive bottom edge, saturating at `i32::MAX`.
    pub fn bottom(&self) -> i32 {
        self.start.y.saturating_add(self.size.height)
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.left() <= pos.x && pos.x < self.right() && self.top() <= pos.y && pos.y < self.bottom()
    }

    /// Overlapping part of both rectangles, `None` if they don't overlap.
    pub fn intersect(&self, other: &Rectangle) -> Option<Rectangle> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left >= right || top >= bottom {
            return None;
        }
        Some(Rectangle::from(left, top, right - left, bottom - top))
    }

    /// Checks that the rectangle lies completely on a canvas of the given size.
    pub fn is_inside(&self, size: Size) -> bool {
        let right = i64::from(self.start.x) + i64::from(self.size.width);
        let bottom = i64::from(self.start.y) + i64::from(self.size.height);
        !self.is_empty() && self.left() >= 0 && self.top() >= 0 && right <= i64::from(size.width) && bottom <= i64::from(size.height)
    }

    /// The part of this rectangle that lies on a canvas of the given size.
    pub fn clamped_to(&self, size: Size) -> Option<Rectangle> {
        self.intersect(&Rectangle::new(Position::default(), size))
    }
}
