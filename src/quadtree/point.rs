use core::fmt::Debug;

#[derive(Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Compute the midpoint of the current `Point` and some `other` `Point`.
    pub fn mid(&self, other: &Self) -> Self {
        Point {
            x: (self.x + other.x) / 2f32,
            y: (self.y + other.y) / 2f32,
        }
    }

    /// Shift the `Point` by `dx` and `dy`.
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A position in the tree, along with whatever the caller attached to it.
///
/// The tree never looks at `payload`. To keep the data itself outside of the tree, store a handle
/// (an index, a reference, an `Rc`) as the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPoint<T> {
    pub position: Point,
    pub payload: T,
}

impl<T> StoredPoint<T> {
    pub fn new(position: Point, payload: T) -> Self {
        StoredPoint { position, payload }
    }
}
