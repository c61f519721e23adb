use crate::quadtree::point::Point;

/// A closed, axis-aligned rectangle given by its center and its half extents.
///
/// Edges are part of the rectangle: a point lying exactly on an edge is contained, and two
/// rectangles sharing only an edge intersect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub center: Point,
    pub half_extent: Point,
}

impl Boundary {
    pub const fn new(center: Point, half_extent: Point) -> Self {
        Boundary {
            center,
            half_extent,
        }
    }

    /// Create a `Boundary` spanning from `min` to `max`.
    ///
    /// The half extents are widened where rounding would otherwise leave a corner just outside.
    pub fn from_corners(min: Point, max: Point) -> Self {
        let center = min.mid(&max);

        Boundary {
            center,
            half_extent: Point {
                x: widen(center.x, (max.x - min.x) / 2f32, min.x, max.x),
                y: widen(center.y, (max.y - min.y) / 2f32, min.y, max.y),
            },
        }
    }

    /// Create the smallest `Boundary` containing every `Point` in `points`, or `None` if there
    /// are no points.
    ///
    /// The points are expected to be finite.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut points = points.into_iter();

        let first = points.next()?;
        let (mut min, mut max) = (*first, *first);

        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        Some(Boundary::from_corners(min, max))
    }

    pub fn min(&self) -> Point {
        self.center.offset(-self.half_extent.x, -self.half_extent.y)
    }

    pub fn max(&self) -> Point {
        self.center.offset(self.half_extent.x, self.half_extent.y)
    }

    /// Finite everywhere, and with non-negative half extents.
    pub fn is_well_formed(&self) -> bool {
        self.center.is_finite()
            && self.half_extent.is_finite()
            && self.half_extent.x >= 0f32
            && self.half_extent.y >= 0f32
    }

    /// Check whether `p` lies within the boundary, edges included.
    pub fn contains(&self, p: Point) -> bool {
        let (min, max) = (self.min(), self.max());

        (p.x >= min.x && p.x <= max.x) && (p.y >= min.y && p.y <= max.y)
    }

    /// Check whether the two boundaries overlap or touch.
    pub fn intersects(&self, other: &Boundary) -> bool {
        // corners are computed the same way as in `contains`, so two boundaries sharing a point
        // always intersect
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());

        (a_min.x <= b_max.x && b_min.x <= a_max.x) && (a_min.y <= b_max.y && b_min.y <= a_max.y)
    }

    /// Splits the boundary into four quadrants, ordered NW, SW, NE, SE.
    ///
    /// North is towards smaller `y`, west towards smaller `x`. Each quadrant reaches from the
    /// center to the outer edges, so every point of the boundary lies in at least one of them.
    pub fn split(&self) -> [Boundary; 4] {
        let Boundary {
            center: c,
            half_extent: h,
        } = *self;
        let (min, max) = (self.min(), self.max());
        let half = Point::new(h.x / 2f32, h.y / 2f32);

        let (west, east) = (c.x - half.x, c.x + half.x);
        let (north, south) = (c.y - half.y, c.y + half.y);

        // halving can round the quadrants a hair short of the center or of the outer edges
        let (west_half, east_half) = (
            widen(west, half.x, min.x, c.x),
            widen(east, half.x, c.x, max.x),
        );
        let (north_half, south_half) = (
            widen(north, half.y, min.y, c.y),
            widen(south, half.y, c.y, max.y),
        );

        let nw = Boundary::new(Point::new(west, north), Point::new(west_half, north_half));
        let sw = Boundary::new(Point::new(west, south), Point::new(west_half, south_half));
        let ne = Boundary::new(Point::new(east, north), Point::new(east_half, north_half));
        let se = Boundary::new(Point::new(east, south), Point::new(east_half, south_half));

        [nw, sw, ne, se]
    }
}

/// Grow `half` until `center - half` reaches down to `lo`, and `center + half` up to `hi`.
fn widen(center: f32, half: f32, lo: f32, hi: f32) -> f32 {
    let mut half = half.max(center - lo).max(hi - center);

    while center - half > lo || center + half < hi {
        half = half.next_up();
    }

    half
}
