use std::collections::TryReserveError;
use std::fmt::Debug;

use crate::quadtree::boundary::Boundary;
use crate::quadtree::point::StoredPoint;

/// Index of a [`Node`] in the tree's node buffer.
pub type NodeID = usize;

/// The four children of a subdivided node, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    NorthWest = 0,
    SouthWest = 1,
    NorthEast = 2,
    SouthEast = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::SouthWest,
        Quadrant::NorthEast,
        Quadrant::SouthEast,
    ];
}

pub struct Node<T> {
    pub boundary: Boundary,

    /// Points held directly by this node. Always empty once the node is subdivided.
    pub points: Vec<StoredPoint<T>>,

    /// How many points the node takes before it subdivides. Doubles every time a node past the
    /// depth limit fills up.
    pub capacity: usize,

    /// The root sits at depth `1`.
    pub depth: usize,

    /// `None` if leaf, otherwise indexed by [`Quadrant`]
    pub children: Option<[NodeID; 4]>,
}

impl<T> Node<T> {
    /// Create a leaf, with storage already set aside for `capacity` points.
    pub fn leaf(
        boundary: Boundary,
        capacity: usize,
        depth: usize,
    ) -> Result<Self, TryReserveError> {
        let mut points = Vec::new();
        points.try_reserve_exact(capacity)?;

        Ok(Node {
            boundary,
            points,
            capacity,
            depth,
            children: None,
        })
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Whether a point can be appended without subdividing or growing.
    pub fn has_room(&self) -> bool {
        self.is_leaf() && self.points.len() < self.capacity
    }
}

impl<T> Debug for Node<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.children {
            None => write!(
                f,
                "[leaf depth: {}, points: {}/{}, boundary: {:?} ± {:?}]",
                self.depth,
                self.points.len(),
                self.capacity,
                self.boundary.center,
                self.boundary.half_extent
            ),
            Some([nw, sw, ne, se]) => write!(
                f,
                "[node depth: {}, nw: {}, sw: {}, ne: {}, se: {}]",
                self.depth, nw, sw, ne, se
            ),
        }
    }
}
