use std::collections::TryReserveError;
use std::mem;

use thiserror::Error;
use tracing::debug;
use tracing::trace;
use tracing::warn;

pub use crate::quadtree::boundary::Boundary;
pub use crate::quadtree::config::DEFAULT_CAPACITY;
pub use crate::quadtree::config::DEFAULT_MAX_DEPTH;
pub use crate::quadtree::config::QuadTreeConfig;
pub use crate::quadtree::node::Quadrant;
pub use crate::quadtree::point::Point;
pub use crate::quadtree::point::StoredPoint;
use crate::quadtree::node::Node;
use crate::quadtree::node::NodeID;

mod boundary;
mod config;
mod node;
mod point;

/// The root always sits at the start of the node buffer.
const ROOT: NodeID = 0;

#[derive(Debug, Error)]
pub enum QuadTreeError {
    #[error("Capacity must be at least 1")]
    InvalidCapacity,

    #[error("Invalid boundary: center {center:?}, half extent {half_extent:?}")]
    InvalidBoundary { center: Point, half_extent: Point },

    #[error("No points to compute a boundary from")]
    EmptyPointSet,

    #[error("Failed to allocate tree nodes: {0}")]
    NodeAllocation(#[source] TryReserveError),

    #[error("Failed to allocate point storage: {0}")]
    StorageAllocation(#[source] TryReserveError),
}

/// A snapshot of the shape of a [`QuadTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadTreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub points: usize,

    /// Depth of the deepest node, with the root at `1`.
    pub depth: usize,
}

/// A region quadtree over points carrying a payload of type `T`.
///
/// Leaves hold up to `capacity` points. Once a leaf fills up it splits into four quadrants and
/// hands its points down, until the depth limit is reached; past it, full leaves double their
/// capacity instead.
#[derive(Debug)]
pub struct QuadTree<T> {
    config: QuadTreeConfig,

    /// Every node of the tree, the root at index [`ROOT`]. Children always come after their
    /// parent.
    nodes: Vec<Node<T>>,

    /// Number of points stored
    len: usize,
}

impl<T> QuadTree<T> {
    /// Create an empty tree covering `boundary`, using the default depth limit.
    pub fn new(boundary: Boundary, capacity: usize) -> Result<Self, QuadTreeError> {
        Self::with_config(boundary, QuadTreeConfig::default().with_capacity(capacity))
    }

    pub fn with_config(boundary: Boundary, config: QuadTreeConfig) -> Result<Self, QuadTreeError> {
        if config.capacity == 0 {
            return Err(QuadTreeError::InvalidCapacity);
        }

        if !boundary.is_well_formed() {
            return Err(QuadTreeError::InvalidBoundary {
                center: boundary.center,
                half_extent: boundary.half_extent,
            });
        }

        let root = Node::leaf(boundary, config.capacity, 1)
            .map_err(QuadTreeError::StorageAllocation)?;

        let mut nodes = Vec::new();
        nodes
            .try_reserve(1)
            .map_err(QuadTreeError::NodeAllocation)?;
        nodes.push(root);

        Ok(QuadTree {
            config,
            nodes,
            len: 0,
        })
    }

    /// Build a tree whose boundary is the smallest one covering all of `points`.
    ///
    /// Points with a non-finite position can't be covered. They are skipped, and their payloads
    /// dropped.
    pub fn from_points<I>(points: I, config: QuadTreeConfig) -> Result<Self, QuadTreeError>
    where
        I: IntoIterator<Item = (Point, T)>,
    {
        let (points, skipped): (Vec<_>, Vec<_>) =
            points.into_iter().partition(|(p, _)| p.is_finite());

        if !skipped.is_empty() {
            warn!(skipped = skipped.len(), "Skipping points with a non-finite position");
        }

        let boundary = Boundary::from_points(points.iter().map(|(p, _)| p))
            .ok_or(QuadTreeError::EmptyPointSet)?;

        let mut tree = Self::with_config(boundary, config)?;

        for (position, payload) in points {
            let inserted = tree.insert(position, payload)?;
            debug_assert!(inserted, "{position:?} outside of its own bounding box");
        }

        Ok(tree)
    }

    pub fn boundary(&self) -> &Boundary {
        &self.nodes[ROOT].boundary
    }

    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over every stored point, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &StoredPoint<T>> {
        self.nodes.iter().flat_map(|node| node.points.iter())
    }

    /// Iterate over the boundary of every node, root first.
    pub fn boundaries(&self) -> impl Iterator<Item = &Boundary> {
        self.nodes.iter().map(|node| &node.boundary)
    }

    pub fn stats(&self) -> QuadTreeStats {
        QuadTreeStats {
            nodes: self.nodes.len(),
            leaves: self.nodes.iter().filter(|node| node.is_leaf()).count(),
            points: self.len,
            depth: self.nodes.iter().map(|node| node.depth).max().unwrap_or(0),
        }
    }

    /// Insert a point into the tree.
    ///
    /// Returns `Ok(false)` if `position` lies outside of the tree's boundary, in which case
    /// `payload` is dropped. Errors are only returned when memory runs out. The point is then not
    /// stored, but the tree stays consistent.
    pub fn insert(&mut self, position: Point, payload: T) -> Result<bool, QuadTreeError> {
        if !self.nodes[ROOT].boundary.contains(position) {
            trace!(?position, "Point outside of the tree, rejected");
            return Ok(false);
        }

        let id = self.place(ROOT, StoredPoint::new(position, payload))?;
        self.len += 1;

        trace!(?position, node = id, "Inserted point");

        Ok(true)
    }

    /// Walk down from `id` until a leaf takes `point`, splitting or growing full leaves on the
    /// way. Returns the node the point ended up in.
    ///
    /// `point` must lie within the boundary of `id`.
    fn place(&mut self, mut id: NodeID, point: StoredPoint<T>) -> Result<NodeID, QuadTreeError> {
        loop {
            let node = &self.nodes[id];

            if node.has_room() {
                break;
            }

            if node.is_leaf() {
                if node.depth > self.config.max_depth {
                    self.grow(id)?;
                    break;
                }

                self.subdivide(id)?;
            }

            id = self.route(id, point.position);
        }

        // storage for `capacity` points is always reserved up front, so this won't allocate
        self.nodes[id].points.push(point);

        Ok(id)
    }

    /// Turn the leaf `id` into an internal node with four children, handing its points down to
    /// them in insertion order.
    fn subdivide(&mut self, id: NodeID) -> Result<(), QuadTreeError> {
        let Node {
            boundary,
            capacity,
            depth,
            ..
        } = self.nodes[id];

        debug_assert!(self.nodes[id].is_leaf(), "Only leaves can be subdivided");
        debug_assert!(depth <= self.config.max_depth, "Subdividing past the depth limit");

        // allocate everything before touching the tree, so that failing leaves it intact
        let leaf = |b: Boundary| {
            Node::leaf(b, capacity, depth + 1).map_err(QuadTreeError::StorageAllocation)
        };
        let [nw, sw, ne, se] = boundary.split();
        let children = [leaf(nw)?, leaf(sw)?, leaf(ne)?, leaf(se)?];

        self.nodes
            .try_reserve(children.len())
            .map_err(QuadTreeError::NodeAllocation)?;

        let first = self.nodes.len();
        self.nodes.extend(children);

        let points = mem::take(&mut self.nodes[id].points);
        self.nodes[id].children = Some([first, first + 1, first + 2, first + 3]);

        debug!(
            depth,
            center = ?boundary.center,
            half_extent = ?boundary.half_extent,
            points = points.len(),
            "Subdivided node"
        );

        // children have the same capacity as their parent, so they can take all of its points
        for point in points {
            let child = self.route(id, point.position);
            self.nodes[child].points.push(point);
        }

        Ok(())
    }

    /// Double the capacity of the leaf `id`. Used once a leaf is too deep to subdivide.
    fn grow(&mut self, id: NodeID) -> Result<(), QuadTreeError> {
        let node = &mut self.nodes[id];
        let capacity = node.capacity.saturating_mul(2);

        node.points
            .try_reserve_exact(capacity - node.points.len())
            .map_err(QuadTreeError::StorageAllocation)?;
        node.capacity = capacity;

        debug!(depth = node.depth, capacity, "Reached maximum depth, growing node storage");

        Ok(())
    }

    /// Pick the child of `id` that should hold `position`: the first one, in [`Quadrant`] order,
    /// whose boundary contains it.
    ///
    /// `position` must lie within the boundary of `id`. Quadrants cover their parent, so one of
    /// them always takes it.
    fn route(&self, id: NodeID, position: Point) -> NodeID {
        let Some(children) = self.nodes[id].children else {
            unreachable!("Only subdivided nodes route points to their children")
        };

        let found = children
            .into_iter()
            .find(|&child| self.nodes[child].boundary.contains(position));

        match found {
            Some(child) => child,
            None => unreachable!("{position:?} lies in no quadrant of node {id}"),
        }
    }

    /// Collect every point lying within `region`, edges included.
    ///
    /// The order of the results is unspecified.
    pub fn query(&self, region: &Boundary) -> Vec<&StoredPoint<T>> {
        let mut results = Vec::new();
        self.query_into(region, &mut results);

        results
    }

    /// Like [`QuadTree::query`], but appends to `results`. Returns whether `region` touches the
    /// tree at all.
    pub fn query_into<'a>(
        &'a self,
        region: &Boundary,
        results: &mut Vec<&'a StoredPoint<T>>,
    ) -> bool {
        self.query_with(region, |point| results.push(point))
    }

    /// Call `f` on every point lying within `region`. Returns whether `region` touches the tree at
    /// all.
    pub fn query_with<'a, F>(&'a self, region: &Boundary, mut f: F) -> bool
    where
        F: FnMut(&'a StoredPoint<T>),
    {
        self.query_node(ROOT, region, &mut f)
    }

    /// Number of points lying within `region`.
    pub fn count(&self, region: &Boundary) -> usize {
        let mut n = 0;
        self.query_with(region, |_| n += 1);

        n
    }

    fn query_node<'a, F>(&'a self, id: NodeID, region: &Boundary, f: &mut F) -> bool
    where
        F: FnMut(&'a StoredPoint<T>),
    {
        let node = &self.nodes[id];

        // nothing below this node can be in the region
        if !node.boundary.intersects(region) {
            return false;
        }

        for point in &node.points {
            if region.contains(point.position) {
                f(point);
            }
        }

        if let Some(children) = node.children {
            for child in children {
                self.query_node(child, region, f);
            }
        }

        true
    }

    /// Tear the tree down, children before their parents. Returns the number of nodes released.
    ///
    /// Dropping the tree releases the same memory; this only makes the teardown explicit.
    pub fn destroy(mut self) -> usize {
        let released = self.release(ROOT);
        debug!(released, points = self.len, "Destroyed tree");

        released
    }

    fn release(&mut self, id: NodeID) -> usize {
        let mut released = 0;

        if let Some(children) = self.nodes[id].children.take() {
            for child in children {
                released += self.release(child);
            }
        }

        drop(mem::take(&mut self.nodes[id].points));

        released + 1
    }
}
