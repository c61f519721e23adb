/// Deepest level at which a node may still subdivide, unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Points a leaf takes before subdividing, unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 4;

/// Per-tree limits. Each [`QuadTree`](crate::quadtree::QuadTree) keeps its own copy, so trees with
/// different limits can live side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadTreeConfig {
    /// Points a leaf holds before it subdivides. Must be at least `1`.
    pub capacity: usize,

    /// Nodes at depth `max_depth` or shallower may subdivide; the root is at depth `1`. Past this
    /// depth, a full leaf doubles its capacity instead, so the deepest node sits at
    /// `max_depth + 1`.
    pub max_depth: usize,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        QuadTreeConfig {
            capacity: DEFAULT_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl QuadTreeConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
