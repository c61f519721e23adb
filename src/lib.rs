pub mod quadtree;

pub use crate::quadtree::Boundary;
pub use crate::quadtree::Point;
pub use crate::quadtree::QuadTree;
pub use crate::quadtree::QuadTreeConfig;
pub use crate::quadtree::QuadTreeError;
pub use crate::quadtree::StoredPoint;
