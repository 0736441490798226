//! BSP (Binary Space Partitioning) subdivision of quadrilateral areas into lots.

mod error;
mod lot;
mod point;
mod random;
mod spatial;
mod stats;

pub mod partition;

pub use error::{ConfigError, ConfigIssue};
pub use lot::{triangle_area, Lot, SplitAxis, INSIDE_EPSILON, SPREAD};
pub use partition::{
    run, Layout, Partition, PartitionConfig, PartitionEngine, SplitCountPolicy, SplitRange,
    Termination,
};
pub use point::{Point, POINT_EPSILON};
pub use random::{JavaRandom, INCREMENT, MASK_48, MULTIPLIER};
pub use spatial::{CellKey, LotId, NeighborQuery, SpatialIndex};
pub use stats::{DimStats, LayoutStats};
