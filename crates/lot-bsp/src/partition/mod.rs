//! Recursive lot subdivision.
//!
//! A run starts from a single quadrilateral and repeatedly splits lots into
//! strips along one of their two axes until the target lot count is reached
//! or no further progress can be made. A split is only committed when every
//! child is large enough, is a simple quadrilateral, and still has a free
//! probe point towards the exterior.
//!
//! # Example
//!
//! ```
//! use lot_bsp::{Lot, Point};
//! use lot_bsp::partition::{run, PartitionConfig, Termination};
//!
//! let initial = Lot::new(
//!     Point::new(100.0, 200.0),
//!     Point::new(600.0, 200.0),
//!     Point::new(650.0, 1200.0),
//!     Point::new(150.0, 1100.0),
//! );
//! let partition = run(initial, PartitionConfig::default()).unwrap();
//!
//! assert!(partition.lots.len() > 1);
//! assert!(matches!(
//!     partition.termination,
//!     Termination::Converged | Termination::Stagnant | Termination::Exhausted
//! ));
//! ```
//!
//! # Architecture
//!
//! - [`PartitionEngine`]: the state machine owning a run
//! - [`Layout`]: live lots plus their spatial index, mutated transactionally
//! - [`SplitSelector`]: strategy trait choosing which lots a round attempts
//! - [`RoundObserver`]: read-only hook called after rounds that made progress

mod config;
mod engine;
mod layout;
mod observer;
mod selector;

pub use config::{PartitionConfig, SplitCountPolicy, SplitRange, MAX_SPLIT_LIMIT};
pub use engine::{
    run, EngineState, Partition, PartitionEngine, Rejection, RoundReport, SplitOutcome, Termination,
};
pub use layout::Layout;
pub use observer::{CollectingObserver, FnObserver, NoopObserver, RoundObserver, RoundSnapshot};
pub use selector::{OldestOnly, OldestOrOversized, SplitSelector};
