//! Skeleton configuration store and the node offsets derived from it.

pub mod config;
pub mod offsets;

pub use config::{Overrides, SkeletonConfig, SkeletonConfigBuilder};
pub use offsets::{compute_all, compute_node_offset, NodeOffsets};
