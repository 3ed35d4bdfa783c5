pub mod catalog;
pub mod error;
pub mod export;
pub mod notify;
pub mod persist;
pub mod profile;
pub mod rig;

pub use catalog::{BoneNode, OffsetParam, ToggleParam, ValueParam};
pub use error::ConfigError;
pub use notify::{ConfigObserver, FaultSink};
pub use persist::{KeyedStore, RawValue};
pub use rig::{NodeOffsets, Overrides, SkeletonConfig};

pub use glam::Vec3;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
