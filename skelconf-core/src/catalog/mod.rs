//! Static catalog of everything the skeleton configuration knows about:
//! proportion parameters, model toggles, auxiliary values and body nodes.

pub mod bones;
pub mod params;

pub use bones::{BoneNode, Side};
pub use params::{OffsetParam, ToggleParam, ValueParam};

/// Total number of persisted entries across all three parameter families.
pub fn entry_count() -> usize {
    OffsetParam::ALL.len() + ToggleParam::ALL.len() + ValueParam::ALL.len()
}
