//! Settings for the external bone-length calibration, and how its results
//! land in a [`SkeletonConfig`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::OffsetParam;
use crate::error::Result;
use crate::rig::{Overrides, SkeletonConfig};

use super::YamlStore;

/// Profile section holding [`AutoBoneSettings`].
pub const SECTION: &str = "autobone";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoBoneSettings {
    pub min_data_distance: u32,
    pub max_data_distance: u32,
    pub num_epochs: u32,
    pub initial_adjust_rate: f32,
    pub adjust_rate_multiplier: f32,
    pub slide_error_factor: f32,
    pub offset_slide_error_factor: f32,
    pub foot_height_offset_error_factor: f32,
    pub body_proportion_error_factor: f32,
    pub height_error_factor: f32,
    pub position_error_factor: f32,
    pub position_offset_error_factor: f32,
    pub calc_init_error: bool,
    /// Non-positive means "take the height from the headset".
    pub target_height: f32,
    pub sample_count: u32,
    pub sample_rate_ms: u64,
    pub save_recordings: bool,
}

impl Default for AutoBoneSettings {
    fn default() -> Self {
        Self {
            min_data_distance: 1,
            max_data_distance: 1,
            num_epochs: 100,
            initial_adjust_rate: 10.0,
            adjust_rate_multiplier: 0.995,
            slide_error_factor: 0.0,
            offset_slide_error_factor: 1.0,
            foot_height_offset_error_factor: 0.0,
            body_proportion_error_factor: 0.2,
            height_error_factor: 0.0,
            position_error_factor: 0.0,
            position_offset_error_factor: 0.0,
            calc_init_error: false,
            target_height: -1.0,
            sample_count: 1000,
            sample_rate_ms: 20,
            save_recordings: false,
        }
    }
}

impl AutoBoneSettings {
    pub fn target_height(&self) -> Option<f32> { (self.target_height > 0.0).then_some(self.target_height) }

    /// Wall-clock span of one recording.
    pub fn recording_duration_ms(&self) -> u64 { self.sample_count as u64 * self.sample_rate_ms }

    pub fn load(store: &YamlStore) -> Result<Self> { Ok(store.section(SECTION)?.unwrap_or_default()) }

    pub fn save(&self, store: &mut YamlStore) -> Result<()> { store.set_section(SECTION, self) }
}

/// Bone lengths produced by a calibration run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub lengths: BTreeMap<OffsetParam, f32>,
}

impl CalibrationResult {
    /// Sum of the lengths that make up standing height, excluding the head offset.
    pub fn height(&self, cfg: &SkeletonConfig) -> f32 {
        let len = |p: OffsetParam| self.lengths.get(&p).copied().unwrap_or_else(|| cfg.offset(p));
        len(OffsetParam::Neck) + len(OffsetParam::Torso) + len(OffsetParam::LegsLength)
    }
}

/// Apply a calibration result as one batch, so node offsets are recomputed once.
pub fn apply_calibration(cfg: &mut SkeletonConfig, result: &CalibrationResult) {
    let overrides = Overrides { offsets: result.lengths.clone(), ..Overrides::default() };
    cfg.set_configs(&overrides);
}
