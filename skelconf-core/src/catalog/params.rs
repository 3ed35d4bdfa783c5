use serde::{Deserialize, Serialize};

use super::bones::BoneNode;

/// Body proportion parameters. Lengths are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OffsetParam {
    Head,
    Neck,
    Chest,
    Torso,
    Waist,
    HipOffset,
    HipsWidth,
    LegsLength,
    KneeHeight,
    FootLength,
    FootShift,
    SkeletonOffset,
    ControllerDistanceZ,
    ControllerDistanceY,
    LowerArmLength,
    ElbowOffset,
    UpperArmLength,
    ShouldersDistance,
    ShouldersWidth,
}

impl OffsetParam {
    pub const ALL: [OffsetParam; 19] = [
        OffsetParam::Head,
        OffsetParam::Neck,
        OffsetParam::Chest,
        OffsetParam::Torso,
        OffsetParam::Waist,
        OffsetParam::HipOffset,
        OffsetParam::HipsWidth,
        OffsetParam::LegsLength,
        OffsetParam::KneeHeight,
        OffsetParam::FootLength,
        OffsetParam::FootShift,
        OffsetParam::SkeletonOffset,
        OffsetParam::ControllerDistanceZ,
        OffsetParam::ControllerDistanceY,
        OffsetParam::LowerArmLength,
        OffsetParam::ElbowOffset,
        OffsetParam::UpperArmLength,
        OffsetParam::ShouldersDistance,
        OffsetParam::ShouldersWidth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OffsetParam::Head => "Head",
            OffsetParam::Neck => "Neck",
            OffsetParam::Chest => "Chest",
            OffsetParam::Torso => "Torso",
            OffsetParam::Waist => "Waist",
            OffsetParam::HipOffset => "Hip offset",
            OffsetParam::HipsWidth => "Hips width",
            OffsetParam::LegsLength => "Legs length",
            OffsetParam::KneeHeight => "Knee height",
            OffsetParam::FootLength => "Foot length",
            OffsetParam::FootShift => "Foot shift",
            OffsetParam::SkeletonOffset => "Skeleton offset",
            OffsetParam::ControllerDistanceZ => "Controller distance z",
            OffsetParam::ControllerDistanceY => "Controller distance y",
            OffsetParam::LowerArmLength => "Lower arm length",
            OffsetParam::ElbowOffset => "Elbow offset",
            OffsetParam::UpperArmLength => "Upper arm length",
            OffsetParam::ShouldersDistance => "Shoulders distance",
            OffsetParam::ShouldersWidth => "Shoulders width",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            OffsetParam::Head => "body.headShift",
            OffsetParam::Neck => "body.neckLength",
            OffsetParam::Chest => "body.chestDistance",
            OffsetParam::Torso => "body.torsoLength",
            OffsetParam::Waist => "body.waistDistance",
            OffsetParam::HipOffset => "body.hipOffset",
            OffsetParam::HipsWidth => "body.hipsWidth",
            OffsetParam::LegsLength => "body.legsLength",
            OffsetParam::KneeHeight => "body.kneeHeight",
            OffsetParam::FootLength => "body.footLength",
            OffsetParam::FootShift => "body.footShift",
            OffsetParam::SkeletonOffset => "body.skeletonOffset",
            OffsetParam::ControllerDistanceZ => "body.controllerDistanceZ",
            OffsetParam::ControllerDistanceY => "body.controllerDistanceY",
            OffsetParam::LowerArmLength => "body.lowerArmLength",
            OffsetParam::ElbowOffset => "body.elbowOffset",
            OffsetParam::UpperArmLength => "body.upperArmLength",
            OffsetParam::ShouldersDistance => "body.shouldersDistance",
            OffsetParam::ShouldersWidth => "body.shouldersWidth",
        }
    }

    pub fn default_value(self) -> f32 {
        match self {
            OffsetParam::Head => 0.1,
            OffsetParam::Neck => 0.1,
            OffsetParam::Chest => 0.32,
            OffsetParam::Torso => 0.64,
            OffsetParam::Waist => 0.05,
            OffsetParam::HipOffset => 0.0,
            OffsetParam::HipsWidth => 0.26,
            OffsetParam::LegsLength => 0.86,
            OffsetParam::KneeHeight => 0.43,
            OffsetParam::FootLength => 0.05,
            OffsetParam::FootShift => -0.05,
            OffsetParam::SkeletonOffset => 0.0,
            OffsetParam::ControllerDistanceZ => 0.15,
            OffsetParam::ControllerDistanceY => 0.05,
            OffsetParam::LowerArmLength => 0.26,
            OffsetParam::ElbowOffset => 0.0,
            OffsetParam::UpperArmLength => 0.26,
            OffsetParam::ShouldersDistance => 0.08,
            OffsetParam::ShouldersWidth => 0.36,
        }
    }

    /// Nodes whose offset must be recomputed when this parameter changes.
    pub fn affected_nodes(self) -> &'static [BoneNode] {
        use BoneNode as B;
        match self {
            OffsetParam::Head => &[B::Head],
            OffsetParam::Neck => &[B::Neck],
            OffsetParam::Chest => &[B::Chest, B::Waist],
            OffsetParam::Torso => &[B::Waist],
            OffsetParam::Waist => &[B::Waist, B::Hip],
            OffsetParam::HipOffset => &[B::HipTracker],
            OffsetParam::HipsWidth => &[B::LeftHip, B::RightHip],
            OffsetParam::LegsLength => &[B::LeftUpperLeg, B::RightUpperLeg],
            OffsetParam::KneeHeight => {
                &[B::LeftUpperLeg, B::RightUpperLeg, B::LeftLowerLeg, B::RightLowerLeg]
            }
            OffsetParam::FootLength => &[B::LeftFoot, B::RightFoot],
            OffsetParam::FootShift => &[B::LeftLowerLeg, B::RightLowerLeg],
            OffsetParam::SkeletonOffset => &[
                B::ChestTracker,
                B::HipTracker,
                B::LeftKneeTracker,
                B::RightKneeTracker,
                B::LeftFootTracker,
                B::RightFootTracker,
            ],
            OffsetParam::ControllerDistanceZ | OffsetParam::ControllerDistanceY => {
                &[B::LeftController, B::RightController, B::LeftHand, B::RightHand]
            }
            OffsetParam::LowerArmLength => &[B::LeftLowerArm, B::RightLowerArm],
            OffsetParam::ElbowOffset => &[B::LeftElbowTracker, B::RightElbowTracker],
            OffsetParam::UpperArmLength => &[B::LeftUpperArm, B::RightUpperArm],
            OffsetParam::ShouldersDistance | OffsetParam::ShouldersWidth => {
                &[B::LeftShoulder, B::RightShoulder]
            }
        }
    }

    pub fn from_key(key: &str) -> Option<OffsetParam> {
        lookup(&Self::ALL, key, |p| (p.key(), p.name()))
    }
}

/// Skeleton model feature switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToggleParam {
    ExtendedSpineModel,
    ExtendedPelvisModel,
    ExtendedKneeModel,
    ForceArmsFromHmd,
    FloorClip,
    SkatingCorrection,
}

impl ToggleParam {
    pub const ALL: [ToggleParam; 6] = [
        ToggleParam::ExtendedSpineModel,
        ToggleParam::ExtendedPelvisModel,
        ToggleParam::ExtendedKneeModel,
        ToggleParam::ForceArmsFromHmd,
        ToggleParam::FloorClip,
        ToggleParam::SkatingCorrection,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToggleParam::ExtendedSpineModel => "Extended spine model",
            ToggleParam::ExtendedPelvisModel => "Extended pelvis model",
            ToggleParam::ExtendedKneeModel => "Extended knee model",
            ToggleParam::ForceArmsFromHmd => "Force arms from HMD",
            ToggleParam::FloorClip => "Floor clip",
            ToggleParam::SkatingCorrection => "Skating correction",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ToggleParam::ExtendedSpineModel => "body.model.extendedSpine",
            ToggleParam::ExtendedPelvisModel => "body.model.extendedPelvis",
            ToggleParam::ExtendedKneeModel => "body.model.extendedKnee",
            ToggleParam::ForceArmsFromHmd => "body.model.forceArmsFromHMD",
            ToggleParam::FloorClip => "body.model.floorClip",
            ToggleParam::SkatingCorrection => "body.model.skatingCorrection",
        }
    }

    pub fn default_value(self) -> bool {
        match self {
            ToggleParam::ExtendedSpineModel
            | ToggleParam::ExtendedPelvisModel
            | ToggleParam::ExtendedKneeModel => true,
            ToggleParam::ForceArmsFromHmd | ToggleParam::FloorClip | ToggleParam::SkatingCorrection => false,
        }
    }

    pub fn from_key(key: &str) -> Option<ToggleParam> {
        lookup(&Self::ALL, key, |p| (p.key(), p.name()))
    }
}

/// Auxiliary scalars consumed by the skeleton model but not by node offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueParam {
    WaistFromChestHipAveraging,
    WaistFromChestLegsAveraging,
    HipFromChestLegsAveraging,
    HipFromWaistLegsAveraging,
    HipLegsAveraging,
    KneeTrackerAnkleAveraging,
    LegTweaksCorrectionStrength,
}

impl ValueParam {
    pub const ALL: [ValueParam; 7] = [
        ValueParam::WaistFromChestHipAveraging,
        ValueParam::WaistFromChestLegsAveraging,
        ValueParam::HipFromChestLegsAveraging,
        ValueParam::HipFromWaistLegsAveraging,
        ValueParam::HipLegsAveraging,
        ValueParam::KneeTrackerAnkleAveraging,
        ValueParam::LegTweaksCorrectionStrength,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ValueParam::WaistFromChestHipAveraging => "Waist from chest hip averaging",
            ValueParam::WaistFromChestLegsAveraging => "Waist from chest legs averaging",
            ValueParam::HipFromChestLegsAveraging => "Hip from chest legs averaging",
            ValueParam::HipFromWaistLegsAveraging => "Hip from waist legs averaging",
            ValueParam::HipLegsAveraging => "Hip legs averaging",
            ValueParam::KneeTrackerAnkleAveraging => "Knee tracker ankle averaging",
            ValueParam::LegTweaksCorrectionStrength => "Leg tweaks correction strength",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ValueParam::WaistFromChestHipAveraging => "body.model.waistFromChestHipAveraging",
            ValueParam::WaistFromChestLegsAveraging => "body.model.waistFromChestLegsAveraging",
            ValueParam::HipFromChestLegsAveraging => "body.model.hipFromChestLegsAveraging",
            ValueParam::HipFromWaistLegsAveraging => "body.model.hipFromWaistLegsAveraging",
            ValueParam::HipLegsAveraging => "body.model.hipLegsAveraging",
            ValueParam::KneeTrackerAnkleAveraging => "body.model.kneeTrackerAnkleAveraging",
            ValueParam::LegTweaksCorrectionStrength => "body.legTweaks.correctionStrength",
        }
    }

    pub fn default_value(self) -> f32 {
        match self {
            ValueParam::WaistFromChestHipAveraging => 0.30,
            ValueParam::WaistFromChestLegsAveraging => 0.20,
            ValueParam::HipFromChestLegsAveraging => 0.45,
            ValueParam::HipFromWaistLegsAveraging => 0.40,
            ValueParam::HipLegsAveraging => 0.25,
            ValueParam::KneeTrackerAnkleAveraging => 0.85,
            ValueParam::LegTweaksCorrectionStrength => 0.30,
        }
    }

    pub fn from_key(key: &str) -> Option<ValueParam> {
        lookup(&Self::ALL, key, |p| (p.key(), p.name()))
    }
}

// Persistence keys match exactly; display names match ignoring ASCII case.
fn lookup<T: Copy>(all: &[T], key: &str, ids: impl Fn(T) -> (&'static str, &'static str)) -> Option<T> {
    all.iter().copied().find(|&p| {
        let (k, name) = ids(p);
        k == key || name.eq_ignore_ascii_case(key)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique_across_families() {
        let mut seen = HashSet::new();
        let keys = OffsetParam::ALL.iter().map(|p| p.key())
            .chain(ToggleParam::ALL.iter().map(|p| p.key()))
            .chain(ValueParam::ALL.iter().map(|p| p.key()));
        for k in keys {
            assert!(seen.insert(k), "duplicate key {k}");
        }
    }

    #[test]
    fn affected_nodes_mirror_formula_dependencies() {
        for p in OffsetParam::ALL {
            let declared: HashSet<BoneNode> = p.affected_nodes().iter().copied().collect();
            let readers: HashSet<BoneNode> = BoneNode::ALL
                .into_iter()
                .filter(|b| b.dependencies().contains(&p))
                .collect();
            assert_eq!(declared, readers, "{p:?}");
        }
    }

    #[test]
    fn from_key_accepts_key_or_name() {
        assert_eq!(OffsetParam::from_key("body.hipsWidth"), Some(OffsetParam::HipsWidth));
        assert_eq!(OffsetParam::from_key("hips WIDTH"), Some(OffsetParam::HipsWidth));
        assert_eq!(OffsetParam::from_key("BODY.HIPSWIDTH"), None);
        assert_eq!(ToggleParam::from_key("Floor clip"), Some(ToggleParam::FloorClip));
        assert_eq!(ValueParam::from_key("body.legTweaks.correctionStrength"), Some(ValueParam::LegTweaksCorrectionStrength));
        assert_eq!(ValueParam::from_key("nope"), None);
    }

    #[test]
    fn upper_leg_default_is_consistent() {
        assert!(OffsetParam::LegsLength.default_value() > OffsetParam::KneeHeight.default_value());
    }
}
