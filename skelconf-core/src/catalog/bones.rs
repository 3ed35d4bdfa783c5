use serde::{Deserialize, Serialize};

use super::params::OffsetParam;

/// Which half of the body a node sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Center,
    Left,
    Right,
}

/// Every joint and tracker anchor of the fixed body hierarchy.
///
/// The discriminant doubles as the index into [`crate::rig::NodeOffsets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoneNode {
    Head,
    Neck,
    Chest,
    ChestTracker,
    Waist,
    Hip,
    HipTracker,
    LeftHip,
    RightHip,
    LeftUpperLeg,
    RightUpperLeg,
    LeftKneeTracker,
    RightKneeTracker,
    LeftLowerLeg,
    RightLowerLeg,
    LeftFoot,
    RightFoot,
    LeftFootTracker,
    RightFootTracker,
    LeftController,
    RightController,
    LeftHand,
    RightHand,
    LeftLowerArm,
    RightLowerArm,
    LeftElbowTracker,
    RightElbowTracker,
    LeftUpperArm,
    RightUpperArm,
    LeftShoulder,
    RightShoulder,
}

impl BoneNode {
    pub const COUNT: usize = 31;

    pub const ALL: [BoneNode; Self::COUNT] = [
        BoneNode::Head,
        BoneNode::Neck,
        BoneNode::Chest,
        BoneNode::ChestTracker,
        BoneNode::Waist,
        BoneNode::Hip,
        BoneNode::HipTracker,
        BoneNode::LeftHip,
        BoneNode::RightHip,
        BoneNode::LeftUpperLeg,
        BoneNode::RightUpperLeg,
        BoneNode::LeftKneeTracker,
        BoneNode::RightKneeTracker,
        BoneNode::LeftLowerLeg,
        BoneNode::RightLowerLeg,
        BoneNode::LeftFoot,
        BoneNode::RightFoot,
        BoneNode::LeftFootTracker,
        BoneNode::RightFootTracker,
        BoneNode::LeftController,
        BoneNode::RightController,
        BoneNode::LeftHand,
        BoneNode::RightHand,
        BoneNode::LeftLowerArm,
        BoneNode::RightLowerArm,
        BoneNode::LeftElbowTracker,
        BoneNode::RightElbowTracker,
        BoneNode::LeftUpperArm,
        BoneNode::RightUpperArm,
        BoneNode::LeftShoulder,
        BoneNode::RightShoulder,
    ];

    #[inline]
    pub fn index(self) -> usize { self as usize }

    pub fn name(self) -> &'static str {
        match self {
            BoneNode::Head => "head",
            BoneNode::Neck => "neck",
            BoneNode::Chest => "chest",
            BoneNode::ChestTracker => "chest_tracker",
            BoneNode::Waist => "waist",
            BoneNode::Hip => "hip",
            BoneNode::HipTracker => "hip_tracker",
            BoneNode::LeftHip => "left_hip",
            BoneNode::RightHip => "right_hip",
            BoneNode::LeftUpperLeg => "left_upper_leg",
            BoneNode::RightUpperLeg => "right_upper_leg",
            BoneNode::LeftKneeTracker => "left_knee_tracker",
            BoneNode::RightKneeTracker => "right_knee_tracker",
            BoneNode::LeftLowerLeg => "left_lower_leg",
            BoneNode::RightLowerLeg => "right_lower_leg",
            BoneNode::LeftFoot => "left_foot",
            BoneNode::RightFoot => "right_foot",
            BoneNode::LeftFootTracker => "left_foot_tracker",
            BoneNode::RightFootTracker => "right_foot_tracker",
            BoneNode::LeftController => "left_controller",
            BoneNode::RightController => "right_controller",
            BoneNode::LeftHand => "left_hand",
            BoneNode::RightHand => "right_hand",
            BoneNode::LeftLowerArm => "left_lower_arm",
            BoneNode::RightLowerArm => "right_lower_arm",
            BoneNode::LeftElbowTracker => "left_elbow_tracker",
            BoneNode::RightElbowTracker => "right_elbow_tracker",
            BoneNode::LeftUpperArm => "left_upper_arm",
            BoneNode::RightUpperArm => "right_upper_arm",
            BoneNode::LeftShoulder => "left_shoulder",
            BoneNode::RightShoulder => "right_shoulder",
        }
    }

    pub fn side(self) -> Side {
        use BoneNode::*;
        match self {
            LeftHip | LeftUpperLeg | LeftKneeTracker | LeftLowerLeg | LeftFoot | LeftFootTracker
            | LeftController | LeftHand | LeftLowerArm | LeftElbowTracker | LeftUpperArm
            | LeftShoulder => Side::Left,
            RightHip | RightUpperLeg | RightKneeTracker | RightLowerLeg | RightFoot
            | RightFootTracker | RightController | RightHand | RightLowerArm | RightElbowTracker
            | RightUpperArm | RightShoulder => Side::Right,
            Head | Neck | Chest | ChestTracker | Waist | Hip | HipTracker => Side::Center,
        }
    }

    /// Parent in the tracking hierarchy, `None` for the root (head).
    ///
    /// Arms hang off the controllers when driven from hand-held devices, so the
    /// arm chain runs controller -> hand -> lower arm -> upper arm -> shoulder.
    pub fn parent(self) -> Option<BoneNode> {
        use BoneNode::*;
        let p = match self {
            Head => return None,
            Neck => Head,
            Chest => Neck,
            ChestTracker => Chest,
            Waist => Chest,
            Hip => Waist,
            HipTracker => Hip,
            LeftHip | RightHip => Hip,
            LeftUpperLeg => LeftHip,
            RightUpperLeg => RightHip,
            LeftKneeTracker => LeftUpperLeg,
            RightKneeTracker => RightUpperLeg,
            LeftLowerLeg => LeftUpperLeg,
            RightLowerLeg => RightUpperLeg,
            LeftFoot => LeftLowerLeg,
            RightFoot => RightLowerLeg,
            LeftFootTracker => LeftFoot,
            RightFootTracker => RightFoot,
            LeftController | RightController => Head,
            LeftHand => LeftController,
            RightHand => RightController,
            LeftLowerArm => LeftHand,
            RightLowerArm => RightHand,
            LeftElbowTracker => LeftLowerArm,
            RightElbowTracker => RightLowerArm,
            LeftUpperArm => LeftLowerArm,
            RightUpperArm => RightLowerArm,
            LeftShoulder => LeftUpperArm,
            RightShoulder => RightUpperArm,
        };
        Some(p)
    }

    /// Offset parameters read by this node's formula.
    pub fn dependencies(self) -> &'static [OffsetParam] {
        use BoneNode::*;
        use OffsetParam as P;
        match self {
            Head => &[P::Head],
            Neck => &[P::Neck],
            Chest => &[P::Chest],
            Waist => &[P::Chest, P::Torso, P::Waist],
            Hip => &[P::Waist],
            HipTracker => &[P::HipOffset, P::SkeletonOffset],
            LeftHip | RightHip => &[P::HipsWidth],
            LeftUpperLeg | RightUpperLeg => &[P::LegsLength, P::KneeHeight],
            LeftLowerLeg | RightLowerLeg => &[P::KneeHeight, P::FootShift],
            LeftFoot | RightFoot => &[P::FootLength],
            ChestTracker | LeftKneeTracker | RightKneeTracker | LeftFootTracker
            | RightFootTracker => &[P::SkeletonOffset],
            LeftController | RightController | LeftHand | RightHand => {
                &[P::ControllerDistanceZ, P::ControllerDistanceY]
            }
            LeftLowerArm | RightLowerArm => &[P::LowerArmLength],
            LeftElbowTracker | RightElbowTracker => &[P::ElbowOffset],
            LeftUpperArm | RightUpperArm => &[P::UpperArmLength],
            LeftShoulder | RightShoulder => &[P::ShouldersDistance, P::ShouldersWidth],
        }
    }

    pub fn from_name(name: &str) -> Option<BoneNode> {
        BoneNode::ALL.iter().copied().find(|b| b.name().eq_ignore_ascii_case(name))
    }

    pub fn children(self) -> impl Iterator<Item = BoneNode> {
        BoneNode::ALL.into_iter().filter(move |b| b.parent() == Some(self))
    }
}

impl std::fmt::Display for BoneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.name()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_discriminant_order() {
        for (i, b) in BoneNode::ALL.iter().enumerate() {
            assert_eq!(b.index(), i, "{b} out of place");
        }
    }

    #[test]
    fn hierarchy_is_rooted_at_head() {
        for b in BoneNode::ALL {
            let mut cur = b;
            let mut hops = 0;
            while let Some(p) = cur.parent() {
                cur = p;
                hops += 1;
                assert!(hops <= BoneNode::COUNT, "cycle through {b}");
            }
            assert_eq!(cur, BoneNode::Head);
        }
    }

    #[test]
    fn mirrored_nodes_share_sides() {
        assert_eq!(BoneNode::LeftFoot.side(), Side::Left);
        assert_eq!(BoneNode::RightShoulder.side(), Side::Right);
        assert_eq!(BoneNode::HipTracker.side(), Side::Center);
        assert_eq!(BoneNode::from_name("LEFT_HAND"), Some(BoneNode::LeftHand));
        assert_eq!(BoneNode::from_name("tail"), None);
    }
}
