//! Node offset formulas.
//!
//! Every node offset is a translation relative to the node's parent, computed
//! only from the effective proportion parameters the node depends on. Mirrored
//! nodes share magnitudes and flip sign on the lateral (x) axis.

use glam::Vec3;

use crate::catalog::{BoneNode, OffsetParam};

/// Offset of a single node, reading effective parameter values through `param`.
pub fn compute_node_offset<F>(bone: BoneNode, param: F) -> Vec3
where
    F: Fn(OffsetParam) -> f32,
{
    use BoneNode::*;
    use OffsetParam as P;
    match bone {
        Head => Vec3::new(0.0, 0.0, param(P::Head)),
        Neck => Vec3::new(0.0, -param(P::Neck), 0.0),
        Chest => Vec3::new(0.0, -param(P::Chest), 0.0),
        Waist => Vec3::new(0.0, param(P::Chest) - param(P::Torso) + param(P::Waist), 0.0),
        Hip => Vec3::new(0.0, -param(P::Waist), 0.0),
        HipTracker => Vec3::new(0.0, param(P::HipOffset), -param(P::SkeletonOffset)),
        LeftHip => Vec3::new(-param(P::HipsWidth) / 2.0, 0.0, 0.0),
        RightHip => Vec3::new(param(P::HipsWidth) / 2.0, 0.0, 0.0),
        LeftUpperLeg | RightUpperLeg => {
            Vec3::new(0.0, -(param(P::LegsLength) - param(P::KneeHeight)), 0.0)
        }
        LeftLowerLeg | RightLowerLeg => {
            Vec3::new(0.0, -param(P::KneeHeight), -param(P::FootShift))
        }
        LeftFoot | RightFoot => Vec3::new(0.0, 0.0, -param(P::FootLength)),
        ChestTracker | LeftKneeTracker | RightKneeTracker | LeftFootTracker | RightFootTracker => {
            Vec3::new(0.0, 0.0, -param(P::SkeletonOffset))
        }
        LeftController | RightController => {
            Vec3::new(0.0, param(P::ControllerDistanceY), param(P::ControllerDistanceZ))
        }
        LeftHand | RightHand => {
            Vec3::new(0.0, -param(P::ControllerDistanceY), -param(P::ControllerDistanceZ))
        }
        LeftLowerArm | RightLowerArm => Vec3::new(0.0, param(P::LowerArmLength), 0.0),
        LeftElbowTracker | RightElbowTracker => Vec3::new(0.0, param(P::ElbowOffset), 0.0),
        LeftUpperArm | RightUpperArm => Vec3::new(0.0, -param(P::UpperArmLength), 0.0),
        LeftShoulder => {
            Vec3::new(-param(P::ShouldersWidth) / 2.0, -param(P::ShouldersDistance), 0.0)
        }
        RightShoulder => {
            Vec3::new(param(P::ShouldersWidth) / 2.0, -param(P::ShouldersDistance), 0.0)
        }
    }
}

/// Evaluate every node from scratch.
pub fn compute_all<F>(param: F) -> NodeOffsets
where
    F: Fn(OffsetParam) -> f32,
{
    let mut out = NodeOffsets::default();
    for bone in BoneNode::ALL {
        out.set(bone, compute_node_offset(bone, &param));
    }
    out
}

/// Snapshot of node offsets, indexed by [`BoneNode`] discriminant.
///
/// Nodes that were never computed read as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeOffsets {
    offsets: [Vec3; BoneNode::COUNT],
}

impl Default for NodeOffsets {
    fn default() -> Self { Self { offsets: [Vec3::ZERO; BoneNode::COUNT] } }
}

impl NodeOffsets {
    #[inline]
    pub fn get(&self, bone: BoneNode) -> Vec3 { self.offsets[bone.index()] }

    #[inline]
    pub(crate) fn set(&mut self, bone: BoneNode, offset: Vec3) { self.offsets[bone.index()] = offset; }

    pub fn iter(&self) -> impl Iterator<Item = (BoneNode, Vec3)> + '_ {
        BoneNode::ALL.into_iter().map(move |b| (b, self.get(b)))
    }

    /// Nodes whose offset differs from `other`.
    pub fn differing_nodes(&self, other: &NodeOffsets) -> Vec<BoneNode> {
        BoneNode::ALL.into_iter().filter(|&b| self.get(b) != other.get(b)).collect()
    }

    /// Position of `bone` relative to the hierarchy root, accumulated along parents.
    pub fn world_position(&self, bone: BoneNode) -> Vec3 {
        let mut pos = self.get(bone);
        let mut cur = bone;
        while let Some(parent) = cur.parent() {
            pos += self.get(parent);
            cur = parent;
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with(overrides: &[(OffsetParam, f32)]) -> impl Fn(OffsetParam) -> f32 {
        let map: HashMap<OffsetParam, f32> = overrides.iter().copied().collect();
        move |p| map.get(&p).copied().unwrap_or_else(|| p.default_value())
    }

    #[test]
    fn hips_are_mirrored() {
        let p = with(&[(OffsetParam::HipsWidth, 30.0)]);
        assert_eq!(compute_node_offset(BoneNode::LeftHip, &p), Vec3::new(-15.0, 0.0, 0.0));
        assert_eq!(compute_node_offset(BoneNode::RightHip, &p), Vec3::new(15.0, 0.0, 0.0));
    }

    #[test]
    fn upper_leg_spans_hip_to_knee() {
        let p = with(&[(OffsetParam::LegsLength, 100.0), (OffsetParam::KneeHeight, 45.0)]);
        for b in [BoneNode::LeftUpperLeg, BoneNode::RightUpperLeg] {
            assert_eq!(compute_node_offset(b, &p), Vec3::new(0.0, -55.0, 0.0));
        }
    }

    #[test]
    fn trackers_push_back_by_skeleton_offset() {
        let p = with(&[(OffsetParam::SkeletonOffset, 8.0), (OffsetParam::HipOffset, 2.0)]);
        assert_eq!(compute_node_offset(BoneNode::ChestTracker, &p), Vec3::new(0.0, 0.0, -8.0));
        assert_eq!(compute_node_offset(BoneNode::LeftFootTracker, &p), Vec3::new(0.0, 0.0, -8.0));
        assert_eq!(compute_node_offset(BoneNode::HipTracker, &p), Vec3::new(0.0, 2.0, -8.0));
    }

    #[test]
    fn waist_combines_chest_torso_and_waist() {
        let p = with(&[
            (OffsetParam::Chest, 0.3),
            (OffsetParam::Torso, 0.6),
            (OffsetParam::Waist, 0.1),
        ]);
        let w = compute_node_offset(BoneNode::Waist, &p);
        assert!((w.y - (0.3 - 0.6 + 0.1)).abs() < 1e-6);
        assert_eq!((w.x, w.z), (0.0, 0.0));
    }

    #[test]
    fn controller_and_hand_cancel_out() {
        let p = with(&[]);
        let c = compute_node_offset(BoneNode::LeftController, &p);
        let h = compute_node_offset(BoneNode::LeftHand, &p);
        assert_eq!(c + h, Vec3::ZERO);
    }

    #[test]
    fn shoulders_are_mirrored() {
        let p = with(&[(OffsetParam::ShouldersWidth, 0.4), (OffsetParam::ShouldersDistance, 0.1)]);
        let l = compute_node_offset(BoneNode::LeftShoulder, &p);
        let r = compute_node_offset(BoneNode::RightShoulder, &p);
        assert_eq!(l, Vec3::new(-0.2, -0.1, 0.0));
        assert_eq!(r, Vec3::new(0.2, -0.1, 0.0));
    }

    #[test]
    fn node_reads_only_declared_dependencies() {
        // Perturb every parameter a node does not declare; its offset must not move.
        let base = with(&[]);
        for bone in BoneNode::ALL {
            let deps = bone.dependencies();
            let perturbed = |p: OffsetParam| {
                if deps.contains(&p) { p.default_value() } else { p.default_value() + 1.0 }
            };
            assert_eq!(compute_node_offset(bone, &base), compute_node_offset(bone, perturbed), "{bone}");
        }
    }

    #[test]
    fn compute_all_is_idempotent() {
        let p = with(&[(OffsetParam::Neck, 0.2)]);
        assert_eq!(compute_all(&p), compute_all(&p));
        assert_eq!(compute_all(&p).get(BoneNode::Neck), Vec3::new(0.0, -0.2, 0.0));
    }

    #[test]
    fn world_position_accumulates_parents() {
        let offsets = compute_all(with(&[]));
        let expected = offsets.get(BoneNode::Head) + offsets.get(BoneNode::Neck);
        assert_eq!(offsets.world_position(BoneNode::Neck), expected);
        assert_eq!(offsets.world_position(BoneNode::Head), offsets.get(BoneNode::Head));
    }
}
