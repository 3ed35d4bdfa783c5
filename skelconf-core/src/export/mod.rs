//! Export of computed node offsets for consumers outside this crate
//! (renderers, debugging overlays).

use serde::Serialize;

use crate::catalog::BoneNode;
use crate::rig::{NodeOffsets, SkeletonConfig};

#[derive(Debug, Clone, Serialize)]
pub struct NodeExport {
    pub node: BoneNode,
    pub parent: Option<BoneNode>,
    pub offset: [f32; 3],
    pub position: [f32; 3],
}

#[derive(Debug, Clone, Serialize)]
pub struct SkeletonExport {
    pub version: &'static str,
    pub nodes: Vec<NodeExport>,
}

impl SkeletonExport {
    pub fn from_offsets(offsets: &NodeOffsets) -> Self {
        let nodes = offsets
            .iter()
            .map(|(node, offset)| NodeExport {
                node,
                parent: node.parent(),
                offset: offset.to_array(),
                position: offsets.world_position(node).to_array(),
            })
            .collect();
        Self { version: crate::VERSION, nodes }
    }

    pub fn from_config(cfg: &SkeletonConfig) -> Self { Self::from_offsets(&cfg.node_offsets()) }

    pub fn to_json(&self) -> serde_json::Result<String> { serde_json::to_string_pretty(self) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OffsetParam;

    #[test]
    fn export_lists_every_node_with_parent() {
        let mut cfg = SkeletonConfig::new(true);
        cfg.set_offset_auto(OffsetParam::HipsWidth, Some(0.3));
        let export = SkeletonExport::from_config(&cfg);
        assert_eq!(export.nodes.len(), BoneNode::COUNT);
        let left_hip = export.nodes.iter().find(|n| n.node == BoneNode::LeftHip).unwrap();
        assert_eq!(left_hip.parent, Some(BoneNode::Hip));
        assert_eq!(left_hip.offset, [-0.15, 0.0, 0.0]);

        let json: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(json["nodes"][0]["node"], "head");
        assert!(json["nodes"][0]["parent"].is_null());
    }
}
