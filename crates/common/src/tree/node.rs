use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Size and age details attached to a node once its own record is seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub bytes: u64,
    /// Size scaled to mebibytes, rounded to two decimals for display.
    pub mb: f64,
    pub created_at: DateTime<Utc>,
}

impl NodeInfo {
    pub fn new(bytes: u64, created_at: DateTime<Utc>) -> Self {
        let mb = (bytes as f64 / BYTES_PER_MB * 100.0).round() / 100.0;
        Self {
            bytes,
            mb,
            created_at,
        }
    }
}

/// One node of the presentation tree.
///
/// Every node is exclusively owned by its parent's `children` vector; the
/// root is owned by the [`Tree`](super::Tree).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub is_dir: bool,
    pub children: Vec<TreeNode>,
    pub info: Option<NodeInfo>,
}

impl TreeNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            is_dir: false,
            children: Vec::new(),
            info: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn has_children(&self) -> bool {
        !self.is_leaf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_predicates() {
        let mut node = TreeNode::new("root");
        assert!(node.is_leaf());
        assert!(!node.has_children());

        node.children.push(TreeNode::new("root/child"));
        assert!(!node.is_leaf());
        assert!(node.has_children());
    }

    #[test]
    fn test_info_mb_rounding() {
        let info = NodeInfo::new(1_572_864, Utc::now()); // 1.5 MiB exactly
        assert_eq!(info.mb, 1.5);

        let info = NodeInfo::new(1_234_567, Utc::now());
        assert_eq!(info.mb, 1.18);

        let info = NodeInfo::new(0, Utc::now());
        assert_eq!(info.mb, 0.0);
    }

    #[test]
    fn test_node_serialization_roundtrip() {
        let mut node = TreeNode::new("bucket/docs");
        node.is_dir = true;
        node.info = Some(NodeInfo::new(42, Utc::now()));

        let encoded = serde_json::to_string(&node).unwrap();
        let decoded: TreeNode = serde_json::from_str(&encoded).unwrap();

        assert_eq!(node, decoded);
    }
}
