use serde::{Deserialize, Serialize};

use store::ObjectRecord;

use super::node::{NodeInfo, TreeNode};

/// The presentation tree for one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub root: TreeNode,
}

impl Tree {
    /// Create a tree with a bare directory root.
    pub fn new(root_id: impl Into<String>) -> Self {
        let mut root = TreeNode::new(root_id);
        root.is_dir = true;
        Self { root }
    }

    /// Build the tree for a flat listing.
    ///
    /// Each record key is split on `/` and walked from the root:
    /// intermediate segments become directory nodes, and the final segment
    /// becomes a leaf (a directory when the record is a zero-byte marker, a
    /// file otherwise). A directory created as an intermediate picks up its
    /// info later if its own marker record shows up.
    pub fn build(root_id: &str, records: &[ObjectRecord]) -> Self {
        let mut tree = Self::new(root_id);
        for record in records {
            tree.insert_record(record);
        }
        tree
    }

    fn insert_record(&mut self, record: &ObjectRecord) {
        let segments: Vec<&str> = record.key.split('/').filter(|s| !s.is_empty()).collect();
        let count = segments.len();
        let mut parent_id = self.root.id.clone();

        for (depth, segment) in segments.into_iter().enumerate() {
            let id = format!("{}/{}", parent_id, segment);
            let last = depth + 1 == count;

            match find_node_mut(&mut self.root, &id) {
                Some(node) => {
                    // First seen as an intermediate; its own record fills
                    // the info in
                    if last && node.info.is_none() {
                        node.info = Some(NodeInfo::new(record.size, record.modified_at));
                    }
                }
                None => {
                    let mut node = TreeNode::new(id.clone());
                    if last {
                        node.is_dir = record.size == 0;
                        node.info = Some(NodeInfo::new(record.size, record.modified_at));
                    } else {
                        node.is_dir = true;
                    }
                    self.insert(&parent_id, node);
                }
            }

            parent_id = id;
        }
    }

    /// Lazy pre-order traversal. Restartable by calling again.
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            stack: vec![&self.root],
        }
    }

    /// Lazy post-order traversal. Restartable by calling again.
    pub fn post_order(&self) -> PostOrder<'_> {
        PostOrder {
            stack: vec![(&self.root, 0)],
        }
    }

    /// Find a node by id, in pre-order.
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.pre_order().find(|node| node.id == id)
    }

    /// Append `node` under the parent with the given id.
    ///
    /// Returns `false` without inserting when the parent id is absent,
    /// which is a listing race rather than an error.
    pub fn insert(&mut self, parent_id: &str, mut node: TreeNode) -> bool {
        match find_node_mut(&mut self.root, parent_id) {
            Some(parent) => {
                node.parent_id = Some(parent.id.clone());
                parent.children.push(node);
                true
            }
            None => false,
        }
    }

    /// Remove the node with the given id, along with its subtree.
    ///
    /// Returns `false` when no such node exists.
    pub fn remove(&mut self, id: &str) -> bool {
        remove_from(&mut self.root, id)
    }
}

fn find_node_mut<'a>(node: &'a mut TreeNode, id: &str) -> Option<&'a mut TreeNode> {
    if node.id == id {
        return Some(node);
    }
    node.children
        .iter_mut()
        .find_map(|child| find_node_mut(child, id))
}

fn remove_from(node: &mut TreeNode, id: &str) -> bool {
    let before = node.children.len();
    node.children.retain(|child| child.id != id);
    if node.children.len() != before {
        return true;
    }
    node.children.iter_mut().any(|child| remove_from(child, id))
}

/// Pre-order iterator over a [`Tree`].
pub struct PreOrder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Post-order iterator over a [`Tree`].
pub struct PostOrder<'a> {
    stack: Vec<(&'a TreeNode, usize)>,
}

impl<'a> Iterator for PostOrder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, child)) = self.stack.last().copied() {
            if child < node.children.len() {
                if let Some(top) = self.stack.last_mut() {
                    top.1 += 1;
                }
                self.stack.push((&node.children[child], 0));
            } else {
                self.stack.pop();
                return Some(node);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(key: &str, size: u64) -> ObjectRecord {
        ObjectRecord {
            key: key.to_string(),
            size,
            modified_at: Utc::now(),
        }
    }

    fn ids<'a>(iter: impl Iterator<Item = &'a TreeNode>) -> Vec<&'a str> {
        iter.map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_build_shapes_directories_and_files() {
        let records = vec![record("a", 0), record("a/b", 12), record("a/c/d", 34)];

        let tree = Tree::build("bucket", &records);

        let a = tree.find("bucket/a").unwrap();
        assert!(a.is_dir);
        assert_eq!(a.children.len(), 2);
        assert!(a.info.is_some());

        let b = tree.find("bucket/a/b").unwrap();
        assert!(!b.is_dir);
        assert!(b.is_leaf());
        assert_eq!(b.info.as_ref().unwrap().bytes, 12);

        let c = tree.find("bucket/a/c").unwrap();
        assert!(c.is_dir);
        assert!(c.info.is_none());

        let d = tree.find("bucket/a/c/d").unwrap();
        assert!(!d.is_dir);
        assert_eq!(d.parent_id.as_deref(), Some("bucket/a/c"));
    }

    #[test]
    fn test_build_marker_fills_info_after_children() {
        // The marker record arrives after a child already created the
        // directory node
        let records = vec![record("dir/file.txt", 9), record("dir", 0)];

        let tree = Tree::build("bucket", &records);

        let dir = tree.find("bucket/dir").unwrap();
        assert!(dir.is_dir);
        assert_eq!(dir.info.as_ref().unwrap().bytes, 0);
        assert_eq!(dir.children.len(), 1);
    }

    #[test]
    fn test_pre_order_traversal() {
        let records = vec![record("a/b", 1), record("a/c", 2), record("x", 3)];
        let tree = Tree::build("r", &records);

        assert_eq!(
            ids(tree.pre_order()),
            vec!["r", "r/a", "r/a/b", "r/a/c", "r/x"]
        );
        // Restartable
        assert_eq!(tree.pre_order().count(), 5);
    }

    #[test]
    fn test_post_order_traversal() {
        let records = vec![record("a/b", 1), record("a/c", 2), record("x", 3)];
        let tree = Tree::build("r", &records);

        assert_eq!(
            ids(tree.post_order()),
            vec!["r/a/b", "r/a/c", "r/a", "r/x", "r"]
        );
    }

    #[test]
    fn test_insert_missing_parent_is_signalled() {
        let mut tree = Tree::new("r");

        assert!(!tree.insert("r/ghost", TreeNode::new("r/ghost/child")));
        assert!(tree.insert("r", TreeNode::new("r/real")));
        assert!(tree.insert("r/real", TreeNode::new("r/real/child")));
        assert_eq!(tree.pre_order().count(), 3);
    }

    #[test]
    fn test_remove_by_id() {
        let records = vec![record("a/b", 1), record("a/c", 2)];
        let mut tree = Tree::build("r", &records);

        assert!(tree.remove("r/a/b"));
        assert!(tree.find("r/a/b").is_none());
        assert!(tree.find("r/a/c").is_some());

        // Removing a subtree removes its descendants too
        assert!(tree.remove("r/a"));
        assert!(tree.find("r/a/c").is_none());

        // Absent id is signalled, not an error
        assert!(!tree.remove("r/a"));
    }
}
