//! A single regression tree, the unit of one ensemble member.

use serde::{Deserialize, Serialize};

/// A binary regression tree over a dense feature vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Split {
        feature_index: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        value: f64,
    },
}

impl TreeNode {
    /// Walk the tree for `features`, returning the leaf value and the
    /// feature indices visited along the path (for importance counting).
    pub fn evaluate(&self, features: &[f64]) -> (f64, Vec<usize>) {
        let mut node = self;
        let mut visited = Vec::new();
        loop {
            match node {
                TreeNode::Leaf { value } => return (*value, visited),
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    visited.push(*feature_index);
                    let value = features.get(*feature_index).copied().unwrap_or(0.0);
                    node = if value <= *threshold { left } else { right };
                }
            }
        }
    }
}

/// One ensemble member: a tree plus the weight it contributes with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub root: TreeNode,
    pub weight: f64,
}

impl RegressionTree {
    pub fn evaluate(&self, features: &[f64]) -> (f64, Vec<usize>) {
        let (value, visited) = self.root.evaluate(features);
        (value * self.weight, visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_tree() -> RegressionTree {
        RegressionTree {
            weight: 1.0,
            root: TreeNode::Split {
                feature_index: 0,
                threshold: 0.5,
                left: Box::new(TreeNode::Leaf { value: 0.2 }),
                right: Box::new(TreeNode::Leaf { value: 0.8 }),
            },
        }
    }

    #[test]
    fn evaluates_left_branch_when_below_threshold() {
        let tree = stub_tree();
        let (value, visited) = tree.evaluate(&[0.1]);
        assert_eq!(value, 0.2);
        assert_eq!(visited, vec![0]);
    }

    #[test]
    fn evaluates_right_branch_when_above_threshold() {
        let tree = stub_tree();
        let (value, _) = tree.evaluate(&[0.9]);
        assert_eq!(value, 0.8);
    }

    #[test]
    fn missing_feature_index_defaults_to_zero() {
        let tree = stub_tree();
        let (value, _) = tree.evaluate(&[]);
        assert_eq!(value, 0.2);
    }
}
