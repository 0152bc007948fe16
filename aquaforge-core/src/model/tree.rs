//! Regression trees stored as flat node arrays.

use crate::error::ArtifactLoadError;
use aquaforge_schemas::model::TreeSpec;

#[derive(Debug, Clone)]
struct Node {
    feature: i32,
    threshold: f64,
    left: usize,
    right: usize,
    value: f64,
}

/// A fitted regression tree predicting one scalar per sample.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Builds a tree from its parallel arrays.
    ///
    /// # Errors
    ///
    /// Returns `InvalidModel` if the arrays disagree in length, a split refers
    /// to a feature at or beyond `n_features`, or a child index does not point
    /// strictly forward. Forward-only children guarantee every walk ends at a leaf.
    pub fn from_spec(spec: &TreeSpec, n_features: usize) -> Result<Self, ArtifactLoadError> {
        let n = spec.feature.len();
        if n == 0 {
            return Err(ArtifactLoadError::InvalidModel("empty tree".into()));
        }
        if spec.threshold.len() != n
            || spec.left.len() != n
            || spec.right.len() != n
            || spec.value.len() != n
        {
            return Err(ArtifactLoadError::InvalidModel(
                "inconsistent tree array lengths".into(),
            ));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let feature = spec.feature[i];
            let (left, right) = if feature < 0 {
                (0, 0)
            } else {
                if feature as usize >= n_features {
                    return Err(ArtifactLoadError::InvalidModel(format!(
                        "node {} splits on feature {} of {}",
                        i, feature, n_features
                    )));
                }
                let left = child_index(spec.left[i], i, n)?;
                let right = child_index(spec.right[i], i, n)?;
                (left, right)
            };
            nodes.push(Node {
                feature,
                threshold: spec.threshold[i],
                left,
                right,
                value: spec.value[i],
            });
        }
        Ok(Self { nodes })
    }

    /// Walks from the root to a leaf and returns its value.
    ///
    /// `features` must hold at least as many columns as the tree was validated against.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if node.feature < 0 {
                return node.value;
            }
            idx = if features[node.feature as usize] <= node.threshold {
                node.left
            } else {
                node.right
            };
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }
}

fn child_index(child: i32, parent: usize, n: usize) -> Result<usize, ArtifactLoadError> {
    if child <= parent as i32 || child as usize >= n {
        return Err(ArtifactLoadError::InvalidModel(format!(
            "node {} has out of order child {}",
            parent, child
        )));
    }
    Ok(child as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    // f[0] <= 0.5 → -1.0, else → 1.0
    fn stump(feature: i32, low: f64, high: f64) -> TreeSpec {
        TreeSpec {
            feature: vec![feature, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            left: vec![1, -1, -1],
            right: vec![2, -1, -1],
            value: vec![0.0, low, high],
        }
    }

    #[test]
    fn stump_splits_on_threshold() {
        let tree = RegressionTree::from_spec(&stump(0, -1.0, 1.0), 1).unwrap();
        assert_eq!(tree.predict(&[0.3]), -1.0);
        assert_eq!(tree.predict(&[0.5]), -1.0);
        assert_eq!(tree.predict(&[0.7]), 1.0);
        assert_eq!(tree.n_nodes(), 3);
    }

    #[test]
    fn single_leaf_tree() {
        let spec = TreeSpec {
            feature: vec![-2],
            threshold: vec![-2.0],
            left: vec![-1],
            right: vec![-1],
            value: vec![4.5],
        };
        let tree = RegressionTree::from_spec(&spec, 6).unwrap();
        assert_eq!(tree.predict(&[0.0; 6]), 4.5);
    }

    #[test]
    fn rejects_inconsistent_arrays() {
        let mut spec = stump(0, -1.0, 1.0);
        spec.value.pop();
        assert!(RegressionTree::from_spec(&spec, 1).is_err());
    }

    #[test]
    fn rejects_backward_children() {
        let mut spec = stump(0, -1.0, 1.0);
        spec.left[0] = 0;
        assert!(RegressionTree::from_spec(&spec, 1).is_err());
    }

    #[test]
    fn rejects_unknown_split_feature() {
        assert!(RegressionTree::from_spec(&stump(3, -1.0, 1.0), 2).is_err());
    }
}
