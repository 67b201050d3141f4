//! Regression tree grown with the squared-error criterion

use super::error::{MlError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;

/// Tree node
#[derive(Debug, Clone)]
pub enum TreeNode {
    /// Leaf holding the mean target of its samples
    Leaf { value: f64, n_samples: usize },
    /// Samples with `x[feature_idx] <= threshold` go left
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Decision tree regressor
#[derive(Debug, Clone)]
pub struct RegressionTree {
    root: Option<TreeNode>,
    /// Maximum number of splits on any root-to-leaf path
    pub max_depth: Option<usize>,
    /// A node with fewer samples than this becomes a leaf
    pub min_samples_split: usize,
    /// Every leaf keeps at least this many samples
    pub min_samples_leaf: usize,
    n_features: usize,
    feature_importances: Option<Array1<f64>>,
}

impl Default for RegressionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RegressionTree {
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            n_features: 0,
            feature_importances: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Fit the tree to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(MlError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(MlError::EmptyDataset);
        }

        self.n_features = n_features;

        let mut importances = vec![0.0; n_features];
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.build_node(x, y, &indices, 0, &mut importances));

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        Ok(self)
    }

    fn build_node(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        depth: usize,
        importances: &mut [f64],
    ) -> TreeNode {
        let n_samples = indices.len();
        let (sum, sq_sum) = indices.iter().fold((0.0, 0.0), |(s, sq), &i| {
            (s + y[i], sq + y[i] * y[i])
        });
        let value = sum / n_samples as f64;
        let impurity = variance(n_samples, sum, sq_sum);

        let should_stop = n_samples < self.min_samples_split
            || n_samples < 2 * self.min_samples_leaf
            || self.max_depth.is_some_and(|d| depth >= d)
            || is_pure(y, indices);

        if should_stop {
            return TreeNode::Leaf { value, n_samples };
        }

        let Some(split) = self.find_best_split(x, y, indices, impurity) else {
            return TreeNode::Leaf { value, n_samples };
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, split.feature_idx]] <= split.threshold);

        if left_indices.len() < self.min_samples_leaf || right_indices.len() < self.min_samples_leaf {
            return TreeNode::Leaf { value, n_samples };
        }

        importances[split.feature_idx] += n_samples as f64 * split.gain;

        let left = Box::new(self.build_node(x, y, &left_indices, depth + 1, importances));
        let right = Box::new(self.build_node(x, y, &right_indices, depth + 1, importances));

        TreeNode::Split {
            feature_idx: split.feature_idx,
            threshold: split.threshold,
            left,
            right,
            n_samples,
        }
    }

    /// Scan every feature for the threshold with the largest impurity decrease.
    ///
    /// Each feature is sorted once and scanned with running sums, so a node
    /// costs `O(n_features * n log n)`.
    fn find_best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        parent_impurity: f64,
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let (total_sum, total_sq_sum) = indices.iter().fold((0.0, 0.0), |(s, sq), &i| {
            (s + y[i], sq + y[i] * y[i])
        });

        let per_feature: Vec<Option<SplitCandidate>> = (0..x.ncols())
            .into_par_iter()
            .map(|feature_idx| {
                let mut order = indices.to_vec();
                order.sort_by(|&a, &b| x[[a, feature_idx]].total_cmp(&x[[b, feature_idx]]));

                let mut best: Option<SplitCandidate> = None;
                let mut left_sum = 0.0;
                let mut left_sq_sum = 0.0;

                for pos in 0..n - 1 {
                    let yi = y[order[pos]];
                    left_sum += yi;
                    left_sq_sum += yi * yi;

                    let current = x[[order[pos], feature_idx]];
                    let next = x[[order[pos + 1], feature_idx]];
                    if current == next {
                        continue;
                    }

                    let n_left = pos + 1;
                    let n_right = n - n_left;
                    if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                        continue;
                    }

                    let left_impurity = variance(n_left, left_sum, left_sq_sum);
                    let right_impurity =
                        variance(n_right, total_sum - left_sum, total_sq_sum - left_sq_sum);
                    let weighted = (n_left as f64 * left_impurity
                        + n_right as f64 * right_impurity)
                        / n as f64;
                    let gain = parent_impurity - weighted;

                    if gain > best.map_or(0.0, |b| b.gain) {
                        let mut threshold = (current + next) / 2.0;
                        // midpoint of adjacent floats can round up to `next`
                        if threshold >= next {
                            threshold = current;
                        }
                        best = Some(SplitCandidate { feature_idx, threshold, gain });
                    }
                }

                best
            })
            .collect();

        per_feature
            .into_iter()
            .flatten()
            .fold(None, |best: Option<SplitCandidate>, candidate| match best {
                Some(b) if b.gain >= candidate.gain => Some(b),
                _ => Some(candidate),
            })
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(MlError::ModelNotFitted)?;
        self.check_width(x.ncols())?;

        Ok(x.rows().into_iter().map(|row| predict_from(root, row)).collect())
    }

    pub fn predict_row(&self, row: ArrayView1<f64>) -> Result<f64> {
        let root = self.root.as_ref().ok_or(MlError::ModelNotFitted)?;
        self.check_width(row.len())?;
        Ok(predict_from(root, row))
    }

    fn check_width(&self, n_features: usize) -> Result<()> {
        if n_features != self.n_features {
            return Err(MlError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", n_features),
            });
        }
        Ok(())
    }

    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Number of split levels; a single-leaf tree has depth 0.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, node_depth)
    }

    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, count_leaves)
    }
}

fn variance(count: usize, sum: f64, sq_sum: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let n = count as f64;
    (sq_sum / n - (sum / n).powi(2)).max(0.0)
}

fn is_pure(y: &Array1<f64>, indices: &[usize]) -> bool {
    let first = y[indices[0]];
    indices.iter().all(|&i| (y[i] - first).abs() < 1e-10)
}

fn predict_from(mut node: &TreeNode, row: ArrayView1<f64>) -> f64 {
    loop {
        match node {
            TreeNode::Leaf { value, .. } => return *value,
            TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                node = if row[*feature_idx] <= *threshold { left } else { right };
            }
        }
    }
}

fn node_depth(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf { .. } => 0,
        TreeNode::Split { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
    }
}

fn count_leaves(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf { .. } => 1,
        TreeNode::Split { left, right, .. } => count_leaves(left) + count_leaves(right),
    }
}
