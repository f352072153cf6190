//! Regression estimators evaluated on encoded rows.

use serde::{Deserialize, Serialize};

use lps_model::PipelineError;

use crate::bundle::MODEL_KEY;
use crate::error::{ArtifactError, Result};

/// Marker for "no child" in the flat tree arrays.
pub const TREE_LEAF: i64 = -1;

/// Linear regression: `intercept + coef · x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

/// One regression tree in flat array form.
///
/// Node `i` is a leaf when `children_left[i] == -1`; otherwise rows with
/// `x[feature[i]] <= threshold[i]` go left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

/// Averaging ensemble of regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub trees: Vec<RegressionTree>,
}

/// A fitted estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Linear(LinearModel),
    Forest(ForestModel),
}

impl Estimator {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Estimator::Linear(_) => "linear",
            Estimator::Forest(_) => "forest",
        }
    }

    pub(crate) fn predict_row(&self, x: &[f64]) -> std::result::Result<f64, PipelineError> {
        match self {
            Estimator::Linear(model) => {
                if x.len() != model.coef.len() {
                    return Err(PipelineError::ShapeMismatch {
                        expected: format!("{} encoded features", model.coef.len()),
                        found: x.len().to_string(),
                    });
                }
                let dot: f64 = model.coef.iter().zip(x).map(|(c, v)| c * v).sum();
                Ok(model.intercept + dot)
            }
            Estimator::Forest(model) => {
                if model.trees.is_empty() {
                    return Err(PipelineError::EmptyOutput);
                }
                let mut total = 0.0;
                for tree in &model.trees {
                    total += tree.predict_row(x)?;
                }
                Ok(total / model.trees.len() as f64)
            }
        }
    }

    pub(crate) fn check(&self, width: usize) -> Result<()> {
        match self {
            Estimator::Linear(model) => {
                if model.coef.len() != width {
                    return Err(ArtifactError::invalid(
                        MODEL_KEY,
                        format!(
                            "linear estimator has {} coefficients for {width} encoded features",
                            model.coef.len()
                        ),
                    ));
                }
                if !model.intercept.is_finite() || model.coef.iter().any(|c| !c.is_finite()) {
                    return Err(ArtifactError::invalid(
                        MODEL_KEY,
                        "linear estimator has non-finite parameters",
                    ));
                }
                Ok(())
            }
            Estimator::Forest(model) => {
                if model.trees.is_empty() {
                    return Err(ArtifactError::invalid(MODEL_KEY, "forest has no trees"));
                }
                for (idx, tree) in model.trees.iter().enumerate() {
                    tree.check(width).map_err(|message| {
                        ArtifactError::invalid(MODEL_KEY, format!("tree {idx}: {message}"))
                    })?;
                }
                Ok(())
            }
        }
    }
}

impl RegressionTree {
    fn predict_row(&self, x: &[f64]) -> std::result::Result<f64, PipelineError> {
        let mut node = 0usize;
        // Children always sit after their parent, so a walk visits each node at most once.
        for _ in 0..self.value.len() {
            let left = *self.children_left.get(node).ok_or_else(|| bad_node(node))?;
            if left == TREE_LEAF {
                return self.value.get(node).copied().ok_or_else(|| bad_node(node));
            }
            let right = *self.children_right.get(node).ok_or_else(|| bad_node(node))?;
            let feature = self
                .feature
                .get(node)
                .and_then(|f| usize::try_from(*f).ok())
                .ok_or_else(|| bad_node(node))?;
            let threshold = *self.threshold.get(node).ok_or_else(|| bad_node(node))?;
            let input = *x.get(feature).ok_or_else(|| PipelineError::ShapeMismatch {
                expected: format!("more than {feature} encoded features"),
                found: x.len().to_string(),
            })?;
            let next = if input <= threshold { left } else { right };
            node = usize::try_from(next).map_err(|_| bad_node(node))?;
        }
        Err(bad_node(node))
    }

    fn check(&self, width: usize) -> std::result::Result<(), String> {
        let len = self.value.len();
        if len == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.children_left.len(),
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
        ]
        .iter()
        .any(|other| *other != len)
        {
            return Err("node arrays differ in length".to_string());
        }
        for node in 0..len {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF && right == TREE_LEAF {
                if !self.value[node].is_finite() {
                    return Err(format!("leaf {node} has a non-finite value"));
                }
                continue;
            }
            for child in [left, right] {
                let valid = usize::try_from(child).is_ok_and(|c| c > node && c < len);
                if !valid {
                    return Err(format!("node {node} has invalid child {child}"));
                }
            }
            let feature_ok = usize::try_from(self.feature[node]).is_ok_and(|f| f < width);
            if !feature_ok {
                return Err(format!(
                    "node {node} splits on feature {} of {width}",
                    self.feature[node]
                ));
            }
            if !self.threshold[node].is_finite() {
                return Err(format!("node {node} has a non-finite threshold"));
            }
        }
        Ok(())
    }
}

fn bad_node(node: usize) -> PipelineError {
    PipelineError::ShapeMismatch {
        expected: "a well-formed tree".to_string(),
        found: format!("broken node {node}"),
    }
}
