//! Binary link classifier over edge feature rows.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A probabilistic binary classifier.
pub trait LinkClassifier {
    /// Fit on `rows` with 0/1 `labels`.
    fn fit(&mut self, rows: &[Vec<f32>], labels: &[f32]) -> Result<()>;

    /// Probability of the positive class for each row.
    fn predict_proba(&self, rows: &[Vec<f32>]) -> Result<Vec<f32>>;

    /// Hard 0/1 predictions at threshold 0.5.
    fn predict(&self, rows: &[Vec<f32>]) -> Result<Vec<f32>> {
        Ok(self
            .predict_proba(rows)?
            .into_iter()
            .map(|p| if p >= 0.5 { 1.0 } else { 0.0 })
            .collect())
    }
}

/// Gradient descent settings for [`LogisticRegression`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticRegressionConfig {
    pub learning_rate: f64,
    pub max_iter: usize,
    /// L2 penalty on the weights (not the bias).
    pub l2: f64,
    /// Stop once the largest gradient component falls below this.
    pub tolerance: f64,
}

impl Default for LogisticRegressionConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iter: 500,
            l2: 1e-4,
            tolerance: 1e-6,
        }
    }
}

impl LogisticRegressionConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig("learning_rate must be > 0".into()));
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidConfig("max_iter must be >= 1".into()));
        }
        if !(self.l2.is_finite() && self.l2 >= 0.0) {
            return Err(Error::InvalidConfig("l2 must be >= 0".into()));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(Error::InvalidConfig("tolerance must be >= 0".into()));
        }
        Ok(())
    }
}

/// L2-regularised logistic regression fit by full-batch gradient descent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    config: LogisticRegressionConfig,
    weights: Vec<f64>,
    bias: f64,
    fitted: bool,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl LogisticRegression {
    pub fn new(config: LogisticRegressionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            weights: Vec::new(),
            bias: 0.0,
            fitted: false,
        })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    fn logit(&self, row: &[f32]) -> f64 {
        self.weights
            .iter()
            .zip(row)
            .map(|(w, &x)| w * f64::from(x))
            .sum::<f64>()
            + self.bias
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            config: LogisticRegressionConfig::default(),
            weights: Vec::new(),
            bias: 0.0,
            fitted: false,
        }
    }
}

fn row_dim(rows: &[Vec<f32>]) -> Result<usize> {
    let dim = rows
        .first()
        .map(Vec::len)
        .ok_or_else(|| Error::InvalidInput("no rows".into()))?;
    if let Some(bad) = rows.iter().find(|r| r.len() != dim) {
        return Err(Error::DimensionMismatch {
            expected: dim,
            got: bad.len(),
        });
    }
    Ok(dim)
}

impl LinkClassifier for LogisticRegression {
    fn fit(&mut self, rows: &[Vec<f32>], labels: &[f32]) -> Result<()> {
        let dim = row_dim(rows)?;
        if labels.len() != rows.len() {
            return Err(Error::InvalidInput(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        if labels.iter().any(|&y| y != 0.0 && y != 1.0) {
            return Err(Error::InvalidInput("labels must be 0 or 1".into()));
        }

        self.weights = vec![0.0; dim];
        self.bias = 0.0;
        let n = rows.len() as f64;
        let lr = self.config.learning_rate;
        let mut grad_w = vec![0.0f64; dim];

        let mut iterations = 0;
        for _ in 0..self.config.max_iter {
            iterations += 1;
            grad_w.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_b = 0.0;

            for (row, &y) in rows.iter().zip(labels) {
                let err = sigmoid(self.logit(row)) - f64::from(y);
                for (g, &x) in grad_w.iter_mut().zip(row) {
                    *g += err * f64::from(x);
                }
                grad_b += err;
            }

            let mut largest = (grad_b / n).abs();
            for (w, g) in self.weights.iter_mut().zip(&grad_w) {
                let step = g / n + self.config.l2 * *w;
                largest = largest.max(step.abs());
                *w -= lr * step;
            }
            self.bias -= lr * grad_b / n;

            if largest < self.config.tolerance {
                break;
            }
        }

        tracing::debug!(rows = rows.len(), dim, iterations, "logistic regression fitted");
        self.fitted = true;
        Ok(())
    }

    fn predict_proba(&self, rows: &[Vec<f32>]) -> Result<Vec<f32>> {
        if !self.fitted {
            return Err(Error::NotFitted);
        }
        rows.iter()
            .map(|row| {
                if row.len() != self.weights.len() {
                    return Err(Error::DimensionMismatch {
                        expected: self.weights.len(),
                        got: row.len(),
                    });
                }
                Ok(sigmoid(self.logit(row)) as f32)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Vec<Vec<f32>>, Vec<f32>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            let t = i as f32 / 20.0;
            rows.push(vec![1.0 + t, 0.5 - t]);
            labels.push(1.0);
            rows.push(vec![-1.0 - t, -0.5 + t]);
            labels.push(0.0);
        }
        (rows, labels)
    }

    #[test]
    fn test_fits_separable_data() {
        let (rows, labels) = separable();
        let mut clf = LogisticRegression::default();
        clf.fit(&rows, &labels).unwrap();

        let predicted = clf.predict(&rows).unwrap();
        assert_eq!(predicted, labels);

        let p = clf.predict_proba(&[vec![2.0, 0.0], vec![-2.0, 0.0]]).unwrap();
        assert!(p[0] > 0.9);
        assert!(p[1] < 0.1);
    }

    #[test]
    fn test_not_fitted() {
        let clf = LogisticRegression::default();
        assert!(matches!(
            clf.predict_proba(&[vec![1.0]]),
            Err(Error::NotFitted)
        ));
    }

    #[test]
    fn test_bad_input() {
        let mut clf = LogisticRegression::default();
        assert!(matches!(clf.fit(&[], &[]), Err(Error::InvalidInput(_))));
        assert!(matches!(
            clf.fit(&[vec![1.0, 2.0], vec![1.0]], &[0.0, 1.0]),
            Err(Error::DimensionMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            clf.fit(&[vec![1.0]], &[0.0, 1.0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            clf.fit(&[vec![1.0]], &[0.3]),
            Err(Error::InvalidInput(_))
        ));

        let (rows, labels) = separable();
        clf.fit(&rows, &labels).unwrap();
        assert!(matches!(
            clf.predict_proba(&[vec![1.0]]),
            Err(Error::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_l2_shrinks_weights() {
        let (rows, labels) = separable();
        let mut loose = LogisticRegression::default();
        loose.fit(&rows, &labels).unwrap();
        let mut tight =
            LogisticRegression::new(LogisticRegressionConfig::default().with_l2(1.0)).unwrap();
        tight.fit(&rows, &labels).unwrap();

        let norm = |w: &[f64]| w.iter().map(|x| x * x).sum::<f64>();
        assert!(norm(tight.weights()) < norm(loose.weights()));
    }

    #[test]
    fn test_invalid_config() {
        assert!(LogisticRegression::new(LogisticRegressionConfig::default().with_max_iter(0)).is_err());
        assert!(
            LogisticRegression::new(LogisticRegressionConfig::default().with_learning_rate(0.0))
                .is_err()
        );
    }
}
