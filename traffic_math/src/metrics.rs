//! Goodness-of-fit metrics for regression predictions

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary of how well predictions match observed values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
}

/// Compare predictions against observed values
pub fn fit_metrics(predicted: &[f64], actual: &[f64]) -> Result<FitMetrics> {
    if predicted.len() != actual.len() || predicted.is_empty() {
        return Err(MathError::InvalidInput(
            "Predicted and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = actual.len() as f64;
    let mean = actual.iter().sum::<f64>() / n;

    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    let mut total_sq = 0.0;
    for (p, a) in predicted.iter().zip(actual) {
        let error = a - p;
        abs_sum += error.abs();
        sq_sum += error * error;
        total_sq += (a - mean) * (a - mean);
    }

    // A constant target is perfectly explained only by perfect predictions
    let r2 = if total_sq == 0.0 {
        if sq_sum == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - sq_sum / total_sq
    };

    Ok(FitMetrics {
        mae: abs_sum / n,
        rmse: (sq_sum / n).sqrt(),
        r2,
    })
}

impl fmt::Display for FitMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MAE={:.4} RMSE={:.4} R2={:.4}",
            self.mae, self.rmse, self.r2
        )
    }
}
