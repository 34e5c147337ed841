//! Timing statistics reduction

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Summary statistics for one timing phase, in milliseconds
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    /// Minimum in milliseconds
    pub min: f64,
    /// Maximum in milliseconds
    pub max: f64,
    /// Mean in milliseconds
    pub mean: f64,
    /// Median in milliseconds
    pub median: f64,
    /// Sample standard deviation; 0.0 when fewer than two samples exist
    pub stddev: f64,
    /// Total number of samples
    pub count: usize,
}

impl StatSummary {
    /// Reduce elapsed-duration samples into summary statistics
    pub fn from_durations(samples: &[Duration]) -> Self {
        let ms: Vec<f64> = samples.iter().map(|d| d.as_secs_f64() * 1000.0).collect();
        Self::from_millis(&ms)
    }

    /// Calculate statistics from samples in milliseconds
    pub fn from_millis(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let sum: f64 = sorted.iter().sum();
        let mean = sum / sorted.len() as f64;
        let median = median_of_sorted(&sorted);

        // Sample standard deviation is undefined below two samples
        let stddev = if sorted.len() < 2 {
            0.0
        } else {
            let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
                / (sorted.len() - 1) as f64;
            variance.sqrt()
        };

        Self {
            min,
            max,
            mean,
            median,
            stddev,
            count: sorted.len(),
        }
    }

    /// Format as summary string
    pub fn format_summary(&self) -> String {
        format!(
            "min={:.3}ms max={:.3}ms mean={:.3}ms median={:.3}ms stddev={:.3}ms",
            self.min, self.max, self.mean, self.median, self.stddev
        )
    }
}

/// Median of an already-sorted slice
fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}
