//! Summary statistics over per-iteration duration samples.

use serde::Serialize;
use thiserror::Error;

/// Errors raised while computing statistics.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Fewer than two samples were supplied.
    #[error("at least two samples are necessary (got {count})")]
    InsufficientSamples { count: usize },
}

/// Statistics over one finished benchmark run.
///
/// Median and minimum stay in integer nanoseconds like the samples they come
/// from; mean and standard deviation need double precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub median: u64,
    pub mean: f64,
    pub standard_deviation: f64,
    pub min: u64,
}

impl SummaryStatistics {
    /// Computes median, mean, minimum and sample standard deviation.
    ///
    /// The even-length median is the average of the two central elements.
    /// The standard deviation is the sample form: squared deviations from the
    /// mean divided by `n - 1`, square-rooted.
    pub fn from_samples(samples: &[u64]) -> Result<Self, StatsError> {
        let size = samples.len();
        if size <= 1 {
            return Err(StatsError::InsufficientSamples { count: size });
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let median = if size % 2 == 0 {
            (sorted[size / 2 - 1] + sorted[size / 2]) / 2
        } else {
            sorted[size / 2]
        };
        let min = sorted[0];

        let mean = sorted.iter().map(|&s| s as f64).sum::<f64>() / size as f64;
        let sum_sq = sorted
            .iter()
            .map(|&s| {
                let deviation = s as f64 - mean;
                deviation * deviation
            })
            .sum::<f64>();
        let standard_deviation = (sum_sq / (size - 1) as f64).sqrt();

        Ok(Self {
            median,
            mean,
            standard_deviation,
            min,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_samples() {
        let stats = SummaryStatistics::from_samples(&[10, 20, 30]).unwrap();
        assert_eq!(stats.mean, 20.0);
        assert_eq!(stats.min, 10);
        assert_eq!(stats.median, 20);
        // sqrt(((10-20)^2 + 0 + (30-20)^2) / 2) = 10
        assert_eq!(stats.standard_deviation, 10.0);
    }

    #[test]
    fn two_samples() {
        let stats = SummaryStatistics::from_samples(&[5, 15]).unwrap();
        assert_eq!(stats.mean, 10.0);
        assert_eq!(stats.min, 5);
        assert_eq!(stats.median, 10);
        assert!((stats.standard_deviation - 50f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn even_length_median_averages_central_elements() {
        let stats = SummaryStatistics::from_samples(&[1, 2, 3, 4]).unwrap();
        assert_eq!(stats.median, 2); // (2 + 3) / 2 in integer ns
    }

    #[test]
    fn input_order_does_not_matter() {
        let sorted = SummaryStatistics::from_samples(&[10, 20, 30]).unwrap();
        let shuffled = SummaryStatistics::from_samples(&[30, 10, 20]).unwrap();
        assert_eq!(sorted, shuffled);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            SummaryStatistics::from_samples(&[]),
            Err(StatsError::InsufficientSamples { count: 0 })
        ));
    }

    #[test]
    fn rejects_single_sample() {
        assert!(matches!(
            SummaryStatistics::from_samples(&[42]),
            Err(StatsError::InsufficientSamples { count: 1 })
        ));
    }
}
