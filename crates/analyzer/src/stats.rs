use shared::models::Score;
use std::fmt;
use std::time::Duration;

pub const HISTOGRAM_BUCKETS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub lower: Score,
    pub upper: Score,
    pub count: usize,
}

/// Aggregate figures printed at the end of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreStats {
    pub count: usize,
    pub mean: Score,
    pub median: Score,
    pub histogram: Vec<Bucket>,
}

impl ScoreStats {
    /// Returns `None` when there are no scores.
    pub fn from_scores(scores: &[Score]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }

        let mut sorted = scores.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<Score>() / count as Score;
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Some(Self {
            count,
            mean,
            median,
            histogram: histogram(&sorted),
        })
    }
}

/// Ten equal-width, right-closed `(lower, upper]` buckets over `[min, max]`.
/// The first lower edge sits 0.1% of the range below `min` so the minimum is
/// counted. A degenerate range is widened by 0.1% on each side instead.
fn histogram(sorted: &[Score]) -> Vec<Bucket> {
    let (lowest, highest) = (sorted[0], sorted[sorted.len() - 1]);
    let (min, max, first_lower) = if lowest == highest {
        let pad = if lowest == 0.0 { 0.001 } else { 0.001 * lowest.abs() };
        (lowest - pad, highest + pad, lowest - pad)
    } else {
        (lowest, highest, lowest - 0.001 * (highest - lowest))
    };

    let width = (max - min) / HISTOGRAM_BUCKETS as Score;
    let mut buckets: Vec<Bucket> = (0..HISTOGRAM_BUCKETS)
        .map(|i| Bucket {
            lower: min + width * i as Score,
            upper: if i + 1 == HISTOGRAM_BUCKETS {
                max
            } else {
                min + width * (i + 1) as Score
            },
            count: 0,
        })
        .collect();
    buckets[0].lower = first_lower;

    for score in sorted {
        let index = buckets
            .iter()
            .position(|bucket| *score <= bucket.upper)
            .unwrap_or(HISTOGRAM_BUCKETS - 1);
        buckets[index].count += 1;
    }

    buckets
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>7.1} - {:>7.1}: {}", self.lower, self.upper, self.count)
    }
}

/// Wallets per second, zero for an empty interval.
pub fn throughput(count: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scores() {
        assert!(ScoreStats::from_scores(&[]).is_none());
    }

    #[test]
    fn test_mean_and_median() {
        let stats = ScoreStats::from_scores(&[300.0, 900.0, 600.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, 600.0);
        assert_eq!(stats.median, 600.0);

        let stats = ScoreStats::from_scores(&[100.0, 400.0, 200.0, 700.0]).unwrap();
        assert_eq!(stats.mean, 350.0);
        assert_eq!(stats.median, 300.0);
    }

    #[test]
    fn test_histogram_spans_min_to_max() {
        let scores: Vec<Score> = (0..=10).map(|i| 100.0 + 50.0 * i as Score).collect();
        let stats = ScoreStats::from_scores(&scores).unwrap();

        assert_eq!(stats.histogram.len(), HISTOGRAM_BUCKETS);
        assert_eq!(stats.histogram[0].lower, 99.5);
        assert_eq!(stats.histogram[9].upper, 600.0);
        assert_eq!(
            stats.histogram.iter().map(|b| b.count).sum::<usize>(),
            scores.len()
        );
    }

    #[test]
    fn test_histogram_edges_belong_to_lower_bucket() {
        let scores: Vec<Score> = (0..=10).map(|i| 100.0 + 50.0 * i as Score).collect();
        let stats = ScoreStats::from_scores(&scores).unwrap();
        let counts: Vec<usize> = stats.histogram.iter().map(|b| b.count).collect();

        // 100 and 150 share the first bucket, 600 is alone in the last
        assert_eq!(counts, vec![2, 1, 1, 1, 1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_histogram_single_value() {
        let stats = ScoreStats::from_scores(&[500.0, 500.0]).unwrap();

        assert_eq!(stats.histogram.len(), HISTOGRAM_BUCKETS);
        assert_eq!(
            stats.histogram.iter().map(|b| b.count).sum::<usize>(),
            2
        );
        assert!(stats.histogram[0].lower < 500.0);
        assert!(stats.histogram[9].upper > 500.0);
    }

    #[test]
    fn test_throughput() {
        assert_eq!(throughput(10, Duration::from_secs(5)), 2.0);
        assert_eq!(throughput(10, Duration::ZERO), 0.0);
    }
}
