//! Bootstrap accumulators and summaries.
use std::{cmp::Ordering, fmt};

use serde::Serialize;

use crate::systems::Metric;

/// Win/tie counters of one metric.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub baseline_wins: usize,
    pub experimental_wins: usize,
    pub ties: usize,
}

impl Tally {
    /// Count one comparison. Only strict inequalities are wins.
    pub fn record(&mut self, baseline: f64, experimental: f64) {
        match baseline.partial_cmp(&experimental) {
            Some(Ordering::Greater) => self.baseline_wins += 1,
            Some(Ordering::Less) => self.experimental_wins += 1,
            _ => self.ties += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.baseline_wins + self.experimental_wins + self.ties
    }
}

/// Scores of one system on one metric, one entry per iteration.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunningSeries(Vec<f64>);

impl RunningSeries {
    pub fn push(&mut self, score: f64) {
        self.0.push(score);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }

    /// Sample standard deviation (n - 1 denominator).
    /// Undefined with fewer than two scores, reported as 0.
    pub fn std_dev(&self) -> f64 {
        if self.0.len() < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let devs = self
            .0
            .iter()
            .fold(0.0, |acc: f64, x| acc + (x - mean).powi(2));
        (devs / (self.0.len() - 1) as f64).sqrt()
    }
}

/// Per-metric outcome of a bootstrap run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric: Metric,
    pub baseline_mean: f64,
    pub experimental_mean: f64,
    pub baseline_std: f64,
    pub experimental_std: f64,
    pub baseline_wins: usize,
    pub experimental_wins: usize,
    pub ties: usize,
    pub experimental_win_ratio: f64,
    pub p_value: f64,
}

impl MetricSummary {
    /// Reduce the series and tally of `metric` over `n_iterations`.
    ///
    /// The p-value is the share of iterations where the baseline wins,
    /// ties counting for half.
    pub fn new(
        metric: Metric,
        baseline: &RunningSeries,
        experimental: &RunningSeries,
        tally: &Tally,
        n_iterations: usize,
    ) -> Self {
        let n = n_iterations as f64;
        Self {
            metric,
            baseline_mean: baseline.mean(),
            experimental_mean: experimental.mean(),
            baseline_std: baseline.std_dev(),
            experimental_std: experimental.std_dev(),
            baseline_wins: tally.baseline_wins,
            experimental_wins: tally.experimental_wins,
            ties: tally.ties,
            experimental_win_ratio: tally.experimental_wins as f64 / n,
            p_value: (tally.baseline_wins as f64 + tally.ties as f64 / 2.0) / n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapSummary {
    pub iterations: usize,
    pub total_sentences: usize,
    pub elapsed_secs: f64,
    pub metrics: Vec<MetricSummary>,
}

impl BootstrapSummary {
    pub fn metric(&self, metric: Metric) -> Option<&MetricSummary> {
        self.metrics.iter().find(|m| m.metric == metric)
    }
}

impl fmt::Display for BootstrapSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Bootstrap Evaluation Results ===")?;
        writeln!(f, "Number of iterations: {}", self.iterations)?;
        writeln!(f, "Total sentences: {}", self.total_sentences)?;
        writeln!(f, "Time taken: {:.2} seconds", self.elapsed_secs)?;

        for m in &self.metrics {
            writeln!(f)?;
            writeln!(f, "{} Scores:", m.metric.name().to_uppercase())?;
            writeln!(
                f,
                "Baseline: {:.4} (±{:.4})",
                m.baseline_mean, m.baseline_std
            )?;
            writeln!(
                f,
                "Experimental: {:.4} (±{:.4})",
                m.experimental_mean, m.experimental_std
            )?;
            writeln!(
                f,
                "Wins: Baseline: {}, Experimental: {}, Ties: {}",
                m.baseline_wins, m.experimental_wins, m.ties
            )?;
            writeln!(
                f,
                "Experimental win ratio: {:.4}",
                m.experimental_win_ratio
            )?;
            writeln!(f, "Approximate p-value: {:.4}", m.p_value)?;
        }
        Ok(())
    }
}
