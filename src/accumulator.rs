/**
Per-task accumulation of the metric outcomes. Instead of a list of scores per metric, every metric
keeps its sum and explicit counts of recorded values, zero-filled values and skipped computations.
*/
use crate::metrics::{ExampleScores, Metric, MetricError};
use enum_iterator::all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running tally of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricTally {
    /// Sum of every recorded value, zero-filled values included.
    pub sum: f64,
    /// Number of recorded values, zero-filled values included.
    pub count: usize,
    /// Number of explicit zeros recorded for examples without any hypothesis.
    pub zero_filled: usize,
    /// Number of computations that failed and were left out.
    pub skipped: usize,
}

impl MetricTally {
    pub fn record(&mut self, outcome: &Result<f64, MetricError>) {
        match outcome {
            Ok(value) => {
                self.sum += value;
                self.count += 1;
            }
            Err(_) => self.skipped += 1,
        }
    }

    pub fn record_zero(&mut self) {
        self.count += 1;
        self.zero_filled += 1;
    }

    /// Arithmetic mean of the recorded values, `None` if nothing was recorded.
    pub fn mean(&self) -> Option<f64> {
        match self.count {
            0 => None,
            n => Some(self.sum / n as f64),
        }
    }
}

/// Tallies of every metric for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsAccumulator {
    tallies: BTreeMap<Metric, MetricTally>,
    examples: usize,
}

impl Default for MetricsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self {
            tallies: all::<Metric>().map(|m| (m, MetricTally::default())).collect(),
            examples: 0,
        }
    }

    /// Records the outcomes of one example. Examples without hypotheses get a zero for every
    /// per-hypothesis metric and nothing for self-BLEU; failed computations are counted as
    /// skipped.
    pub fn record_example(&mut self, scores: &ExampleScores) {
        self.examples += 1;
        match scores {
            ExampleScores::NoHypothesis => {
                for metric in Metric::per_hypothesis() {
                    self.tally_mut(metric).record_zero();
                }
            }
            ExampleScores::Scored(outcomes) => {
                for (metric, outcome) in outcomes {
                    self.tally_mut(*metric).record(outcome);
                }
            }
        }
    }

    fn tally_mut(&mut self, metric: Metric) -> &mut MetricTally {
        self.tallies.entry(metric).or_default()
    }

    pub fn tally(&self, metric: Metric) -> MetricTally {
        self.tallies.get(&metric).copied().unwrap_or_default()
    }

    pub fn examples(&self) -> usize {
        self.examples
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &MetricTally)> {
        self.tallies.iter().map(|(m, t)| (*m, t))
    }
}
