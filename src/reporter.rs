/**
This modules gives a few tools to prettyprint the per-task means of every metric.
*/
use crate::accumulator::{MetricTally, MetricsAccumulator};
use crate::metrics::Metric;
use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

/// The report of one task holds the mean of every metric and how many values went into it. It
/// can be displayed as a dataframe or serialized.
///
/// # Example
///
/// ```rust
/// use ruleval::{ExampleScores, Metric, MetricsAccumulator, Task, TaskReport};
///
/// let mut accumulator = MetricsAccumulator::new();
/// accumulator.record_example(&ExampleScores::Scored(vec![
///     (Metric::Bleu1, Ok(1.0)),
///     (Metric::Bleu1, Ok(0.5)),
/// ]));
/// let report = TaskReport::new(Task::FewRel, &accumulator);
/// assert_eq!(report.mean(Metric::Bleu1), Some(0.75));
///
/// let expected_report = "Metric, Mean, Count, Skipped, Zero-filled
/// bleu-4, NaN, 0, 0, 0
/// bleu-3, NaN, 0, 0, 0
/// bleu-2, NaN, 0, 0, 0
/// bleu-1, 0.75, 2, 0, 0
/// METEOR, NaN, 0, 0, 0
/// ROUGE-L, NaN, 0, 0, 0
/// self-BLEU-2, NaN, 0, 0, 0\n";
/// assert_eq!(expected_report, report.to_string());
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TaskReport {
    pub task: Task,
    /// Number of rows evaluated.
    pub examples: usize,
    pub(crate) metrics: BTreeSet<MetricSummary>,
}

impl TaskReport {
    pub fn new(task: Task, accumulator: &MetricsAccumulator) -> Self {
        Self {
            task,
            examples: accumulator.examples(),
            metrics: accumulator
                .iter()
                .map(|(metric, tally)| MetricSummary::new(metric, tally))
                .collect(),
        }
    }

    pub fn summary(&self, metric: Metric) -> Option<&MetricSummary> {
        self.metrics.iter().find(|s| s.metric == metric)
    }

    pub fn mean(&self, metric: Metric) -> Option<f64> {
        self.summary(metric).and_then(|s| s.mean)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricSummary> {
        self.metrics.iter()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The TaskReport acts as a dataframe when displayed.
impl Display for TaskReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Metric, Mean, Count, Skipped, Zero-filled")?;
        for summary in self.metrics.iter() {
            writeln!(f, "{}", summary)?
        }
        Ok(())
    }
}

/// Mean of one metric over a task. Summaries are ordered and compared by metric, which is the
/// report order: a report holds at most one summary per metric.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MetricSummary {
    pub metric: Metric,
    /// `None` when no value was recorded for the metric.
    pub mean: Option<f64>,
    /// Number of values in the mean, zero-filled values included.
    pub count: usize,
    pub skipped: usize,
    pub zero_filled: usize,
}

impl MetricSummary {
    pub(crate) fn new(metric: Metric, tally: &MetricTally) -> Self {
        Self {
            metric,
            mean: tally.mean(),
            count: tally.count,
            skipped: tally.skipped,
            zero_filled: tally.zero_filled,
        }
    }
}

impl PartialEq for MetricSummary {
    fn eq(&self, other: &Self) -> bool {
        self.metric == other.metric
    }
}

impl Eq for MetricSummary {}

impl PartialOrd for MetricSummary {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MetricSummary {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.metric.cmp(&other.metric)
    }
}

/// The MetricSummary acts as a line in a dataframe when displayed. A metric without any value
/// shows `NaN`, like the mean of an empty array would.
impl Display for MetricSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}",
            self.metric,
            self.mean.unwrap_or(f64::NAN),
            self.count,
            self.skipped,
            self.zero_filled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{ExampleScores, MetricError};
    use pretty_assertions::assert_eq;

    fn accumulator() -> MetricsAccumulator {
        let mut acc = MetricsAccumulator::new();
        acc.record_example(&ExampleScores::Scored(vec![
            (Metric::Bleu4, Ok(1.0)),
            (Metric::RougeL, Ok(0.25)),
            (Metric::RougeL, Err(MetricError::EmptyReferences)),
            (Metric::SelfBleu2, Err(MetricError::TooFewHypotheses(1))),
        ]));
        acc.record_example(&ExampleScores::NoHypothesis);
        acc
    }

    #[test]
    fn test_reporter_output() {
        let report = TaskReport::new(Task::OpenRule155, &accumulator());
        let expected = "Metric, Mean, Count, Skipped, Zero-filled
bleu-4, 0.5, 2, 0, 1
bleu-3, 0, 1, 0, 1
bleu-2, 0, 1, 0, 1
bleu-1, 0, 1, 0, 1
METEOR, 0, 1, 0, 1
ROUGE-L, 0.125, 2, 1, 1
self-BLEU-2, NaN, 0, 1, 0\n";
        assert_eq!(report.to_string(), expected);
        assert_eq!(report.examples, 2);
    }

    #[test]
    fn test_report_accessors() {
        let report = TaskReport::new(Task::OpenRule155, &accumulator());
        assert_eq!(report.mean(Metric::RougeL), Some(0.125));
        assert_eq!(report.mean(Metric::SelfBleu2), None);
        let summary = report.summary(Metric::RougeL).unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(report.iter().count(), 7);
    }

    #[test]
    fn test_report_json_roundtrip_keeps_order() {
        let report = TaskReport::new(Task::Wiki80, &accumulator());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"task\": \"wiki80\""));
        let parsed: TaskReport = serde_json::from_str(&json).unwrap();
        let metrics: Vec<Metric> = parsed.iter().map(|s| s.metric).collect();
        assert_eq!(metrics, enum_iterator::all::<Metric>().collect::<Vec<_>>());
        assert_eq!(parsed.mean(Metric::RougeL), report.mean(Metric::RougeL));
    }

    #[test]
    fn test_summary_equality_agrees_with_order() {
        let mut tally = MetricTally::default();
        tally.record(&Ok(0.25));
        let first = MetricSummary::new(Metric::Meteor, &tally);
        tally.record(&Ok(1.0));
        let second = MetricSummary::new(Metric::Meteor, &tally);
        assert_ne!(first.mean, second.mean);
        assert_eq!(first.cmp(&second), std::cmp::Ordering::Equal);
        assert_eq!(first, second);
        assert_ne!(first, MetricSummary::new(Metric::RougeL, &tally));

        let rows: BTreeSet<MetricSummary> = [first, second].into_iter().collect();
        assert_eq!(rows.len(), 1);
    }
}
