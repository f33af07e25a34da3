/**
The evaluation loop of a task. Every row of the task file is parsed, its hypotheses are generated
and normalized, then scored against its references. Outcomes are accumulated and reduced to a
`TaskReport` once the whole file is processed.

A malformed row or an inductor failure ends the evaluation. A metric that cannot be computed only
skips that (example, metric) pair.
*/
use crate::accumulator::MetricsAccumulator;
use crate::config::EvalConfig;
use crate::inductor::{Inductor, InductorError};
use crate::metrics::{ExampleScores, MetricScorer};
use crate::normalize::normalize_hypothesis;
use crate::record::{RowError, TaskRecord};
use crate::reporter::TaskReport;
use crate::task::Task;
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use std::error::Error;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{info, warn};

const SECTION_END: &str = "****************************";
const PROGRESS_TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}";

#[derive(Debug)]
pub enum EvalError {
    /// The task file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A row of the task file is malformed. Lines are numbered from 1.
    Row { line: usize, source: RowError },
    Inductor(InductorError),
}

impl Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Could not read task file {}: {}", path.display(), source)
            }
            Self::Row { line, source } => write!(f, "Malformed row at line {}: {}", line, source),
            Self::Inductor(e) => write!(f, "{}", e),
        }
    }
}

impl Error for EvalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Row { source, .. } => Some(source),
            Self::Inductor(e) => Some(e),
        }
    }
}

impl From<InductorError> for EvalError {
    fn from(value: InductorError) -> Self {
        Self::Inductor(value)
    }
}

/// Owns the metric scorer and the inductor of an evaluation run.
pub struct Evaluator<I: Inductor> {
    scorer: MetricScorer,
    inductor: I,
    config: EvalConfig,
}

impl<I: Inductor> Evaluator<I> {
    pub fn new(inductor: I, config: EvalConfig) -> Self {
        Self {
            scorer: MetricScorer::new(),
            inductor,
            config,
        }
    }

    pub fn with_scorer(mut self, scorer: MetricScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluates the task configured in `EvalConfig`.
    pub fn run(&self) -> Result<TaskReport, EvalError> {
        self.evaluate(self.config.task)
    }

    /// Evaluates a task, reading its file under the configured data directory.
    pub fn evaluate(&self, task: Task) -> Result<TaskReport, EvalError> {
        let path = task.path_in(&self.config.data_dir);
        let content = std::fs::read_to_string(&path).map_err(|source| EvalError::Io {
            path: path.clone(),
            source,
        })?;
        info!("Evaluating {} from {}", task, path.display());
        self.evaluate_lines(task, &content)
    }

    /// Evaluates a task from the content of its file. Blank lines are ignored.
    pub fn evaluate_lines(&self, task: Task, content: &str) -> Result<TaskReport, EvalError> {
        let rows = content.lines().filter(|l| !l.trim().is_empty()).count();
        let pb = self.progress_bar(rows);
        let mut accumulator = MetricsAccumulator::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record =
                TaskRecord::parse(line).map_err(|source| EvalError::Row { line: idx + 1, source })?;
            let scores = self.evaluate_record(&record)?;
            accumulator.record_example(&scores);
            pb.inc(1);
        }
        pb.finish_with_message(format!("{} done", task));
        let report = TaskReport::new(task, &accumulator);
        log_report(&report);
        Ok(report)
    }

    /// Bar over `rows` rows, hidden unless `EvalConfig::progress` is set.
    fn progress_bar(&self, rows: usize) -> ProgressBar {
        if !self.config.progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(rows as u64);
        match ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
            Ok(style) => pb.set_style(style.progress_chars("=>-")),
            Err(e) => warn!("Default progress style kept: {}", e),
        }
        pb
    }

    /// Generates, logs and scores the hypotheses of one record.
    pub fn evaluate_record(&self, record: &TaskRecord) -> Result<ExampleScores, EvalError> {
        let references = record.references();
        let generations = self
            .inductor
            .generate(&record.input, self.config.k, self.config.topk)?;
        let hypotheses: Vec<String> = generations.iter().map(|h| normalize_hypothesis(h)).collect();

        info!("***********Input************");
        info!("{}", record.input);
        info!("*********Hypothesis*********");
        for line in hypothesis_log_lines(&generations, &hypotheses) {
            info!("{}", line);
        }
        info!("{}", SECTION_END);
        info!("*********References*********");
        info!("[{}]", references.iter().map(|r| format!("'{}'", r)).join(", "));
        info!("{}", SECTION_END);

        let scores = self.scorer.score_example(&hypotheses, &references);
        for (metric, error) in scores.failures() {
            warn!("Skip {} in example: {} ({})", metric, record.input, error);
        }
        Ok(scores)
    }
}

/// Log lines of the hypotheses: each generation as returned by the inductor, followed by its
/// normalized form when normalization changed it.
fn hypothesis_log_lines(generations: &[String], hypotheses: &[String]) -> Vec<String> {
    let mut lines = Vec::with_capacity(generations.len());
    for (raw, normalized) in generations.iter().zip(hypotheses) {
        lines.push(raw.clone());
        if raw != normalized {
            lines.push(format!("  -> {}", normalized));
        }
    }
    lines
}

fn log_report(report: &TaskReport) {
    info!("Task: {}", report.task);
    for summary in report.iter() {
        info!("{}: {}", summary.metric, summary.mean.unwrap_or(f64::NAN));
    }
    for _ in 0..3 {
        info!("*******************************************************");
    }
}
