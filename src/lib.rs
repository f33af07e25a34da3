/*!
This library evaluates automatically generated relation paraphrases against human-curated
references. A relation paraphrase is a short template such as `<mask> is the capital of <mask>.`
where the two `<mask>` slots stand for the head and the tail entities of a relation.

# Pipeline
Every task is a file of tab-separated rows `input, head, tail, relation`. For each row:
* The relation is parsed into references. It is either a bracketed list of paraphrases using
    `<A>`/`<B>` slots or a single template using `[X]`/`[Y]` slots. Lists are decoded by a
    restricted literal parser, never evaluated.
* The inductor generates up to `topk` hypotheses for the input.
* Hypotheses and references are normalized: slots become `<mask>`, text is lowercased and stray
    spaces before the final period are removed.
* Every hypothesis is scored with BLEU-1 to BLEU-4, METEOR and ROUGE-L against the references,
    and the list of hypotheses is scored with self-BLEU-2 for diversity.

# Aggregation
The report holds the mean of every metric over a task. A metric that fails on an example is
skipped for that example only. An example without any hypothesis counts as a zero for every metric
except self-BLEU, which is left out.
*/

mod accumulator;
mod config;
mod evaluator;
mod inductor;
mod logging;
mod metrics;
mod normalize;
mod record;
mod reporter;
mod task;

// The public api starts here
pub use accumulator::{MetricTally, MetricsAccumulator};

pub use config::{EvalConfig, EvalConfigBuilder};

pub use evaluator::{EvalError, Evaluator};

pub use inductor::{
    GenerationRecord, Inductor, InductorError, InductorKind, InductorKindParsingError,
    InductorSettings, PrecomputedInductor,
};

pub use logging::{init_run_logging, log_file_name};

pub use metrics::bleu::{self_bleu, sentence_bleu, uniform_weights};
pub use metrics::meteor::{meteor, MeteorParams};
pub use metrics::rouge::{best_rouge_l, rouge_l_fmeasure, rouge_tokens};
pub use metrics::{ExampleScores, Metric, MetricError, MetricParsingError, MetricScorer};

pub use normalize::{
    clean_hypothesis, clean_reference, normalize_hypothesis, normalize_reference, unify_masks,
    MASK,
};

pub use record::literal::{parse_string_list, LiteralError, LiteralErrorKind};
pub use record::{RelationSpec, RowError, TaskRecord};

pub use reporter::{MetricSummary, TaskReport};

pub use task::{Task, UnknownTaskError};

/// Main entrypoint of the library. Evaluates one task with the given inductor, using the data
/// directory and the generation parameters of `config`.
///
/// #Example
/// ```rust
/// use ruleval::{evaluate_task, EvalConfig, InductorError, Metric, Task};
///
/// let data_dir = tempfile::tempdir().unwrap();
/// std::fs::create_dir_all(data_dir.path().join("data")).unwrap();
/// std::fs::write(
///     Task::OpenRule155.path_in(data_dir.path()),
///     "<mask> is the capital of <mask> .\tParis\tFrance\t[X] is the capital of [Y] .\n",
/// )
/// .unwrap();
///
/// let inductor = |_input: &str, _k: usize, _topk: usize| -> Result<Vec<String>, InductorError> {
///     Ok(vec![String::from("<mask> IS the CAPITAL of <mask>.")])
/// };
/// let config = EvalConfig::builder().data_dir(data_dir.path()).build();
/// let report = evaluate_task(Task::OpenRule155, inductor, config).unwrap();
/// assert_eq!(report.mean(Metric::Bleu4), Some(1.0));
/// ```
pub fn evaluate_task<I: Inductor>(
    task: Task,
    inductor: I,
    config: EvalConfig,
) -> Result<TaskReport, EvalError> {
    Evaluator::new(inductor, config).evaluate(task)
}
