/*
 * This modules contains the configuration of an evaluation run. The `EvalConfig` struct implements
 * the default trait and can be customized with the `EvalConfigBuilder`. Its `Display` output is
 * the configuration block written at the top of every log file.
*/
use crate::inductor::{InductorKind, InductorSettings};
use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::path::{Path, PathBuf};

/// Width of the key column in the configuration block.
const KEY_WIDTH: usize = 25;
const BANNER: &str = "**************** MODEL CONFIGURATION ****************";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Config struct gathering the parameters of an evaluation run. It implements the default trait.
pub struct EvalConfig {
    /// Directory against which the dataset paths of the tasks are resolved.
    pub data_dir: PathBuf,
    /// Task evaluated by default.
    pub task: Task,
    /// Explicit generations file of the precomputed inductor.
    pub generations: Option<PathBuf>,
    /// Number of instances sampled by the inductor.
    pub k: usize,
    /// Maximum number of hypotheses kept per example.
    pub topk: usize,
    pub inductor: InductorSettings,
    /// Draw a progress bar over the rows of the task file.
    pub progress: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            task: Task::default(),
            generations: None,
            k: 10,
            topk: 10,
            inductor: InductorSettings::default(),
            progress: false,
        }
    }
}

impl EvalConfig {
    pub fn builder() -> EvalConfigBuilder {
        EvalConfigBuilder::new()
    }

    /// Generations file of the inductor variant for a task. Unless given explicitly, it is
    /// `generations/<variant>/<task>.jsonl` under the data directory.
    pub fn generations_path(&self, task: Task) -> PathBuf {
        match &self.generations {
            Some(path) => path.clone(),
            None => self
                .data_dir
                .join("generations")
                .join(self.inductor.variant_name())
                .join(format!("{}.jsonl", task.name())),
        }
    }

    /// Configuration as sorted (key, value) pairs.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let generations = self
            .generations
            .as_ref()
            .map_or_else(|| String::from("None"), |p| p.display().to_string());
        vec![
            ("bart_training", self.inductor.bart_training.to_string()),
            ("data_dir", self.data_dir.display().to_string()),
            ("generations", generations),
            ("group_beam", self.inductor.group_beam.to_string()),
            ("if_then", self.inductor.if_then.to_string()),
            ("inductor", self.inductor.kind.to_string()),
            ("k", self.k.to_string()),
            ("mlm_training", self.inductor.mlm_training.to_string()),
            ("task", self.task.to_string()),
            ("topk", self.topk.to_string()),
        ]
    }
}

/// One line per parameter, keys padded to 25 columns, between two banners.
impl Display for EvalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", BANNER)?;
        for (key, value) in self.entries() {
            writeln!(f, "{:<width$} -->   {}", key, value, width = KEY_WIDTH)?;
        }
        write!(f, "{}", BANNER)
    }
}

/// This builder can be used to build and customize an `EvalConfig` stucture.
#[derive(Clone, Debug, Default)]
pub struct EvalConfigBuilder {
    config: EvalConfig,
}

impl EvalConfigBuilder {
    pub fn data_dir<P: AsRef<Path>>(mut self, data_dir: P) -> Self {
        self.config.data_dir = data_dir.as_ref().to_path_buf();
        self
    }
    pub fn task(mut self, task: Task) -> Self {
        self.config.task = task;
        self
    }
    pub fn generations<P: AsRef<Path>>(mut self, generations: P) -> Self {
        self.config.generations = Some(generations.as_ref().to_path_buf());
        self
    }
    pub fn k(mut self, k: usize) -> Self {
        self.config.k = k;
        self
    }
    pub fn topk(mut self, topk: usize) -> Self {
        self.config.topk = topk;
        self
    }
    pub fn inductor(mut self, kind: InductorKind) -> Self {
        self.config.inductor.kind = kind;
        self
    }
    pub fn group_beam(mut self, group_beam: bool) -> Self {
        self.config.inductor.group_beam = group_beam;
        self
    }
    pub fn mlm_training(mut self, mlm_training: bool) -> Self {
        self.config.inductor.mlm_training = mlm_training;
        self
    }
    pub fn bart_training(mut self, bart_training: bool) -> Self {
        self.config.inductor.bart_training = bart_training;
        self
    }
    pub fn if_then(mut self, if_then: bool) -> Self {
        self.config.inductor.if_then = if_then;
        self
    }
    pub fn progress(mut self, progress: bool) -> Self {
        self.config.progress = progress;
        self
    }
    pub fn new() -> Self {
        Self::default()
    }
    pub fn build(self) -> EvalConfig {
        self.config
    }
}
