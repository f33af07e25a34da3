/**
The generative inductor is the model producing candidate relation paraphrases for an input
template. The evaluation only depends on the `Inductor` capability; any closure with the right
signature is an inductor, and `PrecomputedInductor` replays generations dumped by a model.
*/
mod precomputed;

pub use precomputed::{GenerationRecord, PrecomputedInductor};

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

/// Produces an ordered sequence of hypotheses for an input template. `k` is the number of
/// instances the inductor may sample internally and `topk` the maximum number of hypotheses
/// returned.
pub trait Inductor {
    fn generate(&self, input: &str, k: usize, topk: usize) -> Result<Vec<String>, InductorError>;
}

impl<F> Inductor for F
where
    F: Fn(&str, usize, usize) -> Result<Vec<String>, InductorError>,
{
    fn generate(&self, input: &str, k: usize, topk: usize) -> Result<Vec<String>, InductorError> {
        self(input, k, topk)
    }
}

#[derive(Debug)]
pub enum InductorError {
    /// The inductor has no generation for this input.
    UnknownInput(String),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A line of a generations file could not be decoded.
    Parse {
        path: PathBuf,
        line: usize,
        source: std::io::Error,
    },
    /// Any other failure of the underlying model.
    Model(String),
}

impl Display for InductorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownInput(input) => write!(f, "No generation found for input: `{}`", input),
            Self::Io { path, source } => {
                write!(f, "Could not read generations from {}: {}", path.display(), source)
            }
            Self::Parse { path, line, source } => write!(
                f,
                "Invalid generation at line {} of {}: {}",
                line,
                path.display(),
                source
            ),
            Self::Model(msg) => write!(f, "Inductor failure: {}", msg),
        }
    }
}

impl Error for InductorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::UnknownInput(_) | Self::Model(_) => None,
        }
    }
}

/// Family of the generative model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InductorKind {
    /// BART-based rule inductor.
    #[default]
    Rule,
    Comet,
}

impl InductorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::Comet => "comet",
        }
    }
}

impl Display for InductorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for InductorKind {
    type Err = InductorKindParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rule" => Ok(Self::Rule),
            "comet" => Ok(Self::Comet),
            other => Err(InductorKindParsingError(String::from(other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InductorKindParsingError(String);

impl Display for InductorKindParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown inductor `{}`, expected `rule` or `comet`", self.0)
    }
}

impl Error for InductorKindParsingError {}

/// Settings of the generative inductor. The toggles only apply to the rule inductor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct InductorSettings {
    pub kind: InductorKind,
    /// Group beam search decoding.
    pub group_beam: bool,
    /// Continue the pretraining of the instance generator.
    pub mlm_training: bool,
    /// Continue the pretraining of the hypothesis generator.
    pub bart_training: bool,
    /// Use the if-then prompt template.
    pub if_then: bool,
}

impl InductorSettings {
    /// Name of the model variant, e.g. `rule`, `rule+group-beam+if-then` or `comet`. Generations
    /// of a variant are stored under a directory of that name.
    pub fn variant_name(&self) -> String {
        match self.kind {
            InductorKind::Comet => String::from(InductorKind::Comet.name()),
            InductorKind::Rule => {
                let toggles = [
                    (self.group_beam, "group-beam"),
                    (self.mlm_training, "mlm-training"),
                    (self.bart_training, "bart-training"),
                    (self.if_then, "if-then"),
                ];
                std::iter::once(InductorKind::Rule.name())
                    .chain(toggles.iter().filter(|(on, _)| *on).map(|(_, name)| *name))
                    .collect::<Vec<_>>()
                    .join("+")
            }
        }
    }
}
