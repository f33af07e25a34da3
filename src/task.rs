/**
This module holds the fixed mapping between the name of a benchmark task and the file containing
its examples.
*/
use enum_iterator::{all, Sequence};
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A benchmark dataset. Each task has its own file, relative to the data directory. The
/// reference format (bracketed list or `[X]`/`[Y]` template) is detected row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Sequence)]
pub enum Task {
    AmieYago2,
    RulesYago2,
    OpenRule155,
    FewRel,
    SemEval,
    TRex,
    Nyt10,
    GoogleRe,
    Wiki80,
}

impl Task {
    /// Name of the task, as accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AmieYago2 => "amie-yago2",
            Self::RulesYago2 => "rules-yago2",
            Self::OpenRule155 => "openrule155",
            Self::FewRel => "fewrel",
            Self::SemEval => "semeval",
            Self::TRex => "TREx",
            Self::Nyt10 => "nyt10",
            Self::GoogleRe => "google-re",
            Self::Wiki80 => "wiki80",
        }
    }

    /// Path of the dataset, relative to the data directory.
    pub fn relative_path(&self) -> &'static str {
        match self {
            Self::AmieYago2 => "data/RE-datasets/AMIE-yago2.txt",
            Self::RulesYago2 => "data/RE-datasets/RuLES-yago2.txt",
            Self::OpenRule155 => "data/OpenRule155.txt",
            Self::FewRel => "data/RE/fewrel-5.txt",
            Self::SemEval => "data/RE/semeval-5.txt",
            Self::TRex => "data/RE/trex-5.txt",
            Self::Nyt10 => "data/RE/nyt10-5.txt",
            Self::GoogleRe => "data/RE/google-re-5.txt",
            Self::Wiki80 => "data/RE/wiki80-5.txt",
        }
    }

    pub fn path_in<P: AsRef<Path>>(&self, data_dir: P) -> PathBuf {
        data_dir.as_ref().join(self.relative_path())
    }

    /// Every known task, in declaration order.
    pub fn all() -> Vec<Task> {
        all::<Task>().collect()
    }
}

impl Default for Task {
    fn default() -> Self {
        Self::OpenRule155
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Lookup is exact: the names are keys of a fixed mapping, `trex` is not `TREx`.
impl FromStr for Task {
    type Err = UnknownTaskError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all::<Task>()
            .find(|t| t.name() == s)
            .ok_or_else(|| UnknownTaskError(String::from(s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTaskError(pub String);

impl Display for UnknownTaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Task key not found: `{}`. Known tasks are: {}",
            self.0,
            all::<Task>().map(|t| t.name()).join(", ")
        )
    }
}

impl Error for UnknownTaskError {}

/// Tasks are (de)serialized by their command-line name.
impl Serialize for Task {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Task {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
