use super::{Inductor, InductorError};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_jsonlines::json_lines;
use std::path::Path;
use tracing::debug;

/// One line of a generations file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub input: String,
    pub hypotheses: Vec<String>,
}

/// Inductor serving generations read from a JSON-lines file. When an input appears more than once,
/// the last line wins.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedInductor {
    generations: AHashMap<String, Vec<String>>,
}

impl PrecomputedInductor {
    pub fn from_jsonl<P: AsRef<Path>>(path: P) -> Result<Self, InductorError> {
        let path = path.as_ref();
        let lines = json_lines::<GenerationRecord, _>(path).map_err(|source| InductorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut generations = AHashMap::new();
        for (idx, line) in lines.enumerate() {
            let record = line.map_err(|source| {
                if source.get_ref().is_some_and(|e| e.is::<serde_json::Error>()) {
                    InductorError::Parse {
                        path: path.to_path_buf(),
                        line: idx + 1,
                        source,
                    }
                } else {
                    InductorError::Io {
                        path: path.to_path_buf(),
                        source,
                    }
                }
            })?;
            generations.insert(record.input, record.hypotheses);
        }
        debug!("Loaded {} generations from {}", generations.len(), path.display());
        Ok(Self { generations })
    }

    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }
}

impl FromIterator<GenerationRecord> for PrecomputedInductor {
    fn from_iter<T: IntoIterator<Item = GenerationRecord>>(iter: T) -> Self {
        Self {
            generations: iter.into_iter().map(|r| (r.input, r.hypotheses)).collect(),
        }
    }
}

impl Inductor for PrecomputedInductor {
    fn generate(&self, input: &str, _k: usize, topk: usize) -> Result<Vec<String>, InductorError> {
        self.generations
            .get(input)
            .map(|hypotheses| hypotheses.iter().take(topk).cloned().collect())
            .ok_or_else(|| InductorError::UnknownInput(String::from(input)))
    }
}
