/**
METEOR for a single hypothesis. Words are aligned in two passes, exact matches first and then
matches between the stems of the words left unaligned. Synonym matching is not supported.
*/
use crate::metrics::MetricError;
use rust_stemmers::Stemmer;

/// Parameters of the METEOR score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteorParams {
    /// Relative weight of the precision and the recall in the harmonic mean.
    pub alpha: f64,
    /// Shape of the fragmentation penalty.
    pub beta: f64,
    /// Maximum fragmentation penalty.
    pub gamma: f64,
}

impl Default for MeteorParams {
    fn default() -> Self {
        Self {
            alpha: 0.9,
            beta: 3.0,
            gamma: 0.5,
        }
    }
}

type EnumeratedWords = Vec<(usize, String)>;

fn enumerate_words(tokens: &[&str]) -> EnumeratedWords {
    tokens
        .iter()
        .enumerate()
        .map(|(i, w)| (i, w.to_lowercase()))
        .collect()
}

/// Aligns identical words. The hypothesis is scanned from its end and each word is aligned with
/// the last unaligned identical word of the reference. Aligned words are removed from both lists.
fn match_words(
    hypothesis: &mut EnumeratedWords,
    reference: &mut EnumeratedWords,
) -> Vec<(usize, usize)> {
    let mut matches = Vec::new();
    for i in (0..hypothesis.len()).rev() {
        if let Some(j) = reference.iter().rposition(|(_, w)| *w == hypothesis[i].1) {
            matches.push((hypothesis[i].0, reference[j].0));
            hypothesis.remove(i);
            reference.remove(j);
        }
    }
    matches
}

fn stem_words(stemmer: &Stemmer, words: EnumeratedWords) -> EnumeratedWords {
    words
        .into_iter()
        .map(|(i, w)| (i, stemmer.stem(&w).into_owned()))
        .collect()
}

/// Alignment between the hypothesis and the reference, as (hypothesis index, reference index)
/// pairs sorted by hypothesis index.
pub(crate) fn align(
    stemmer: &Stemmer,
    hypothesis: &[&str],
    reference: &[&str],
) -> Vec<(usize, usize)> {
    let mut hypothesis = enumerate_words(hypothesis);
    let mut reference = enumerate_words(reference);
    let mut matches = match_words(&mut hypothesis, &mut reference);
    let mut stemmed_hypothesis = stem_words(stemmer, hypothesis);
    let mut stemmed_reference = stem_words(stemmer, reference);
    matches.extend(match_words(&mut stemmed_hypothesis, &mut stemmed_reference));
    matches.sort_by_key(|&(h, _)| h);
    matches
}

/// Number of runs of aligned words that are contiguous in both the hypothesis and the reference.
pub(crate) fn count_chunks(matches: &[(usize, usize)]) -> usize {
    1 + matches
        .windows(2)
        .filter(|pair| !(pair[1].0 == pair[0].0 + 1 && pair[1].1 == pair[0].1 + 1))
        .count()
}

pub fn single_meteor(
    stemmer: &Stemmer,
    params: &MeteorParams,
    hypothesis: &[&str],
    reference: &[&str],
) -> f64 {
    let matches = align(stemmer, hypothesis, reference);
    if hypothesis.is_empty() || reference.is_empty() || matches.is_empty() {
        return 0.0;
    }
    let matches_count = matches.len() as f64;
    let precision = matches_count / hypothesis.len() as f64;
    let recall = matches_count / reference.len() as f64;
    let fmean = (precision * recall) / (params.alpha * precision + (1.0 - params.alpha) * recall);
    let fragmentation = count_chunks(&matches) as f64 / matches_count;
    let penalty = params.gamma * fragmentation.powf(params.beta);
    (1.0 - penalty) * fmean
}

/// Best METEOR of the hypothesis against each reference.
pub fn meteor(
    stemmer: &Stemmer,
    params: &MeteorParams,
    hypothesis: &[&str],
    references: &[Vec<&str>],
) -> Result<f64, MetricError> {
    let score = references
        .iter()
        .map(|reference| single_meteor(stemmer, params, hypothesis, reference))
        .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))))
        .ok_or(MetricError::EmptyReferences)?;
    if score.is_finite() {
        Ok(score)
    } else {
        Err(MetricError::NonFinite(score))
    }
}
