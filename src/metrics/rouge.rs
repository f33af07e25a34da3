/**
ROUGE-L: F-measure of the longest common subsequence between the tokens of the hypothesis and
the tokens of a reference. Tokens are lowercased alphanumeric runs, stemmed when longer than three
characters.
*/
use crate::metrics::MetricError;
use ndarray::Array2;
use rust_stemmers::Stemmer;

/// Tokens shorter than this are never stemmed.
const MIN_STEMMED_LEN: usize = 4;

pub fn rouge_tokens(stemmer: &Stemmer, text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned
        .split_whitespace()
        .map(|t| {
            if t.len() >= MIN_STEMMED_LEN {
                stemmer.stem(t).into_owned()
            } else {
                String::from(t)
            }
        })
        .filter(|t| !t.is_empty())
        .collect()
}

pub(crate) fn lcs_length<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let mut table = Array2::<usize>::zeros((a.len() + 1, b.len() + 1));
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            table[[i, j]] = if a[i - 1] == b[j - 1] {
                table[[i - 1, j - 1]] + 1
            } else {
                table[[i - 1, j]].max(table[[i, j - 1]])
            };
        }
    }
    table[[a.len(), b.len()]]
}

/// ROUGE-L F-measure of tokenized texts. Zero when either side has no token.
pub fn rouge_l_fmeasure<T: PartialEq>(reference: &[T], hypothesis: &[T]) -> f64 {
    if reference.is_empty() || hypothesis.is_empty() {
        return 0.0;
    }
    let lcs = lcs_length(reference, hypothesis) as f64;
    let precision = lcs / hypothesis.len() as f64;
    let recall = lcs / reference.len() as f64;
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// Highest ROUGE-L of the hypothesis against each reference taken individually.
pub fn best_rouge_l<T: PartialEq, R: AsRef<[T]>>(
    references: &[R],
    hypothesis: &[T],
) -> Result<f64, MetricError> {
    references
        .iter()
        .map(|r| rouge_l_fmeasure(r.as_ref(), hypothesis))
        .reduce(f64::max)
        .ok_or(MetricError::EmptyReferences)
}
