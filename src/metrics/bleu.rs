/**
Sentence-level BLEU with clipped n-gram precision, the closest-reference brevity penalty and no
smoothing beyond replacing null higher-order precisions by the smallest positive float.
*/
use crate::metrics::MetricError;
use ahash::AHashMap;
use std::hash::Hash;

/// Uniform weights for BLEU of the given order, e.g. `[0.5, 0.5]` for BLEU-2.
pub fn uniform_weights(order: usize) -> Vec<f64> {
    vec![1.0 / order as f64; order]
}

fn ngram_counts<T: Eq + Hash>(tokens: &[T], n: usize) -> AHashMap<&[T], usize> {
    let mut counts = AHashMap::new();
    if tokens.len() < n {
        return counts;
    }
    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// Clipped n-gram precision of the hypothesis, as a (numerator, denominator) pair. Each n-gram
/// count is clipped by its maximum count in any single reference. The denominator is at least 1.
pub(crate) fn modified_precision<T, R>(
    references: &[R],
    hypothesis: &[T],
    n: usize,
) -> (usize, usize)
where
    T: Eq + Hash,
    R: AsRef<[T]>,
{
    let counts = ngram_counts(hypothesis, n);
    let mut max_counts: AHashMap<&[T], usize> = AHashMap::with_capacity(counts.len());
    for reference in references {
        let reference_counts = ngram_counts(reference.as_ref(), n);
        for gram in counts.keys() {
            let in_reference = reference_counts.get(gram).copied().unwrap_or(0);
            let best = max_counts.entry(*gram).or_insert(0);
            *best = (*best).max(in_reference);
        }
    }
    let numerator = counts
        .iter()
        .map(|(gram, count)| (*count).min(max_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let denominator = counts.values().sum::<usize>().max(1);
    (numerator, denominator)
}

/// Length of the reference closest to the hypothesis length. Ties go to the shortest reference.
pub(crate) fn closest_reference_length(
    reference_lengths: &[usize],
    hypothesis_length: usize,
) -> Option<usize> {
    reference_lengths
        .iter()
        .copied()
        .min_by_key(|&r| (r.abs_diff(hypothesis_length), r))
}

pub(crate) fn brevity_penalty(closest_reference_length: usize, hypothesis_length: usize) -> f64 {
    if hypothesis_length > closest_reference_length {
        1.0
    } else if hypothesis_length == 0 {
        0.0
    } else {
        (1.0 - closest_reference_length as f64 / hypothesis_length as f64).exp()
    }
}

/// BLEU of one tokenized hypothesis against a set of tokenized references. The order of the
/// metric is the number of weights.
pub fn sentence_bleu<T, R>(
    references: &[R],
    hypothesis: &[T],
    weights: &[f64],
) -> Result<f64, MetricError>
where
    T: Eq + Hash,
    R: AsRef<[T]>,
{
    if weights.is_empty() {
        return Err(MetricError::InvalidWeights);
    }
    let reference_lengths: Vec<usize> = references.iter().map(|r| r.as_ref().len()).collect();
    let closest = closest_reference_length(&reference_lengths, hypothesis.len())
        .ok_or(MetricError::EmptyReferences)?;
    let precisions: Vec<(usize, usize)> = (1..=weights.len())
        .map(|n| modified_precision(references, hypothesis, n))
        .collect();
    if precisions[0].0 == 0 {
        return Ok(0.0);
    }
    let penalty = brevity_penalty(closest, hypothesis.len());
    let log_precision: f64 = weights
        .iter()
        .zip(precisions.iter())
        .map(|(weight, &(numerator, denominator))| {
            let precision = if numerator == 0 {
                f64::MIN_POSITIVE
            } else {
                numerator as f64 / denominator as f64
            };
            weight * precision.ln()
        })
        .sum();
    let score = penalty * log_precision.exp();
    if score.is_finite() {
        Ok(score)
    } else {
        Err(MetricError::NonFinite(score))
    }
}

/// Average BLEU of each hypothesis against all the other hypotheses of the list. The higher it
/// is, the less diverse the list.
pub fn self_bleu<T, R>(hypotheses: &[R], weights: &[f64]) -> Result<f64, MetricError>
where
    T: Eq + Hash,
    R: AsRef<[T]>,
{
    if hypotheses.len() < 2 {
        return Err(MetricError::TooFewHypotheses(hypotheses.len()));
    }
    let mut total = 0.0;
    for (i, hypothesis) in hypotheses.iter().enumerate() {
        let others: Vec<&[T]> = hypotheses
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, h)| h.as_ref())
            .collect();
        total += sentence_bleu(&others, hypothesis.as_ref(), weights)?;
    }
    Ok(total / hypotheses.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tokens(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    const EPS: f64 = 1e-9;

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    fn test_identical_sentences_score_one(#[case] order: usize) {
        let reference = tokens("<mask> is the capital of <mask>.");
        let hypothesis = reference.clone();
        let score = sentence_bleu(&[reference], &hypothesis, &uniform_weights(order)).unwrap();
        assert!((score - 1.0).abs() < EPS, "{score}");
    }

    #[test]
    fn test_modified_precision_clips_counts() {
        // Classic example from Papineni et al.: "the the the the the the the".
        let hypothesis = tokens("the the the the the the the");
        let references = vec![
            tokens("the cat is on the mat"),
            tokens("there is a cat on the mat"),
        ];
        assert_eq!(modified_precision(&references, &hypothesis, 1), (2, 7));
        assert_eq!(modified_precision(&references, &hypothesis, 2), (0, 6));
    }

    #[test]
    fn test_modified_precision_short_hypothesis() {
        let references = vec![tokens("a b c")];
        assert_eq!(modified_precision(&references, &tokens("a"), 2), (0, 1));
    }

    #[rstest]
    #[case(vec![3, 5], 4, 3)]
    #[case(vec![5, 3], 4, 3)]
    #[case(vec![2, 7], 6, 7)]
    #[case(vec![4], 10, 4)]
    fn test_closest_reference_length(
        #[case] lengths: Vec<usize>,
        #[case] hypothesis: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(closest_reference_length(&lengths, hypothesis), Some(expected))
    }

    #[test]
    fn test_brevity_penalty() {
        assert_eq!(brevity_penalty(4, 5), 1.0);
        assert_eq!(brevity_penalty(4, 4), 1.0);
        assert_eq!(brevity_penalty(4, 0), 0.0);
        assert!((brevity_penalty(4, 2) - (-1.0f64).exp()).abs() < EPS);
    }

    #[test]
    fn test_partial_match_bleu_2() {
        // unigrams: 3/4 matched, bigrams: 2/3 matched, same length so no penalty.
        let reference = tokens("<mask> is capital of");
        let hypothesis = tokens("<mask> is capital in");
        let score = sentence_bleu(&[reference], &hypothesis, &uniform_weights(2)).unwrap();
        let expected = (0.5 * (3.0f64 / 4.0).ln() + 0.5 * (2.0f64 / 3.0).ln()).exp();
        assert!((score - expected).abs() < EPS, "{score} != {expected}");
    }

    #[test]
    fn test_no_unigram_match_is_zero() {
        let score =
            sentence_bleu(&[tokens("a b c")], &tokens("d e f"), &uniform_weights(4)).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_empty_hypothesis_is_zero() {
        let empty: Vec<&str> = vec![];
        let score = sentence_bleu(&[tokens("a b c")], &empty, &uniform_weights(4)).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_missing_higher_order_is_almost_zero() {
        let score = sentence_bleu(&[tokens("a b c d")], &tokens("d c b a"), &uniform_weights(4))
            .unwrap();
        assert!(score > 0.0);
        assert!(score < 1e-50);
    }

    #[test]
    fn test_no_reference_is_an_error() {
        let references: Vec<Vec<&str>> = vec![];
        assert_eq!(
            sentence_bleu(&references, &tokens("a b"), &uniform_weights(2)),
            Err(MetricError::EmptyReferences)
        );
    }

    #[test]
    fn test_no_weight_is_an_error() {
        assert_eq!(
            sentence_bleu(&[tokens("a")], &tokens("a"), &[]),
            Err(MetricError::InvalidWeights)
        );
    }

    #[test]
    fn test_self_bleu_identical_pair_is_maximal() {
        let hypotheses = vec![
            tokens("<mask> is the capital of <mask>."),
            tokens("<mask> is the capital of <mask>."),
        ];
        let score = self_bleu(&hypotheses, &uniform_weights(2)).unwrap();
        assert!((score - 1.0).abs() < EPS);
    }

    #[test]
    fn test_self_bleu_is_lower_for_diverse_lists() {
        let redundant = vec![
            tokens("<mask> is the capital of <mask>."),
            tokens("<mask> is the capital city of <mask>."),
        ];
        let diverse = vec![
            tokens("<mask> is the capital of <mask>."),
            tokens("<mask> governs <mask>."),
        ];
        let weights = uniform_weights(2);
        assert!(self_bleu(&diverse, &weights).unwrap() < self_bleu(&redundant, &weights).unwrap());
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn test_self_bleu_needs_two_hypotheses(#[case] len: usize) {
        let hypotheses: Vec<Vec<&str>> = (0..len).map(|_| tokens("a b")).collect();
        assert_eq!(
            self_bleu(&hypotheses, &uniform_weights(2)),
            Err(MetricError::TooFewHypotheses(len))
        );
    }
}
