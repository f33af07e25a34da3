/**
This module scores the hypotheses of one example against its references. Every (hypothesis,
metric) pair is computed independently and yields a `Result`: a failure never prevents the other
metrics or hypotheses from being scored.
*/
pub mod bleu;
pub mod meteor;
pub mod rouge;

use enum_iterator::{all, Sequence};
use meteor::MeteorParams;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// The metrics reported for every task, in report order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Sequence, Serialize, Deserialize,
)]
pub enum Metric {
    Bleu4,
    Bleu3,
    Bleu2,
    Bleu1,
    Meteor,
    RougeL,
    SelfBleu2,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bleu4 => "bleu-4",
            Self::Bleu3 => "bleu-3",
            Self::Bleu2 => "bleu-2",
            Self::Bleu1 => "bleu-1",
            Self::Meteor => "METEOR",
            Self::RougeL => "ROUGE-L",
            Self::SelfBleu2 => "self-BLEU-2",
        }
    }

    /// Order of the BLEU metrics, `None` for the others.
    pub fn bleu_order(&self) -> Option<usize> {
        match self {
            Self::Bleu4 => Some(4),
            Self::Bleu3 => Some(3),
            Self::Bleu2 | Self::SelfBleu2 => Some(2),
            Self::Bleu1 => Some(1),
            Self::Meteor | Self::RougeL => None,
        }
    }

    /// Per-hypothesis metrics are computed once per generated hypothesis. Self-BLEU is computed
    /// once per example, over the whole list of hypotheses.
    pub fn is_per_hypothesis(&self) -> bool {
        !matches!(self, Self::SelfBleu2)
    }

    pub fn per_hypothesis() -> impl Iterator<Item = Metric> {
        all::<Metric>().filter(Metric::is_per_hypothesis)
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Metric {
    type Err = MetricParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all::<Metric>()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MetricParsingError(String::from(s)))
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MetricParsingError(String);

impl Display for MetricParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Impossible to parse the string ({}) into a Metric", self.0)
    }
}

impl Error for MetricParsingError {}

/// Reasons why a metric could not be computed for a hypothesis.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricError {
    /// The example has no reference to compare against.
    EmptyReferences,
    /// Self-BLEU needs at least two hypotheses.
    TooFewHypotheses(usize),
    /// BLEU was called without any n-gram weight.
    InvalidWeights,
    /// The computation produced a NaN or an infinite value.
    NonFinite(f64),
    /// The metric is not computed per hypothesis.
    NotPerHypothesis(Metric),
}

impl Display for MetricError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyReferences => write!(f, "No reference to score against"),
            Self::TooFewHypotheses(n) => {
                write!(f, "At least 2 hypotheses are needed, got {}", n)
            }
            Self::InvalidWeights => write!(f, "BLEU needs at least one n-gram weight"),
            Self::NonFinite(value) => write!(f, "Metric computation produced {}", value),
            Self::NotPerHypothesis(metric) => {
                write!(f, "{} is not computed per hypothesis", metric)
            }
        }
    }
}

impl Error for MetricError {}

/// Outcome of the scoring of one example.
#[derive(Debug, Clone, PartialEq)]
pub enum ExampleScores {
    /// The inductor did not generate anything. Every per-hypothesis metric is zero-filled and
    /// self-BLEU is left out.
    NoHypothesis,
    /// One outcome per (hypothesis, per-hypothesis metric) pair in hypothesis order, followed by
    /// the self-BLEU outcome of the example.
    Scored(Vec<(Metric, Result<f64, MetricError>)>),
}

impl ExampleScores {
    pub fn failures(&self) -> impl Iterator<Item = (Metric, &MetricError)> {
        let outcomes = match self {
            Self::NoHypothesis => &[][..],
            Self::Scored(outcomes) => outcomes.as_slice(),
        };
        outcomes
            .iter()
            .filter_map(|(metric, outcome)| outcome.as_ref().err().map(|e| (*metric, e)))
    }
}

/// References of one example, tokenized once for every metric.
pub struct PreparedReferences<'a> {
    words: Vec<Vec<&'a str>>,
    rouge_tokens: Vec<Vec<String>>,
}

/// The metric computation context. It owns the stemmer used by METEOR and ROUGE-L and the METEOR
/// parameters. Build one per evaluation and pass it around.
pub struct MetricScorer {
    stemmer: Stemmer,
    meteor_params: MeteorParams,
}

impl Default for MetricScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricScorer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
            meteor_params: MeteorParams::default(),
        }
    }

    pub fn with_meteor_params(mut self, meteor_params: MeteorParams) -> Self {
        self.meteor_params = meteor_params;
        self
    }

    pub fn meteor_params(&self) -> &MeteorParams {
        &self.meteor_params
    }

    pub fn prepare<'a, S: AsRef<str>>(&self, references: &'a [S]) -> PreparedReferences<'a> {
        PreparedReferences {
            words: references
                .iter()
                .map(|r| r.as_ref().split_whitespace().collect())
                .collect(),
            rouge_tokens: references
                .iter()
                .map(|r| rouge::rouge_tokens(&self.stemmer, r.as_ref()))
                .collect(),
        }
    }

    /// Scores one hypothesis with a per-hypothesis metric.
    pub fn score_prepared(
        &self,
        metric: Metric,
        hypothesis: &str,
        references: &PreparedReferences,
    ) -> Result<f64, MetricError> {
        let words: Vec<&str> = hypothesis.split_whitespace().collect();
        match metric {
            Metric::Bleu4 | Metric::Bleu3 | Metric::Bleu2 | Metric::Bleu1 => {
                let order = metric.bleu_order().ok_or(MetricError::InvalidWeights)?;
                bleu::sentence_bleu(&references.words, &words, &bleu::uniform_weights(order))
            }
            Metric::Meteor => meteor::meteor(
                &self.stemmer,
                &self.meteor_params,
                &words,
                &references.words,
            ),
            Metric::RougeL => {
                let tokens = rouge::rouge_tokens(&self.stemmer, hypothesis);
                rouge::best_rouge_l(&references.rouge_tokens, &tokens)
            }
            Metric::SelfBleu2 => Err(MetricError::NotPerHypothesis(metric)),
        }
    }

    pub fn score<S: AsRef<str>>(
        &self,
        metric: Metric,
        hypothesis: &str,
        references: &[S],
    ) -> Result<f64, MetricError> {
        self.score_prepared(metric, hypothesis, &self.prepare(references))
    }

    /// Self-BLEU-2 of a list of hypotheses. The n-grams are taken over the characters of each
    /// hypothesis, not its words.
    pub fn self_bleu<S: AsRef<str>>(&self, hypotheses: &[S]) -> Result<f64, MetricError> {
        let chars: Vec<Vec<char>> = hypotheses
            .iter()
            .map(|h| h.as_ref().chars().collect())
            .collect();
        let order = Metric::SelfBleu2
            .bleu_order()
            .ok_or(MetricError::InvalidWeights)?;
        bleu::self_bleu(&chars, &bleu::uniform_weights(order))
    }

    /// Scores every hypothesis of an example with every metric.
    pub fn score_example<H: AsRef<str>, R: AsRef<str>>(
        &self,
        hypotheses: &[H],
        references: &[R],
    ) -> ExampleScores {
        if hypotheses.is_empty() {
            return ExampleScores::NoHypothesis;
        }
        let prepared = &self.prepare(references);
        let mut outcomes: Vec<(Metric, Result<f64, MetricError>)> = hypotheses
            .iter()
            .flat_map(move |h| {
                Metric::per_hypothesis()
                    .map(move |m| (m, self.score_prepared(m, h.as_ref(), prepared)))
            })
            .collect();
        outcomes.push((Metric::SelfBleu2, self.self_bleu(hypotheses)));
        ExampleScores::Scored(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPS: f64 = 1e-9;

    #[rstest]
    #[case("bleu-4", Metric::Bleu4)]
    #[case("BLEU-1", Metric::Bleu1)]
    #[case("meteor", Metric::Meteor)]
    #[case("ROUGE-L", Metric::RougeL)]
    #[case("self-BLEU-2", Metric::SelfBleu2)]
    fn test_parse_metric(#[case] name: &str, #[case] expected: Metric) {
        assert_eq!(name.parse::<Metric>().unwrap(), expected)
    }

    #[test]
    fn test_metric_order_and_names() {
        let names: Vec<&str> = all::<Metric>().map(|m| m.name()).collect();
        assert_eq!(
            names,
            vec!["bleu-4", "bleu-3", "bleu-2", "bleu-1", "METEOR", "ROUGE-L", "self-BLEU-2"]
        );
        assert_eq!(Metric::per_hypothesis().count(), 6);
    }

    #[test]
    fn test_capital_scenario_scores_one() {
        let scorer = MetricScorer::new();
        let references = vec![String::from("<mask> is the capital of <mask>.")];
        let hypothesis = "<mask> is the capital of <mask>.";
        for metric in [Metric::Bleu4, Metric::Bleu3, Metric::Bleu2, Metric::Bleu1] {
            let score = scorer.score(metric, hypothesis, &references).unwrap();
            assert!((score - 1.0).abs() < EPS, "{metric}: {score}");
        }
        let rouge = scorer.score(Metric::RougeL, hypothesis, &references).unwrap();
        assert!((rouge - 1.0).abs() < EPS);
        let meteor = scorer.score(Metric::Meteor, hypothesis, &references).unwrap();
        assert!(meteor > 0.99 && meteor < 1.0);
    }

    #[test]
    fn test_self_bleu_uses_characters() {
        let scorer = MetricScorer::new();
        let hypotheses = ["<mask> is located in <mask>.", "<mask> is situated in <mask>."];
        let score = scorer.self_bleu(&hypotheses).unwrap();
        assert!((score - 0.8415).abs() < 1e-4, "{score}");
        let words: Vec<Vec<&str>> = hypotheses
            .iter()
            .map(|h| h.split_whitespace().collect())
            .collect();
        let word_level = bleu::self_bleu(&words, &bleu::uniform_weights(2)).unwrap();
        assert!((word_level - 0.6325).abs() < 1e-4, "{word_level}");
    }

    #[test]
    fn test_self_bleu_of_a_single_word_pair() {
        // Words that share no token still share characters.
        let scorer = MetricScorer::new();
        assert!(scorer.self_bleu(&["located", "locate"]).unwrap() > 0.5);
    }

    #[test]
    fn test_self_bleu_is_not_per_hypothesis() {
        let scorer = MetricScorer::new();
        assert_eq!(
            scorer.score(Metric::SelfBleu2, "a", &["a"]),
            Err(MetricError::NotPerHypothesis(Metric::SelfBleu2))
        );
    }

    #[test]
    fn test_empty_hypotheses() {
        let scorer = MetricScorer::new();
        let hypotheses: Vec<String> = vec![];
        assert_eq!(
            scorer.score_example(&hypotheses, &["a b"]),
            ExampleScores::NoHypothesis
        );
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(5)]
    fn test_outcome_counts(#[case] n: usize) {
        let scorer = MetricScorer::new();
        let hypotheses: Vec<String> = (0..n).map(|i| format!("<mask> rel{i} <mask>.")).collect();
        let scores = scorer.score_example(&hypotheses, &["<mask> rel <mask>."]);
        let ExampleScores::Scored(outcomes) = scores else {
            panic!("hypotheses were given")
        };
        for metric in Metric::per_hypothesis() {
            assert_eq!(outcomes.iter().filter(|(m, _)| *m == metric).count(), n);
        }
        let self_bleu: Vec<_> = outcomes
            .iter()
            .filter(|(m, _)| *m == Metric::SelfBleu2)
            .collect();
        assert_eq!(self_bleu.len(), 1);
        assert_eq!(self_bleu[0].1.is_ok(), n >= 2);
    }

    #[test]
    fn test_failures_are_isolated() {
        let scorer = MetricScorer::new();
        let references: Vec<String> = vec![];
        let scores = scorer.score_example(&["a b", "a c"], &references);
        let failures: Vec<_> = scores.failures().collect();
        // Every per-hypothesis metric fails, self-BLEU does not need references.
        assert_eq!(failures.len(), 12);
        assert!(failures
            .iter()
            .all(|(m, e)| m.is_per_hypothesis() && **e == MetricError::EmptyReferences));
    }
}
