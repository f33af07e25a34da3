/**
Text normalization shared by hypotheses and references. Every dataset uses its own placeholder
notation for the two entity slots; they are all mapped onto `MASK` so that generated and curated
paraphrases can be compared token by token.
*/

/// The single mask token every placeholder is unified into.
pub const MASK: &str = "<mask>";

/// Placeholder pairs found in the datasets. `<A>`/`<B>` appear in the bracketed-list references
/// and `[X]`/`[Y]` in the template references.
pub(crate) const ANGLE_PLACEHOLDERS: [&str; 2] = ["<A>", "<B>"];
pub(crate) const SQUARE_PLACEHOLDERS: [&str; 2] = ["[X]", "[Y]"];

/// Replaces the given placeholders by `MASK`, without touching the case nor the surrounding
/// whitespace.
pub(crate) fn replace_placeholders(text: &str, placeholders: &[&str]) -> String {
    placeholders
        .iter()
        .fold(String::from(text), |acc, p| acc.replace(p, MASK))
}

/// Unifies every known placeholder into `MASK`, case-folds and strips the text.
pub fn unify_masks(text: &str) -> String {
    let replaced = replace_placeholders(text, &ANGLE_PLACEHOLDERS);
    let replaced = replace_placeholders(&replaced, &SQUARE_PLACEHOLDERS);
    replaced.to_lowercase().trim().to_string()
}

/// Collapses the `<mask> ... <mask>.<anything>` shape produced by the generators down to a
/// sentence ending with exactly one mask and one period. Anything else is returned unchanged.
pub fn clean_hypothesis(text: &str) -> String {
    let segments: Vec<&str> = text.split(MASK).collect();
    match segments.as_slice() {
        [head, middle, tail] if tail.starts_with('.') => {
            format!("{head}{MASK}{middle}{MASK}.")
        }
        _ => String::from(text),
    }
}

/// Removes the space before the periods of a reference ending with " .".
pub fn clean_reference(text: &str) -> String {
    let mut cleaned = String::from(text);
    while cleaned.ends_with(" .") {
        cleaned = cleaned.replace(" .", ".");
    }
    cleaned
}

/// Full normalization of one generated hypothesis.
pub fn normalize_hypothesis(text: &str) -> String {
    clean_hypothesis(&unify_masks(text))
}

/// Full normalization of one reference paraphrase.
pub fn normalize_reference(text: &str) -> String {
    clean_reference(&unify_masks(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use enum_iterator::{all, Sequence};
    use quickcheck::{Arbitrary, Gen, QuickCheck};
    use rstest::rstest;

    #[rstest]
    #[case("[X] is the capital of [Y]", "<mask> is the capital of <mask>")]
    #[case("<A> Located In <B>", "<mask> located in <mask>")]
    #[case("  <mask> IS the CAPITAL of <mask>.  ", "<mask> is the capital of <mask>.")]
    #[case("no placeholder here", "no placeholder here")]
    fn test_unify_masks(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(unify_masks(input), expected)
    }

    #[rstest]
    #[case("<mask> is born in <mask>.", "<mask> is born in <mask>.")]
    #[case("<mask> is born in <mask>. <mask>", "<mask> is born in <mask>. <mask>")]
    #[case("<mask> is born in <mask>.. and more", "<mask> is born in <mask>.")]
    #[case("<mask> is born in <mask> .", "<mask> is born in <mask> .")]
    #[case("<mask> lives", "<mask> lives")]
    #[case("", "")]
    fn test_clean_hypothesis(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(clean_hypothesis(input), expected)
    }

    #[rstest]
    #[case("<mask> is the capital of <mask> .", "<mask> is the capital of <mask>.")]
    #[case("a . b .", "a. b.")]
    #[case("a  .", "a.")]
    #[case("a . b", "a . b")]
    #[case("already clean.", "already clean.")]
    fn test_clean_reference(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(clean_reference(input), expected)
    }

    #[test]
    fn test_normalize_hypothesis_matches_reference() {
        let hypothesis = normalize_hypothesis("<mask> IS the CAPITAL of <mask>.");
        let reference = normalize_reference("[X] is the capital of [Y] .");
        assert_eq!(hypothesis, "<mask> is the capital of <mask>.");
        assert_eq!(hypothesis, reference);
    }

    /// Vocabulary used to generate template-like strings, with every placeholder notation and
    /// the whitespace/period shapes the cleanup functions care about.
    #[derive(Debug, PartialEq, Hash, Clone, Sequence, Eq)]
    enum Fragment {
        Mask,
        UpperMask,
        X,
        Y,
        A,
        B,
        Space,
        Period,
        SpacePeriod,
        Word,
        UpperWord,
        Tab,
    }

    impl Fragment {
        fn as_str(&self) -> &'static str {
            match self {
                Self::Mask => "<mask>",
                Self::UpperMask => "<MASK>",
                Self::X => "[X]",
                Self::Y => "[Y]",
                Self::A => "<A>",
                Self::B => "<B>",
                Self::Space => " ",
                Self::Period => ".",
                Self::SpacePeriod => " .",
                Self::Word => "capital",
                Self::UpperWord => "Located",
                Self::Tab => "\t",
            }
        }
    }

    #[derive(Debug, Clone)]
    struct TemplateText(String);

    impl Arbitrary for TemplateText {
        fn arbitrary(g: &mut Gen) -> Self {
            let choices: Vec<Fragment> = all::<Fragment>().collect();
            let len = usize::arbitrary(g) % 16;
            let text = (0..len)
                .map(|_| g.choose(&choices).unwrap().as_str())
                .collect::<String>();
            TemplateText(text)
        }
    }

    #[test]
    fn test_normalize_hypothesis_is_idempotent() {
        fn prop(text: TemplateText) -> bool {
            let once = normalize_hypothesis(&text.0);
            normalize_hypothesis(&once) == once
        }
        QuickCheck::new()
            .tests(2000)
            .quickcheck(prop as fn(TemplateText) -> bool);
    }

    #[test]
    fn test_normalize_reference_is_idempotent() {
        fn prop(text: TemplateText) -> bool {
            let once = normalize_reference(&text.0);
            normalize_reference(&once) == once
        }
        QuickCheck::new()
            .tests(2000)
            .quickcheck(prop as fn(TemplateText) -> bool);
    }

    #[test]
    fn test_unify_masks_is_idempotent_on_any_string() {
        fn prop(text: String) -> bool {
            let once = unify_masks(&text);
            unify_masks(&once) == once
        }
        QuickCheck::new().quickcheck(prop as fn(String) -> bool);
    }
}
