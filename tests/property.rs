use proptest::prelude::*;
use substrfill::{apply, learn, materialize, paths, Config};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// `learn` must never panic on an arbitrary single example, whatever
    /// the relationship between input and output turns out to be.
    #[test]
    fn learn_never_panics_on_one_example(input in "[A-Za-z0-9 ]{0,30}", output in "[A-Za-z0-9 ]{0,10}") {
        let config = Config::default();
        let examples = vec![(input, output)];
        let _ = learn(&examples, &config);
    }

    /// When the output is literally a substring of the input, the learned
    /// program space is never empty and every enumerated path reproduces
    /// the example it was learned from.
    #[test]
    fn substring_examples_are_always_reproducible(
        prefix in "[A-Za-z0-9 ]{0,10}",
        middle in "[A-Za-z0-9]{1,8}",
        suffix in "[A-Za-z0-9 ]{0,10}",
    ) {
        let input = format!("{prefix}{middle}{suffix}");
        let config = Config::default();
        let examples = vec![(input.clone(), middle.clone())];
        let dag = learn(&examples, &config).expect("a single example always learns");
        let found = paths(&dag, &config);
        prop_assert!(!found.is_empty());
        for p in found.iter().take(16) {
            let program = materialize(&dag, p);
            let result = apply(&program, &input).expect("apply must not error");
            prop_assert_eq!(result.as_deref(), Some(middle.as_str()));
        }
    }

    /// Applying a program learned from one pair of examples to a wholly
    /// unrelated fresh input must never panic, even when every candidate
    /// fails to resolve.
    #[test]
    fn apply_never_panics_on_unrelated_input(
        a in "[A-Za-z0-9 ]{1,20}",
        b in "[A-Za-z0-9 ]{1,20}",
        fresh in "[A-Za-z0-9 ]{0,20}",
    ) {
        let config = Config::default();
        let examples = vec![(a.clone(), a.clone()), (b.clone(), b.clone())];
        if let Ok(dag) = learn(&examples, &config) {
            for p in paths(&dag, &config).iter().take(8) {
                let program = materialize(&dag, p);
                let _ = apply(&program, &fresh);
            }
        }
    }
}
