//! Property tests for the keyword classifier
//!
//! Encodes the classification laws: analysis keywords dominate code
//! keywords unconditionally, and input matching nothing is always text.

use modelgate::classifier::classify;
use modelgate::routing::Category;
use proptest::prelude::*;

/// Alphabet with no Latin or Cyrillic letters; keyword lists are all
/// letters, so nothing drawn from here can ever match
const NEUTRAL: &str = "[0-9 .,:;!?]{0,64}";

proptest! {
    #[test]
    fn neutral_input_is_always_text(s in NEUTRAL) {
        prop_assert_eq!(classify(&s), Category::Text);
    }

    #[test]
    fn analysis_keyword_dominates_any_surrounding_text(
        prefix in ".{0,64}",
        suffix in ".{0,64}",
        keyword in prop::sample::select(vec![
            "анализ", "проверь", "ошибк", "баг", "оптимиз",
            "производительность", "безопасность", "review",
            "рефактор", "улучш", "исправ",
        ]),
    ) {
        let message = format!("{prefix}{keyword}{suffix}");
        prop_assert_eq!(classify(&message), Category::Analysis);
    }

    #[test]
    fn code_keyword_in_neutral_text_is_code(
        prefix in NEUTRAL,
        suffix in NEUTRAL,
        keyword in prop::sample::select(vec![
            "код", "программ", "function", "class", "javascript",
            "python", "sql", "алгоритм", "функц", "переменная",
        ]),
    ) {
        let message = format!("{prefix}{keyword}{suffix}");
        prop_assert_eq!(classify(&message), Category::Code);
    }

    #[test]
    fn analysis_beats_code_when_both_present(
        analysis_kw in prop::sample::select(vec!["проверь", "баг", "review", "оптимиз"]),
        code_kw in prop::sample::select(vec!["function", "код", "python", "алгоритм"]),
        swap in any::<bool>(),
    ) {
        let message = if swap {
            format!("{code_kw} {analysis_kw}")
        } else {
            format!("{analysis_kw} {code_kw}")
        };
        prop_assert_eq!(classify(&message), Category::Analysis);
    }

    #[test]
    fn classification_never_panics(s in "\\PC*") {
        let _ = classify(&s);
    }

    #[test]
    fn uppercasing_does_not_change_the_result(s in "[a-zA-Z ]{0,64}") {
        prop_assert_eq!(classify(&s.to_uppercase()), classify(&s.to_lowercase()));
    }
}
