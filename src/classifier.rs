//! Keyword-based message classification
//!
//! Fast, deterministic classification using substring matching on the
//! lowercased message. Zero LLM overhead - all decisions are pure CPU logic.
//!
//! Matching is substring containment, not whole-word: "оптимизируй" matches
//! the stem "оптимиз", and an English word containing "for" matches the
//! code keyword "for". Analysis keywords strictly dominate code keywords
//! regardless of match count or position.

use crate::routing::Category;

/// Keywords indicating review, debugging, optimization, or security intent.
///
/// Checked first: a message asking to *check* code is an analysis request
/// even when it also contains code tokens.
const ANALYSIS_KEYWORDS: &[&str] = &[
    "анализ",
    "проверь",
    "ошибк",
    "баг",
    "оптимиз",
    "производительность",
    "безопасность",
    "review",
    "рефактор",
    "улучш",
    "исправ",
];

/// Programming-language tokens, syntax keywords, and domain terms.
const CODE_KEYWORDS: &[&str] = &[
    "код",
    "программ",
    "function",
    "class",
    "def",
    "var",
    "const",
    "let",
    "import",
    "export",
    "if",
    "else",
    "for",
    "while",
    "try",
    "catch",
    "javascript",
    "python",
    "react",
    "html",
    "css",
    "sql",
    "api",
    "алгоритм",
    "функц",
    "класс",
    "метод",
    "переменная",
];

/// Classify a message into a [`Category`]
///
/// # Classification Logic
/// 1. Lowercase the input
/// 2. If any analysis keyword is contained, return `Analysis`
/// 3. Otherwise, if any code keyword is contained, return `Code`
/// 4. Otherwise return `Text` (the empty string matches nothing)
///
/// Pure function; no side effects.
pub fn classify(message: &str) -> Category {
    let lowered = message.to_lowercase();

    if ANALYSIS_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        return Category::Analysis;
    }

    if CODE_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        return Category::Code;
    }

    Category::Text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_text() {
        assert_eq!(classify(""), Category::Text);
    }

    #[test]
    fn whitespace_only_is_text() {
        assert_eq!(classify("   \n\t  "), Category::Text);
    }

    #[test]
    fn plain_greeting_is_text() {
        assert_eq!(classify("привет, как дела?"), Category::Text);
    }

    #[test]
    fn javascript_request_is_code() {
        assert_eq!(
            classify("напиши функцию сортировки массива на JavaScript"),
            Category::Code
        );
    }

    #[test]
    fn check_request_is_analysis_despite_code_content() {
        // "проверь" wins even though the message contains a function definition
        assert_eq!(
            classify("проверь этот код на ошибки: function test() {}"),
            Category::Analysis
        );
    }

    #[test]
    fn solid_principles_matches_code_stem() {
        // "программировании" contains the stem "программ"; substring
        // containment classifies this as code, not text
        assert_eq!(
            classify("расскажи о принципах SOLID в программировании"),
            Category::Code
        );
    }

    #[test]
    fn analysis_dominates_regardless_of_code_match_count() {
        let msg = "review: function class def var const let import export python sql api";
        assert_eq!(classify(msg), Category::Analysis);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("REVIEW THIS"), Category::Analysis);
        assert_eq!(classify("Напиши Алгоритм"), Category::Code);
    }

    #[test]
    fn substring_false_positive_preserved() {
        // "performance" contains "for" - containment semantics are
        // intentional, matching the configured keyword list as-is
        assert_eq!(classify("tell me about performance art"), Category::Code);
    }

    #[test]
    fn russian_code_stems_match_inflected_forms() {
        assert_eq!(classify("объясни этот алгоритм"), Category::Code);
        assert_eq!(classify("создай функцию"), Category::Code);
        assert_eq!(classify("что такое метод?"), Category::Code);
    }

    #[test]
    fn russian_analysis_stems_match_inflected_forms() {
        assert_eq!(classify("оптимизируй запрос"), Category::Analysis);
        assert_eq!(classify("найди баги"), Category::Analysis);
        assert_eq!(classify("исправь это"), Category::Analysis);
    }

    #[test]
    fn non_latin_non_cyrillic_text_is_text() {
        assert_eq!(classify("こんにちは、元気ですか"), Category::Text);
    }
}
