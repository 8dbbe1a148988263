//! Normalizer: trims the raw line, strips merge fields and emoji from a
//! measurement copy, tokenizes it and derives the flags rules look at.
//!
//! The stored subject line is never altered beyond trimming; only the
//! measurement copy loses placeholders and emoji.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::config::scoring::Limits;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{.*?\}").expect("placeholder regex"));
static STANDALONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+\b").expect("standalone number regex"));

/// Everything the rules need, computed once per analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleContext {
    /// Trimmed input, placeholders and emoji included.
    pub raw: String,
    /// Placeholder- and emoji-stripped copy, original case.
    pub measured: String,
    /// Length of `measured` in characters.
    pub length: usize,
    /// Lowercase whitespace-separated words of `measured`.
    pub words: Vec<String>,
    /// `words` with surrounding punctuation dropped; used for keyword lookups.
    pub terms: Vec<String>,
    pub word_count: usize,
    pub unique_words: usize,
    /// Emoji occurrences in `raw`.
    pub emoji_count: usize,
    pub has_digits: bool,
    /// `raw` equals its own uppercase form.
    pub all_caps: bool,
    pub has_question: bool,
    /// `raw` differs from both its lowercase and uppercase forms.
    pub mixed_case: bool,
}

impl RuleContext {
    pub fn raw_len(&self) -> usize {
        self.raw.chars().count()
    }

    pub fn unique_ratio(&self) -> Option<f32> {
        (self.word_count > 0).then(|| self.unique_words as f32 / self.word_count as f32)
    }

    pub fn has_term(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    /// Whole-phrase match over the punctuation-free term sequence.
    pub fn has_phrase(&self, phrase: &str) -> bool {
        let wanted: Vec<&str> = phrase.split_whitespace().collect();
        if wanted.is_empty() || wanted.len() > self.terms.len() {
            return false;
        }
        self.terms
            .windows(wanted.len())
            .any(|w| w.iter().zip(&wanted).all(|(a, b)| a == b))
    }
}

/// Outcome of normalization. The two sentinels stop the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Empty,
    OverLength { chars: usize, words: usize },
    Ready(RuleContext),
}

pub fn normalize(input: &str, limits: &Limits) -> Normalized {
    let raw = input.trim();
    if raw.is_empty() {
        return Normalized::Empty;
    }

    let without_placeholders = PLACEHOLDER.replace_all(raw, "");
    let measured: String = without_placeholders
        .chars()
        .filter(|c| !is_emoji(*c))
        .collect();
    let length = measured.chars().count();

    let words: Vec<String> = measured
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let word_count = words.len();

    if length > limits.max_chars || word_count > limits.max_words {
        return Normalized::OverLength {
            chars: length,
            words: word_count,
        };
    }

    let unique_words = words.iter().collect::<HashSet<_>>().len();
    let terms = words.iter().filter_map(|w| clean_term(w)).collect();
    let upper = raw.to_uppercase();
    let lower = raw.to_lowercase();

    Normalized::Ready(RuleContext {
        raw: raw.to_string(),
        length,
        terms,
        word_count,
        unique_words,
        emoji_count: raw.chars().filter(|c| is_emoji(*c)).count(),
        has_digits: STANDALONE_NUMBER.is_match(raw),
        all_caps: raw == upper,
        has_question: raw.contains('?'),
        mixed_case: raw != upper && raw != lower,
        measured,
        words,
    })
}

/// Emoji blocks: emoticons, misc symbols & pictographs, transport & map,
/// regional indicators.
pub fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F600..=0x1F64F | 0x1F300..=0x1F5FF | 0x1F680..=0x1F6FF | 0x1F1E0..=0x1F1FF
    )
}

fn clean_term(word: &str) -> Option<String> {
    let t = word
        .replace('\u{2019}', "'")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string();
    (!t.is_empty()).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(s: &str) -> RuleContext {
        match normalize(s, &Limits::default()) {
            Normalized::Ready(ctx) => ctx,
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert_eq!(normalize("   \t ", &Limits::default()), Normalized::Empty);
    }

    #[test]
    fn placeholders_leave_measurements_but_not_raw() {
        let ctx = ready("  Hi {name}, your {company} update  ");
        assert_eq!(ctx.raw, "Hi {name}, your {company} update");
        assert_eq!(ctx.measured, "Hi , your  update");
        assert_eq!(ctx.words, vec!["hi", ",", "your", "update"]);
        assert_eq!(ctx.terms, vec!["hi", "your", "update"]);
    }

    #[test]
    fn placeholder_match_is_non_greedy() {
        let ctx = ready("{a} keep {b}");
        assert_eq!(ctx.measured, " keep ");
        assert_eq!(ctx.length, 6);
    }

    #[test]
    fn emoji_counted_on_raw_and_removed_from_measurement() {
        let ctx = ready("Sale \u{1F389} starts \u{1F680}");
        assert_eq!(ctx.emoji_count, 2);
        assert_eq!(ctx.measured, "Sale  starts ");
        assert_eq!(ctx.word_count, 2);
    }

    #[test]
    fn flags() {
        let ctx = ready("Top 10 TIPS?");
        assert!(ctx.has_digits);
        assert!(ctx.has_question);
        assert!(ctx.mixed_case);
        assert!(!ctx.all_caps);

        let ctx = ready("FREE PRIZE NOW");
        assert!(ctx.all_caps);
        assert!(!ctx.mixed_case);
        assert!(!ctx.has_digits);

        // digits glued to letters are not standalone numbers
        assert!(!ready("mp3 player").has_digits);
    }

    #[test]
    fn unique_words_are_counted_after_lowercasing() {
        let ctx = ready("Sale sale SALE today");
        assert_eq!(ctx.word_count, 4);
        assert_eq!(ctx.unique_words, 2);
        assert_eq!(ctx.unique_ratio(), Some(0.5));
    }

    #[test]
    fn only_placeholder_has_no_words() {
        let ctx = ready("{name}");
        assert_eq!(ctx.word_count, 0);
        assert_eq!(ctx.unique_ratio(), None);
    }

    #[test]
    fn guard_limits_are_inclusive() {
        let ctx = ready(&"x".repeat(120));
        assert_eq!(ctx.length, 120);

        let ctx = ready(&vec!["go"; 20].join(" "));
        assert_eq!(ctx.word_count, 20);
    }

    #[test]
    fn guard_on_characters_and_words() {
        let long = "x".repeat(121);
        assert!(matches!(
            normalize(&long, &Limits::default()),
            Normalized::OverLength { chars: 121, words: 1 }
        ));

        let many = vec!["go"; 21].join(" ");
        assert!(matches!(
            normalize(&many, &Limits::default()),
            Normalized::OverLength { words: 21, .. }
        ));

        // placeholders don't count toward the limit
        let padded = format!("{} {{{}}}", "y".repeat(100), "z".repeat(50));
        assert!(matches!(
            normalize(&padded, &Limits::default()),
            Normalized::Ready(_)
        ));
    }

    #[test]
    fn phrase_matching_respects_word_boundaries() {
        let ctx = ready("Limited time offer, don't miss out!");
        assert!(ctx.has_phrase("don't miss"));
        assert!(ctx.has_term("out"));
        assert!(!ready("exact nowhere").has_phrase("act now"));
        assert!(ready("Don\u{2019}t miss this").has_phrase("don't miss"));
    }
}
