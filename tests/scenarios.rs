// tests/scenarios.rs
//
// End-to-end scoring of known subject lines through the public engine entry.

use subject_line_analyzer::analyze::feedback::{
    MSG_EMPTY, VERDICT_EXCELLENT, VERDICT_GOOD, VERDICT_IMPROVE,
};
use subject_line_analyzer::{analyze_subject_line, Outcome, ScoringConfig};

fn score(s: &str) -> (u8, Vec<String>) {
    let a = analyze_subject_line(s, &ScoringConfig::default());
    (a.score, a.feedback)
}

#[test]
fn empty_input_prompts_for_text() {
    let (score, feedback) = score("");
    assert_eq!(score, 0);
    assert_eq!(feedback, vec![MSG_EMPTY.to_string()]);
}

#[test]
fn twenty_five_words_is_over_length() {
    let line = (1..=25).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
    let a = analyze_subject_line(&line, &ScoringConfig::default());
    assert_eq!(a.outcome, Outcome::OverLength);
    assert_eq!(a.score, 0);
    assert_eq!(a.feedback.len(), 3);
    assert!(a.feedback[0].contains("unusually long"));
}

#[test]
fn urgency_line_scores_good() {
    let (score, feedback) = score("Limited time offer, don't miss out!");
    // 50 + 15 (length 35) + 10 (urgency)
    assert_eq!(score, 75);
    assert!(feedback.iter().any(|f| f.starts_with("Optimal length")));
    assert!(feedback
        .iter()
        .any(|f| f.contains("urgency") && f.contains("limited, don't miss")));
    assert_eq!(feedback.last().map(String::as_str), Some(VERDICT_GOOD));
}

#[test]
fn shouting_spam_line_needs_work() {
    let (score, feedback) = score("FREE PRIZE NOW");
    // 50 - 10 (caps) - 10 (spam) + 10 (urgency) + 5 (short)
    assert_eq!(score, 45);
    assert!(feedback.iter().any(|f| f.contains("ALL CAPS")));
    assert!(feedback.iter().any(|f| f.contains("spam: free, prize")));
    assert_eq!(feedback.last().map(String::as_str), Some(VERDICT_IMPROVE));
}

#[test]
fn many_best_practices_score_excellent() {
    // personalization, optimal length, variety, urgency, emoji, impactful,
    // cta, question, digits
    let line = "{name}, discover 5 new picks today \u{1F381} want to see?";
    let (score, feedback) = score(line);
    assert_eq!(score, 100);
    assert_eq!(feedback.last().map(String::as_str), Some(VERDICT_EXCELLENT));
}

#[test]
fn personalization_token_excluded_from_length() {
    let with = analyze_subject_line("Hi {company} team", &ScoringConfig::default());
    assert!(with.feedback[0].starts_with("Good use of personalization"));
    assert_eq!(with.subject_line, "Hi {company} team");
    // 50 + 10 (personalization) + 5 (short)
    assert_eq!(with.score, 65);
}
