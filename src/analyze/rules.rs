//! Rule engine: an ordered table of independent rules over `RuleContext`.
//!
//! Each rule yields at most one `RuleHit` (score delta + feedback line). Order
//! only decides where a line shows up in the feedback, never the total.
//!
//! Word-list rules are data: `ScoringConfig::keywords` holds
//! `{name, words, delta, template}` entries and `keyword_hit` evaluates any
//! of them. The canonical lists (`urgency`, `impactful`, `cta`, `spam`) are
//! slotted between the built-in checks; any extra lists from the config run
//! after the table in file order.

use serde::Serialize;

use super::normalize::RuleContext;
use crate::config::scoring::{KeywordRule, ScoringConfig, WORDS_PLACEHOLDER};

const MSG_PERSONALIZATION: &str =
    "Good use of personalization! This can significantly increase open rates and engagement.";
const MSG_VARIETY: &str =
    "Good word variety, which can make your subject line more engaging and interesting.";
const MSG_SINGLE_EMOJI: &str =
    "Good use of a single emoji. This can increase visual appeal without overwhelming.";
const MSG_MULTIPLE_EMOJI: &str =
    "Caution: multiple emojis detected. Use them sparingly to keep the subject line professional.";
const MSG_CAPITALIZATION: &str =
    "Proper use of capitalization improves readability and professionalism.";
const MSG_QUESTION: &str = "Using a question can pique curiosity and boost open rates.";
const MSG_ALL_CAPS: &str =
    "Avoid using ALL CAPS as it may trigger spam filters and appear like shouting.";
const MSG_DIGITS: &str =
    "Including numbers can make your subject line more specific and compelling.";

/// One rule firing: who, how many points, what to tell the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleHit {
    pub rule: String,
    pub delta: i32,
    pub message: String,
}

impl RuleHit {
    fn new(rule: &str, delta: i32, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            delta,
            message: message.into(),
        }
    }
}

type RuleFn = fn(&RuleContext, &ScoringConfig) -> Option<RuleHit>;

#[derive(Clone, Copy)]
enum Step {
    Builtin(RuleFn),
    Keywords(&'static str),
}

/// Canonical evaluation order.
const PLAN: &[Step] = &[
    Step::Builtin(personalization),
    Step::Builtin(length),
    Step::Builtin(variety),
    Step::Keywords("urgency"),
    Step::Builtin(emoji),
    Step::Keywords("impactful"),
    Step::Keywords("cta"),
    Step::Builtin(capitalization),
    Step::Builtin(question),
    Step::Builtin(all_caps),
    Step::Builtin(digits),
    Step::Keywords("spam"),
];

/// Run every rule; hits come back in display order.
pub fn evaluate(ctx: &RuleContext, cfg: &ScoringConfig) -> Vec<RuleHit> {
    let mut hits = Vec::new();

    for step in PLAN {
        match step {
            Step::Builtin(rule) => hits.extend(rule(ctx, cfg)),
            Step::Keywords(name) => {
                if let Some(rule) = cfg.keyword(name) {
                    hits.extend(keyword_hit(rule, ctx));
                }
            }
        }
    }

    for rule in cfg.keywords.iter().filter(|k| !is_planned(&k.name)) {
        hits.extend(keyword_hit(rule, ctx));
    }

    hits
}

fn is_planned(name: &str) -> bool {
    PLAN.iter()
        .any(|s| matches!(s, Step::Keywords(n) if *n == name))
}

/// Generic word-list rule. Matches are listed in table order.
pub fn keyword_hit(rule: &KeywordRule, ctx: &RuleContext) -> Option<RuleHit> {
    let matched: Vec<&str> = rule
        .words
        .iter()
        .map(String::as_str)
        .filter(|w| keyword_matches(w, ctx))
        .collect();
    if matched.is_empty() {
        return None;
    }
    let message = rule.template.replace(WORDS_PLACEHOLDER, &matched.join(", "));
    Some(RuleHit::new(&rule.name, rule.delta, message))
}

fn keyword_matches(word: &str, ctx: &RuleContext) -> bool {
    let w = word.trim().to_lowercase();
    if w.contains(char::is_whitespace) {
        ctx.has_phrase(&w)
    } else {
        ctx.has_term(&w)
    }
}

// --- built-in rules ---

fn personalization(ctx: &RuleContext, cfg: &ScoringConfig) -> Option<RuleHit> {
    let raw = ctx.raw.to_lowercase();
    cfg.merge_fields
        .iter()
        .any(|f| raw.contains(&f.to_lowercase()))
        .then(|| RuleHit::new("personalization", cfg.points.personalization, MSG_PERSONALIZATION))
}

fn length(ctx: &RuleContext, cfg: &ScoringConfig) -> Option<RuleHit> {
    let l = &cfg.length;
    let hit = if ctx.length < l.optimal_min {
        RuleHit::new(
            "length",
            l.short,
            format!(
                "Your subject line is concise, which can be effective. Consider adding more detail to reach {}-{} characters for optimal impact.",
                l.optimal_min, l.optimal_max
            ),
        )
    } else if ctx.length > l.optimal_max {
        RuleHit::new(
            "length",
            l.long,
            format!(
                "Your subject line is too long. Try to keep it under {} characters to prevent truncation in some email clients.",
                l.optimal_max
            ),
        )
    } else {
        RuleHit::new(
            "length",
            l.optimal,
            format!(
                "Optimal length! Your subject line is within the recommended range of {}-{} characters.",
                l.optimal_min, l.optimal_max
            ),
        )
    };
    Some(hit)
}

fn variety(ctx: &RuleContext, cfg: &ScoringConfig) -> Option<RuleHit> {
    let v = &cfg.variety;
    if ctx.word_count < v.min_words {
        return None;
    }
    let ratio = ctx.unique_ratio()?;
    (ratio > v.min_ratio).then(|| RuleHit::new("variety", v.points, MSG_VARIETY))
}

fn emoji(ctx: &RuleContext, cfg: &ScoringConfig) -> Option<RuleHit> {
    match ctx.emoji_count {
        0 => None,
        1 => Some(RuleHit::new("emoji", cfg.points.single_emoji, MSG_SINGLE_EMOJI)),
        _ => Some(RuleHit::new("emoji", cfg.points.multiple_emoji, MSG_MULTIPLE_EMOJI)),
    }
}

fn capitalization(ctx: &RuleContext, cfg: &ScoringConfig) -> Option<RuleHit> {
    let points = cfg.points.capitalization;
    (points != 0 && ctx.mixed_case)
        .then(|| RuleHit::new("capitalization", points, MSG_CAPITALIZATION))
}

fn question(ctx: &RuleContext, cfg: &ScoringConfig) -> Option<RuleHit> {
    ctx.has_question
        .then(|| RuleHit::new("question", cfg.points.question, MSG_QUESTION))
}

fn all_caps(ctx: &RuleContext, cfg: &ScoringConfig) -> Option<RuleHit> {
    (ctx.all_caps && ctx.raw_len() > cfg.all_caps_min_len)
        .then(|| RuleHit::new("all_caps", cfg.points.all_caps, MSG_ALL_CAPS))
}

fn digits(ctx: &RuleContext, cfg: &ScoringConfig) -> Option<RuleHit> {
    ctx.has_digits
        .then(|| RuleHit::new("digits", cfg.points.digits, MSG_DIGITS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::normalize::{normalize, Normalized};

    fn ctx(s: &str) -> RuleContext {
        match normalize(s, &ScoringConfig::default().limits) {
            Normalized::Ready(c) => c,
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    fn hits(s: &str) -> Vec<RuleHit> {
        evaluate(&ctx(s), &ScoringConfig::default())
    }

    fn hit<'a>(all: &'a [RuleHit], rule: &str) -> Option<&'a RuleHit> {
        all.iter().find(|h| h.rule == rule)
    }

    #[test]
    fn length_bands() {
        let short = hits("Hello there");
        assert_eq!(hit(&short, "length").unwrap().delta, 5);

        let optimal = hits("Our spring collection has landed in store");
        let h = hit(&optimal, "length").unwrap();
        assert_eq!(h.delta, 15);
        assert!(h.message.starts_with("Optimal length"));

        let long = hits("This is a deliberately long subject line that goes on past sixty chars");
        let h = hit(&long, "length").unwrap();
        assert_eq!(h.delta, 0);
        assert!(h.message.contains("too long"));
    }

    #[test]
    fn personalization_is_case_insensitive_and_uses_raw() {
        let all = hits("Hey {NAME}, a note for you");
        assert_eq!(hit(&all, "personalization").unwrap().delta, 10);
        assert!(hit(&hits("Hey {first}, a note"), "personalization").is_none());
    }

    #[test]
    fn keyword_lists_match_tokens_not_substrings() {
        let all = hits("Nowhere to go, snowfall knows");
        assert!(hit(&all, "urgency").is_none());

        let all = hits("Only today: new arrivals, buy now!");
        let urgency = hit(&all, "urgency").unwrap();
        assert_eq!(urgency.delta, 10);
        assert!(urgency.message.contains("only, now, today"));
        assert_eq!(hit(&all, "impactful").unwrap().delta, 5);
        assert!(hit(&all, "cta").unwrap().message.contains(": buy."));
    }

    #[test]
    fn phrases_match_across_tokens() {
        let all = hits("Act now and find out more");
        assert!(hit(&all, "spam").unwrap().message.contains("act now"));
        assert!(hit(&all, "cta").unwrap().message.contains("find out"));
    }

    #[test]
    fn emoji_single_and_multiple() {
        let one = hits("Fresh picks \u{1F600}");
        assert_eq!(hit(&one, "emoji").unwrap().delta, 5);
        let many = hits("Fresh \u{1F600} picks \u{1F680}");
        let h = hit(&many, "emoji").unwrap();
        assert_eq!(h.delta, 0);
        assert!(h.message.starts_with("Caution"));
    }

    #[test]
    fn all_caps_needs_more_than_ten_chars() {
        assert_eq!(hit(&hits("FREE PRIZE NOW"), "all_caps").unwrap().delta, -10);
        assert!(hit(&hits("SALE TODAY"), "all_caps").is_none());
    }

    #[test]
    fn capitalization_disabled_by_default() {
        assert!(hit(&hits("Spring Sale"), "capitalization").is_none());

        let mut cfg = ScoringConfig::default();
        cfg.points.capitalization = 5;
        let all = evaluate(&ctx("Spring Sale"), &cfg);
        assert_eq!(hit(&all, "capitalization").unwrap().delta, 5);
        assert!(hit(&evaluate(&ctx("spring sale"), &cfg), "capitalization").is_none());
    }

    #[test]
    fn question_and_digits() {
        let all = hits("Ready for 5 tips?");
        assert_eq!(hit(&all, "question").unwrap().delta, 5);
        assert_eq!(hit(&all, "digits").unwrap().delta, 5);
    }

    #[test]
    fn variety_needs_enough_words() {
        let seven = hits("one two three four five six seven");
        assert_eq!(hit(&seven, "variety").unwrap().delta, 10);
        assert!(hit(&hits("one two three"), "variety").is_none());
        assert!(hit(&hits("go go go go go go go"), "variety").is_none());
    }

    #[test]
    fn display_order_follows_table() {
        let all = hits("Don't miss our new sale - buy now? 50 FREE");
        let order: Vec<&str> = all.iter().map(|h| h.rule.as_str()).collect();
        assert_eq!(
            order,
            vec!["length", "variety", "urgency", "impactful", "cta", "question", "digits", "spam"]
        );
    }

    #[test]
    fn extra_keyword_lists_run_after_table() {
        let mut cfg = ScoringConfig::default();
        cfg.keywords.push(KeywordRule::new(
            "seasonal",
            &["holiday", "black friday"],
            3,
            "Seasonal hook: {words}.",
        ));
        let all = evaluate(&ctx("Black Friday holiday deals"), &cfg);
        let last = all.last().unwrap();
        assert_eq!(last.rule, "seasonal");
        assert_eq!(last.message, "Seasonal hook: holiday, black friday.");
    }
}
