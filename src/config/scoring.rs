//! Scoring table: point values, thresholds and keyword lists, loaded from TOML.
//!
//! Every field has a built-in default, so an empty file (or no file at all)
//! yields the canonical rule table. Example override:
//!
//! ```toml
//! base_score = 50
//!
//! [points]
//! capitalization = 5
//!
//! [[keywords]]
//! name = "seasonal"
//! words = ["holiday", "black friday"]
//! delta = 5
//! template = "Seasonal hook: {words}."
//! ```
//!
//! Lookup order for the file: `$SCORING_CONFIG_PATH`, then `config/scoring.toml`.
//! `HotReloadScoring` re-reads the file when its mtime changes.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
    time::SystemTime,
};
use tracing::{info, warn};

pub const DEFAULT_SCORING_CONFIG_PATH: &str = "config/scoring.toml";
pub const ENV_SCORING_CONFIG_PATH: &str = "SCORING_CONFIG_PATH";

/// Placeholder in keyword templates replaced by the matched words.
pub const WORDS_PLACEHOLDER: &str = "{words}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Score before any rule contributes.
    pub base_score: i32,
    pub limits: Limits,
    pub length: LengthRule,
    pub variety: VarietyRule,
    pub points: Points,
    /// An all-uppercase line is only penalized above this many characters.
    pub all_caps_min_len: usize,
    /// Merge fields that count as personalization (matched case-insensitively).
    pub merge_fields: Vec<String>,
    /// Declarative word-list rules, evaluated by one generic routine.
    pub keywords: Vec<KeywordRule>,
    pub verdict: VerdictThresholds,
}

/// Short-circuit guard for lines no rule table should bother with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_chars: usize,
    pub max_words: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthRule {
    pub optimal_min: usize,
    pub optimal_max: usize,
    pub optimal: i32,
    pub short: i32,
    pub long: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarietyRule {
    /// unique/total must be strictly above this.
    pub min_ratio: f32,
    /// Lines shorter than this never earn the bonus. At 7 the stock
    /// examples ("Limited time offer, don't miss out!" = 75,
    /// "FREE PRIZE NOW" = 45) score as documented.
    pub min_words: usize,
    pub points: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Points {
    pub personalization: i32,
    pub single_emoji: i32,
    pub multiple_emoji: i32,
    /// Mixed-case bonus; 0 disables the rule entirely.
    pub capitalization: i32,
    pub question: i32,
    pub all_caps: i32,
    pub digits: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdictThresholds {
    pub excellent: u8,
    pub good: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub name: String,
    /// Single words match whole tokens; entries with a space match as phrases.
    pub words: Vec<String>,
    pub delta: i32,
    /// Feedback line; `{words}` is replaced with the matches, comma separated.
    pub template: String,
}

impl KeywordRule {
    pub fn new(name: &str, words: &[&str], delta: i32, template: &str) -> Self {
        Self {
            name: name.to_string(),
            words: words.iter().map(|w| w.to_string()).collect(),
            delta,
            template: template.to_string(),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_chars: 120,
            max_words: 20,
        }
    }
}

impl Default for LengthRule {
    fn default() -> Self {
        Self {
            optimal_min: 30,
            optimal_max: 60,
            optimal: 15,
            short: 5,
            long: 0,
        }
    }
}

impl Default for VarietyRule {
    fn default() -> Self {
        Self {
            min_ratio: 0.8,
            min_words: 7,
            points: 10,
        }
    }
}

impl Default for Points {
    fn default() -> Self {
        Self {
            personalization: 10,
            single_emoji: 5,
            multiple_emoji: 0,
            capitalization: 0,
            question: 5,
            all_caps: -10,
            digits: 5,
        }
    }
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            excellent: 90,
            good: 70,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 50,
            limits: Limits::default(),
            length: LengthRule::default(),
            variety: VarietyRule::default(),
            points: Points::default(),
            all_caps_min_len: 10,
            merge_fields: vec!["{name}".to_string(), "{company}".to_string()],
            keywords: default_keywords(),
            verdict: VerdictThresholds::default(),
        }
    }
}

/// The canonical English word lists.
pub fn default_keywords() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new(
            "urgency",
            &[
                "limited",
                "exclusive",
                "don't miss",
                "last chance",
                "ending soon",
                "only",
                "hurry",
                "quick",
                "fast",
                "now",
                "today",
            ],
            10,
            "Effective use of urgency or scarcity: {words}. This can motivate recipients to open your email.",
        ),
        KeywordRule::new(
            "impactful",
            &[
                "new",
                "announcement",
                "important",
                "breaking",
                "alert",
                "update",
                "introducing",
                "discover",
                "revealed",
                "finally",
            ],
            5,
            "Strong word choice: {words}. These words can grab attention and increase open rates.",
        ),
        KeywordRule::new(
            "cta",
            &[
                "get",
                "download",
                "try",
                "buy",
                "subscribe",
                "learn",
                "discover",
                "find out",
                "see",
                "watch",
            ],
            5,
            "Includes a clear call to action: {words}. This can encourage recipients to engage with your email.",
        ),
        KeywordRule::new(
            "spam",
            &[
                "free",
                "guarantee",
                "no obligation",
                "winner",
                "congratulations",
                "prize",
                "urgent",
                "act now",
            ],
            -10,
            "Caution: Your subject line contains words often associated with spam: {words}. Consider alternatives to improve deliverability.",
        ),
    ]
}

impl ScoringConfig {
    /// Parse a TOML document; missing fields fall back to defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: ScoringConfig = toml::from_str(s)?;
        Ok(cfg.sanitized())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading scoring config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing scoring config {}", path.display()))
    }

    pub fn keyword(&self, name: &str) -> Option<&KeywordRule> {
        self.keywords.iter().find(|k| k.name == name)
    }

    fn sanitized(mut self) -> Self {
        self.variety.min_ratio = self.variety.min_ratio.clamp(0.0, 1.0);
        if self.length.optimal_min > self.length.optimal_max {
            std::mem::swap(&mut self.length.optimal_min, &mut self.length.optimal_max);
        }
        if self.verdict.good > self.verdict.excellent {
            std::mem::swap(&mut self.verdict.good, &mut self.verdict.excellent);
        }
        self.merge_fields.retain(|f| !f.trim().is_empty());
        self.keywords.retain(|k| !k.words.is_empty());
        self
    }
}

/// Resolve the scoring file:
/// 1) $SCORING_CONFIG_PATH (must exist)
/// 2) config/scoring.toml
pub fn resolve_path() -> Result<Option<PathBuf>> {
    if let Ok(p) = std::env::var(ENV_SCORING_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Ok(Some(pb));
        }
        return Err(anyhow!(
            "{ENV_SCORING_CONFIG_PATH} points to non-existent path {}",
            pb.display()
        ));
    }
    let fallback = PathBuf::from(DEFAULT_SCORING_CONFIG_PATH);
    Ok(fallback.exists().then_some(fallback))
}

/// Scoring config that follows its file on disk (or stays fixed without one).
#[derive(Debug)]
pub struct HotReloadScoring {
    path: Option<PathBuf>,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    config: ScoringConfig,
    last_modified: Option<SystemTime>,
}

impl HotReloadScoring {
    pub fn fixed(config: ScoringConfig) -> Self {
        Self {
            path: None,
            inner: RwLock::new(State {
                config,
                last_modified: None,
            }),
        }
    }

    /// Resolve the file (env var, then `config/`) and watch it; built-in
    /// table, fixed, when there is none.
    pub fn load_default() -> Result<Self> {
        match resolve_path()? {
            Some(path) => {
                let initial = ScoringConfig::load_from(&path)?;
                Ok(Self::watching(path, initial))
            }
            None => Ok(Self::fixed(ScoringConfig::default())),
        }
    }

    /// `initial` should be the config already parsed from `path`.
    pub fn watching(path: PathBuf, initial: ScoringConfig) -> Self {
        let last_modified = modified(&path);
        info!(path = %path.display(), "watching scoring config");
        Self {
            path: Some(path),
            inner: RwLock::new(State {
                config: initial,
                last_modified,
            }),
        }
    }

    /// Latest config, reloading if the file changed. A file that fails to
    /// parse keeps the previous config in place.
    pub fn current(&self) -> ScoringConfig {
        let Some(path) = &self.path else {
            return self.read().config.clone();
        };

        let mtime = modified(path);
        {
            let guard = self.read();
            if mtime.is_none() || guard.last_modified == mtime {
                return guard.config.clone();
            }
        }

        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if guard.last_modified != mtime {
            match ScoringConfig::load_from(path) {
                Ok(cfg) => {
                    info!(path = %path.display(), "scoring config reloaded");
                    guard.config = cfg;
                }
                Err(e) => warn!(error = ?e, "scoring config reload failed; keeping previous"),
            }
            guard.last_modified = mtime;
        }
        guard.config.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
