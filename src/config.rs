// Scoring configuration. Defaults reproduce the reference weighting; a JSON
// file may override any subset of fields.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Weight of the oracle's context polarity in a keyword score.
pub const CONTEXT_WEIGHT: f64 = 0.4;
/// Weight of the context's positive/negative keyword balance.
pub const EMOTION_WEIGHT: f64 = 0.3;
/// Weight of the keyword's own lexicon polarity.
pub const BASE_WEIGHT: f64 = 0.3;
/// Magnitude of a keyword's lexicon polarity before weighting.
pub const BASE_POLARITY: f64 = 0.3;
/// Z-scores are divided by this before clamping so that only values beyond
/// three standard deviations saturate at +/-1.
pub const Z_DAMPING: f64 = 3.0;
/// Standard deviations at or below this are treated as zero variance.
pub const MIN_STD_DEV: f64 = 1e-12;
/// Keywords seen in fewer documents are left out of frequency rankings.
pub const MIN_SUPPORT: usize = 2;
pub const MIN_WORD_LEN: usize = 3;
pub const WINDOW_BEFORE: usize = 5;
pub const WINDOW_AFTER: usize = 6;

/// How repeated occurrences of one keyword inside a single document combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    /// The last occurrence's score replaces earlier ones.
    #[default]
    LastWins,
    /// Scores of all occurrences are averaged.
    Average,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub context_weight: f64,
    pub emotion_weight: f64,
    pub base_weight: f64,
    pub base_polarity: f64,
    pub min_word_len: usize,
    /// Tokens taken before the keyword.
    pub window_before: usize,
    /// Exclusive end offset of the window after the keyword.
    pub window_after: usize,
    pub z_damping: f64,
    pub min_support: usize,
    pub repeat_mode: RepeatMode,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            context_weight: CONTEXT_WEIGHT,
            emotion_weight: EMOTION_WEIGHT,
            base_weight: BASE_WEIGHT,
            base_polarity: BASE_POLARITY,
            min_word_len: MIN_WORD_LEN,
            window_before: WINDOW_BEFORE,
            window_after: WINDOW_AFTER,
            z_damping: Z_DAMPING,
            min_support: MIN_SUPPORT,
            repeat_mode: RepeatMode::LastWins,
        }
    }
}

impl ScoringConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let f = File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let config: ScoringConfig = serde_json::from_reader(f)
            .with_context(|| format!("invalid scoring config {}", path.display()))?;
        tracing::debug!(?config, "loaded scoring config");
        Ok(config)
    }
}
