// Contextual keyword sentiment: scores every topic keyword in a document by
// blending the oracle's polarity of its context window, the keyword balance of
// that window, and the keyword's own lexicon polarity, with negation flipping
// all three.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use tracing::warn;

use crate::config::{RepeatMode, ScoringConfig};
use crate::nlp::lexicon::{is_negation, Topic};
use crate::nlp::polarity::PolarityOracle;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z]+\b").unwrap());

/// Lowercases and splits into purely alphabetic words. A run of letters
/// glued to digits or other word characters is dropped, not split.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Keyword to score map that remembers first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordScores {
    entries: Vec<(String, f64)>,
    occurrences: Vec<usize>,
    index: HashMap<String, usize>,
}

impl KeywordScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `keyword` to `score`, keeping its original position if present.
    pub fn insert(&mut self, keyword: &str, score: f64) {
        self.record(keyword, score, RepeatMode::LastWins);
    }

    fn record(&mut self, keyword: &str, score: f64, mode: RepeatMode) {
        match self.index.get(keyword) {
            Some(&slot) => {
                let seen = self.occurrences[slot];
                let current = &mut self.entries[slot].1;
                *current = match mode {
                    RepeatMode::LastWins => score,
                    RepeatMode::Average => (*current * seen as f64 + score) / (seen + 1) as f64,
                };
                self.occurrences[slot] = seen + 1;
            }
            None => {
                self.index.insert(keyword.to_string(), self.entries.len());
                self.entries.push((keyword.to_string(), score));
                self.occurrences.push(1);
            }
        }
    }

    pub fn get(&self, keyword: &str) -> Option<f64> {
        self.index.get(keyword).map(|&slot| self.entries[slot].1)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.index.contains_key(keyword)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl FromIterator<(String, f64)> for KeywordScores {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut scores = KeywordScores::new();
        for (keyword, score) in iter {
            scores.insert(&keyword, score);
        }
        scores
    }
}

impl Serialize for KeywordScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (keyword, score) in &self.entries {
            map.serialize_entry(keyword, score)?;
        }
        map.end()
    }
}

/// Scores the topic keywords of one document with the default configuration.
pub fn score_document<O>(text: &str, topic: Topic, oracle: &O) -> KeywordScores
where
    O: PolarityOracle + ?Sized,
{
    score_document_with(text, topic, oracle, &ScoringConfig::default())
}

/// Scores against the default topic's lexicon.
pub fn score_document_default<O>(text: &str, oracle: &O) -> KeywordScores
where
    O: PolarityOracle + ?Sized,
{
    score_document(text, Topic::default(), oracle)
}

pub fn score_document_with<O>(
    text: &str,
    topic: Topic,
    oracle: &O,
    config: &ScoringConfig,
) -> KeywordScores
where
    O: PolarityOracle + ?Sized,
{
    let words = tokenize(text);
    let lexicon = topic.lexicon();
    let mut scores = KeywordScores::new();

    for (i, word) in words.iter().enumerate() {
        if word.len() < config.min_word_len || !lexicon.contains(word) {
            continue;
        }

        let start = i.saturating_sub(config.window_before);
        let end = words.len().min(i + config.window_after);
        let context = &words[start..end];

        let negated = context.iter().any(|w| is_negation(w));
        let mut context_polarity = guarded_polarity(oracle, &context.join(" "));

        let mut positive_count = context.iter().filter(|w| lexicon.is_positive(w)).count();
        let mut negative_count = context.iter().filter(|w| lexicon.is_negative(w)).count();

        let mut base_polarity = if lexicon.is_positive(word) {
            config.base_polarity
        } else {
            -config.base_polarity
        };

        if negated {
            base_polarity = -base_polarity;
            context_polarity = -context_polarity;
            std::mem::swap(&mut positive_count, &mut negative_count);
        }

        let emotion = (positive_count as f64 - negative_count as f64) / context.len().max(1) as f64;

        let score = (config.context_weight * context_polarity
            + config.emotion_weight * emotion
            + config.base_weight * base_polarity)
            .clamp(-1.0, 1.0);

        scores.record(word, score, config.repeat_mode);
    }

    scores
}

/// Oracle polarity of `text`, with blank text, failures and non-finite
/// values all reading as a neutral 0.0.
pub(crate) fn guarded_polarity<O>(oracle: &O, text: &str) -> f64
where
    O: PolarityOracle + ?Sized,
{
    if text.trim().is_empty() {
        return 0.0;
    }
    match oracle.polarity(text) {
        Ok(value) if value.is_finite() => value,
        Ok(value) => {
            warn!(value, text, "polarity oracle returned a non-finite value, using 0.0");
            0.0
        }
        Err(e) => {
            warn!(error = %e, text, "polarity oracle failed, using 0.0");
            0.0
        }
    }
}
