// General-purpose text polarity: the oracle capability consumed by the keyword
// scorer, a lexicon-based default implementation, and a memoizing wrapper.
use anyhow::Result;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Scores arbitrary text on [-1, 1], independent of any topic lexicon.
///
/// Any `Fn(&str) -> f64` closure is an oracle, which keeps tests free of a
/// real scorer. Implementations may fail; callers in this crate treat a
/// failure as a neutral 0.0 for the text in question.
pub trait PolarityOracle {
    fn polarity(&self, text: &str) -> Result<f64>;
}

impl<F> PolarityOracle for F
where
    F: Fn(&str) -> f64,
{
    fn polarity(&self, text: &str) -> Result<f64> {
        Ok(self(text))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: String,
    pub score: f64,
}

// Positive words lexicon
static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "good", "great", "excellent", "wonderful", "fantastic", "amazing", "awesome",
        "love", "happy", "joy", "pleased", "delighted", "satisfied", "perfect",
        "beautiful", "brilliant", "outstanding", "superb", "magnificent", "marvelous",
        "terrific", "fabulous", "exceptional", "impressive", "remarkable", "best",
        "better", "positive", "advantage", "benefit", "success", "successful",
        "win", "winner", "winning", "accomplished", "achievement", "triumph",
        "enjoy", "pleasant", "comfortable", "excited", "exciting", "thrilled",
        "approve", "approved", "approval", "like", "liked", "favorite", "prefer",
        "affordable", "safe", "fair", "helpful", "hopeful", "grateful", "relief",
    ].iter().copied().collect()
});

// Negative words lexicon
static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bad", "terrible", "awful", "horrible", "poor", "worst", "worse",
        "hate", "angry", "sad", "upset", "disappointed", "dissatisfied", "unhappy",
        "fail", "failure", "failed", "problem", "issue", "wrong", "error",
        "difficult", "hard", "tough", "struggle", "struggling", "broken",
        "pain", "painful", "hurt", "hurting", "damage", "damaged", "disaster",
        "negative", "loss", "lose", "losing", "lost", "defeat", "defeated",
        "reject", "rejected", "rejection", "dislike", "disliked", "unpleasant",
        "uncomfortable", "disappointing", "frustrate", "frustrated", "frustrating",
        "unfair", "unsafe", "desperate", "hopeless", "scared", "cruel",
    ].iter().copied().collect()
});

// Intensifiers
static INTENSIFIERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["very", "extremely", "absolutely", "really", "incredibly", "highly", "totally"]
        .iter().copied().collect()
});

// Negation words
static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["not", "no", "never", "nothing", "nobody", "nowhere", "neither", "nor", "none"]
        .iter().copied().collect()
});

const INTENSIFIER_MULTIPLIER: f64 = 1.5;
const NEUTRAL_BAND: f64 = 0.05;

/// Built-in oracle backed by a small general-purpose word list.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconPolarity;

impl PolarityOracle for LexiconPolarity {
    fn polarity(&self, text: &str) -> Result<f64> {
        Ok(lexicon_polarity(text))
    }
}

/// Mean signed weight of the sentiment words in `text`, clamped to [-1, 1].
/// An intensifier right before a word scales it by 1.5; a negation in the
/// two preceding words flips its sign. Text without sentiment words is 0.0.
pub fn lexicon_polarity(text: &str) -> f64 {
    let words: Vec<String> = text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    let mut total = 0.0;
    let mut hits = 0usize;

    for (i, word) in words.iter().enumerate() {
        let sign = if POSITIVE_WORDS.contains(word.as_str()) {
            1.0
        } else if NEGATIVE_WORDS.contains(word.as_str()) {
            -1.0
        } else {
            continue;
        };

        let multiplier = if i > 0 && INTENSIFIERS.contains(words[i - 1].as_str()) {
            INTENSIFIER_MULTIPLIER
        } else {
            1.0
        };

        let is_negated = (i > 0 && NEGATIONS.contains(words[i - 1].as_str()))
            || (i > 1 && NEGATIONS.contains(words[i - 2].as_str()));

        let weight = sign * multiplier;
        total += if is_negated { -weight } else { weight };
        hits += 1;
    }

    if hits == 0 {
        return 0.0;
    }
    (total / hits as f64).clamp(-1.0, 1.0)
}

/// Labels a polarity value, treating |p| <= 0.05 as neutral.
pub fn classify(polarity: f64) -> Sentiment {
    if polarity > NEUTRAL_BAND {
        Sentiment { label: "Positive".to_string(), score: polarity }
    } else if polarity < -NEUTRAL_BAND {
        Sentiment { label: "Negative".to_string(), score: polarity }
    } else {
        Sentiment { label: "Neutral".to_string(), score: polarity }
    }
}

/// Memoizes an oracle per distinct input string. Context windows repeat a
/// lot across a corpus, so this pays off for expensive oracles. Failures are
/// passed through and not cached.
pub struct CachedPolarity<O> {
    inner: O,
    cache: Mutex<HashMap<String, f64>>,
}

impl<O: PolarityOracle> CachedPolarity<O> {
    pub fn new(inner: O) -> Self {
        CachedPolarity {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.lock().len()
    }
}

impl<O: PolarityOracle> PolarityOracle for CachedPolarity<O> {
    fn polarity(&self, text: &str) -> Result<f64> {
        if let Some(hit) = self.cache.lock().get(text).copied() {
            return Ok(hit);
        }
        // Lock is released while the inner oracle runs
        let value = self.inner.polarity(text)?;
        self.cache.lock().insert(text.to_string(), value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_lexicon_polarity_positive() {
        let score = lexicon_polarity("This is a wonderful day! I'm feeling great and happy!");
        assert!(score > 0.0);
        assert_eq!(classify(score).label, "Positive");
    }

    #[test]
    fn test_lexicon_polarity_negative() {
        let score = lexicon_polarity("This is terrible and awful. I hate it!");
        assert!(score < 0.0);
        assert_eq!(classify(score).label, "Negative");
    }

    #[test]
    fn test_lexicon_polarity_neutral() {
        let score = lexicon_polarity("The sky is blue. The grass is green.");
        assert_eq!(score, 0.0);
        assert_eq!(classify(score).label, "Neutral");
    }

    #[test]
    fn test_negation_handling() {
        assert_eq!(lexicon_polarity("This is not good at all."), -1.0);
    }

    #[test]
    fn test_intensifier_is_clamped() {
        assert_eq!(lexicon_polarity("very good"), 1.0);
        assert!((lexicon_polarity("very good and bad") - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(lexicon_polarity(""), 0.0);
        assert_eq!(LexiconPolarity.polarity("   ").unwrap(), 0.0);
    }

    #[test]
    fn test_closure_is_an_oracle() {
        let oracle = |text: &str| text.len() as f64;
        assert_eq!(oracle.polarity("abcd").unwrap(), 4.0);
    }

    struct CountingOracle {
        calls: AtomicUsize,
    }

    impl PolarityOracle for CountingOracle {
        fn polarity(&self, text: &str) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text == "boom" {
                return Err(anyhow!("oracle exploded"));
            }
            Ok(0.5)
        }
    }

    #[test]
    fn test_cache_reuses_results() {
        let cached = CachedPolarity::new(CountingOracle { calls: AtomicUsize::new(0) });
        assert_eq!(cached.polarity("same window").unwrap(), 0.5);
        assert_eq!(cached.polarity("same window").unwrap(), 0.5);
        assert_eq!(cached.polarity("other window").unwrap(), 0.5);
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.cached_entries(), 2);
    }

    #[test]
    fn test_cache_does_not_store_errors() {
        let cached = CachedPolarity::new(CountingOracle { calls: AtomicUsize::new(0) });
        assert!(cached.polarity("boom").is_err());
        assert!(cached.polarity("boom").is_err());
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.cached_entries(), 0);
    }
}
