// Corpus aggregation: per-keyword averages of document scores, z-score
// normalized into [-1, 1], and the frequency-ranked keyword view.
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::config::{ScoringConfig, MIN_STD_DEV};
use crate::corpus::Document;
use crate::nlp::keyword_sentiment::{score_document_with, KeywordScores};
use crate::nlp::lexicon::Topic;
use crate::nlp::polarity::PolarityOracle;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordFrequency {
    pub keyword: String,
    /// Number of documents the keyword was scored in.
    pub frequency: usize,
    pub score: f64,
}

#[derive(Debug, Clone)]
struct TallyEntry {
    keyword: String,
    sum: f64,
    count: usize,
}

/// Running per-keyword score sums and document counts, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct KeywordTally {
    entries: Vec<TallyEntry>,
    index: HashMap<String, usize>,
}

impl KeywordTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one document's scores; each keyword counts once per document.
    pub fn add_document(&mut self, scores: &KeywordScores) {
        for (keyword, score) in scores.iter() {
            match self.index.get(keyword) {
                Some(&slot) => {
                    let entry = &mut self.entries[slot];
                    entry.sum += score;
                    entry.count += 1;
                }
                None => {
                    self.index.insert(keyword.to_string(), self.entries.len());
                    self.entries.push(TallyEntry {
                        keyword: keyword.to_string(),
                        sum: score,
                        count: 1,
                    });
                }
            }
        }
    }

    pub fn count(&self, keyword: &str) -> usize {
        self.index
            .get(keyword)
            .map(|&slot| self.entries[slot].count)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn averages(&self) -> KeywordScores {
        self.averages_with_min_support(1)
    }

    /// Averages of keywords seen in at least `min_support` documents.
    pub fn averages_with_min_support(&self, min_support: usize) -> KeywordScores {
        self.entries
            .iter()
            .filter(|e| e.count > 0 && e.count >= min_support)
            .map(|e| (e.keyword.clone(), e.sum / e.count as f64))
            .collect()
    }
}

/// Z-score normalizes `averages`, divides by `damping` and clamps to
/// [-1, 1]. With zero variance (a single keyword, or identical averages)
/// the averages are returned unchanged.
pub fn normalize(averages: &KeywordScores, damping: f64) -> KeywordScores {
    if averages.is_empty() {
        return KeywordScores::new();
    }

    let n = averages.len() as f64;
    let mean = averages.iter().map(|(_, v)| v).sum::<f64>() / n;
    let variance = averages.iter().map(|(_, v)| (v - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();

    if std <= MIN_STD_DEV {
        debug!(keywords = averages.len(), "zero variance, keeping raw averages");
        return averages.clone();
    }

    averages
        .iter()
        .map(|(keyword, avg)| {
            let z = (avg - mean) / std;
            (keyword.to_string(), (z / damping).clamp(-1.0, 1.0))
        })
        .collect()
}

/// Scores every document and tallies the results. Documents are scored in
/// parallel; the tally is built in corpus order so sums and keyword order
/// match a sequential pass.
pub fn tally_corpus<O>(
    documents: &[Document],
    topic: Topic,
    oracle: &O,
    config: &ScoringConfig,
) -> KeywordTally
where
    O: PolarityOracle + Sync + ?Sized,
{
    let per_document: Vec<KeywordScores> = documents
        .par_iter()
        .map(|doc| score_document_with(&doc.text(), topic, oracle, config))
        .collect();

    let mut tally = KeywordTally::new();
    for scores in &per_document {
        tally.add_document(scores);
    }
    debug!(documents = documents.len(), keywords = tally.len(), %topic, "tallied corpus");
    tally
}

pub fn aggregate<O>(documents: &[Document], topic: Topic, oracle: &O) -> KeywordScores
where
    O: PolarityOracle + Sync + ?Sized,
{
    aggregate_with(documents, topic, oracle, &ScoringConfig::default())
}

/// Normalized average sentiment of every keyword in the corpus.
pub fn aggregate_with<O>(
    documents: &[Document],
    topic: Topic,
    oracle: &O,
    config: &ScoringConfig,
) -> KeywordScores
where
    O: PolarityOracle + Sync + ?Sized,
{
    let tally = tally_corpus(documents, topic, oracle, config);
    normalize(&tally.averages(), config.z_damping)
}

pub fn top_by_frequency<O>(
    documents: &[Document],
    topic: Topic,
    top_n: usize,
    oracle: &O,
) -> Vec<KeywordFrequency>
where
    O: PolarityOracle + Sync + ?Sized,
{
    top_by_frequency_with(documents, topic, top_n, oracle, &ScoringConfig::default())
}

/// The `top_n` most frequent keywords meeting the minimum support, with
/// scores normalized over that supported set only. Equal frequencies keep
/// first-seen order.
pub fn top_by_frequency_with<O>(
    documents: &[Document],
    topic: Topic,
    top_n: usize,
    oracle: &O,
    config: &ScoringConfig,
) -> Vec<KeywordFrequency>
where
    O: PolarityOracle + Sync + ?Sized,
{
    let tally = tally_corpus(documents, topic, oracle, config);
    rank_by_frequency(&tally, top_n, config)
}

fn rank_by_frequency(tally: &KeywordTally, top_n: usize, config: &ScoringConfig) -> Vec<KeywordFrequency> {
    let supported = tally.averages_with_min_support(config.min_support);
    let normalized = normalize(&supported, config.z_damping);

    let mut ranked: Vec<KeywordFrequency> = normalized
        .iter()
        .map(|(keyword, score)| KeywordFrequency {
            keyword: keyword.to_string(),
            frequency: tally.count(keyword),
            score,
        })
        .collect();

    // stable
    ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::polarity::LexiconPolarity;

    fn neutral(_: &str) -> f64 {
        0.0
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn scores(pairs: &[(&str, f64)]) -> KeywordScores {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn docs(texts: &[&str]) -> Vec<Document> {
        texts.iter().map(|t| Document::new(*t, "")).collect()
    }

    #[test]
    fn test_empty_corpus() {
        assert!(aggregate(&[], Topic::HousingCrisis, &neutral).is_empty());
        assert!(top_by_frequency(&[], Topic::HousingCrisis, 10, &neutral).is_empty());
    }

    #[test]
    fn test_documents_without_keywords() {
        let corpus = vec![Document::default(), Document::new("", "nothing to see")];
        assert!(aggregate(&corpus, Topic::HousingCrisis, &neutral).is_empty());
    }

    #[test]
    fn test_tally_counts_once_per_document() {
        let mut tally = KeywordTally::new();
        tally.add_document(&scores(&[("eviction", -0.2), ("support", 0.3)]));
        tally.add_document(&scores(&[("eviction", -0.4)]));
        tally.add_document(&scores(&[("eviction", -0.6)]));

        assert_eq!(tally.count("eviction"), 3);
        assert_eq!(tally.count("support"), 1);
        assert_eq!(tally.count("hope"), 0);

        let averages = tally.averages();
        assert!(approx(averages.get("eviction").unwrap(), -0.4));
        assert!(approx(averages.get("support").unwrap(), 0.3));
        assert_eq!(averages.keys().collect::<Vec<_>>(), vec!["eviction", "support"]);

        let supported = tally.averages_with_min_support(2);
        assert_eq!(supported.keys().collect::<Vec<_>>(), vec!["eviction"]);
    }

    #[test]
    fn test_rank_excludes_singletons() {
        let mut tally = KeywordTally::new();
        tally.add_document(&scores(&[("eviction", -0.2), ("support", 0.3)]));
        tally.add_document(&scores(&[("eviction", -0.4)]));
        tally.add_document(&scores(&[("eviction", -0.6)]));

        let ranked = rank_by_frequency(&tally, 5, &ScoringConfig::default());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].keyword, "eviction");
        assert_eq!(ranked[0].frequency, 3);
        // a single supported keyword has no variance, so the raw average survives
        assert!(approx(ranked[0].score, -0.4));
    }

    #[test]
    fn test_normalize_symmetric() {
        let normalized = normalize(&scores(&[("hope", 0.5), ("crisis", -0.5)]), 3.0);
        assert!(approx(normalized.get("hope").unwrap(), 1.0 / 3.0));
        assert!(approx(normalized.get("crisis").unwrap(), -1.0 / 3.0));
    }

    #[test]
    fn test_normalize_clamps_outliers() {
        let mut pairs: Vec<(String, f64)> = (0..20).map(|i| (format!("k{}", i), 0.0)).collect();
        pairs.push(("outlier".to_string(), 10.0));
        let normalized = normalize(&pairs.into_iter().collect(), 3.0);
        assert_eq!(normalized.get("outlier"), Some(1.0));
        for (_, v) in normalized.iter() {
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_normalize_zero_variance_passthrough() {
        let averages = scores(&[("hope", 0.2), ("crisis", 0.2)]);
        assert_eq!(normalize(&averages, 3.0), averages);
        let single = scores(&[("eviction", -0.7)]);
        assert_eq!(normalize(&single, 3.0), single);
        assert!(normalize(&KeywordScores::new(), 3.0).is_empty());
    }

    #[test]
    fn test_uniform_corpus_returns_raw_averages() {
        let corpus = docs(&["eviction crisis", "eviction crisis", "eviction crisis"]);
        let config = ScoringConfig::default();
        let raw = tally_corpus(&corpus, Topic::HousingCrisis, &neutral, &config).averages();
        let result = aggregate(&corpus, Topic::HousingCrisis, &neutral);
        assert_eq!(result, raw);
        // window of two negative keywords: 0.3 * -1 + 0.3 * -0.3
        assert!(approx(result.get("eviction").unwrap(), -0.39));
    }

    #[test]
    fn test_end_to_end_minimum_support() {
        let corpus = docs(&["eviction again", "another eviction", "eviction but support"]);
        let averaged = aggregate(&corpus, Topic::HousingCrisis, &neutral);
        assert!(averaged.contains("eviction"));
        assert!(averaged.contains("support"));

        let top = top_by_frequency(&corpus, Topic::HousingCrisis, 5, &neutral);
        assert!(top.iter().any(|k| k.keyword == "eviction" && k.frequency == 3));
        assert!(top.iter().all(|k| k.keyword != "support"));
    }

    #[test]
    fn test_singletons_do_not_shift_ranked_scores() {
        let base = docs(&["hope eviction", "hope", "eviction crisis", "eviction"]);
        let mut noisy = base.clone();
        noisy.push(Document::new("pure joy", ""));

        let clean = top_by_frequency(&base, Topic::HousingCrisis, 10, &LexiconPolarity);
        let with_noise = top_by_frequency(&noisy, Topic::HousingCrisis, 10, &LexiconPolarity);
        assert_eq!(clean, with_noise);
        assert!(clean.iter().all(|k| k.keyword != "joy" && k.keyword != "crisis"));
    }

    #[test]
    fn test_frequency_order_is_stable() {
        let corpus = docs(&["hope eviction crisis", "hope eviction crisis", "eviction crisis"]);
        let top = top_by_frequency(&corpus, Topic::HousingCrisis, 10, &neutral);
        let ranked: Vec<_> = top.iter().map(|k| (k.keyword.as_str(), k.frequency)).collect();
        assert_eq!(ranked, vec![("eviction", 3), ("crisis", 3), ("hope", 2)]);

        let top = top_by_frequency(&corpus, Topic::HousingCrisis, 2, &neutral);
        assert_eq!(top.len(), 2);
        assert_eq!(top[1].keyword, "crisis");
    }

    #[test]
    fn test_aggregate_matches_sequential_pass() {
        let corpus = vec![
            Document::new("Facing eviction", "The landlord is cruel and we are desperate"),
            Document::new("Good news", "Our voucher program was a great success, real hope"),
            Document::new("No relief", "not affordable, never safe, just another crisis"),
            Document { title: "Missing body".to_string(), ..Document::default() },
        ];
        let config = ScoringConfig::default();

        let mut tally = KeywordTally::new();
        for doc in &corpus {
            tally.add_document(&score_document_with(&doc.text(), Topic::HousingCrisis, &LexiconPolarity, &config));
        }
        let expected = normalize(&tally.averages(), config.z_damping);

        let actual = aggregate(&corpus, Topic::HousingCrisis, &LexiconPolarity);
        assert_eq!(actual, expected);
        for (_, v) in actual.iter() {
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_min_support_is_configurable() {
        let corpus = docs(&["hope", "hope", "hope eviction"]);
        let config = ScoringConfig { min_support: 3, ..ScoringConfig::default() };
        let top = top_by_frequency_with(&corpus, Topic::HousingCrisis, 10, &neutral, &config);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].keyword, "hope");
    }
}
