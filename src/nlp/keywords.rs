// Topic-independent keyword helpers: frequent-term extraction, keyword variant
// expansion, focus-term matching and mean document sentiment per term.
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::corpus::Document;
use crate::nlp::keyword_sentiment::{guarded_polarity, tokenize, KeywordScores};
use crate::nlp::polarity::PolarityOracle;

pub const DEFAULT_MIN_KEYWORD_LEN: usize = 4;

// Stop words and filler words filtered from keyword extraction
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // basic
        "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does",
        "did", "will", "would", "could", "should", "this", "that", "these", "those",
        "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
        "my", "your", "his", "its", "our", "their", "what", "when", "where",
        "why", "how", "who", "which", "there", "here", "can", "may", "must", "might",
        "shall", "just", "now", "then", "very", "also", "only", "even", "still",
        "already", "yet", "really", "quite", "rather", "pretty", "too", "so", "such",
        "not", "out", "from", "any", "all", "about", "don", "some", "because", "one",
        "after", "another", "new", "over", "people", "since", "more", "most", "much",
        "many", "other", "others", "first", "last", "next", "back", "up", "down",
        "each", "every", "both", "either", "neither", "none", "nothing", "something",
        "anything", "everything", "someone", "anyone", "everyone", "nobody",
        "somewhere", "anywhere", "everywhere", "nowhere", "somehow", "anyhow",
        "somewhat", "anyway", "anyways",
        // fillers and discourse markers
        "like", "um", "uh", "ah", "oh", "well", "okay", "ok", "yeah", "yes", "no",
        "sure", "right", "exactly", "basically", "literally", "actually", "honestly",
        "seriously", "obviously", "clearly", "definitely", "probably", "maybe", "perhaps",
        "sort", "kind", "though", "although", "however", "therefore", "moreover",
        "furthermore", "meanwhile", "otherwise", "instead",
        // generic nouns
        "thing", "things", "stuff", "way", "ways", "time", "times", "day", "days",
        "year", "years", "month", "months", "week", "weeks", "hour", "hours",
        "minute", "minutes", "second", "seconds", "moment", "moments",
        // verbs that carry no sentiment
        "get", "got", "getting", "go", "goes", "going", "went", "gone", "come", "comes",
        "coming", "came", "see", "sees", "seeing", "saw", "seen", "look", "looks",
        "looking", "looked", "seem", "seems", "seeming", "seemed", "appear", "appears",
        "appearing", "appeared", "become", "becomes", "becoming", "became", "make",
        "makes", "making", "made", "take", "takes", "taking", "took", "taken",
        "give", "gives", "giving", "gave", "given", "put", "puts", "putting",
        "use", "uses", "using", "used", "work", "works", "working", "worked",
        "try", "tries", "trying", "tried", "want", "wants", "wanting", "wanted",
        "need", "needs", "needing", "needed", "feel", "feels", "feeling", "felt",
        "think", "thinks", "thinking", "thought", "know", "knows", "knowing", "knew",
        "known", "say", "says", "saying", "said", "tell", "tells", "telling", "told",
        "ask", "asks", "asking", "asked", "find", "finds", "finding", "found",
        "turn", "turns", "turning", "turned", "move", "moves", "moving", "moved",
        "play", "plays", "playing", "played", "run", "runs", "running", "ran",
        "walk", "walks", "walking", "walked", "sit", "sits", "sitting", "sat",
        "stand", "stands", "standing", "stood", "live", "lives", "living", "lived",
        "die", "dies", "dying", "died", "dead", "death", "born", "birth",
    ].iter().copied().collect()
});

// General emotion vocabulary appended to every variant expansion
static EMOTION_WORDS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    [
        "hope", "hopeful", "joy", "joyful", "relief", "grateful", "gratitude", "support",
        "helpful", "uplift", "positive", "good", "great", "excellent", "amazing", "wonderful",
        "fantastic", "love", "loved", "happy", "happiness", "success", "successful", "achieve",
        "achievement", "progress", "improve", "better", "best",
        "anger", "angry", "frustrated", "frustration", "sad", "sadness", "fear", "afraid",
        "worried", "anxious", "desperate", "desperation", "pain", "suffering", "cry", "outrage",
        "shame", "guilt", "negative", "bad", "terrible", "awful", "horrible", "hate", "hated",
        "hateful", "disgusting", "disgusted", "disappointed", "disappointment", "failure",
        "failed", "problem", "problems", "issue", "issues", "concern", "concerns", "worry",
        "worries", "stress", "stressed", "overwhelmed", "depressed", "depression",
    ].iter().copied().collect()
});

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Non-stop-words of at least `min_length` letters with their counts, most
/// frequent first. Ties keep first-occurrence order.
pub fn extract_keywords(text: &str, min_length: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for word in tokenize(text) {
        if word.len() < min_length || is_stop_word(&word) {
            continue;
        }
        match slots.get(&word) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(word.clone(), counts.len());
                counts.push((word, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Lowercased keywords plus naive plural and spelling variants, together
/// with the general emotion vocabulary. Sorted and deduplicated.
pub fn expand_keywords_with_variants<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    let mut variants: BTreeSet<String> = BTreeSet::new();
    for keyword in keywords {
        let kw = keyword.as_ref().to_lowercase();
        if let Some(stem) = kw.strip_suffix('y') {
            variants.insert(format!("{}ies", stem));
        }
        variants.insert(format!("{}s", kw));
        variants.insert(kw.replace(' ', ""));
        variants.insert(kw.replace('-', " "));
        variants.insert(kw);
    }
    variants.extend(EMOTION_WORDS.iter().map(|w| w.to_string()));
    variants.into_iter().collect()
}

/// Focus terms that occur anywhere in the lowercased text, in the order given.
pub fn extract_important_terms<S: AsRef<str>>(text: &str, focus_terms: &[S]) -> Vec<String> {
    let lower = text.to_lowercase();
    focus_terms
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| lower.contains(t))
        .map(String::from)
        .collect()
}

/// Document-level polarity of `text`; oracle failures read as 0.0.
pub fn post_sentiment<O>(text: &str, oracle: &O) -> f64
where
    O: PolarityOracle + ?Sized,
{
    guarded_polarity(oracle, text)
}

/// Mean document polarity per term over the documents mentioning it. A
/// document's precomputed polarity is used when present. Terms that appear
/// in no document are left out.
pub fn term_sentiment<O, S>(documents: &[Document], terms: &[S], oracle: &O) -> KeywordScores
where
    O: PolarityOracle + ?Sized,
    S: AsRef<str>,
{
    let mut sums: Vec<(f64, usize)> = vec![(0.0, 0); terms.len()];

    for doc in documents {
        let text = doc.text();
        let lower = text.to_lowercase();
        let mut polarity: Option<f64> = None;

        for (slot, term) in terms.iter().enumerate() {
            if !lower.contains(term.as_ref()) {
                continue;
            }
            let value = *polarity.get_or_insert_with(|| match doc.sentiment_polarity {
                Some(p) if p.is_finite() => p,
                _ => post_sentiment(&text, oracle),
            });
            sums[slot].0 += value;
            sums[slot].1 += 1;
        }
    }

    terms
        .iter()
        .zip(sums)
        .filter(|(_, (_, n))| *n > 0)
        .map(|(term, (sum, n))| (term.as_ref().to_string(), sum / n as f64))
        .collect()
}
