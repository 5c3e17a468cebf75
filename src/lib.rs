//! Context-aware sentiment scoring of topic keywords in social media posts.
//!
//! Each post is scored per keyword of a topic lexicon, blending an external
//! polarity oracle's view of the keyword's context window with lexicon
//! signals and negation. Corpus aggregation averages those scores per
//! keyword and z-score normalizes them into [-1, 1].
//!
//! ```
//! use topic_sentiment::corpus::Document;
//! use topic_sentiment::nlp::{aggregate, score_document, LexiconPolarity, Topic};
//!
//! let neutral = |_: &str| 0.0;
//! let scores = score_document("This is not affordable housing", Topic::HousingCrisis, &neutral);
//! assert!(scores.get("affordable").unwrap() < 0.0);
//!
//! let docs = vec![Document::new("Facing eviction", "no help anywhere")];
//! let normalized = aggregate(&docs, Topic::HousingCrisis, &LexiconPolarity);
//! assert!(normalized.contains("eviction"));
//! ```
pub mod config;
pub mod corpus;
pub mod nlp;

pub use config::ScoringConfig;
pub use corpus::Document;
