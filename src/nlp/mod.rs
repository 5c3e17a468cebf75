// NLP module for topic keyword sentiment
pub mod aggregate;
pub mod keyword_sentiment;
pub mod keywords;
pub mod lexicon;
pub mod polarity;

pub use aggregate::{aggregate, top_by_frequency, KeywordFrequency, KeywordTally};
pub use keyword_sentiment::{score_document, score_document_default, KeywordScores};
pub use lexicon::Topic;
pub use polarity::{CachedPolarity, LexiconPolarity, PolarityOracle};
