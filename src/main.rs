// Command-line front end: score a single post, aggregate a corpus, rank its
// most frequent topic keywords, or summarize terms.
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use topic_sentiment::config::ScoringConfig;
use topic_sentiment::corpus::{self, Document};
use topic_sentiment::nlp::aggregate::{aggregate_with, top_by_frequency_with, KeywordFrequency};
use topic_sentiment::nlp::keyword_sentiment::score_document_with;
use topic_sentiment::nlp::keywords::{extract_keywords, term_sentiment, DEFAULT_MIN_KEYWORD_LEN};
use topic_sentiment::nlp::polarity::classify;
use topic_sentiment::nlp::{CachedPolarity, LexiconPolarity, PolarityOracle, Topic};

#[derive(Parser)]
#[command(name = "topic_sentiment", about = "Context-aware keyword sentiment for housing discussions")]
struct Cli {
    /// JSON file overriding scoring weights and thresholds
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Memoize polarity lookups of repeated context windows
    #[arg(long, global = true)]
    cache: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score the topic keywords of one text
    Score {
        #[arg(short, long)]
        text: String,
        #[arg(short = 'T', long, default_value = "housing_crisis")]
        topic: String,
    },
    /// Normalized keyword sentiment across a corpus
    Aggregate {
        /// .json / .jsonl file or a directory of them
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short = 'T', long, default_value = "housing_crisis")]
        topic: String,
    },
    /// Most frequent keywords with their normalized sentiment
    Top {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short = 'T', long, default_value = "housing_crisis")]
        topic: String,
        #[arg(short = 'n', long, default_value_t = 50)]
        top_n: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Frequent non-stop-words of one text
    Keywords {
        #[arg(short, long)]
        text: String,
        #[arg(long, default_value_t = DEFAULT_MIN_KEYWORD_LEN)]
        min_length: usize,
        #[arg(short = 'n', long, default_value_t = 20)]
        top_n: usize,
    },
    /// Mean post sentiment for each term across a corpus
    Terms {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short = 't', long = "term", required = true)]
        terms: Vec<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_oracle(cache: bool) -> Box<dyn PolarityOracle + Send + Sync> {
    if cache {
        Box::new(CachedPolarity::new(LexiconPolarity))
    } else {
        Box::new(LexiconPolarity)
    }
}

fn resolve_topic(name: &str) -> Topic {
    let topic = Topic::from_name(name);
    if topic.name() != name.trim().to_lowercase() {
        warn!(requested = %name, using = %topic, "unknown topic");
    }
    topic
}

fn load_corpus(input: &Path) -> Result<Vec<Document>> {
    let files = corpus::discover_files(input)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {wide_bar} {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let mut docs = Vec::new();
    for file in &files {
        docs.extend(corpus::load_file(file)?);
        pb.inc(1);
    }
    pb.finish_with_message("loading documents");

    info!(files = files.len(), documents = docs.len(), "corpus loaded");
    Ok(docs)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_table(rows: &[KeywordFrequency]) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    writeln!(stdout, "{:<24} {:>9} {:>8}", "keyword", "documents", "score")?;
    for row in rows {
        write!(stdout, "{:<24} {:>9} ", row.keyword, row.frequency)?;
        let color = match classify(row.score).label.as_str() {
            "Positive" => Some(Color::Green),
            "Negative" => Some(Color::Red),
            _ => None,
        };
        stdout.set_color(ColorSpec::new().set_fg(color))?;
        writeln!(stdout, "{:>8.3}", row.score)?;
        stdout.reset()?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    };
    let oracle = build_oracle(cli.cache);

    match cli.command {
        Commands::Score { text, topic } => {
            let scores = score_document_with(&text, resolve_topic(&topic), &*oracle, &config);
            print_json(&scores)?;
        }
        Commands::Aggregate { input, topic } => {
            let docs = load_corpus(&input)?;
            let normalized = aggregate_with(&docs, resolve_topic(&topic), &*oracle, &config);
            print_json(&normalized)?;
        }
        Commands::Top { input, topic, top_n, json } => {
            let docs = load_corpus(&input)?;
            let ranked = top_by_frequency_with(&docs, resolve_topic(&topic), top_n, &*oracle, &config);
            if json {
                print_json(&ranked)?;
            } else {
                print_table(&ranked)?;
            }
        }
        Commands::Keywords { text, min_length, top_n } => {
            let keywords: Vec<(String, usize)> =
                extract_keywords(&text, min_length).into_iter().take(top_n).collect();
            print_json(&keywords)?;
        }
        Commands::Terms { input, terms } => {
            let docs = load_corpus(&input)?;
            print_json(&term_sentiment(&docs, &terms, &*oracle))?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    run(Cli::parse())
}
