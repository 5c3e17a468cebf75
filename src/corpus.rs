// Documents and corpus loading. A corpus is a `.json` file holding an array of
// posts, a `.jsonl` file with one post per line, or a directory tree of both.
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One post. Missing or null fields read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, alias = "selftext", alias = "text", deserialize_with = "null_as_empty")]
    pub body: String,
    /// Document-level polarity computed upstream, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_polarity: Option<f64>,
}

impl Document {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Document {
            title: title.into(),
            body: body.into(),
            sentiment_polarity: None,
        }
    }

    /// Title and body joined by a single space.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

const CORPUS_EXTS: [&str; 2] = ["json", "jsonl"];

fn has_corpus_ext(p: &Path) -> bool {
    p.extension()
        .and_then(|s| s.to_str())
        .map(|ext| CORPUS_EXTS.contains(&ext))
        .unwrap_or(false)
}

/// Corpus files under `path`, sorted. A plain file is returned as is.
pub fn discover_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        anyhow::bail!("corpus path {} does not exist", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_corpus_ext(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    debug!(dir = %path.display(), files = files.len(), "discovered corpus files");
    Ok(files)
}

/// Loads one corpus file. Entries that are not valid documents are logged
/// and skipped.
pub fn load_file(path: &Path) -> Result<Vec<Document>> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    let f = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let docs = if ext == "jsonl" {
        let mut docs = Vec::new();
        for (lineno, line) in BufReader::new(f).lines().enumerate() {
            let line = line.with_context(|| format!("failed to read {}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Document>(&line) {
                Ok(doc) => docs.push(doc),
                Err(e) => warn!(file = %path.display(), line = lineno + 1, error = %e, "skipping malformed document"),
            }
        }
        docs
    } else {
        let values: Vec<Value> = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("{} is not a JSON array of documents", path.display()))?;
        values
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match serde_json::from_value::<Document>(value) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!(file = %path.display(), entry = i, error = %e, "skipping malformed document");
                    None
                }
            })
            .collect()
    };

    debug!(file = %path.display(), documents = docs.len(), "loaded corpus file");
    Ok(docs)
}

pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    for file in discover_files(path)? {
        docs.extend(load_file(&file)?);
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_document_text() {
        let doc = Document::new("Rent is up", "again this year");
        assert_eq!(doc.text(), "Rent is up again this year");
        assert_eq!(Document::default().text(), " ");
    }

    #[test]
    fn test_missing_and_null_fields() {
        let doc: Document = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(doc.title, "");
        assert_eq!(doc.body, "");

        let doc: Document = serde_json::from_str(r#"{"selftext": "eviction notice", "score": 12}"#).unwrap();
        assert_eq!(doc.title, "");
        assert_eq!(doc.body, "eviction notice");
    }

    #[test]
    fn test_load_json_array() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("posts.json");
        std::fs::write(
            &path,
            r#"[{"title": "Help", "selftext": "facing eviction"}, 42, {"body": "no title", "sentiment_polarity": -0.5}]"#,
        )?;

        let docs = load_file(&path)?;
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].body, "facing eviction");
        assert_eq!(docs[1].sentiment_polarity, Some(-0.5));
        Ok(())
    }

    #[test]
    fn test_load_jsonl_skips_bad_lines() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("posts.jsonl");
        let mut f = File::create(&path)?;
        writeln!(f, r#"{{"title": "first"}}"#)?;
        writeln!(f)?;
        writeln!(f, "not json at all")?;
        writeln!(f, r#"{{"title": "second", "selftext": "body"}}"#)?;

        let docs = load_file(&path)?;
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].text(), "second body");
        Ok(())
    }

    #[test]
    fn test_load_json_not_an_array() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, r#"{"title": "lonely"}"#)?;
        assert!(load_file(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_load_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let nested = temp_dir.path().join("reddit").join("2024");
        std::fs::create_dir_all(&nested)?;
        std::fs::write(temp_dir.path().join("a.json"), r#"[{"title": "one"}]"#)?;
        std::fs::write(nested.join("b.jsonl"), "{\"title\": \"two\"}\n{\"title\": \"three\"}\n")?;
        std::fs::write(temp_dir.path().join("notes.txt"), "ignored")?;

        let files = discover_files(temp_dir.path())?;
        assert_eq!(files.len(), 2);

        let docs = load_documents(temp_dir.path())?;
        let titles: Vec<_> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two", "three"]);
        Ok(())
    }

    #[test]
    fn test_missing_path() {
        assert!(load_documents(Path::new("/nonexistent/corpus")).is_err());
    }
}
