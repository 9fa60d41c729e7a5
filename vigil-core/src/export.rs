//! JSON export of in-memory records
//!
//! Exports are plain JSON objects, pretty-printed with 2-space indentation,
//! written into the configured export directory under a filename of the form
//! `<prefix>-<slug(name)>[-<timestamp>].json`.

use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::info;

static SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

/// Errors from export operations
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Lowercase and replace every run of non-alphanumeric characters with `-`
///
/// Path separators never survive, so a slug is always a single path component.
pub fn slug(name: &str) -> String {
    SEPARATOR_REGEX
        .replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Build an export filename
pub fn export_filename(prefix: &str, name: &str, timestamp: Option<i64>) -> String {
    match timestamp {
        Some(ts) => format!("{}-{}-{}.json", prefix, slug(name), ts),
        None => format!("{}-{}.json", prefix, slug(name)),
    }
}

/// Milliseconds since the Unix epoch, used as filename timestamp
pub fn export_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// RFC 3339 timestamp stored inside exported documents
pub fn export_date() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Serialize with 2-space indentation
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes export documents into a directory
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Serialize `value` and write it as `filename`, returning the full path
    pub fn write<T: Serialize>(&self, filename: &str, value: &T) -> Result<PathBuf, ExportError> {
        let json = to_pretty_json(value)?;
        std::fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(filename);
        std::fs::write(&path, json)?;
        info!("Exported {}", path.display());
        Ok(path)
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Alexandre Dubois"), "alexandre-dubois");
        assert_eq!(slug("  Jean   Martin\tJr "), "jean-martin-jr");
        assert_eq!(slug("AC/DC"), "ac-dc");
        assert_eq!(slug("..\\escaped/../x"), "escaped-x");
        assert_eq!(slug("Émilie Côté"), "émilie-côté");
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename("osint", "Marie Leclerc", Some(1700000000000)),
            "osint-marie-leclerc-1700000000000.json"
        );
        assert_eq!(export_filename("report", "Jean Martin", None), "report-jean-martin.json");
    }

    #[test]
    fn test_pretty_json_uses_two_spaces() {
        let text = to_pretty_json(&json!({"a": {"b": 1}})).unwrap();
        assert!(text.contains("\n  \"a\""));
        assert!(text.contains("\n    \"b\": 1"));
    }

    #[test]
    fn test_exporter_writes_file() {
        let dir = std::env::temp_dir().join(format!("vigil-export-{}", uuid::Uuid::new_v4()));
        let exporter = Exporter::new(&dir);

        let path = exporter.write("test.json", &json!({"target": "x"})).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"target\": \"x\""));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
