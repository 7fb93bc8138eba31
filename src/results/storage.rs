use super::types::{ResultHistory, HISTORY_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// Get the default result history path (~/.config/get-authentic/results.json)
pub fn get_results_path() -> PathBuf {
    crate::config::get_config_dir().join("results.json")
}

/// Load result history from a JSON file
///
/// A missing file yields an empty history. A file with an unsupported
/// version is an error.
pub fn load_history(path: &Path) -> Result<ResultHistory> {
    if !path.exists() {
        return Ok(ResultHistory::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open result history at {}", path.display()))?;

    let history: ResultHistory =
        serde_json::from_reader(file).context("Failed to load result history")?;

    if history.version != HISTORY_VERSION {
        anyhow::bail!("Unsupported result history version: {}", history.version);
    }

    Ok(history)
}

/// Save result history atomically, creating the parent directory if needed
pub fn save_history(path: &Path, history: &ResultHistory) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, history)
        .context("Failed to serialize result history")?;

    file.commit().context("Failed to save result history")?;

    info!(path = %path.display(), results = history.len(), "result history saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::results::StoredResult;
    use crate::scoring::{score_answers, ScoringConfig};

    fn stored(email: &str) -> StoredResult {
        let scores = vec![7, 7, 7, 7];
        let categories = Category::ALL.to_vec();
        let result = score_answers(&scores, &categories, &ScoringConfig::default()).unwrap();
        StoredResult::new(email, scores, categories, &result)
    }

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = load_history(&dir.path().join("results.json")).unwrap();
        assert_eq!(history.version, 1);
        assert!(history.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("results.json");

        let mut history = ResultHistory::new();
        let entry = stored("owner@example.com");
        let token = entry.token.clone();
        history.record(entry.clone()).unwrap();

        save_history(&path, &history).unwrap();
        let loaded = load_history(&path).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.find(&token), Some(&entry));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, r#"{"version": 2, "results": []}"#).unwrap();

        let err = load_history(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported result history version: 2"));
    }

    #[test]
    fn test_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, "not json").unwrap();

        let err = load_history(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to load result history"));
    }
}
