//! LLM cache — per-cortex `id -> summary` and `id -> token_count` maps.
//!
//! No binary layout is mandated for these (unlike `graph.idx`/`vectors.bin`),
//! so they're plain JSON maps, atomically written like everything else in
//! the File Store.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct LlmCache {
    pub summaries: HashMap<String, String>,
    pub token_counts: HashMap<String, u32>,
}

impl LlmCache {
    /// Load both maps, treating a missing or corrupt file as empty rather
    /// than failing sync.
    pub fn load(summaries_path: &Path, tokens_path: &Path) -> Self {
        Self {
            summaries: read_json_map(summaries_path).unwrap_or_default(),
            token_counts: read_json_map(tokens_path).unwrap_or_default(),
        }
    }

    /// Write both maps back atomically. Idempotent: writing the same cache
    /// twice produces byte-identical files.
    pub fn save(&self, summaries_path: &Path, tokens_path: &Path) -> io::Result<()> {
        write_json_map(summaries_path, &self.summaries)?;
        write_json_map(tokens_path, &self.token_counts)?;
        Ok(())
    }
}

fn read_json_map<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let text = fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

fn write_json_map<T: serde::Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("cache.tmp");
    let json = serde_json::to_string_pretty(value)?;
    {
        let mut file = fs::File::create(&tmp_path)?;
        use std::io::Write;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_files_load_as_empty() {
        let dir = tempdir().unwrap();
        let cache = LlmCache::load(&dir.path().join("summaries.cache"), &dir.path().join("tokens.cache"));
        assert!(cache.summaries.is_empty());
        assert!(cache.token_counts.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let summaries_path = dir.path().join("cache/summaries.cache");
        let tokens_path = dir.path().join("cache/tokens.cache");

        let mut cache = LlmCache::default();
        cache.summaries.insert("req.one".to_string(), "A login requirement.".to_string());
        cache.token_counts.insert("req.one".to_string(), 42);
        cache.save(&summaries_path, &tokens_path).unwrap();

        let loaded = LlmCache::load(&summaries_path, &tokens_path);
        assert_eq!(loaded.summaries.get("req.one").unwrap(), "A login requirement.");
        assert_eq!(loaded.token_counts.get("req.one"), Some(&42));
    }

    #[test]
    fn write_back_is_idempotent() {
        let dir = tempdir().unwrap();
        let summaries_path = dir.path().join("summaries.cache");
        let tokens_path = dir.path().join("tokens.cache");

        let cache = LlmCache::load(&summaries_path, &tokens_path);
        cache.save(&summaries_path, &tokens_path).unwrap();
        let first = fs::read_to_string(&summaries_path).unwrap();
        cache.save(&summaries_path, &tokens_path).unwrap();
        let second = fs::read_to_string(&summaries_path).unwrap();
        assert_eq!(first, second);
    }
}
