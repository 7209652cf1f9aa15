use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
};

use crate::provider::Provider;

/// Get the cache directory for a given URL
pub fn get_cache_dir(url: &str) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    let url_hash = hasher.finish();

    get_root_cache_dir().join(url_hash.to_string())
}

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("podbrief")
}

/// Find a downloaded audio file in the cache directory
pub fn find_audio_in_cache(cache_dir: &Path) -> Option<PathBuf> {
    let Ok(entries) = std::fs::read_dir(cache_dir) else {
        return None;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if let Some(ext) = path.extension() {
            let ext = ext.to_string_lossy().to_lowercase();
            if matches!(ext.as_str(), "mp3" | "m4a" | "wav" | "opus" | "ogg") {
                return Some(path);
            }
        }
    }
    None
}

/// Get the path for the cached media source descriptor
pub fn get_source_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join("source.json")
}

/// Get the path for a cached transcript file
pub fn get_transcript_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join("transcript.json")
}

/// Get the path for a cached summary file (provider, strategy and language aware)
pub fn get_summary_path(cache_dir: &Path, provider: &Provider, strategy: &str, lang: &str) -> PathBuf {
    let provider_name = match provider {
        Provider::Grok => "grok",
        Provider::Openai => "openai",
        Provider::Gemini => "gemini",
    };
    cache_dir.join(format!("summary_{}_{}_{}.json", provider_name, strategy, lang))
}
