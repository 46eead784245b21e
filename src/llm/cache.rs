//! Response cache for completion calls.
//!
//! When `PIPELINE_CACHE` is enabled, identical requests (same model,
//! temperature and messages) are answered from memory instead of hitting
//! the API again. Keys are md5 digests of the request parameters.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use md5::{Digest, Md5};

use crate::llm::ChatMessage;

/// Thread-safe in-memory cache of completion responses.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl ResponseCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Digest of the request parameters that identify a completion.
    pub fn key_for(model: &str, temperature: f64, messages: &[ChatMessage]) -> String {
        let mut hasher = Md5::new();
        hasher.update(model.as_bytes());
        hasher.update(format!("{:.3}", temperature).as_bytes());
        for message in messages {
            hasher.update(message.role.as_bytes());
            hasher.update(b"|");
            hasher.update(message.content.as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }

    /// Store a response.
    pub fn add(&self, key: &str, response: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), response.to_string());
        }
    }

    /// Look up a cached response.
    pub fn read(&self, key: &str) -> Option<String> {
        if let Ok(entries) = self.entries.read() {
            entries.get(key).cloned()
        } else {
            None
        }
    }

    /// Drop all cached entries.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Number of cached responses.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages() -> Vec<ChatMessage> {
        vec![
            ChatMessage::system("You are a researcher."),
            ChatMessage::user("Find topics about rust."),
        ]
    }

    #[test]
    fn test_cache_add_and_read() {
        let cache = ResponseCache::new();
        let key = ResponseCache::key_for("gpt-4o", 0.7, &messages());

        assert!(cache.read(&key).is_none());
        cache.add(&key, "{\"trending_topics\": []}");
        assert_eq!(cache.read(&key).as_deref(), Some("{\"trending_topics\": []}"));
    }

    #[test]
    fn test_key_varies_with_temperature_and_content() {
        let base = ResponseCache::key_for("gpt-4o", 0.7, &messages());
        let hotter = ResponseCache::key_for("gpt-4o", 0.9, &messages());
        let other_model = ResponseCache::key_for("gpt-4o-mini", 0.7, &messages());

        assert_ne!(base, hotter);
        assert_ne!(base, other_model);
        // Same inputs, same key.
        assert_eq!(base, ResponseCache::key_for("gpt-4o", 0.7, &messages()));
    }

    #[test]
    fn test_cache_clear() {
        let cache = ResponseCache::new();
        cache.add("k", "v");
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_thread_safety() {
        use std::thread;

        let cache = ResponseCache::new();
        let writer_cache = cache.clone();
        let writer = thread::spawn(move || {
            for i in 0..100 {
                writer_cache.add(&format!("key_{}", i), "response");
            }
        });

        let reader_cache = cache.clone();
        let reader = thread::spawn(move || {
            for i in 0..100 {
                let _ = reader_cache.read(&format!("key_{}", i));
            }
        });

        writer.join().unwrap();
        reader.join().unwrap();
        assert_eq!(cache.len(), 100);
    }
}
