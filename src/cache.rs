use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};
use crate::metrics::{CACHE_HITS, CACHE_MISSES, CACHE_SIZE};

// Cache entry with timestamp
#[derive(Clone)]
pub struct CacheEntry {
    pub answer: String,
    pub created_at: Instant,
}

// LLM answer cache; a zero ttl disables it
pub struct AnswerCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl AnswerCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if self.ttl.is_zero() {
            return None;
        }

        let hit = self
            .entries
            .get(key)
            .filter(|entry| entry.created_at.elapsed() < self.ttl)
            .map(|entry| entry.answer.clone());

        match hit {
            Some(_) => CACHE_HITS.inc(),
            None => CACHE_MISSES.inc(),
        }
        hit
    }

    pub fn insert(&self, key: String, answer: String) {
        if self.ttl.is_zero() {
            return;
        }

        // expired entries are replaced in place, so drop the rest here
        self.entries.retain(|_, entry| entry.created_at.elapsed() < self.ttl);
        self.entries.insert(key, CacheEntry {
            answer,
            created_at: Instant::now(),
        });
        CACHE_SIZE.set(self.entries.len() as f64);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// Create a cache key (hash of model + system prompt + prompt)
pub fn make_cache_key(model: &str, system: Option<&str>, prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model);
    hasher.update([0u8]);
    hasher.update(system.unwrap_or_default());
    hasher.update([0u8]);
    hasher.update(prompt);
    format!("{:x}", hasher.finalize())
}

// Short, non-reversible tag for logging a client key
pub fn fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    format!("{:x}", digest)[..12].to_string()
}
