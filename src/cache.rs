use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::types::{ChatTurn, Identity};

/// How many trailing history turns participate in the reply cache key.
const HISTORY_TAIL: usize = 3;

/// Small in-process TTL cache. Entries expire lazily on read; when the cache
/// is full, expired entries are swept and, failing that, the map is dropped
/// wholesale rather than tracking per-entry recency.
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, (Instant, V)>>,
    ttl: Duration,
    max_entries: usize,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: String, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() >= self.max_entries {
            let ttl = self.ttl;
            entries.retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
            if entries.len() >= self.max_entries {
                entries.clear();
            }
        }
        entries.insert(key, (Instant::now(), value));
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

/// Stable key for the reply cache: persona, message, identity, history length
/// and the last few history turns. serde_json sorts map keys, so the hashed
/// representation is stable for a given input.
pub fn reply_cache_key(
    persona: &str,
    message: &str,
    identity: Option<&Identity>,
    history: &[ChatTurn],
) -> String {
    let tail_start = history.len().saturating_sub(HISTORY_TAIL);
    let payload = serde_json::json!({
        "persona": persona,
        "message": message,
        "employee_id": identity.map(|i| i.employee_id.as_str()),
        "employee_name": identity.map(|i| i.employee_name.as_str()),
        "history_length": history.len(),
        "history_tail": &history[tail_start..],
    });

    let mut hasher = DefaultHasher::new();
    payload.to_string().hash(&mut hasher);
    format!("{}:{:016x}", persona, hasher.finish())
}
