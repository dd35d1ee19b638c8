use std::thread;
use std::time::Duration;

use crate::cache::{TtlCache, reply_cache_key};
use crate::types::{ChatTurn, Identity};

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: &str, content: &str) -> ChatTurn {
        ChatTurn {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(60), 8);
        assert!(cache.is_empty());
        cache.insert("a".to_string(), "one".to_string());
        assert_eq!(cache.get("a").as_deref(), Some("one"));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_entries_expire() {
        let cache: TtlCache<String> = TtlCache::new(Duration::from_millis(20), 8);
        cache.insert("a".to_string(), "one".to_string());
        thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get("a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_full_cache_still_accepts_inserts() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60), 2);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        cache.insert("c".to_string(), 3);
        // Nothing was expired, so the old entries were dropped wholesale.
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_full_cache_sweeps_expired_entries_first() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_millis(20), 2);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        thread::sleep(Duration::from_millis(40));
        cache.insert("c".to_string(), 3);
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_clear() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60), 8);
        cache.insert("a".to_string(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_reply_cache_key_is_stable() {
        let identity = Identity {
            employee_id: "7".to_string(),
            employee_name: "Sam".to_string(),
        };
        let history = vec![turn("user", "hello"), turn("assistant", "hi")];
        let a = reply_cache_key("employee", "how am I doing?", Some(&identity), &history);
        let b = reply_cache_key("employee", "how am I doing?", Some(&identity), &history);
        assert_eq!(a, b);
        assert!(a.starts_with("employee:"));
    }

    #[test]
    fn test_reply_cache_key_varies_with_inputs() {
        let identity = Identity {
            employee_id: "7".to_string(),
            employee_name: "Sam".to_string(),
        };
        let history = vec![turn("user", "hello")];
        let base = reply_cache_key("employee", "how am I doing?", Some(&identity), &history);

        let other_message =
            reply_cache_key("employee", "what is my status?", Some(&identity), &history);
        assert_ne!(base, other_message);

        let other_persona = reply_cache_key("ciso", "how am I doing?", Some(&identity), &history);
        assert_ne!(base, other_persona);

        let no_identity = reply_cache_key("employee", "how am I doing?", None, &history);
        assert_ne!(base, no_identity);

        let longer_history = vec![turn("user", "hi"), turn("user", "hello")];
        let other_history =
            reply_cache_key("employee", "how am I doing?", Some(&identity), &longer_history);
        assert_ne!(base, other_history);
    }
}
