use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Cache key for one text under one language pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(source_lang: &str, target_lang: &str, text: &str) -> Self {
        Self(format!("{source_lang}->{target_lang}:{text}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bounded translation cache with insertion order eviction.
///
/// Reads do not refresh an entry; when full, the oldest inserted entry goes first.
/// Not synchronized, owners wrap it in a lock if it is shared.
#[derive(Debug)]
pub struct TranslationCache {
    capacity: usize,
    entries: HashMap<CacheKey, String>,
    order: VecDeque<CacheKey>,
}

impl TranslationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity.min(1024)),
            order: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: CacheKey, value: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }

        let value = value.into();
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = value;
            return;
        }

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(text: &str) -> CacheKey {
        CacheKey::new("English", "Uzbek", text)
    }

    #[test]
    fn key_format() {
        assert_eq!(key("Hello").as_str(), "English->Uzbek:Hello");
    }

    #[test]
    fn overflow_evicts_exactly_the_first_key() {
        let capacity = 5;
        let mut cache = TranslationCache::new(capacity);
        for i in 0..=capacity {
            cache.set(key(&format!("text {i}")), format!("matn {i}"));
        }

        assert_eq!(cache.len(), capacity);
        assert!(cache.get(&key("text 0")).is_none());
        for i in 1..=capacity {
            assert_eq!(
                cache.get(&key(&format!("text {i}"))),
                Some(format!("matn {i}").as_str())
            );
        }
    }

    #[test]
    fn reads_do_not_change_eviction_order() {
        let mut cache = TranslationCache::new(2);
        cache.set(key("a"), "A");
        cache.set(key("b"), "B");

        // LRU would keep "a" here
        assert_eq!(cache.get(&key("a")), Some("A"));
        cache.set(key("c"), "C");

        assert!(cache.get(&key("a")).is_none());
        assert_eq!(cache.get(&key("b")), Some("B"));
        assert_eq!(cache.get(&key("c")), Some("C"));
    }

    #[test]
    fn updating_existing_key_evicts_nothing() {
        let mut cache = TranslationCache::new(2);
        cache.set(key("a"), "A");
        cache.set(key("b"), "B");
        cache.set(key("a"), "A2");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key("a")), Some("A2"));
        assert_eq!(cache.get(&key("b")), Some("B"));

        // "a" keeps its original slot and is still the oldest
        cache.set(key("c"), "C");
        assert!(cache.get(&key("a")).is_none());
    }

    #[test]
    fn language_pair_is_part_of_the_key() {
        let mut cache = TranslationCache::new(10);
        cache.set(CacheKey::new("English", "Uzbek", "Hello"), "Salom");

        assert!(cache.get(&CacheKey::new("English", "Russian", "Hello")).is_none());
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut cache = TranslationCache::new(0);
        cache.set(key("a"), "A");
        assert!(cache.is_empty());
    }
}
