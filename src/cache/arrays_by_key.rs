//! Fixed-capacity cache of dense, page-addressable sequences
//!
//! Dense storage means a page is either wholly cached or a miss: the hot
//! read path never deals with partial results, the insert path pays for it
//! instead.

use std::collections::{HashMap, VecDeque};

/// Maps a key to a gap-free array of elements, with FIFO-by-key eviction.
/// Capacity is a fixed maximum element count across all keys.
pub struct ArraysByKeyCache<T> {
    cache: HashMap<String, Vec<T>>,
    /// Key touch order: least-recently-touched at the front
    key_queue: VecDeque<String>,
    total_elements: usize,
    max_nb_elements: usize,
}

impl<T: Clone> ArraysByKeyCache<T> {
    pub fn new(max_nb_elements: usize) -> Self {
        ArraysByKeyCache {
            cache: HashMap::new(),
            key_queue: VecDeque::new(),
            total_elements: 0,
            max_nb_elements,
        }
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.key_queue.clear();
        self.total_elements = 0;
    }

    /// Store `value` at position `index` of the sequence for `key`.
    ///
    /// Silently rejected when `index` would leave a hole (`index` past the
    /// current length). The key is promoted to most-recently-touched; when
    /// the element budget would overflow, the least-recently-touched key's
    /// entire sequence is evicted first, unless that key is the one being
    /// grown.
    pub fn insert(&mut self, key: &str, index: usize, value: T) {
        let current_len = self.cache.get(key).map_or(0, |a| a.len());
        if index > current_len {
            return;
        }

        self.touch(key);

        if index < current_len {
            // Overwrite in place, element count unchanged
            if let Some(array) = self.cache.get_mut(key) {
                array[index] = value;
            }
            return;
        }

        if self.total_elements + 1 > self.max_nb_elements {
            if let Some(oldest) = self.key_queue.front().cloned() {
                if oldest != key {
                    self.evict_key(&oldest);
                }
            }
        }

        self.cache.entry(key.to_string()).or_default().push(value);
        self.total_elements += 1;
    }

    /// Return the slice `[start_index, start_index + page_size)` for `key`
    /// iff the stored sequence covers the whole range. `None` means
    /// "not fully cached": the caller must fetch, not treat it as empty.
    pub fn retrieve(&self, key: &str, start_index: usize, page_size: usize) -> Option<Vec<T>> {
        let array = self.cache.get(key)?;
        if start_index + page_size > array.len() {
            return None;
        }
        Some(array[start_index..start_index + page_size].to_vec())
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.key_queue.iter().position(|k| k == key) {
            self.key_queue.remove(pos);
        }
        self.key_queue.push_back(key.to_string());
    }

    fn evict_key(&mut self, key: &str) {
        if let Some(array) = self.cache.remove(key) {
            self.total_elements -= array.len();
        }
        if let Some(pos) = self.key_queue.iter().position(|k| k == key) {
            self.key_queue.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieve_requires_full_coverage() {
        let mut cache = ArraysByKeyCache::new(100);
        for i in 0..4 {
            cache.insert("k", i, i);
        }
        assert_eq!(cache.retrieve("k", 0, 4), Some(vec![0, 1, 2, 3]));
        assert_eq!(cache.retrieve("k", 1, 3), Some(vec![1, 2, 3]));
        // Range exceeds stored length: miss, not a shorter slice
        assert_eq!(cache.retrieve("k", 2, 4), None);
        assert_eq!(cache.retrieve("other", 0, 1), None);
    }

    #[test]
    fn test_insert_rejects_holes() {
        let mut cache = ArraysByKeyCache::new(100);
        cache.insert("k", 1, 10);
        assert_eq!(cache.retrieve("k", 0, 1), None);

        cache.insert("k", 0, 0);
        cache.insert("k", 1, 1);
        cache.insert("k", 5, 5);
        assert_eq!(cache.retrieve("k", 0, 2), Some(vec![0, 1]));
        assert_eq!(cache.retrieve("k", 0, 3), None);
    }

    #[test]
    fn test_insert_overwrites_existing_index() {
        let mut cache = ArraysByKeyCache::new(100);
        cache.insert("k", 0, 1);
        cache.insert("k", 1, 2);
        cache.insert("k", 0, 9);
        assert_eq!(cache.retrieve("k", 0, 2), Some(vec![9, 2]));
    }

    #[test]
    fn test_eviction_removes_whole_least_recent_key() {
        let mut cache = ArraysByKeyCache::new(4);
        cache.insert("key1", 0, 10);
        cache.insert("key2", 0, 20);
        cache.insert("key1", 1, 11);
        cache.insert("key2", 1, 21);

        // Fifth element: key1 is promoted by the insert itself, so key2
        // becomes the oldest key and is dropped entirely.
        cache.insert("key1", 2, 12);

        assert_eq!(cache.retrieve("key1", 0, 3), Some(vec![10, 11, 12]));
        assert_eq!(cache.retrieve("key2", 1, 1), None);
        assert_eq!(cache.retrieve("key2", 0, 1), None);
    }

    #[test]
    fn test_single_key_can_exceed_budget() {
        let mut cache = ArraysByKeyCache::new(2);
        cache.insert("k", 0, 0);
        cache.insert("k", 1, 1);
        // Only key in the cache is never self-evicted
        cache.insert("k", 2, 2);
        assert_eq!(cache.retrieve("k", 0, 3), Some(vec![0, 1, 2]));
    }

    #[test]
    fn test_clear() {
        let mut cache = ArraysByKeyCache::new(4);
        cache.insert("k", 0, 1);
        cache.clear();
        assert_eq!(cache.retrieve("k", 0, 1), None);
        cache.insert("k", 0, 2);
        assert_eq!(cache.retrieve("k", 0, 1), Some(vec![2]));
    }
}
