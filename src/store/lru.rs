//! Byte-bounded LRU Store
//!
//! Entries are charged `key.len() + value.len()` bytes against the capacity.
//! When an insert pushes usage over the limit, least recently used entries are
//! evicted until it fits again. Expired entries are dropped lazily on read.

use super::{ByteView, LocalStore};

use lru::LruCache;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

struct Entry {
    value: ByteView,
    created_at: Instant,
}

impl Entry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

struct Inner {
    entries: LruCache<String, Entry>,
    used_bytes: usize,
}

pub struct LruStore {
    inner: Mutex<Inner>,
    /// Zero disables the capacity bound.
    max_bytes: usize,
    ttl: Duration,
}

impl LruStore {
    pub fn new(max_bytes: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::unbounded(),
                used_bytes: 0,
            }),
            max_bytes,
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes currently charged against the capacity.
    pub fn used_bytes(&self) -> usize {
        self.inner.lock().used_bytes
    }

    fn evict_overflow(&self, inner: &mut Inner) {
        if self.max_bytes == 0 {
            return;
        }
        while inner.used_bytes > self.max_bytes {
            match inner.entries.pop_lru() {
                Some((key, entry)) => {
                    inner.used_bytes -= key.len() + entry.value.len();
                    tracing::trace!("Evicted {} from local store", key);
                }
                None => break,
            }
        }
    }
}

impl LocalStore for LruStore {
    fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock();

        match inner.entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => return Some(entry.value.clone()),
            Some(_) => {}
            None => return None,
        }

        if let Some(entry) = inner.entries.pop(key) {
            inner.used_bytes -= key.len() + entry.value.len();
        }
        None
    }

    fn add(&self, key: &str, value: ByteView) {
        let mut inner = self.inner.lock();

        let cost = key.len() + value.len();
        let entry = Entry {
            value,
            created_at: Instant::now(),
        };
        if let Some(old) = inner.entries.put(key.to_string(), entry) {
            inner.used_bytes -= key.len() + old.value.len();
        }
        inner.used_bytes += cost;

        self.evict_overflow(&mut inner);
    }
}
