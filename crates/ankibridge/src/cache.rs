//! TTL cache for note-type schemas.
//!
//! Schemas change rarely, so reads of the schema resources go through a
//! [`SchemaCache`]. Entries are never evicted except by age: an entry older
//! than the TTL is treated as absent and replaced wholesale by the next `put`.
//!
//! The bulk entry ([`SchemaKey::AllWithSchemas`]) and the per-model entries
//! ([`SchemaKey::Model`]) are independent. Reading one never consults or fills
//! the other, so they may disagree for at most one TTL.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use ankiconnect::NoteTypeSchema;
use parking_lot::Mutex;
use tokio::time::Instant;

/// Default time-to-live of a cache entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Source of the current time for expiry checks.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Clock backed by the tokio timer (pausable in tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

/// A key-value store whose entries expire after a fixed TTL.
///
/// Internally synchronized; the lock is never held across an `.await`.
/// Concurrent writers to the same key race and the last `put` wins.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache with the given TTL using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache with an injected clock.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// The configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get the value for `key` if present and unexpired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let entries = self.entries.lock();
        entries
            .get(key)
            .filter(|entry| now.duration_since(entry.fetched_at) < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key` with a fresh timestamp, replacing any
    /// previous entry.
    pub fn put(&self, key: K, value: V) {
        let fetched_at = self.clock.now();
        self.entries
            .lock()
            .insert(key, CacheEntry { value, fetched_at });
    }

    /// Drop the entry for `key`, if any.
    pub fn invalidate(&self, key: &K) {
        self.entries.lock().remove(key);
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<K, V> std::fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries.lock().len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Keys of the schema cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaKey {
    /// Every note type with its schema (the bulk entry).
    AllWithSchemas,
    /// One note type, by name.
    Model(String),
}

/// Values of the schema cache.
#[derive(Debug, Clone)]
enum CachedSchemas {
    All(Arc<Vec<NoteTypeSchema>>),
    One(Arc<NoteTypeSchema>),
}

/// Typed view over a [`TtlCache`] holding note-type schemas.
#[derive(Debug)]
pub struct SchemaCache {
    inner: TtlCache<SchemaKey, CachedSchemas>,
}

impl SchemaCache {
    /// Create a schema cache with the default TTL and system clock.
    pub fn new() -> Self {
        Self::with_clock(DEFAULT_TTL, Arc::new(SystemClock))
    }

    /// Create a schema cache with a custom TTL and clock.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: TtlCache::with_clock(ttl, clock),
        }
    }

    /// The cached bulk listing, if fresh.
    pub fn all(&self) -> Option<Arc<Vec<NoteTypeSchema>>> {
        match self.inner.get(&SchemaKey::AllWithSchemas)? {
            CachedSchemas::All(schemas) => Some(schemas),
            CachedSchemas::One(_) => None,
        }
    }

    /// Store the bulk listing.
    pub fn put_all(&self, schemas: Vec<NoteTypeSchema>) -> Arc<Vec<NoteTypeSchema>> {
        let schemas = Arc::new(schemas);
        self.inner
            .put(SchemaKey::AllWithSchemas, CachedSchemas::All(schemas.clone()));
        schemas
    }

    /// The cached schema of one note type, if fresh.
    pub fn model(&self, name: &str) -> Option<Arc<NoteTypeSchema>> {
        match self.inner.get(&SchemaKey::Model(name.to_string()))? {
            CachedSchemas::One(schema) => Some(schema),
            CachedSchemas::All(_) => None,
        }
    }

    /// Store the schema of one note type under its own name.
    pub fn put_model(&self, schema: NoteTypeSchema) -> Arc<NoteTypeSchema> {
        let schema = Arc::new(schema);
        self.inner.put(
            SchemaKey::Model(schema.name.clone()),
            CachedSchemas::One(schema.clone()),
        );
        schema
    }

    /// Drop the entries a new or changed note type `name` makes stale.
    pub fn invalidate_model(&self, name: &str) {
        self.inner.invalidate(&SchemaKey::AllWithSchemas);
        self.inner.invalidate(&SchemaKey::Model(name.to_string()));
    }

    /// Whether a fresh entry exists for `key`.
    pub fn contains(&self, key: &SchemaKey) -> bool {
        self.inner.get(key).is_some()
    }
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new()
    }
}
