//! Read-once property cache

use crate::error::Result;
use crate::source::{PropertySource, SystemProperties};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::{debug, warn};

/// Outcome of a successful property read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedProperty {
    /// Property holds a value
    Present(String),
    /// Property was read and is absent or empty
    Absent,
}

impl CachedProperty {
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Present(v) => Some(v.as_str()),
            Self::Absent => None,
        }
    }
}

static SYSTEM: OnceLock<PropertyCache<SystemProperties>> = OnceLock::new();

/// Caches each key after its first successful read.
///
/// A key missing from the map has not been queried yet. Present and absent
/// answers are both kept for the lifetime of the cache; failed reads are not,
/// so the next query retries the source. There is no invalidation.
pub struct PropertyCache<S> {
    source: S,
    entries: Mutex<HashMap<String, CachedProperty>>,
}

impl<S: PropertySource> PropertyCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get a property, treating read failures as absent
    pub fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Property {} unavailable: {}", key, e);
                None
            }
        }
    }

    /// Get a property, surfacing read failures
    pub fn try_get(&self, key: &str) -> Result<Option<String>> {
        // Held across the read so each key reaches the source at most once
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(cached) = entries.get(key) {
            return Ok(cached.value().map(str::to_string));
        }

        let value = self.source.read(key)?;
        debug!(
            "Fetched {} from {}: {:?}",
            key,
            self.source.name(),
            value.as_deref().unwrap_or("<absent>")
        );

        let cached = match &value {
            Some(v) => CachedProperty::Present(v.clone()),
            None => CachedProperty::Absent,
        };
        entries.insert(key.to_string(), cached);

        Ok(value)
    }

    /// Cached state of a key; `None` if it has not been read successfully yet
    pub fn state(&self, key: &str) -> Option<CachedProperty> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl PropertyCache<SystemProperties> {
    /// Process-wide cache over the platform property service
    pub fn system() -> &'static Self {
        SYSTEM.get_or_init(|| Self::new(SystemProperties))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DevPropError;
    use crate::keys;
    use crate::source::MemoryProperties;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts reads and fails the first `failures` of them
    struct CountingSource {
        inner: MemoryProperties,
        reads: AtomicUsize,
        failures: usize,
    }

    impl CountingSource {
        fn new(inner: MemoryProperties, failures: usize) -> Self {
            Self {
                inner,
                reads: AtomicUsize::new(0),
                failures,
            }
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl PropertySource for CountingSource {
        fn read(&self, key: &str) -> Result<Option<String>> {
            let n = self.reads.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(DevPropError::InvalidUtf8(key.to_string()));
            }
            self.inner.read(key)
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[test]
    fn test_value_fetched_once() {
        let cache = PropertyCache::new(CountingSource::new(
            MemoryProperties::new().with(keys::BOARD, "TAS"),
            0,
        ));

        assert_eq!(cache.state(keys::BOARD), None);
        assert_eq!(cache.get(keys::BOARD), Some("TAS".to_string()));
        assert_eq!(cache.get(keys::BOARD), Some("TAS".to_string()));
        assert_eq!(cache.source().reads(), 1);
        assert_eq!(
            cache.state(keys::BOARD),
            Some(CachedProperty::Present("TAS".to_string()))
        );
    }

    #[test]
    fn test_absent_is_cached_and_distinct_from_unqueried() {
        let cache = PropertyCache::new(CountingSource::new(MemoryProperties::new(), 0));

        assert_eq!(cache.state(keys::BASE_VERSION), None);
        assert_eq!(cache.get(keys::BASE_VERSION), None);
        assert_eq!(cache.state(keys::BASE_VERSION), Some(CachedProperty::Absent));
        assert_eq!(cache.get(keys::BASE_VERSION), None);
        assert_eq!(cache.source().reads(), 1);
    }

    #[test]
    fn test_failures_are_retried() {
        let cache = PropertyCache::new(CountingSource::new(
            MemoryProperties::new().with(keys::DRIVER_VERSION, "100.330.000.012"),
            1,
        ));

        assert!(cache.try_get(keys::DRIVER_VERSION).is_err());
        assert_eq!(cache.state(keys::DRIVER_VERSION), None);

        assert_eq!(
            cache.get(keys::DRIVER_VERSION),
            Some("100.330.000.012".to_string())
        );
        assert_eq!(cache.get(keys::DRIVER_VERSION), Some("100.330.000.012".to_string()));
        assert_eq!(cache.source().reads(), 2);
    }

    #[test]
    fn test_system_cache_is_shared() {
        let a = PropertyCache::system() as *const _;
        let b = PropertyCache::system() as *const _;
        assert_eq!(a, b);
    }
}
