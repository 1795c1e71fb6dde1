//! Geocode cache contract and the in-memory store.

use std::collections::BTreeMap;

use geo::Coord;
use thiserror::Error;

/// Errors raised while loading or persisting a geocode cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The stored cache could not be decoded.
    #[error("geocode cache at {location} is corrupt: {message}")]
    Corrupt {
        /// Where the cache lives.
        location: String,
        /// Decoder message.
        message: String,
    },
    /// Reading the stored cache failed.
    #[error("failed to read geocode cache at {location}")]
    Read {
        /// Where the cache lives.
        location: String,
        /// Source error from the filesystem.
        #[source]
        source: std::io::Error,
    },
    /// Persisting the cache failed.
    #[error("failed to write geocode cache at {location}")]
    Write {
        /// Where the cache lives.
        location: String,
        /// Source error from the filesystem.
        #[source]
        source: std::io::Error,
    },
}

/// Persistent mapping from normalised address to coordinate.
///
/// Keys are expected to be normalised with
/// [`normalise_address`](crate::normalise_address). Entries never expire and
/// are never evicted.
pub trait GeocodeCache: Send {
    /// Return the coordinate stored for `normalised_address`.
    fn get(&self, normalised_address: &str) -> Option<Coord<f64>>;

    /// Store `location` for `normalised_address`, replacing any previous
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Write`] when a durable store cannot persist the
    /// entry. The in-memory value is still updated.
    fn put(&mut self, normalised_address: &str, location: Coord<f64>) -> Result<(), CacheError>;

    /// Persist any pending entries.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Write`] when the store cannot be written.
    fn flush(&mut self) -> Result<(), CacheError>;

    /// Number of cached entries.
    fn len(&self) -> usize;

    /// Whether the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local cache used by tests and single-shot runs.
///
/// # Examples
///
/// ```
/// use courier_core::{GeocodeCache, MemoryGeocodeCache};
/// use geo::Coord;
///
/// let mut cache = MemoryGeocodeCache::default();
/// cache.put("1 dock road", Coord { x: -1.5, y: 53.8 })?;
/// assert_eq!(cache.get("1 dock road"), Some(Coord { x: -1.5, y: 53.8 }));
/// # Ok::<(), courier_core::CacheError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryGeocodeCache {
    entries: BTreeMap<String, Coord<f64>>,
}

impl MemoryGeocodeCache {
    /// Seed a cache from existing entries.
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Coord<f64>)>,
        K: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, location)| (key.into(), location))
                .collect(),
        }
    }

    /// Iterate over the stored entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Coord<f64>)> {
        self.entries
            .iter()
            .map(|(key, location)| (key.as_str(), *location))
    }
}

impl GeocodeCache for MemoryGeocodeCache {
    fn get(&self, normalised_address: &str) -> Option<Coord<f64>> {
        self.entries.get(normalised_address).copied()
    }

    fn put(&mut self, normalised_address: &str, location: Coord<f64>) -> Result<(), CacheError> {
        self.entries.insert(normalised_address.to_owned(), location);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CacheError> {
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
