//! JSON file store for geocoded coordinates.
//!
//! The file is a JSON object mapping each normalised address to a
//! `[latitude, longitude]` pair:
//!
//! ```json
//! {
//!   "1 dock road, leeds": [53.7946, -1.5474]
//! }
//! ```
//!
//! Every `put` writes the whole file through a sibling temporary file that is
//! renamed into place, so an interrupted run leaves either the old or the new
//! file and never a torn one.

use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use courier_core::{CacheError, GeocodeCache, normalise_address};
use geo::Coord;
use log::{debug, warn};

type StoredEntries = BTreeMap<String, [f64; 2]>;

/// Durable [`GeocodeCache`] backed by a JSON file.
///
/// # Examples
///
/// ```no_run
/// use courier_core::GeocodeCache;
/// use courier_data::JsonFileGeocodeCache;
///
/// let cache = JsonFileGeocodeCache::load("data/cache/coords.json")?;
/// println!("{} cached addresses", cache.len());
/// # Ok::<(), courier_core::CacheError>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileGeocodeCache {
    path: Utf8PathBuf,
    entries: StoredEntries,
    dirty: bool,
}

impl JsonFileGeocodeCache {
    /// Load the cache at `path`, starting empty when the file is missing or
    /// cannot be decoded.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Read`] when the file exists but cannot be read.
    pub fn load(path: impl Into<Utf8PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        match Self::load_strict(path.clone()) {
            Err(err @ CacheError::Corrupt { .. }) => {
                warn!("{err}; starting with an empty geocode cache");
                Ok(Self::empty(path))
            }
            other => other,
        }
    }

    /// Load the cache at `path`, treating only a missing file as empty.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Corrupt`] when the file cannot be decoded and
    /// [`CacheError::Read`] when it cannot be read.
    pub fn load_strict(path: impl Into<Utf8PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let contents = match courier_fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no geocode cache at {path}; starting cold");
                return Ok(Self::empty(path));
            }
            Err(source) => {
                return Err(CacheError::Read {
                    location: path.to_string(),
                    source,
                });
            }
        };
        let stored: StoredEntries =
            serde_json::from_str(&contents).map_err(|err| CacheError::Corrupt {
                location: path.to_string(),
                message: err.to_string(),
            })?;
        let entries = stored
            .into_iter()
            .map(|(address, location)| (normalise_address(&address), location))
            .collect();
        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    fn empty(path: Utf8PathBuf) -> Self {
        Self {
            path,
            entries: StoredEntries::new(),
            dirty: false,
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn persist(&mut self) -> Result<(), CacheError> {
        let write_error = |source| CacheError::Write {
            location: self.path.to_string(),
            source,
        };
        let bytes = serde_json::to_vec_pretty(&self.entries)
            .map_err(|err| write_error(io::Error::other(err)))?;
        courier_fs::write_atomic(&self.path, &bytes).map_err(write_error)?;
        self.dirty = false;
        Ok(())
    }
}

impl GeocodeCache for JsonFileGeocodeCache {
    fn get(&self, normalised_address: &str) -> Option<Coord<f64>> {
        self.entries
            .get(normalised_address)
            .map(|[lat, lon]| Coord { x: *lon, y: *lat })
    }

    fn put(&mut self, normalised_address: &str, location: Coord<f64>) -> Result<(), CacheError> {
        self.entries
            .insert(normalised_address.to_owned(), [location.y, location.x]);
        self.dirty = true;
        self.persist()
    }

    fn flush(&mut self) -> Result<(), CacheError> {
        if self.dirty {
            self.persist()
        } else {
            Ok(())
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn cache_dir() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("cache/coords.json"))
            .expect("utf-8 tempdir");
        (dir, path)
    }

    #[rstest]
    fn missing_file_is_a_cold_start(cache_dir: (TempDir, Utf8PathBuf)) {
        let (_guard, path) = cache_dir;
        let cache = JsonFileGeocodeCache::load(path).expect("cold start");
        assert!(cache.is_empty());
    }

    #[rstest]
    fn entries_survive_a_reload(cache_dir: (TempDir, Utf8PathBuf)) {
        let (_guard, path) = cache_dir;
        let location = Coord { x: 23.3219, y: 42.6977 };
        let mut cache = JsonFileGeocodeCache::load(path.clone()).expect("cold start");
        cache.put("sofia centre", location).expect("write-through");

        let reloaded = JsonFileGeocodeCache::load(path).expect("reload");
        assert_eq!(reloaded.get("sofia centre"), Some(location));
        assert_eq!(reloaded.len(), 1);
    }

    #[rstest]
    fn file_stores_latitude_first(cache_dir: (TempDir, Utf8PathBuf)) {
        let (_guard, path) = cache_dir;
        let mut cache = JsonFileGeocodeCache::load(path.clone()).expect("cold start");
        cache
            .put("a", Coord { x: -1.5, y: 53.8 })
            .expect("write-through");
        let raw = courier_fs::read_to_string(&path).expect("read back");
        let stored: StoredEntries = serde_json::from_str(&raw).expect("json");
        assert_eq!(stored.get("a"), Some(&[53.8, -1.5]));
    }

    #[rstest]
    fn corrupt_file_starts_empty(cache_dir: (TempDir, Utf8PathBuf)) {
        let (_guard, path) = cache_dir;
        courier_fs::write_atomic(&path, b"{ not json").expect("seed");

        let strict = JsonFileGeocodeCache::load_strict(path.clone()).expect_err("corrupt");
        assert!(matches!(strict, CacheError::Corrupt { .. }));

        let lenient = JsonFileGeocodeCache::load(path).expect("lenient load");
        assert!(lenient.is_empty());
    }

    #[rstest]
    fn legacy_keys_are_normalised_on_load(cache_dir: (TempDir, Utf8PathBuf)) {
        let (_guard, path) = cache_dir;
        courier_fs::write_atomic(&path, br#"{"  1 Dock  ROAD ": [53.79, -1.54]}"#)
            .expect("seed");
        let cache = JsonFileGeocodeCache::load(path).expect("load");
        assert_eq!(cache.get("1 dock road"), Some(Coord { x: -1.54, y: 53.79 }));
    }

    #[rstest]
    fn flush_without_changes_leaves_no_file(cache_dir: (TempDir, Utf8PathBuf)) {
        let (_guard, path) = cache_dir;
        let mut cache = JsonFileGeocodeCache::load(path.clone()).expect("cold start");
        cache.flush().expect("clean flush");
        assert!(courier_fs::read_to_string(&path).is_err());
    }
}
