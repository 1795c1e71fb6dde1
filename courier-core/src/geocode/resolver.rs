//! Cache-first address resolution.

use geo::Coord;
use log::{debug, warn};

use super::{GeocodeCache, GeocodeError, GeocodingProvider};
use crate::address::normalise_address;
use crate::dispatch::RequestDispatcher;

/// Outcome of resolving a single address.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAddress {
    /// Cache key derived from the raw address.
    pub normalised_address: String,
    /// Geocoded position.
    pub location: Coord<f64>,
}

/// Resolves addresses through a cache before consulting a provider.
///
/// Every successful provider result is written to the cache before
/// [`Geocoder::resolve`] returns. Cache write failures are logged and do not
/// fail the lookup.
///
/// # Examples
///
/// ```
/// use courier_core::{GeocodeError, Geocoder, GeocodingProvider, MemoryGeocodeCache};
/// use geo::Coord;
///
/// struct Fixed;
///
/// impl GeocodingProvider for Fixed {
///     fn geocode(&self, _address: &str) -> Result<Coord<f64>, GeocodeError> {
///         Ok(Coord { x: 1.0, y: 2.0 })
///     }
/// }
///
/// let mut geocoder = Geocoder::new(Fixed, MemoryGeocodeCache::default());
/// geocoder.resolve("1 Main St")?;
/// geocoder.resolve("1  main st")?;
/// assert_eq!(geocoder.lookups(), 1);
/// # Ok::<(), GeocodeError>(())
/// ```
#[derive(Debug)]
pub struct Geocoder<P, C> {
    provider: P,
    cache: C,
    dispatcher: Option<RequestDispatcher>,
    lookups: usize,
}

impl<P, C> Geocoder<P, C>
where
    P: GeocodingProvider,
    C: GeocodeCache,
{
    /// Create a geocoder backed by `provider` and `cache`.
    pub const fn new(provider: P, cache: C) -> Self {
        Self {
            provider,
            cache,
            dispatcher: None,
            lookups: 0,
        }
    }

    /// Route provider calls through `dispatcher` for pacing and quota.
    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: RequestDispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Resolve `address` to a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::EmptyAddress`] for blank input,
    /// [`GeocodeError::QuotaExhausted`] when the dispatcher refuses the call,
    /// or the provider's error otherwise.
    pub fn resolve(&mut self, address: &str) -> Result<ResolvedAddress, GeocodeError> {
        let normalised_address = normalise_address(address);
        if normalised_address.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        if let Some(location) = self.cache.get(&normalised_address) {
            debug!("geocode cache hit for {normalised_address:?}");
            return Ok(ResolvedAddress {
                normalised_address,
                location,
            });
        }

        if let Some(dispatcher) = &self.dispatcher {
            dispatcher
                .acquire()
                .map_err(|_| GeocodeError::QuotaExhausted)?;
        }
        self.lookups += 1;
        debug!("geocoding {address:?}");
        let location = self.provider.geocode(address.trim())?;

        if let Err(err) = self.cache.put(&normalised_address, location) {
            warn!("failed to cache geocode for {normalised_address:?}: {err}");
        }
        Ok(ResolvedAddress {
            normalised_address,
            location,
        })
    }

    /// Number of provider calls issued so far.
    pub const fn lookups(&self) -> usize {
        self.lookups
    }

    /// Borrow the underlying cache.
    pub const fn cache(&self) -> &C {
        &self.cache
    }

    /// Flush the underlying cache.
    ///
    /// # Errors
    ///
    /// Propagates the cache's write error.
    pub fn flush_cache(&mut self) -> Result<(), super::CacheError> {
        self.cache.flush()
    }
}
