//! Shared budget and pacing for outbound requests.
//!
//! A single [`RequestDispatcher`] is shared by reference between the
//! per-vehicle matrix builders so that the daily quota covers both vehicles.

use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use log::warn;
use thiserror::Error;

/// Errors returned by [`RequestDispatcher::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Every request permitted by the quota has been issued.
    #[error("request quota of {quota} exhausted")]
    QuotaExhausted {
        /// Configured quota.
        quota: u32,
    },
}

#[derive(Debug, Default)]
struct DispatchState {
    issued: u32,
    last_issued: Option<Instant>,
}

/// Enforces a request quota and a minimum interval between requests.
///
/// # Examples
///
/// ```
/// use courier_core::{DispatchError, RequestDispatcher};
///
/// let dispatcher = RequestDispatcher::with_quota(1);
/// assert!(dispatcher.acquire().is_ok());
/// assert_eq!(
///     dispatcher.acquire(),
///     Err(DispatchError::QuotaExhausted { quota: 1 })
/// );
/// ```
#[derive(Debug)]
pub struct RequestDispatcher {
    quota: Option<u32>,
    min_interval: Duration,
    state: Mutex<DispatchState>,
}

impl Default for RequestDispatcher {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl RequestDispatcher {
    /// A dispatcher with no quota and no pacing.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            quota: None,
            min_interval: Duration::ZERO,
            state: Mutex::new(DispatchState::default()),
        }
    }

    /// A dispatcher permitting at most `quota` requests.
    #[must_use]
    pub fn with_quota(quota: u32) -> Self {
        Self {
            quota: Some(quota),
            ..Self::unlimited()
        }
    }

    /// Require at least `interval` between consecutive requests.
    #[must_use]
    pub const fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Reserve one request, sleeping if the minimum interval has not
    /// elapsed since the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::QuotaExhausted`] once the quota is spent.
    pub fn acquire(&self) -> Result<(), DispatchError> {
        // A panicking holder cannot leave the counters inconsistent.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(quota) = self.quota
            && state.issued >= quota
        {
            warn!("request quota of {quota} exhausted");
            return Err(DispatchError::QuotaExhausted { quota });
        }
        if let Some(last) = state.last_issued {
            let wait = self.min_interval.saturating_sub(last.elapsed());
            if !wait.is_zero() {
                thread::sleep(wait);
            }
        }
        state.issued = state.issued.saturating_add(1);
        state.last_issued = Some(Instant::now());
        Ok(())
    }

    /// Requests issued so far.
    pub fn issued(&self) -> u32 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .issued
    }

    /// Requests still permitted, or `None` when unlimited.
    pub fn remaining(&self) -> Option<u32> {
        self.quota.map(|quota| quota.saturating_sub(self.issued()))
    }
}
