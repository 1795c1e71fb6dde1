//! Shared HTTP plumbing for the synchronous service adapters.
//!
//! The provider traits in `courier-core` are synchronous so the core stays
//! embeddable anywhere. Adapters own a `reqwest` client and a
//! `current_thread` Tokio runtime, and block on each request.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "courier-engine/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while constructing an HTTP-backed provider.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The configured base URL does not parse.
    #[error("invalid service URL {url:?}")]
    InvalidBaseUrl {
        /// URL as configured.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime")]
    Runtime(#[source] std::io::Error),
}

/// Connection settings shared by the HTTP adapters.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Base URL of the service, e.g. `"http://localhost:5000"`.
    pub base_url: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl HttpProviderConfig {
    /// Configuration for `base_url` with the default timeout and user agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Base URL without trailing slashes.
    #[must_use]
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// A client paired with the runtime that drives it.
pub(crate) struct BlockingClient {
    pub(crate) client: Client,
    runtime: Runtime,
}

impl std::fmt::Debug for BlockingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingClient")
            .field("client", &self.client)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl BlockingClient {
    pub(crate) fn build(config: &HttpProviderConfig) -> Result<Self, ProviderBuildError> {
        Url::parse(&config.base_url).map_err(|source| ProviderBuildError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self { client, runtime })
    }

    /// Drive `future` to completion from synchronous code.
    ///
    /// Inside a multi-threaded runtime the caller's handle is used through
    /// `block_in_place`; otherwise the owned runtime runs the future.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

/// Transport failure classified for the adapters' error enums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportFailure {
    Timeout,
    Status(u16),
    Network,
}

pub(crate) fn classify(error: &reqwest::Error) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::Timeout
    } else if let Some(status) = error.status() {
        TransportFailure::Status(status.as_u16())
    } else {
        TransportFailure::Network
    }
}
