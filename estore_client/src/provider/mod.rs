//! Ledger provider resolution
//!
//! A process gets exactly one provider handle. When the host environment
//! injects a provider it is wrapped as-is; otherwise a handle pointed at the
//! local development network is built. Resolution only picks a target and
//! never touches the network, so an unreachable endpoint surfaces on the
//! first call made through the handle.

use crate::config::ProviderConfig;
use crate::error::{ClientError, Result};
use ethers::providers::{Http, Provider};
use log::{info, warn};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Local development network endpoint
pub const FALLBACK_ENDPOINT: &str = "http://localhost:8545";

/// Where the process-wide handle came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOrigin {
    /// Wrapped the provider injected by the host environment
    Ambient,
    /// Built for the fallback endpoint
    Fallback,
}

impl std::fmt::Display for ProviderOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderOrigin::Ambient => write!(f, "ambient"),
            ProviderOrigin::Fallback => write!(f, "fallback"),
        }
    }
}

/// Provider injected by the host environment
#[derive(Debug, Clone)]
pub struct AmbientProvider {
    provider: Provider<Http>,
    endpoint: Url,
}

impl AmbientProvider {
    /// Wrap an already constructed provider
    pub fn new(provider: Provider<Http>, endpoint: Url) -> Self {
        Self { provider, endpoint }
    }

    /// Build the injected provider from its endpoint URL
    pub fn from_url(url: &str) -> Result<Self> {
        let endpoint = Url::parse(url)
            .map_err(|e| ClientError::Config(format!("invalid provider url {}: {}", url, e)))?;
        let provider = Provider::new(Http::new(endpoint.clone()));
        Ok(Self { provider, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Process-wide capability for submitting calls to the ledger
#[derive(Debug)]
pub struct ProviderHandle {
    provider: Arc<Provider<Http>>,
    endpoint: Url,
    origin: ProviderOrigin,
}

impl ProviderHandle {
    /// Shared provider used by contract bindings
    pub fn provider(&self) -> Arc<Provider<Http>> {
        self.provider.clone()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn origin(&self) -> ProviderOrigin {
        self.origin
    }
}

/// Produces the single provider handle of the process
pub struct ProviderResolver {
    /// Target used when nothing is injected
    fallback: Url,
    /// Polling interval applied to the resolved provider
    poll_interval: Option<Duration>,
    /// The resolved handle, set at most once
    handle: OnceCell<Arc<ProviderHandle>>,
}

impl ProviderResolver {
    /// Create a resolver with the given fallback endpoint
    pub fn new(fallback: Url) -> Self {
        Self {
            fallback,
            poll_interval: None,
            handle: OnceCell::new(),
        }
    }

    /// Create a resolver from provider settings
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let resolver = Self::new(config.fallback_endpoint()?);
        Ok(resolver.with_poll_interval(Duration::from_millis(config.poll_interval_ms)))
    }

    /// Override the pending transaction polling interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn fallback_endpoint(&self) -> &Url {
        &self.fallback
    }

    /// Resolve the process-wide handle.
    ///
    /// The first call decides the handle; later calls return the same
    /// instance and ignore their argument.
    pub fn resolve(&self, ambient: Option<AmbientProvider>) -> Arc<ProviderHandle> {
        let mut resolved_now = false;
        let handle = self.handle.get_or_init(|| {
            resolved_now = true;
            Arc::new(self.build(ambient))
        });

        if resolved_now {
            info!(
                "Ledger provider resolved ({}): {}",
                handle.origin, handle.endpoint
            );
        } else {
            warn!(
                "Ledger provider already resolved ({}), keeping {}",
                handle.origin, handle.endpoint
            );
        }

        handle.clone()
    }

    /// The resolved handle, if `resolve` has run
    pub fn handle(&self) -> Option<Arc<ProviderHandle>> {
        self.handle.get().cloned()
    }

    fn build(&self, ambient: Option<AmbientProvider>) -> ProviderHandle {
        let (provider, endpoint, origin) = match ambient {
            Some(AmbientProvider { provider, endpoint }) => (provider, endpoint, ProviderOrigin::Ambient),
            None => (
                Provider::new(Http::new(self.fallback.clone())),
                self.fallback.clone(),
                ProviderOrigin::Fallback,
            ),
        };

        let provider = match self.poll_interval {
            Some(interval) => provider.interval(interval),
            None => provider,
        };

        ProviderHandle {
            provider: Arc::new(provider),
            endpoint,
            origin,
        }
    }
}
