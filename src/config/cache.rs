//! Memoized configuration factory.
//!
//! Loading re-reads every candidate file, so callers that need the same
//! profile repeatedly hold a [`ConfigCache`] and pass it around instead of
//! reloading. The cached value is swapped atomically, so a shared cache can
//! be reset while readers still hold the previous `Arc`.

use super::profile::ConfigProfile;
use super::resolved::ResolvedConfig;
use crate::error::Result;
use arc_swap::ArcSwapOption;
use std::sync::Arc;
use tracing::debug;

pub struct ConfigCache {
    profile: ConfigProfile,
    current: ArcSwapOption<ResolvedConfig>,
}

impl ConfigCache {
    pub fn new(profile: ConfigProfile) -> Self {
        Self {
            profile,
            current: ArcSwapOption::empty(),
        }
    }

    pub fn profile(&self) -> &ConfigProfile {
        &self.profile
    }

    /// Return the cached configuration, loading it from the environment-derived
    /// paths on first use. A failed load caches nothing.
    pub fn get(&self) -> Result<Arc<ResolvedConfig>> {
        if let Some(config) = self.current.load_full() {
            return Ok(config);
        }

        let config = Arc::new(ResolvedConfig::read(&self.profile)?);
        self.current.store(Some(Arc::clone(&config)));
        debug!(slug = self.profile.slug(), "Cached resolved configuration");
        Ok(config)
    }

    /// The cached configuration, if one has been loaded.
    pub fn peek(&self) -> Option<Arc<ResolvedConfig>> {
        self.current.load_full()
    }

    /// Drop the cached configuration so the next [`get`](Self::get) reloads.
    pub fn reset(&self) {
        self.current.store(None);
    }
}

impl std::fmt::Debug for ConfigCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigCache")
            .field("slug", &self.profile.slug())
            .field("loaded", &self.current.load().is_some())
            .finish()
    }
}
