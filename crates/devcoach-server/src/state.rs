use devcoach_core::config::Config;
use devcoach_core::ratelimit::RateLimiter;
use devcoach_core::{CoachError, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Key used for callers that do not name themselves.
pub const ANONYMOUS: &str = "anonymous";

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    limiter: Arc<Mutex<RateLimiter>>,
}

impl AppState {
    pub fn new(root: PathBuf, config: Config) -> Self {
        let limiter = config.rate_limit.build();
        Self {
            root,
            config: Arc::new(config),
            limiter: Arc::new(Mutex::new(limiter)),
        }
    }

    /// Build state from `root/.devcoach/config.yaml`, falling back to the
    /// defaults when the project has not been initialized.
    pub fn load(root: PathBuf) -> Result<Self> {
        let config = Config::load_or_default(&root)?;
        Ok(Self::new(root, config))
    }

    /// Count one request against `username`'s budget.
    pub fn check_rate(&self, username: Option<&str>) -> std::result::Result<(), CoachError> {
        let key = username.filter(|u| !u.is_empty()).unwrap_or(ANONYMOUS);
        let mut limiter = self
            .limiter
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();
        limiter.prune(now);
        limiter.check(key, now).inspect_err(|_| {
            tracing::warn!(key, "rate limit exceeded");
        })
    }
}
