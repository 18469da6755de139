use crate::error::{CoachError, Result};
use crate::paths;
use crate::ratelimit::RateLimiter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_frontend_origins")]
    pub frontend_origins: Vec<String>,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_port() -> u16 {
    8000
}

fn default_frontend_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            frontend_origins: default_frontend_origins(),
            environment: default_environment(),
        }
    }
}

// ---------------------------------------------------------------------------
// GithubConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Username used by the CLI when `--user` is omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

// ---------------------------------------------------------------------------
// RateLimitConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_window")]
    pub requests_per_window: usize,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_requests_per_window() -> usize {
    20
}

fn default_window_secs() -> u64 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: default_requests_per_window(),
            window_secs: default_window_secs(),
        }
    }
}

impl RateLimitConfig {
    pub fn build(&self) -> RateLimiter {
        RateLimiter::new(
            self.requests_per_window,
            Duration::from_secs(self.window_secs),
        )
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            server: ServerConfig::default(),
            github: GithubConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(CoachError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like [`Config::load`], but an uninitialized root yields the defaults.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        match Self::load(root) {
            Err(CoachError::NotInitialized) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Write the config only when none exists yet. Returns true if written.
    pub fn save_if_missing(&self, root: &Path) -> Result<bool> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::write_if_missing(&path, data.as_bytes())
    }

    pub fn is_production(&self) -> bool {
        self.server.environment.eq_ignore_ascii_case("production")
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "server.port is 0; the OS will pick a free port".to_string(),
            });
        }

        if self.server.frontend_origins.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "server.frontend_origins is empty; CORS will allow any origin"
                    .to_string(),
            });
        }

        if self.is_production() && self.server.frontend_origins.iter().any(|o| o == "*") {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "wildcard origin '*' is not allowed in production".to_string(),
            });
        }

        if self.rate_limit.requests_per_window == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "rate_limit.requests_per_window is 0; every request would be rejected"
                    .to_string(),
            });
        }

        if self.rate_limit.window_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "rate_limit.window_secs is 0; rate limiting is effectively off"
                    .to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.server.port, 8000);
        assert_eq!(parsed.rate_limit.requests_per_window, 20);
    }

    #[test]
    fn sparse_yaml_fills_defaults() {
        let cfg: Config = serde_yaml::from_str("server:\n  port: 9000\n").unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.environment, "development");
        assert_eq!(cfg.server.frontend_origins, vec!["http://localhost:5173"]);
        assert_eq!(cfg.rate_limit.window_secs, 60);
        assert!(cfg.github.username.is_none());
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(CoachError::NotInitialized)
        ));
        assert_eq!(Config::load_or_default(dir.path()).unwrap().version, 1);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.github.username = Some("alice".to_string());
        cfg.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.github.username.as_deref(), Some("alice"));
    }

    #[test]
    fn save_if_missing_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.server.port = 9100;
        assert!(cfg.save_if_missing(dir.path()).unwrap());

        cfg.server.port = 9200;
        assert!(!cfg.save_if_missing(dir.path()).unwrap());
        assert_eq!(Config::load(dir.path()).unwrap().server.port, 9100);
    }

    #[test]
    fn production_detection_ignores_case() {
        let mut cfg = Config::default();
        assert!(!cfg.is_production());
        cfg.server.environment = "Production".to_string();
        assert!(cfg.is_production());
    }

    #[test]
    fn default_config_is_clean() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn validate_flags_bad_settings() {
        let mut cfg = Config::default();
        cfg.server.environment = "production".to_string();
        cfg.server.frontend_origins = vec!["*".to_string()];
        cfg.rate_limit.requests_per_window = 0;

        let warnings = cfg.validate();
        let errors: Vec<_> = warnings
            .iter()
            .filter(|w| w.level == WarnLevel::Error)
            .collect();
        assert_eq!(errors.len(), 2);
        assert!(warnings.iter().any(|w| w.message.contains("wildcard")));
    }

    #[test]
    fn rate_limit_config_builds_limiter() {
        let limiter = RateLimitConfig::default().build();
        assert_eq!(limiter.limit(), 20);
        assert_eq!(limiter.window(), Duration::from_secs(60));
    }
}
