use once_cell::sync::Lazy;
use std::env;

/// Engine-wide tuning knobs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Hard ceiling on any normalized page size. `None` disables the cap.
    pub max_limit: Option<i64>,
    /// Emit compiled plans and cap warnings at debug level.
    pub debug_logging: bool,
}

impl SearchConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn defaults() -> Self {
        Self {
            max_limit: Some(100),
            debug_logging: false,
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("SEARCH_MAX_LIMIT") {
            self.max_limit = v.parse().ok();
        }
        if let Ok(v) = env::var("SEARCH_DEBUG_LOGGING") {
            self.debug_logging = v.parse().unwrap_or(self.debug_logging);
        }
        self
    }
}

// Global singleton config - initialized once at first use
pub static CONFIG: Lazy<SearchConfig> = Lazy::new(SearchConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static SearchConfig {
    &CONFIG
}
