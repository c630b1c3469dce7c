use crate::models::Tier;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_FLASH_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_PRO_MODEL: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_OPTIMIZER_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_CHUNK_PAUSE_MS: u64 = 300;
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub flash_model: String,
    pub pro_model: String,
    pub optimizer_model: String,
    pub chunk_pause: Duration,
    pub request_timeout: Option<Duration>,
    pub history_capacity: usize,
    pub export_dir: PathBuf,
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            flash_model: DEFAULT_FLASH_MODEL.to_string(),
            pro_model: DEFAULT_PRO_MODEL.to_string(),
            optimizer_model: DEFAULT_OPTIMIZER_MODEL.to_string(),
            chunk_pause: Duration::from_millis(DEFAULT_CHUNK_PAUSE_MS),
            request_timeout: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            export_dir: PathBuf::from("."),
        }
    }
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_key = non_empty_env("GEMINI_API_KEY")
            .or_else(|| non_empty_env("GOOGLE_API_KEY"))
            .or_else(|| non_empty_env("API_KEY"));
        let api_base = non_empty_env("GEMINI_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base);
        let flash_model = non_empty_env("STUDIO_FLASH_MODEL").unwrap_or(defaults.flash_model);
        let pro_model = non_empty_env("STUDIO_PRO_MODEL").unwrap_or(defaults.pro_model);
        let optimizer_model =
            non_empty_env("STUDIO_OPTIMIZER_MODEL").unwrap_or(defaults.optimizer_model);
        let chunk_pause = non_empty_env("STUDIO_CHUNK_PAUSE_MS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.chunk_pause);
        let request_timeout = non_empty_env("STUDIO_REQUEST_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs);
        let history_capacity = non_empty_env("STUDIO_HISTORY_CAPACITY")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.history_capacity);
        let export_dir = non_empty_env("STUDIO_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        StudioConfig {
            api_key,
            api_base,
            flash_model,
            pro_model,
            optimizer_model,
            chunk_pause,
            request_timeout,
            history_capacity,
            export_dir,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_models(
        mut self,
        flash_model: impl Into<String>,
        pro_model: impl Into<String>,
    ) -> Self {
        self.flash_model = flash_model.into();
        self.pro_model = pro_model.into();
        self
    }

    pub fn with_chunk_pause(mut self, pause: Duration) -> Self {
        self.chunk_pause = pause;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn model_for(&self, tier: Tier) -> &str {
        match tier {
            Tier::Flash => &self.flash_model,
            Tier::Pro => &self.pro_model,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().map_or(false, |key| !key.is_empty())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StudioConfig::default();
        assert_eq!(config.chunk_pause, Duration::from_millis(300));
        assert_eq!(config.history_capacity, 50);
        assert!(config.request_timeout.is_none());
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_model_for_tier() {
        let config = StudioConfig::new().with_models("flash-x", "pro-x");
        assert_eq!(config.model_for(Tier::Flash), "flash-x");
        assert_eq!(config.model_for(Tier::Pro), "pro-x");
    }

    #[test]
    fn test_empty_key_is_not_a_key() {
        assert!(!StudioConfig::new().with_api_key("").has_api_key());
        assert!(StudioConfig::new().with_api_key("abc").has_api_key());
    }
}
