//! Configuration for a ChatKit context

use std::env;
use std::path::PathBuf;

use crate::error::{ChatKitError, ChatKitResult};

/// Environment variable holding the application id.
pub const ENV_APP_ID: &str = "CHATKIT_APP_ID";
/// Environment variable holding the data directory.
pub const ENV_DATA_DIR: &str = "CHATKIT_DATA_DIR";
/// Environment variable holding the log filter directive.
pub const ENV_LOG: &str = "CHATKIT_LOG";

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "chatkit_core=info";

/// Configuration for a [`ChatKit`](crate::ChatKit) context
#[derive(Debug, Clone)]
pub struct ChatKitConfig {
    /// Application id passed to the service's `init`
    pub app_id: String,

    /// Directory for persisted preferences. `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,

    /// Fall back to the user id when neither the host nor the server
    /// provides a nickname
    pub use_user_id_for_nickname: bool,

    /// Let the service cache data locally
    pub use_caching: bool,

    /// `tracing` filter directive used by [`init_logging`](crate::logging::init_logging)
    pub log_filter: String,
}

impl Default for ChatKitConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            data_dir: None,
            use_user_id_for_nickname: true,
            use_caching: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ChatKitConfig {
    /// Creates a config for `app_id` with defaults for everything else.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Default::default()
        }
    }

    /// Reads `CHATKIT_APP_ID`, `CHATKIT_DATA_DIR` and `CHATKIT_LOG`.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(app_id) = env::var(ENV_APP_ID) {
            config.app_id = app_id;
        }
        if let Ok(dir) = env::var(ENV_DATA_DIR) {
            if !dir.is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(filter) = env::var(ENV_LOG) {
            if !filter.is_empty() {
                config.log_filter = filter;
            }
        }
        config
    }

    /// Persist preferences under `dir`
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Never derive a nickname from the user id
    pub fn without_user_id_nickname(mut self) -> Self {
        self.use_user_id_for_nickname = false;
        self
    }

    /// Checks that the config can initialize a context.
    pub fn validate(&self) -> ChatKitResult<()> {
        if self.app_id.trim().is_empty() {
            return Err(ChatKitError::Configuration(
                "app_id must not be empty".into(),
            ));
        }
        Ok(())
    }
}
