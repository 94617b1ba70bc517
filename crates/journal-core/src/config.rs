//! Configuration for the journal client.
//!
//! Root configuration struct and nested sections with full defaults,
//! validation, YAML file loading, environment variable overrides, and tilde
//! path expansion for the config file location.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// File name searched for in the config directories.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

// ---------------------------------------------------------------------------
// Root config
// ---------------------------------------------------------------------------

/// Root configuration for the journal client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub gesture: GestureConfig,
    pub mutation: MutationConfig,
    pub media: MediaConfig,
    pub logging: LoggingConfig,
}

/// A config together with the file it was read from, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: ClientConfig,
    pub path: Option<PathBuf>,
}

impl ClientConfig {
    /// Validates the entire configuration, returning an error message on failure.
    pub fn validate(&self) -> Result<(), String> {
        // Server
        let base_url = self.server.base_url.trim();
        if base_url.is_empty() {
            return Err("server.base_url is required".into());
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err("server.base_url must start with http:// or https://".into());
        }
        if !self.server.route_prefix.starts_with('/') {
            return Err("server.route_prefix must start with '/'".into());
        }
        if self.server.request_timeout.is_zero() {
            return Err("server.request_timeout must be greater than 0".into());
        }
        if self.server.delete_route.trim().is_empty() {
            return Err("server.delete_route is required".into());
        }
        if self.server.delete_field.trim().is_empty() {
            return Err("server.delete_field is required".into());
        }

        // Logging
        match self.logging.level.to_lowercase().trim() {
            "debug" | "info" | "warn" | "error" => {}
            _ => return Err("logging.level must be one of debug, info, warn, error".into()),
        }
        match self.logging.format.to_lowercase().trim() {
            "console" | "json" => {}
            _ => return Err("logging.format must be one of console, json".into()),
        }

        // Gesture thresholds <= 0 are allowed: they disable double activation.
        Ok(())
    }

    /// Parse a YAML document on top of the defaults.
    pub fn from_yaml_str(raw: &str) -> Result<Self, String> {
        let file: ConfigFile = if raw.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(raw).map_err(|err| format!("failed to parse config: {err}"))?
        };
        let mut cfg = Self::default();
        file.apply(&mut cfg)?;
        Ok(cfg)
    }

    /// Read and parse a YAML config file.
    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read config file {}: {err}", path.display()))?;
        Self::from_yaml_str(&raw)
    }

    /// Apply `JOURNAL_*` overrides using the given variable lookup.
    pub fn apply_env_overrides(
        &mut self,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<(), String> {
        if let Some(v) = lookup("JOURNAL_SERVER_URL") {
            self.server.base_url = v;
        }
        if let Some(v) = lookup("JOURNAL_ROUTE_PREFIX") {
            self.server.route_prefix = v;
        }
        if let Some(v) = lookup("JOURNAL_DOUBLE_TAP_MS") {
            self.gesture.threshold_ms = v
                .trim()
                .parse()
                .map_err(|_| format!("JOURNAL_DOUBLE_TAP_MS must be an integer, got {v:?}"))?;
        }
        if let Some(v) = lookup("JOURNAL_FAILURE_POLICY") {
            self.mutation.failure_policy = FailurePolicy::parse(&v)?;
        }
        if let Some(v) = lookup("JOURNAL_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("JOURNAL_LOG_FORMAT") {
            self.logging.format = v;
        }
        Ok(())
    }

    /// Load the effective configuration: defaults, then the first config file
    /// found (or `explicit_path`), then process environment overrides.
    pub fn load(explicit_path: Option<&str>) -> Result<LoadedConfig, String> {
        let path = match explicit_path {
            Some(p) => Some(PathBuf::from(expand_tilde(p))),
            None => find_config_file(),
        };
        let mut config = match &path {
            Some(p) => Self::load_from_path(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides(&|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(LoadedConfig { config, path })
    }

    /// Render the effective configuration as YAML, in the shape
    /// `from_yaml_str` reads back.
    pub fn to_yaml(&self) -> Result<String, String> {
        serde_yaml::to_string(&ConfigFile::from(self))
            .map_err(|err| format!("failed to serialize config: {err}"))
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Where the journal server lives and how its routes are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub base_url: String,
    /// Prefix joined in front of every route name: `/_` gives `/_edit`,
    /// `/` gives `/edit`.
    pub route_prefix: String,
    pub request_timeout: Duration,
    pub delete_route: String,
    pub delete_field: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            route_prefix: "/_".into(),
            request_timeout: Duration::from_secs(10),
            delete_route: "delete_media".into(),
            delete_field: "thepath".into(),
        }
    }
}

/// Double-activation detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureConfig {
    /// Maximum gap between two pointer releases that still counts as a
    /// double activation. Zero or negative disables detection.
    pub threshold_ms: i64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { threshold_ms: 500 }
    }
}

/// What a failed speculative action leaves on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePolicy {
    /// Keep the pending marker so the user sees which action did not land.
    PersistentPending,
    /// Roll the element back to its displayed state.
    AutoRevert,
}

impl FailurePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PersistentPending => "persistent-pending",
            Self::AutoRevert => "auto-revert",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().replace('_', "-").as_str() {
            "persistent-pending" => Ok(Self::PersistentPending),
            "auto-revert" => Ok(Self::AutoRevert),
            _ => Err(format!(
                "failure policy must be persistent-pending or auto-revert, got {value:?}"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationConfig {
    pub failure_policy: FailurePolicy,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::PersistentPending,
        }
    }
}

/// Timings of the media page feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaConfig {
    pub status_clear_after: Duration,
    pub copy_feedback_for: Duration,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            status_clear_after: Duration::from_millis(3000),
            copy_feedback_for: Duration::from_millis(1500),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "console".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// YAML file shape
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    server: ServerSection,
    gesture: GestureSection,
    mutation: MutationSection,
    media: MediaSection,
    logging: LoggingSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ServerSection {
    base_url: Option<String>,
    route_prefix: Option<String>,
    request_timeout_ms: Option<u64>,
    delete_route: Option<String>,
    delete_field: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GestureSection {
    threshold_ms: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MutationSection {
    failure_policy: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MediaSection {
    status_clear_after_ms: Option<u64>,
    copy_feedback_ms: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LoggingSection {
    level: Option<String>,
    format: Option<String>,
}

impl From<&ClientConfig> for ConfigFile {
    fn from(cfg: &ClientConfig) -> Self {
        Self {
            server: ServerSection {
                base_url: Some(cfg.server.base_url.clone()),
                route_prefix: Some(cfg.server.route_prefix.clone()),
                request_timeout_ms: Some(duration_ms(cfg.server.request_timeout)),
                delete_route: Some(cfg.server.delete_route.clone()),
                delete_field: Some(cfg.server.delete_field.clone()),
            },
            gesture: GestureSection {
                threshold_ms: Some(cfg.gesture.threshold_ms),
            },
            mutation: MutationSection {
                failure_policy: Some(cfg.mutation.failure_policy.as_str().to_string()),
            },
            media: MediaSection {
                status_clear_after_ms: Some(duration_ms(cfg.media.status_clear_after)),
                copy_feedback_ms: Some(duration_ms(cfg.media.copy_feedback_for)),
            },
            logging: LoggingSection {
                level: Some(cfg.logging.level.clone()),
                format: Some(cfg.logging.format.clone()),
            },
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl ConfigFile {
    fn apply(self, cfg: &mut ClientConfig) -> Result<(), String> {
        let server = self.server;
        if let Some(v) = server.base_url {
            cfg.server.base_url = v;
        }
        if let Some(v) = server.route_prefix {
            cfg.server.route_prefix = v;
        }
        if let Some(v) = server.request_timeout_ms {
            cfg.server.request_timeout = Duration::from_millis(v);
        }
        if let Some(v) = server.delete_route {
            cfg.server.delete_route = v;
        }
        if let Some(v) = server.delete_field {
            cfg.server.delete_field = v;
        }
        if let Some(v) = self.gesture.threshold_ms {
            cfg.gesture.threshold_ms = v;
        }
        if let Some(v) = self.mutation.failure_policy {
            cfg.mutation.failure_policy = FailurePolicy::parse(&v)?;
        }
        if let Some(v) = self.media.status_clear_after_ms {
            cfg.media.status_clear_after = Duration::from_millis(v);
        }
        if let Some(v) = self.media.copy_feedback_ms {
            cfg.media.copy_feedback_for = Duration::from_millis(v);
        }
        if let Some(v) = self.logging.level {
            cfg.logging.level = v;
        }
        if let Some(v) = self.logging.format {
            cfg.logging.format = v;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if path.is_empty() {
        return path.to_string();
    }
    if path == "~" {
        return home_dir().display().to_string();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return home_dir().join(rest).display().to_string();
    }
    path.to_string()
}

/// Search for a configuration file in the standard locations.
/// Returns `None` if no config file is found.
pub fn find_config_file() -> Option<PathBuf> {
    config_search_paths()
        .into_iter()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Returns the list of directories to search for config files.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        paths.push(Path::new(&xdg).join("journal"));
    }

    let home = home_dir();
    if home.as_os_str() != "" {
        paths.push(home.join(".config/journal"));
    }

    paths.push(PathBuf::from("."));

    paths
}

/// Get the user's home directory, falling back to `/` on failure.
fn home_dir() -> PathBuf {
    #[allow(deprecated)]
    std::env::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
