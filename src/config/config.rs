use crate::utils::app_paths::AppPaths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the directory backend
    pub base_url: String,

    /// Seconds to wait for a TCP connection
    pub connect_timeout_secs: u64,

    /// Seconds to wait for a whole request
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before searching
    pub debounce_ms: u64,

    /// Show "(escribiendo...)" in the search title while a search is pending
    pub show_debounce_indicator: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for card markers and labels
    pub use_glyphs: bool,

    /// Show privilege labels on cards
    pub show_privileges: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            show_debounce_indicator: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            show_privileges: true,
        }
    }
}

impl ServerConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Config {
    /// Load config from the default location, writing defaults if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::config_file()?)
    }

    /// Load config from `path`, writing defaults there if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).with_context(|| format!("writing config {}", path.display()))?;

        Ok(())
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# contact-cli Configuration File
# Location: ~/.config/contact-cli/config.toml (Linux)
#           ~/Library/Application Support/contact-cli/config.toml (macOS)
#           %APPDATA%\contact-cli\config.toml (Windows)

[server]
# Base URL of the directory backend (serves /api/buscar and /api/whatsapp/enviar)
base_url = "http://127.0.0.1:5000"

# Seconds to wait for a connection before reporting a network error
connect_timeout_secs = 5

# Seconds to wait for a complete response
request_timeout_secs = 30

[search]
# Quiet period after the last keystroke before a search is sent
debounce_ms = 300

# Show "(escribiendo...)" in the search box title while waiting
show_debounce_indicator = true

[display]
# Use Unicode glyphs on cards; set to false for ASCII-only terminals
use_glyphs = true

# Show privilege labels on cards
show_privileges = true
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.server.base_url, "http://127.0.0.1:5000");
        assert!(config.display.use_glyphs);
    }

    #[test]
    fn test_commented_default_parses() {
        let parsed: Config = toml::from_str(&Config::create_default_with_comments()).unwrap();
        assert_eq!(parsed.search.debounce_ms, 300);
        assert_eq!(parsed.server.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: Config = toml::from_str("[search]\ndebounce_ms = 150\n").unwrap();
        assert_eq!(parsed.search.debounce_ms, 150);
        assert!(parsed.search.show_debounce_indicator);
        assert_eq!(parsed.server.connect_timeout_secs, 5);
    }

    #[test]
    fn test_load_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.search.debounce_ms, 300);

        fs::write(&path, "[server]\nbase_url = \"http://10.0.0.2:8080\"\n").unwrap();
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.server.base_url, "http://10.0.0.2:8080");
    }
}
