use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::calendar::grouping::HierarchyLevel;
use crate::calendar::timeline::{MAX_ZOOM, MIN_ZOOM};
use crate::calendar::tools::ToolMode;
use crate::error::{CalendarError, Result};

const APP_DIR: &str = "cockpit-calendar";

const DEFAULT_HEADER: &str = "\
# cockpit-calendar configuration
#
# server.base_url      cockpit server, or set COCKPIT_SERVER__BASE_URL
# calendar.zoom        0.25 - 4.0 rows per minute
# calendar.hierarchy_level  0 routine, 1 subroutine, 2 microroutine, 3 items
# calendar.tool        cursor | select | picker | eraser
# storage.blocks_path  defaults to blocks.json in the data directory
# keybindings.preset   vim | emacs
";

const DEFAULT_FOOTER: &str = "\
# Override specific keys:
# [keybindings.bindings]
# quit = \"Ctrl+q\"
# today = \"g\"
";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CalendarConfig {
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default = "default_hierarchy_level")]
    pub hierarchy_level: u8,
    #[serde(default = "default_tool")]
    pub tool: String,
    #[serde(default = "default_schedule_ttl")]
    pub schedule_ttl_secs: u64,
    #[serde(default = "default_save_debounce")]
    pub save_debounce_ms: u64,
    #[serde(default = "default_drag_create")]
    pub drag_create: bool,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            zoom: default_zoom(),
            hierarchy_level: default_hierarchy_level(),
            tool: default_tool(),
            schedule_ttl_secs: default_schedule_ttl(),
            save_debounce_ms: default_save_debounce(),
            drag_create: default_drag_create(),
        }
    }
}

impl CalendarConfig {
    pub fn level(&self) -> HierarchyLevel {
        HierarchyLevel::from_index(self.hierarchy_level).unwrap_or_default()
    }

    pub fn tool_mode(&self) -> ToolMode {
        self.tool.parse().unwrap_or_default()
    }

    pub fn schedule_ttl(&self) -> Duration {
        Duration::from_secs(self.schedule_ttl_secs)
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub blocks_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct KeybindingsConfig {
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default)]
    pub bindings: HashMap<String, String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            bindings: HashMap::new(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_zoom() -> f64 {
    1.0
}

fn default_hierarchy_level() -> u8 {
    3
}

fn default_tool() -> String {
    "cursor".into()
}

fn default_schedule_ttl() -> u64 {
    5
}

fn default_save_debounce() -> u64 {
    400
}

fn default_drag_create() -> bool {
    true
}

fn default_log_level() -> String {
    "info".into()
}

fn default_preset() -> String {
    "vim".into()
}

impl AppConfig {
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        let config: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::defaults()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("COCKPIT_").split("__"))
            .extract()
            .map_err(|e| CalendarError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.server.base_url.trim();
        if url.is_empty() {
            return Err(CalendarError::Config("server.base_url is required".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CalendarError::Config(format!(
                "server.base_url must start with http:// or https://, got '{}'",
                url
            )));
        }
        let zoom = self.calendar.zoom;
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(CalendarError::Config(format!(
                "calendar.zoom must be between {} and {}, got {}",
                MIN_ZOOM, MAX_ZOOM, zoom
            )));
        }
        if HierarchyLevel::from_index(self.calendar.hierarchy_level).is_none() {
            return Err(CalendarError::Config(format!(
                "calendar.hierarchy_level must be 0-3, got {}",
                self.calendar.hierarchy_level
            )));
        }
        self.calendar.tool.parse::<ToolMode>()?;
        Ok(())
    }

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(|xdg| PathBuf::from(xdg).join(APP_DIR))
            .or_else(|| {
                directories::BaseDirs::new()
                    .map(|dirs| dirs.home_dir().join(".config").join(APP_DIR))
            })
    }

    /// Where blocks and logs live when not configured otherwise.
    pub fn data_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", APP_DIR).map(|dirs| dirs.data_dir().to_path_buf())
    }

    pub fn blocks_path(&self) -> PathBuf {
        self.storage.blocks_path.clone().unwrap_or_else(|| {
            Self::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("blocks.json")
        })
    }

    pub fn log_dir() -> PathBuf {
        Self::data_dir()
            .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR))
            .join("logs")
    }

    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut config = Self::defaults();
        config.server.base_url = "http://localhost:8080".into();
        let body = toml::to_string_pretty(&config)?;
        let content = format!("{}\n{}\n{}", DEFAULT_HEADER, body, DEFAULT_FOOTER);

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn defaults() -> Self {
        Self {
            server: ServerConfig {
                base_url: String::new(),
                timeout_secs: default_timeout(),
            },
            calendar: CalendarConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            keybindings: KeybindingsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_valid_config_from_toml() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[server]
base_url = "https://cockpit.example"

[calendar]
zoom = 2.0
hierarchy_level = 0
tool = "picker"

[keybindings]
preset = "emacs"
"#,
        );

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.server.base_url, "https://cockpit.example");
        assert_eq!(config.calendar.zoom, 2.0);
        assert_eq!(config.calendar.level(), HierarchyLevel::Routine);
        assert_eq!(config.calendar.tool_mode(), ToolMode::Picker);
        assert_eq!(config.keybindings.preset, "emacs");
    }

    #[test]
    fn defaults_apply_for_missing_optional_fields() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[server]
base_url = "http://localhost:8080"
"#,
        );

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.calendar.zoom, 1.0);
        assert_eq!(config.calendar.level(), HierarchyLevel::Leaf);
        assert_eq!(config.calendar.tool_mode(), ToolMode::Cursor);
        assert_eq!(config.calendar.schedule_ttl(), Duration::from_secs(5));
        assert_eq!(config.calendar.save_debounce(), Duration::from_millis(400));
        assert!(config.calendar.drag_create);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.keybindings.preset, "vim");
        assert!(config.storage.blocks_path.is_none());
    }

    #[test]
    fn validate_fails_without_base_url() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[server]
base_url = ""
"#,
        );

        let msg = AppConfig::load_from_path(&path).unwrap_err().to_string();
        assert!(msg.contains("server.base_url"));
    }

    #[test]
    fn validate_rejects_non_http_url() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[server]
base_url = "ftp://cockpit"
"#,
        );

        let msg = AppConfig::load_from_path(&path).unwrap_err().to_string();
        assert!(msg.contains("http://"));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let tmp = TempDir::new().unwrap();
        let zoom = write_config(
            tmp.path(),
            r#"
[server]
base_url = "http://localhost"

[calendar]
zoom = 8.0
"#,
        );
        assert!(AppConfig::load_from_path(&zoom)
            .unwrap_err()
            .to_string()
            .contains("calendar.zoom"));

        let level = write_config(
            tmp.path(),
            r#"
[server]
base_url = "http://localhost"

[calendar]
hierarchy_level = 7
"#,
        );
        assert!(AppConfig::load_from_path(&level)
            .unwrap_err()
            .to_string()
            .contains("hierarchy_level"));

        let tool = write_config(
            tmp.path(),
            r#"
[server]
base_url = "http://localhost"

[calendar]
tool = "lasso"
"#,
        );
        assert!(AppConfig::load_from_path(&tool)
            .unwrap_err()
            .to_string()
            .contains("unknown tool"));
    }

    #[test]
    fn env_var_overrides_base_url() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[server]
base_url = "http://from-file"
"#,
        );

        env::set_var("COCKPIT_SERVER__BASE_URL", "http://from-env");
        let config = AppConfig::load_from_path(&path).unwrap();
        env::remove_var("COCKPIT_SERVER__BASE_URL");

        assert_eq!(config.server.base_url, "http://from-env");
    }

    #[test]
    fn write_default_creates_loadable_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("subdir").join("config.toml");

        AppConfig::write_default(&path).unwrap();

        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("base_url"));
        assert!(content.contains("vim"));
        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.server.base_url, "http://localhost:8080");
    }

    #[test]
    fn default_config_is_serialized_from_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        AppConfig::write_default(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# cockpit-calendar configuration"));
        assert!(content.contains("timeout_secs = 10"));
        assert!(content.contains("save_debounce_ms = 400"));
        assert!(!content.contains("blocks_path ="));

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.server.timeout(), Duration::from_secs(10));
        assert_eq!(config.calendar.tool, "cursor");
        assert!(config.calendar.drag_create);
        assert!(config.storage.blocks_path.is_none());
    }

    #[test]
    fn server_timeout_is_configurable() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[server]
base_url = "http://localhost"
timeout_secs = 3
"#,
        );

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.server.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn keybinding_overrides_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[server]
base_url = "http://localhost"

[keybindings]
preset = "vim"

[keybindings.bindings]
quit = "Ctrl+q"
today = "g"
"#,
        );

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.keybindings.bindings.get("quit").unwrap(), "Ctrl+q");
        assert_eq!(config.keybindings.bindings.get("today").unwrap(), "g");
    }

    #[test]
    fn blocks_path_prefers_configured_value() {
        let tmp = TempDir::new().unwrap();
        let custom = tmp.path().join("mine.json");
        let path = write_config(
            tmp.path(),
            &format!(
                "[server]\nbase_url = \"http://localhost\"\n\n[storage]\nblocks_path = {:?}\n",
                custom
            ),
        );

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.blocks_path(), custom);
    }

    #[test]
    fn config_dir_returns_some() {
        assert!(AppConfig::config_dir().is_some());
    }
}
