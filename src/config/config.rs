use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::geometry::LatLon;
use crate::notifications::DEFAULT_NOTIFICATION_TTL;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub map: MapConfig,
    pub render: RenderConfig,
    pub notifications: NotificationConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the search backend
    pub base_url: String,

    /// HTTP timeout in seconds; a hung backend surfaces as a transport
    /// error instead of an eternally busy prompt
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial map center, latitude
    pub initial_lat: f64,

    /// Initial map center, longitude
    pub initial_lon: f64,

    pub initial_zoom: u8,

    /// Zoom applied when a geocoded address recenters the map
    pub recenter_zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Candidate point marker color
    pub point_color: String,

    /// Zone polygon outline color
    pub zone_color: String,

    /// Draw the validZone polygon in addition to the ZPP
    pub show_valid_zone: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Seconds a transient notification stays visible
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Record submissions to the history file
    pub enabled: bool,

    /// Maximum history entries to keep
    pub max_entries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            map: MapConfig::default(),
            render: RenderConfig::default(),
            notifications: NotificationConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        // Paris, the default operating area.
        Self {
            initial_lat: 48.8566,
            initial_lon: 2.3522,
            initial_zoom: 12,
            recenter_zoom: 10,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            point_color: "#ff0000".to_string(),
            zone_color: "#3388ff".to_string(),
            show_valid_zone: true,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_NOTIFICATION_TTL.as_secs(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 200,
        }
    }
}

impl Config {
    /// Load config from the default location, creating it on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("epervier-cli").join("config.toml"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notifications.ttl_secs)
    }

    pub fn initial_center(&self) -> LatLon {
        LatLon::new(self.map.initial_lat, self.map.initial_lon)
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r##"# Epervier CLI configuration file
# Location: ~/.config/epervier-cli/config.toml (Linux/macOS)
#           %APPDATA%\epervier-cli\config.toml (Windows)

[backend]
# Base URL of the search backend
base_url = "http://127.0.0.1:5000"

# HTTP timeout in seconds; a hung backend surfaces as a transport error
timeout_secs = 30

[map]
# Initial view (Paris)
initial_lat = 48.8566
initial_lon = 2.3522
initial_zoom = 12

# Zoom applied when a geocoded address recenters the map
recenter_zoom = 10

[render]
# Candidate point marker color
point_color = "#ff0000"

# Zone polygon outline color
zone_color = "#3388ff"

# Draw the validZone polygon in addition to the ZPP
show_valid_zone = true

[notifications]
# Seconds a transient notification stays visible
ttl_secs = 10

[history]
# Record submissions in ~/.epervier_history.json
enabled = true

# Maximum number of entries to keep
max_entries = 200
"##
        .to_string()
    }
}
