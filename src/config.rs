use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub growth: GrowthConfig,

    #[serde(default)]
    pub people: PeopleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Path to the library's `Photos.sqlite`.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_db_path() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Photos Library.photoslibrary")
        .join("database")
        .join("Photos.sqlite")
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the CSV and PNG files.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Whether to render PNG charts at all.
    #[serde(default = "default_true")]
    pub charts: bool,

    /// Whether to open rendered charts in an image viewer.
    #[serde(default = "default_true")]
    pub display: bool,

    /// Viewer command for charts (e.g., "feh", "eog")
    /// If not set, uses system default (xdg-open on Linux, open on macOS)
    #[serde(default)]
    pub viewer: Option<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            charts: true,
            display: true,
            viewer: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthConfig {
    /// Months listed in the "highest growth" ranking.
    #[serde(default = "default_top_months")]
    pub top_months: usize,
}

fn default_top_months() -> usize {
    5
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            top_months: default_top_months(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeopleConfig {
    /// Replace real names with stable pseudonyms in every output.
    #[serde(default = "default_true")]
    pub anonymize: bool,

    #[serde(default = "default_top_people")]
    pub top_people: usize,

    #[serde(default = "default_timeline_people")]
    pub timeline_people: usize,
}

fn default_top_people() -> usize {
    20
}

fn default_timeline_people() -> usize {
    5
}

impl Default for PeopleConfig {
    fn default() -> Self {
        Self {
            anonymize: true,
            top_people: default_top_people(),
            timeline_people: default_timeline_people(),
        }
    }
}

impl Config {
    /// Load from `PHOTOLENS_CONFIG` or the default location, writing a
    /// default config file on first use.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("photolens")
    }

    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("PHOTOLENS_CONFIG") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }
}
