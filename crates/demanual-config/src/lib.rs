//! User settings, stored as TOML in the platform config directory.
//!
//! Every field is optional in the file; missing ones take their defaults.
//!
//! ```toml
//! posts_dir = "posts"
//! start_page = "blog"
//! background_color = "#ffffff"
//!
//! [animation]
//! enabled = true
//! frame_interval_ms = 16
//! max_active_glows = 4
//! aging = { mode = "measured" }
//! ```

mod error;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use demanual_background::GlowConfig;
use demanual_core::{AgingMode, Page, Rgba};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub use error::ConfigError;

const APPLICATION: &str = "demanual";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "demanual.log";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APPLICATION)
}

/// Location of the user's config file.
pub fn default_path() -> Result<PathBuf, ConfigError> {
    project_dirs()
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
        .ok_or(ConfigError::NoConfigDir)
}

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the `<id>.md` post files.
    pub posts_dir: PathBuf,
    /// Directory for post images, created on startup when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images_dir: Option<PathBuf>,
    pub start_page: Page,
    /// Color the grid is blended onto.
    pub background_color: Rgba,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    pub animation: AnimationSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            posts_dir: PathBuf::from("posts"),
            images_dir: Some(PathBuf::from("public/posts/images")),
            start_page: Page::Home,
            background_color: Rgba::WHITE,
            log_file: None,
            animation: AnimationSettings::default(),
        }
    }
}

impl Config {
    /// Load the user's config file, or defaults if there is none.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_path()?)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, contents).map_err(write_err)
    }

    /// Log file to write to: the configured one, else one in the local
    /// data directory, else the working directory.
    pub fn log_path(&self) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_local_dir().join(LOG_FILE))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE))
    }
}

/// Background animation settings.
///
/// The `Option` fields override the page preset when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub enabled: bool,
    /// Time between redraws.
    pub frame_interval_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glow_interval_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_active_glows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_intensity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_opacity: Option<f32>,
    pub aging: AgingMode,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            frame_interval_ms: 16,
            glow_interval_ms: None,
            max_active_glows: None,
            path_intensity: None,
            palette_opacity: None,
            aging: AgingMode::default(),
        }
    }
}

impl AnimationSettings {
    /// The preset for `page` with this file's overrides applied.
    pub fn glow_config(&self, page: Page) -> GlowConfig {
        let mut config = GlowConfig::for_page(page);
        config.aging = self.aging;
        if let Some(interval) = self.glow_interval_ms {
            config.glow_interval_ms = interval.max(0.0);
        }
        if let Some(max) = self.max_active_glows {
            config.max_active_glows = max;
        }
        if let Some(intensity) = self.path_intensity {
            config.path_intensity = intensity.clamp(0.0, 1.0);
        }
        match self.palette_opacity {
            Some(opacity) => config.with_palette_opacity(opacity.clamp(0.0, 1.0)),
            None => config,
        }
    }

    /// Frame interval, at least one millisecond.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}
