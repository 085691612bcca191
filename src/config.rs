/// User settings
///
/// Read once at startup from `settings.json` in the platform config directory:
/// - Linux: ~/.config/film-gallery/settings.json
/// - macOS: ~/Library/Application Support/film-gallery/settings.json
/// - Windows: %APPDATA%\film-gallery\settings.json
///
/// Every key is optional. A missing file yields the defaults.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::GalleryError;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gallery opened at startup, if any
    pub gallery_dir: Option<PathBuf>,
    pub loader: LoaderSettings,
    pub grid: GridSettings,
}

/// Parameters of the lazy-loading engine
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Number of leading entries fetched at registration, regardless of visibility
    pub eager_count: usize,
    /// Padding in pixels added around the viewport when testing visibility
    pub margin: f32,
    /// Fraction of a tile's area that must intersect the padded viewport
    pub threshold: f32,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            eager_count: 3,
            margin: 50.0,
            threshold: 0.01,
        }
    }
}

/// Fixed tile geometry of the gallery grid
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub tile_width: f32,
    pub tile_height: f32,
    pub spacing: f32,
    pub padding: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            tile_width: 280.0,
            tile_height: 210.0,
            spacing: 12.0,
            padding: 16.0,
        }
    }
}

impl Settings {
    /// Load settings from the platform config directory, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            debug!("no config directory available, using default settings");
            return Self::default();
        };

        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Self::default();
        }

        match Self::from_path(&path) {
            Ok(settings) => settings,
            Err(error) => {
                warn!(%error, "ignoring unreadable settings file");
                Self::default()
            }
        }
    }

    /// Parse a settings file
    pub fn from_path(path: &Path) -> Result<Self, GalleryError> {
        let contents = std::fs::read_to_string(path).map_err(|e| GalleryError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&contents).map_err(|e| GalleryError::Json {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("film-gallery");
        path.push(SETTINGS_FILE);
        Some(path)
    }
}
