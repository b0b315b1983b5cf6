use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use geolabel_core::{CoreError, GeoFrame, GeoPoint, DEFAULT_STEP_SIZE_PX};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("configuration lists no labels")]
    NoLabels,

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Settings for a labelling run, read from a JSON file.
///
/// `image_size_px` and `relative_span` describe the map image that gets
/// requested and are also the calibration of every click on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Side length of the requested (square) map image in pixels.
    #[serde(default = "default_image_size_px")]
    pub image_size_px: u32,
    /// Degrees covered by the image width (and height).
    #[serde(default = "default_relative_span")]
    pub relative_span: f64,
    /// Labels offered for commit. Either a JSON list or a comma-separated string.
    #[serde(default = "default_labels", deserialize_with = "deserialize_labels")]
    pub labels: Vec<String>,
    /// Map request URL. Placeholders: `{bbox}` `{west}` `{south}` `{east}`
    /// `{north}` `{width}` `{height}` `{size}`.
    #[serde(default = "default_image_url_template")]
    pub image_url_template: String,
    /// CSV file that committed labels are appended to. Relative paths are
    /// resolved against the configuration file's directory.
    #[serde(default = "default_records_csv")]
    pub records_csv: PathBuf,
    /// Browser link for the current coordinate, with `{lat}` and `{lon}`.
    #[serde(default = "default_map_link_template")]
    pub map_link_template: String,
    #[serde(default = "default_step_size_px")]
    pub initial_step_size_px: u32,
    #[serde(default = "default_marker_radius_px")]
    pub marker_radius_px: u32,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_window_size")]
    pub window_width: f32,
    #[serde(default = "default_window_size")]
    pub window_height: f32,
}

fn default_image_size_px() -> u32 {
    512
}
fn default_relative_span() -> f64 {
    0.02
}
fn default_labels() -> Vec<String> {
    vec!["positive".to_string(), "negative".to_string()]
}
fn default_image_url_template() -> String {
    "https://ows.terrestris.de/osm/service?SERVICE=WMS&VERSION=1.1.1&REQUEST=GetMap\
     &LAYERS=OSM-WMS&STYLES=&SRS=EPSG:4326&BBOX={bbox}&WIDTH={width}&HEIGHT={height}\
     &FORMAT=image/png"
        .to_string()
}
fn default_records_csv() -> PathBuf {
    PathBuf::from("labels.csv")
}
fn default_map_link_template() -> String {
    "https://www.google.com/maps/search/?api=1&query={lat},{lon}".to_string()
}
fn default_step_size_px() -> u32 {
    DEFAULT_STEP_SIZE_PX
}
fn default_marker_radius_px() -> u32 {
    5
}
fn default_fetch_timeout_secs() -> u64 {
    30
}
fn default_window_size() -> f32 {
    700.0
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelList {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_labels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = match LabelList::deserialize(deserializer)? {
        LabelList::List(list) => list,
        LabelList::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };
    Ok(raw
        .into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect())
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            image_size_px: default_image_size_px(),
            relative_span: default_relative_span(),
            labels: default_labels(),
            image_url_template: default_image_url_template(),
            records_csv: default_records_csv(),
            map_link_template: default_map_link_template(),
            initial_step_size_px: default_step_size_px(),
            marker_radius_px: default_marker_radius_px(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            window_width: default_window_size(),
            window_height: default_window_size(),
        }
    }
}

impl LabelConfig {
    /// Load and validate the configuration at `path`.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// read, parsed, or validated is an error: labelling with the wrong
    /// calibration or output file is worse than not starting.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let config: LabelConfig =
                serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            info!("Loaded configuration from {}", path.display());
            config
        } else {
            debug!("No configuration file at {}, using defaults", path.display());
            Self::default()
        };
        config.validate()?;
        if let Some(dir) = path.parent() {
            config.resolve_relative_paths(dir);
        }
        Ok(config)
    }

    /// Check the values a session cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        GeoFrame::new(GeoPoint::UNSET, self.image_size_px, self.relative_span)?;
        if self.labels.is_empty() {
            return Err(ConfigError::NoLabels);
        }
        Ok(())
    }

    /// The image frame for a session anchored at `center`.
    pub fn frame(&self, center: GeoPoint) -> Result<GeoFrame, CoreError> {
        GeoFrame::new(center, self.image_size_px, self.relative_span)
    }

    /// Write the default configuration to `path` as a starting point.
    /// Never overwrites an existing file.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json =
            serde_json::to_string_pretty(&Self::default()).map_err(ConfigError::Serialize)?;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(io_err)?;
        file.write_all(json.as_bytes()).map_err(io_err)?;
        info!("Wrote default configuration to {}", path.display());
        Ok(())
    }

    fn resolve_relative_paths(&mut self, base: &Path) {
        if self.records_csv.is_relative() {
            self.records_csv = base.join(&self.records_csv);
        }
    }
}
