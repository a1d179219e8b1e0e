//! Drag behavior configuration
//!
//! All geometric tolerances and timer durations used by the engine live in
//! [`DragConfig`]. The values are tunable at construction time (or through a
//! TOML override file) but are never changed while a drag is in flight.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default proximity tolerance (layout units) for dropping onto a collapsed
/// container.
pub const DEFAULT_COLLAPSE_PROXIMITY: f64 = 10.0;

/// Default proximity tolerance (layout units) for dropping into a container
/// with no reorderable children.
pub const DEFAULT_EMPTY_CONTAINER_PROXIMITY: f64 = 50.0;

/// Default upper bound on the per-sibling fudge tolerance.
pub const DEFAULT_SIBLING_FUDGE_CAP: f64 = 20.0;

/// Default distance from the viewport edge at which dragging starts to
/// scroll, and the per-event scroll step.
pub const DEFAULT_EDGE_SCROLL_MARGIN: f64 = 10.0;

/// Default lifetime of the transient was-dropped flag, in milliseconds.
///
/// Must match the paired visual transition duration exactly.
pub const DEFAULT_DROP_FLAG_MS: u64 = 1000;

/// Tunable constants for drop-target resolution and drag feedback.
///
/// `Default` yields the stock tolerances; individual values can be adjusted
/// with the `with_*` builders or loaded from a TOML file where only the keys
/// being overridden need to be present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Tolerance around a collapsed container's edges (see
    /// [`DEFAULT_COLLAPSE_PROXIMITY`]).
    pub collapse_proximity: f64,
    /// Tolerance between the dragged box and an empty container's top edge
    /// (see [`DEFAULT_EMPTY_CONTAINER_PROXIMITY`]).
    pub empty_container_proximity: f64,
    /// Cap applied to the half-sibling-height fudge tolerance (see
    /// [`DEFAULT_SIBLING_FUDGE_CAP`]).
    pub sibling_fudge_cap: f64,
    /// Edge-scroll trigger distance and scroll step (see
    /// [`DEFAULT_EDGE_SCROLL_MARGIN`]).
    pub edge_scroll_margin: f64,
    /// Lifetime of the was-dropped flag in milliseconds (see
    /// [`DEFAULT_DROP_FLAG_MS`]).
    pub drop_flag_ms: u64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            collapse_proximity: DEFAULT_COLLAPSE_PROXIMITY,
            empty_container_proximity: DEFAULT_EMPTY_CONTAINER_PROXIMITY,
            sibling_fudge_cap: DEFAULT_SIBLING_FUDGE_CAP,
            edge_scroll_margin: DEFAULT_EDGE_SCROLL_MARGIN,
            drop_flag_ms: DEFAULT_DROP_FLAG_MS,
        }
    }
}

impl DragConfig {
    /// Creates a config with the default tolerances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the collapsed-container proximity tolerance.
    #[must_use]
    pub const fn with_collapse_proximity(mut self, tolerance: f64) -> Self {
        self.collapse_proximity = tolerance;
        self
    }

    /// Sets the empty-container proximity tolerance.
    #[must_use]
    pub const fn with_empty_container_proximity(mut self, tolerance: f64) -> Self {
        self.empty_container_proximity = tolerance;
        self
    }

    /// Sets the cap on the per-sibling fudge tolerance.
    #[must_use]
    pub const fn with_sibling_fudge_cap(mut self, cap: f64) -> Self {
        self.sibling_fudge_cap = cap;
        self
    }

    /// Sets the edge-scroll trigger distance and step.
    #[must_use]
    pub const fn with_edge_scroll_margin(mut self, margin: f64) -> Self {
        self.edge_scroll_margin = margin;
        self
    }

    /// Sets the was-dropped flag lifetime in milliseconds.
    #[must_use]
    pub const fn with_drop_flag_ms(mut self, millis: u64) -> Self {
        self.drop_flag_ms = millis;
        self
    }

    /// Returns the was-dropped flag lifetime as a [`Duration`].
    #[must_use]
    pub const fn drop_flag_duration(&self) -> Duration {
        Duration::from_millis(self.drop_flag_ms)
    }

    /// Parses a config from a TOML document.
    ///
    /// Missing keys fall back to their defaults, so an override file only
    /// needs to name the values it changes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid TOML or
    /// contains keys of the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a config override file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if its contents are invalid.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// Errors raised while loading a [`DragConfig`] override file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The override file could not be read.
    #[error("failed to read drag config {path}: {source}")]
    Io {
        /// Path of the file that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The override file is not a valid config document.
    #[error("invalid drag config: {0}")]
    Parse(#[from] toml::de::Error),
}
