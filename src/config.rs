//! Configuration loading for the marker node.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level node configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct MarkersConfig {
    /// URDF file holding the furniture description.
    #[serde(default = "default_description_path")]
    pub description_path: String,

    /// Name of the registry holding parking spots.
    #[serde(default = "default_parking_server")]
    pub parking_server: String,

    /// Name of the registry holding surfaces.
    #[serde(default = "default_surface_server")]
    pub surface_server: String,

    /// Local socket on which interaction feedback arrives.
    #[serde(default = "default_feedback_socket")]
    pub feedback_socket: String,

    #[serde(default)]
    pub navigation: NavigationConfig,
}

/// Connection settings for the navigation executor.
#[derive(Clone, Debug, Deserialize)]
pub struct NavigationConfig {
    /// Local socket the executor listens on (default: /tmp/move_base.sock)
    #[serde(default = "default_navigation_socket")]
    pub socket: String,

    /// Delay between handshake attempts in milliseconds (default: 500)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Give up on the handshake after this many milliseconds, 0 waits forever (default: 0)
    #[serde(default)]
    pub ready_timeout_ms: u64,
}

fn default_description_path() -> String {
    "ilab_description.urdf".to_string()
}

fn default_parking_server() -> String {
    "parking_markers".to_string()
}

fn default_surface_server() -> String {
    "surfaces_markers".to_string()
}

fn default_feedback_socket() -> String {
    "/tmp/surface_markers_feedback.sock".to_string()
}

fn default_navigation_socket() -> String {
    "/tmp/move_base.sock".to_string()
}

fn default_poll_interval() -> u64 {
    500
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            socket: default_navigation_socket(),
            poll_interval_ms: default_poll_interval(),
            ready_timeout_ms: 0,
        }
    }
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            description_path: default_description_path(),
            parking_server: default_parking_server(),
            surface_server: default_surface_server(),
            feedback_socket: default_feedback_socket(),
            navigation: NavigationConfig::default(),
        }
    }
}

impl MarkersConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: MarkersConfig = toml::from_str(content)?;
        if config.navigation.poll_interval_ms == 0 {
            return Err(Error::Config(
                "navigation.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }
}
