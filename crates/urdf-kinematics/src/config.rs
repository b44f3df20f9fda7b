//! Loader configuration
//!
//! Stored as RON so hosts can keep package tables and parse options next to their
//! robot descriptions.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::package::PackageResolver;
use crate::scene::DEFAULT_COLOR;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// Serializable package table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PackageConfig {
    /// One base path for every package
    Base(String),
    /// Base path per package name
    Map(HashMap<String, String>),
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig::Map(HashMap::new())
    }
}

impl From<&PackageConfig> for PackageResolver {
    fn from(config: &PackageConfig) -> Self {
        match config {
            PackageConfig::Base(base) => PackageResolver::Base(base.clone()),
            PackageConfig::Map(packages) => PackageResolver::Map(packages.clone()),
        }
    }
}

/// URDF loader configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoaderConfig {
    /// Prefix for mesh and texture filenames that are not `package://` references
    #[serde(default)]
    pub working_path: String,
    #[serde(default)]
    pub packages: PackageConfig,
    /// Build `<visual>` nodes
    #[serde(default = "default_true")]
    pub parse_visual: bool,
    /// Build `<collision>` nodes
    #[serde(default = "default_true")]
    pub parse_collision: bool,
    /// Initial `ignore_limits` flag for every joint
    #[serde(default)]
    pub ignore_limits: bool,
    /// Color used when a material reference cannot be resolved
    #[serde(default = "default_color")]
    pub default_color: [f32; 4],
}

fn default_true() -> bool {
    true
}

fn default_color() -> [f32; 4] {
    DEFAULT_COLOR
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            working_path: String::new(),
            packages: PackageConfig::default(),
            parse_visual: true,
            parse_collision: true,
            ignore_limits: false,
            default_color: DEFAULT_COLOR,
        }
    }
}

impl LoaderConfig {
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_ron_str(&content)?;
        tracing::info!("Loaded loader config from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a RON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = self.to_ron_string()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::info!("Saved loader config to {:?}", path);
        Ok(())
    }

    pub fn package_resolver(&self) -> PackageResolver {
        PackageResolver::from(&self.packages)
    }
}
