//! # Configuration Management
//!
//! Centralized configuration for the framing codec.
//!
//! This module provides structured configuration for readers, writers, and
//! the async codec, including frame length limits and buffering behavior.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides
//!
//! ## Security Considerations
//! - An unset `max_frame_len` trusts the peer's declared lengths; set a
//!   limit when reading streams from untrusted sources
//! - The default read buffer (16 KiB) bounds per-frame memory while copying

use crate::error::{FrameError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default capacity for buffered readers and body copy windows
pub const DEFAULT_READ_BUFFER_CAPACITY: usize = 16 * 1024;

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FramingConfig {
    /// Maximum accepted declared frame length in bytes. `None` accepts any
    /// length representable as `u64`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_frame_len: Option<u64>,

    /// Capacity of the read buffer used when streaming frame bodies and
    /// when opening files
    #[serde(default = "default_read_buffer_capacity")]
    pub read_buffer_capacity: usize,
}

fn default_read_buffer_capacity() -> usize {
    DEFAULT_READ_BUFFER_CAPACITY
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            max_frame_len: None,
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
        }
    }
}

impl FramingConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| FrameError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| FrameError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| FrameError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Start with defaults
        let mut config = Self::default();

        // Override with environment variables
        if let Ok(limit) = std::env::var("FRAMEPACK_MAX_FRAME_LEN") {
            if let Ok(val) = limit.parse::<u64>() {
                config.max_frame_len = Some(val);
            }
        }

        if let Ok(capacity) = std::env::var("FRAMEPACK_READ_BUFFER_CAPACITY") {
            if let Ok(val) = capacity.parse::<usize>() {
                config.read_buffer_capacity = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FrameError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| FrameError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        // Validate frame length limit
        if let Some(limit) = self.max_frame_len {
            if limit == 0 {
                errors.push("Max frame length of 0 rejects every non-empty frame".to_string());
            }
        }

        // Validate read buffer capacity
        if self.read_buffer_capacity == 0 {
            errors.push("Read buffer capacity must be greater than 0".to_string());
        } else if self.read_buffer_capacity > 64 * 1024 * 1024 {
            errors.push(format!(
                "Read buffer capacity very large: {} bytes (maximum recommended: 64 MB)",
                self.read_buffer_capacity
            ));
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(FrameError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}
