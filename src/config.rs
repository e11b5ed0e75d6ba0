// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export configuration

use crate::error::ExportError;
use crate::geometry::{DEFAULT_IMAGE_SIZE, MAX_IMAGE_SIZE};
use crate::io::mqo::{MAX_SCALE, MIN_SCALE};
use crate::io::{MqoOptions, RecOptions};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "trle-export.toml";

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Texture page size in pixels
    pub image_size: u32,
    /// Page number written into texture records
    pub page: u32,
    /// Mesh scale for .mqo output
    pub scale: f64,
    /// Texture file referenced by .mqo materials
    pub texture: Option<String>,
    /// Emit per-face StrPix materials in .mqo output
    pub materials: bool,
    /// Object to export instead of the active one
    pub object: Option<String>,
    /// Write every object of the scene into one .mqo file
    pub all_objects: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            image_size: DEFAULT_IMAGE_SIZE,
            page: 1,
            scale: 1.0,
            texture: None,
            materials: true,
            object: None,
            all_objects: false,
        }
    }
}

impl ExportConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: ExportConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `path`, or `trle-export.toml` when present, then apply
    /// environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if PathBuf::from(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(scale) = std::env::var("TRLE_EXPORT_SCALE") {
            self.scale = scale.parse().context("TRLE_EXPORT_SCALE is not a number")?;
        }

        if let Ok(page) = std::env::var("TRLE_EXPORT_PAGE") {
            self.page = page.parse().context("TRLE_EXPORT_PAGE is not a page number")?;
        }

        if let Ok(size) = std::env::var("TRLE_EXPORT_IMAGE_SIZE") {
            self.image_size = size.parse().context("TRLE_EXPORT_IMAGE_SIZE is not a size")?;
        }

        if let Ok(texture) = std::env::var("TRLE_EXPORT_TEXTURE") {
            self.texture = Some(texture).filter(|t| !t.is_empty());
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(MIN_SCALE..=MAX_SCALE).contains(&self.scale) {
            return Err(ExportError::InvalidConfig(format!(
                "scale {} outside {}..={}",
                self.scale, MIN_SCALE, MAX_SCALE
            )));
        }
        if self.page == 0 {
            return Err(ExportError::InvalidConfig("page numbers start at 1".to_string()));
        }
        if !(1..=MAX_IMAGE_SIZE).contains(&self.image_size) {
            return Err(ExportError::InvalidConfig(format!(
                "image size {} outside 1..={}",
                self.image_size, MAX_IMAGE_SIZE
            )));
        }
        Ok(())
    }

    pub fn rec_options(&self) -> RecOptions {
        RecOptions {
            image_size: self.image_size,
            page: self.page,
        }
    }

    pub fn mqo_options(&self) -> MqoOptions {
        MqoOptions {
            scale: self.scale,
            texture: self.texture.clone(),
            materials: self.materials,
            image_size: self.image_size,
        }
    }
}
