//! Startup configuration.
//!
//! Everything has a default, so a JSON file only needs the fields it wants to
//! change. Command-line flags are applied on top of the file.

use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Window creation parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowOptions {
    pub title: String,
    /// Initial inner width in logical pixels
    pub width: u32,
    /// Initial inner height in logical pixels
    pub height: u32,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "Spaceport".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Where each camera starts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraOptions {
    pub first_person: [f32; 3],
    pub tracking: [f32; 3],
    pub grounded: [f32; 3],
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            first_person: [-5.0, 0.2, 4.0],
            tracking: [0.0, 0.0, 0.0],
            grounded: [-3.0, 0.2, 5.0],
        }
    }
}

/// Launch site and trajectory coefficients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VehicleOptions {
    pub initial_position: [f32; 3],
    /// Horizontal coefficient of `kx·t³`
    pub kx: f32,
    /// Vertical coefficient of `ky·t²`
    pub ky: f32,
}

impl Default for VehicleOptions {
    fn default() -> Self {
        Self {
            initial_position: crate::vehicle::DEFAULT_INITIAL_POSITION.to_array(),
            kx: crate::vehicle::DEFAULT_KX,
            ky: crate::vehicle::DEFAULT_KY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowOptions,
    pub cameras: CameraOptions,
    pub vehicle: VehicleOptions,
    /// RGB background
    pub clear_color: [f32; 3],
    /// Start with two viewports
    pub split_screen: bool,
    /// Draw the HUD buttons and FPS readout
    pub show_ui: bool,
    /// Log per-frame timing at debug level
    pub benchmark: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowOptions::default(),
            cameras: CameraOptions::default(),
            vehicle: VehicleOptions::default(),
            clear_color: [0.2, 0.2, 0.2],
            split_screen: false,
            show_ui: true,
            benchmark: false,
        }
    }
}

impl Config {
    /// Read a JSON config. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Config file named on the command line (or defaults), with the
    /// command-line overrides applied.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.no_ui {
            self.show_ui = false;
        }
        if cli.split_screen {
            self.split_screen = true;
        }
        if cli.benchmark {
            self.benchmark = true;
        }
        if let Some(width) = cli.width {
            self.window.width = width;
        }
        if let Some(height) = cli.height {
            self.window.height = height;
        }
    }

    pub fn vehicle_position(&self) -> Vec3 {
        Vec3::from_array(self.vehicle.initial_position)
    }
}
