use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::device::{self, DeviceSchema};
use crate::data::export::ExportLayout;
use crate::data::model::ChartQuantity;

/// Environment variable naming an alternative settings file.
pub const CONFIG_ENV: &str = "DIELECTRIC_LAB_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "dielectric-lab.json";

// ---------------------------------------------------------------------------
// Settings – optional JSON file, every field defaulted
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Instrument selected at start-up.
    pub default_instrument: String,
    /// Initial contents of the geometry inputs, in millimetres.
    pub thickness_mm: String,
    pub diameter_mm: String,
    /// Export subfolder for per-temperature tables.
    pub temperature_dir: String,
    /// Export subfolder for per-frequency tables.
    pub frequency_dir: String,
    pub chart_quantity: ChartQuantity,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_instrument: device::E7_30.name.to_string(),
            thickness_mm: String::new(),
            diameter_mm: String::new(),
            temperature_dir: "Temperature".to_string(),
            frequency_dir: "Frequency dependences".to_string(),
            chart_quantity: ChartQuantity::Epsilon,
        }
    }
}

impl Settings {
    /// Load from `$DIELECTRIC_LAB_CONFIG`, else `./dielectric-lab.json`.
    ///
    /// A missing file gives the defaults; an unreadable or malformed one also
    /// gives the defaults, with a warning in the log.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// The configured start-up instrument, falling back to the first
    /// registered one when the name is unknown.
    pub fn instrument(&self) -> &'static DeviceSchema {
        device::by_name(&self.default_instrument).unwrap_or_else(|| {
            log::warn!("Unknown instrument '{}'", self.default_instrument);
            device::REGISTRY[0]
        })
    }

    pub fn export_layout(&self) -> ExportLayout {
        ExportLayout {
            temperature_dir: self.temperature_dir.clone(),
            frequency_dir: self.frequency_dir.clone(),
        }
    }
}
