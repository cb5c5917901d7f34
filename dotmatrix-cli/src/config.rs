use anyhow::Context;
use dotmatrix_proc_macros::{EnumDisplay, EnumFromStr, StrDeserialize};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Shade-to-color mapping used when dumping a frame to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDisplay, EnumFromStr, StrDeserialize)]
pub enum Palette {
    Grey,
    Green,
}

impl Palette {
    /// RGB triples for shades 0 (lightest) through 3 (darkest).
    pub fn colors(self) -> [[u8; 3]; 4] {
        match self {
            Self::Grey => [[0xFF; 3], [0xAA; 3], [0x55; 3], [0x00; 3]],
            Self::Green => [
                [0x9B, 0xBC, 0x0F],
                [0x8B, 0xAC, 0x0F],
                [0x30, 0x62, 0x30],
                [0x0F, 0x38, 0x0F],
            ],
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::Grey
    }
}

/// Optional TOML config file. Every field has a default, and command-line flags override
/// whatever the file supplies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub palette: Palette,

    #[serde(default = "default_frame_limit")]
    pub frame_limit: u64,

    pub boot_rom_path: Option<String>,
}

// Roughly one emulated minute
fn default_frame_limit() -> u64 {
    60 * 60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            frame_limit: default_frame_limit(),
            boot_rom_path: Option::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_file<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path> + std::fmt::Debug,
    {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("error reading TOML config file from '{path:?}'"))?;
        let config: Self = toml::from_str(&config_str)
            .with_context(|| format!("error parsing config from TOML file at '{path:?}'"))?;

        Ok(config)
    }
}
