//! Configuration file support for tika
//!
//! Config file location: `~/.config/tika/config.toml` (XDG_CONFIG_HOME)
//!
//! Example config:
//! ```toml
//! [ui]
//! gutter = true
//!
//! [ui.palette]
//! yellow = "#EBCB8B"
//! green = "#A3BE8C"
//! blue = "#81A1C1"
//!
//! [files]
//! autosave = true
//! store = "/home/user/verses/project.json"
//! ```

use ratatui::style::Color;
use serde::Deserialize;
use std::path::PathBuf;
use tika_core::PALETTE_SIZE;

/// Highlight palette overrides, one hex color per slot.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub yellow: String,
    pub green: String,
    pub blue: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            yellow: "#EBCB8B".to_string(),
            green: "#A3BE8C".to_string(),
            blue: "#81A1C1".to_string(),
        }
    }
}

impl PaletteConfig {
    /// Resolve to concrete colors, slot order matching the engine's
    /// palette cycle. Unparseable values fall back to the ANSI color of
    /// the slot's name.
    pub fn resolve(&self) -> [Color; PALETTE_SIZE] {
        [
            parse_hex_color(&self.yellow).unwrap_or(Color::Yellow),
            parse_hex_color(&self.green).unwrap_or(Color::Green),
            parse_hex_color(&self.blue).unwrap_or(Color::Blue),
        ]
    }
}

/// Parse `#RRGGBB` into a ratatui color.
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// UI configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Show the line-number gutter
    pub gutter: bool,
    /// Highlight palette overrides
    pub palette: PaletteConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            gutter: true,
            palette: PaletteConfig::default(),
        }
    }
}

/// Files configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Persist after every mutation (default: true)
    pub autosave: bool,
    /// Project store path override
    pub store: Option<PathBuf>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            autosave: true,
            store: None,
        }
    }
}

/// Root configuration
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub files: FilesConfig,
}

impl Config {
    /// Get all possible config file paths in priority order
    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG_CONFIG_HOME (if set)
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg).join("tika").join("config.toml"));
        }

        // 2. ~/.config/tika/config.toml (XDG default, works on all platforms)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("tika").join("config.toml"));
        }

        // 3. Platform-specific config dir (~/Library/Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("tika").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        paths
    }

    /// Get the first existing config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|p| p.exists())
    }

    /// Load config from XDG config path
    /// Returns default config if file doesn't exist or can't be parsed
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| std::fs::read_to_string(&path).ok())
            .and_then(|content| {
                toml::from_str(&content)
                    .map_err(|e| {
                        eprintln!("Warning: Failed to parse config: {}", e);
                        e
                    })
                    .ok()
            })
            .unwrap_or_default()
    }
}
