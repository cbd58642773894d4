/// Configuration system: TOML-based with sensible defaults.
/// Config file: `~/.config/replterm/config.toml`

use crate::core::{DEFAULT_BLINK_INTERVAL, DEFAULT_SCROLLBACK};
use crate::session::{DispatchMode, SessionOptions};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub font: FontConfig,
    pub window: WindowConfig,
    pub colors: ColorConfig,
    pub shell: ShellConfig,
    pub caret: CaretConfig,
    pub scrollback: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font file to load; searched for in the usual places when unset.
    pub path: Option<PathBuf>,
    pub size: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub padding: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub theme: String,
    pub foreground: Option<String>,
    pub background: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Handle `cd` in-process so the prompt follows it.
    pub builtin_cd: bool,
    /// Append `[exit N]` after commands that fail.
    pub show_exit_status: bool,
    /// Run commands off the UI thread.
    pub background: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaretConfig {
    pub blink_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font: FontConfig::default(),
            window: WindowConfig::default(),
            colors: ColorConfig::default(),
            shell: ShellConfig::default(),
            caret: CaretConfig::default(),
            scrollback: DEFAULT_SCROLLBACK,
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            size: 11.0,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Terminal".into(),
            width: 800,
            height: 600,
            padding: 4,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            theme: "default".into(),
            foreground: None,
            background: None,
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        if cfg!(windows) {
            Self {
                program: "cmd".into(),
                args: vec!["/C".into()],
                builtin_cd: false,
                show_exit_status: false,
                background: true,
            }
        } else {
            Self {
                program: "/bin/sh".into(),
                args: vec!["-c".into()],
                builtin_cd: false,
                show_exit_status: false,
                background: true,
            }
        }
    }
}

impl Default for CaretConfig {
    fn default() -> Self {
        Self {
            blink_interval_ms: DEFAULT_BLINK_INTERVAL.as_millis() as u64,
        }
    }
}

impl CaretConfig {
    pub fn blink_interval(&self) -> Duration {
        Duration::from_millis(self.blink_interval_ms)
    }
}

impl Config {
    /// Config file path: `~/.config/replterm/config.toml`
    pub fn path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from file, falling back to defaults.
    pub fn load() -> Self {
        let path = Self::path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                log::info!("loading config from {}", path.display());
                Self::from_toml(&contents)
            }
            Err(_) => Self::default(),
        }
    }

    /// Parse config from TOML string. Invalid input yields the defaults.
    pub fn from_toml(s: &str) -> Self {
        toml::from_str(s).unwrap_or_else(|e| {
            log::warn!("invalid config, using defaults: {}", e);
            Self::default()
        })
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            dispatch_mode: if self.shell.background {
                DispatchMode::Background
            } else {
                DispatchMode::Blocking
            },
            show_exit_status: self.shell.show_exit_status,
            scrollback: self.scrollback,
        }
    }
}

fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".config").join("replterm")
}
