//! XDG Base Directory support.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "shopchat";

/// XDG directory paths for shopchat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XdgDirs {
    /// Config directory (~/.config/shopchat or XDG_CONFIG_HOME/shopchat)
    pub config: PathBuf,
    /// State directory (~/.local/state/shopchat or XDG_STATE_HOME/shopchat)
    pub state: PathBuf,
}

impl XdgDirs {
    /// Get XDG directories, respecting environment variables.
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::resolve(&home, |key| std::env::var(key).ok())
    }

    /// Resolve directories against `home` using `lookup` for the `XDG_*` variables.
    pub fn resolve(home: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = |var: &str, fallback: &str| {
            lookup(var)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| home.join(fallback))
                .join(APP_DIR)
        };

        Self {
            config: base("XDG_CONFIG_HOME", ".config"),
            state: base("XDG_STATE_HOME", ".local/state"),
        }
    }

    /// Default config file path.
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Log file used while the TUI owns the terminal.
    pub fn log_file(&self) -> PathBuf {
        self.state.join("shopchat.log")
    }

    /// Ensure all directories exist.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [&self.config, &self.state] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}
