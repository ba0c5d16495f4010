//! Configuration management.

mod settings;
mod xdg;

pub use settings::{ChatConfig, ConfigError, MIN_PANEL_HEIGHT, MIN_PANEL_WIDTH};
pub use xdg::XdgDirs;
