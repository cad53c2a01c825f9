//! User configuration (`~/.prjrem/config.toml`).

pub mod settings;

pub use settings::{config_dir, Settings};
