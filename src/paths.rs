use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const SETTINGS_FILE_NAME: &str = "config.json";

pub fn config_dir() -> Result<PathBuf> {
    config_dir_from_env(env::var_os("QUICKPLAY_CONFIG_DIR"))
}

pub fn config_dir_from_env(env_value: Option<OsString>) -> Result<PathBuf> {
    match env_value {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => {
            let base = dirs::config_dir().context("unable to resolve config directory")?;
            Ok(base.join("quickplay"))
        }
    }
}

pub fn settings_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(SETTINGS_FILE_NAME))
}
