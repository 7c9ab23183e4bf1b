//! Configuration loading and root folder resolution
//!
//! The root folder holds the SQLite database, the survey manifest and the
//! per-method content files.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. `PAIRCOMP_ROOT` environment variable
/// 3. TOML config file (`root_folder` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("PAIRCOMP_ROOT") {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Create the root folder if it does not exist yet.
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    std::fs::create_dir_all(root)?;
    Ok(())
}

/// Path of the SQLite database within the root folder.
pub fn database_path(root: &Path) -> PathBuf {
    root.join("paircomp.db")
}

/// Path of the survey manifest within the root folder.
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join("manifest.json")
}

/// Directory holding the per-method content files.
pub fn content_dir(root: &Path) -> PathBuf {
    root.join("methods")
}

/// Locate the configuration file for the platform.
fn locate_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/paircomp/config.toml first, then /etc/paircomp/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("paircomp").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/paircomp/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let config_path = dirs::config_dir()
        .map(|d| d.join("paircomp").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// OS-dependent default root folder path.
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("paircomp"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/paircomp"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("paircomp"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/paircomp"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("paircomp"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\paircomp"))
    } else {
        PathBuf::from("./paircomp_data")
    }
}
