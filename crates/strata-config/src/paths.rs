//! Platform-specific paths for presets and configuration.
//!
//! This module provides cross-platform paths for storing user presets,
//! configuration files, and locating system presets.
//!
//! # Directory Structure
//!
//! - **User presets**: `~/.config/strata/presets/` (Linux), `~/Library/Application Support/strata/presets/` (macOS), `%APPDATA%\strata\presets\` (Windows)
//! - **User config**: `~/.config/strata/` (Linux), `~/Library/Application Support/strata/` (macOS), `%APPDATA%\strata\` (Windows)
//! - **System presets**: `/usr/share/strata/presets/` (Linux), `/Library/Application Support/strata/presets/` (macOS)
//!
//! # Example
//!
//! ```rust,no_run
//! use strata_config::paths;
//!
//! // Get the user presets directory
//! let presets_dir = paths::user_presets_dir();
//! println!("User presets: {:?}", presets_dir);
//!
//! // Find a preset by name (searches user then system directories)
//! if let Some(path) = paths::find_preset("my_preset") {
//!     println!("Found preset at: {:?}", path);
//! }
//! ```

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "strata";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// Returns the user-specific presets directory.
///
/// # Platform Paths
///
/// - Linux: `~/.config/strata/presets/`
/// - macOS: `~/Library/Application Support/strata/presets/`
/// - Windows: `%APPDATA%\strata\presets\`
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_presets_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(PRESETS_SUBDIR)
}

/// Returns the user-specific configuration directory.
///
/// # Platform Paths
///
/// - Linux: `~/.config/strata/`
/// - macOS: `~/Library/Application Support/strata/`
/// - Windows: `%APPDATA%\strata\`
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the system-wide presets directory.
///
/// This directory is typically read-only and contains factory presets.
///
/// # Platform Paths
///
/// - Linux: `/usr/share/strata/presets/`
/// - macOS: `/Library/Application Support/strata/presets/`
/// - Windows: `%PROGRAMDATA%\strata\presets\`
pub fn system_presets_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/usr/share").join(APP_NAME).join(PRESETS_SUBDIR)
    }
    #[cfg(target_os = "macos")]
    {
        PathBuf::from("/Library/Application Support").join(APP_NAME).join(PRESETS_SUBDIR)
    }
    #[cfg(target_os = "windows")]
    {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData"))
            .join(APP_NAME)
            .join(PRESETS_SUBDIR)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
            .join(PRESETS_SUBDIR)
    }
}

/// Find a preset file by name.
///
/// Searches in the following order:
/// 1. Current directory (if the path is a valid file)
/// 2. User presets directory
/// 3. System presets directory
///
/// The name can be:
/// - An absolute path to a TOML file
/// - A relative path to a TOML file
/// - A preset name (with or without `.toml` extension)
///
/// # Example
///
/// ```rust,no_run
/// use strata_config::paths::find_preset;
///
/// // Find by name
/// if let Some(path) = find_preset("blues_drive") {
///     println!("Found: {:?}", path);
/// }
///
/// // Find by path
/// if let Some(path) = find_preset("/path/to/my_preset.toml") {
///     println!("Found: {:?}", path);
/// }
/// ```
pub fn find_preset(name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(name);

    // Check if it's already a valid file path
    if path.is_file() {
        return Some(path);
    }

    // Normalize the name (add .toml if not present)
    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{}.toml", name)
    };

    // Search user presets directory
    let user_path = user_presets_dir().join(&filename);
    if user_path.is_file() {
        return Some(user_path);
    }

    // Search system presets directory
    let system_path = system_presets_dir().join(&filename);
    if system_path.is_file() {
        return Some(system_path);
    }

    None
}

/// Ensure the user presets directory exists.
///
/// Creates the directory and any parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_presets_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_presets_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

/// Ensure the user config directory exists.
///
/// Creates the directory and any parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

/// List all preset files in the user presets directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&user_presets_dir())
}

/// List all preset files in the system presets directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_system_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&system_presets_dir())
}

/// List all available presets (user + system).
///
/// User presets are listed first, followed by system presets.
/// Duplicate names are not filtered - the caller should handle precedence.
pub fn list_all_presets() -> Vec<PathBuf> {
    let mut presets = list_user_presets();
    presets.extend(list_system_presets());
    presets
}

/// Helper to list preset files in a directory.
fn list_presets_in_dir(dir: &PathBuf) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext == "toml")
                    .unwrap_or(false)
        })
        .collect()
}

/// Get the preset name from a file path.
///
/// Extracts the file stem (filename without extension).
///
/// # Example
///
/// ```rust
/// use strata_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/path/to/blues_drive.toml"));
/// assert_eq!(name, Some("blues_drive".to_string()));
/// ```
pub fn preset_name_from_path(path: &std::path::Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
