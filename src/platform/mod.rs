// Mediamarks platform paths
// Resolves where settings and the bookmark database live on each OS.

use std::env;
use std::path::PathBuf;

const APP_DIR_UNIX: &str = "mediamarks";
const APP_DIR_DESKTOP: &str = "Mediamarks";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `$XDG_CONFIG_HOME/mediamarks` or `~/.config/mediamarks`
/// - **macOS**: `~/Library/Application Support/Mediamarks`
/// - **Windows**: `%APPDATA%/Mediamarks`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Application Support").join(APP_DIR_DESKTOP)
    }
    #[cfg(target_os = "windows")]
    {
        let _ = home_dir;
        let appdata = env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Temp"));
        PathBuf::from(appdata).join(APP_DIR_DESKTOP)
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let _ = APP_DIR_DESKTOP;
        match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join(APP_DIR_UNIX),
            Err(_) => home_dir().join(".config").join(APP_DIR_UNIX),
        }
    }
}

/// Returns the platform-specific data directory (holds `mediamarks.db`).
///
/// - **Linux**: `$XDG_DATA_HOME/mediamarks` or `~/.local/share/mediamarks`
/// - **macOS**: same as the config directory
/// - **Windows**: `%LOCALAPPDATA%/Mediamarks`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        let local = env::var("LOCALAPPDATA").unwrap_or_else(|_| String::from("C:\\Temp"));
        PathBuf::from(local).join(APP_DIR_DESKTOP)
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        match env::var("XDG_DATA_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join(APP_DIR_UNIX),
            Err(_) => home_dir().join(".local").join("share").join(APP_DIR_UNIX),
        }
    }
}
