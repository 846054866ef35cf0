// Mediamarks Settings Engine
// Loads and saves AppSettings as a JSON file, updates single values by dotted key.
// Defaults apply when the file is absent; the file is only written on change.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::AppSettings;

/// File name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<AppSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &AppSettings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine persisting [`AppSettings`] as pretty-printed JSON.
pub struct SettingsEngine {
    config_path: String,
    settings: AppSettings,
}

impl SettingsEngine {
    /// Creates an engine for `path_override`, or for `settings.json` in the
    /// platform config directory when no override is given.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override.unwrap_or_else(|| {
            platform::get_config_dir()
                .join(SETTINGS_FILE)
                .to_string_lossy()
                .to_string()
        });

        Self {
            config_path,
            settings: AppSettings::default(),
        }
    }
}

/// Replaces the value at a dotted path inside a JSON object tree. Only keys
/// that already exist can be replaced.
fn replace_at_path(root: &mut Value, key: &str, value: Value) -> Result<(), SettingsError> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((last, parents)) = parts.split_last() else {
        return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
    };

    let mut current = root;
    for part in parents {
        current = current
            .get_mut(*part)
            .ok_or_else(|| SettingsError::InvalidKey(format!("Key '{}' not found in settings", key)))?;
    }

    match current {
        Value::Object(map) if map.contains_key(*last) => {
            map.insert(last.to_string(), value);
            Ok(())
        }
        Value::Object(_) => Err(SettingsError::InvalidKey(format!(
            "Key '{}' not found in settings",
            key
        ))),
        _ => Err(SettingsError::InvalidKey(format!(
            "Cannot navigate to key '{}': intermediate value is not an object",
            key
        ))),
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Reads the settings file. A missing file yields defaults; a malformed
    /// one is a serialization error.
    fn load(&mut self) -> Result<AppSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            debug!(path = %self.config_path, "no settings file, using defaults");
            self.settings = AppSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        self.settings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        info!(path = %self.config_path, "loaded settings");
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))
    }

    fn get_settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Updates one value by dotted key, e.g. `"flickr.api_key"` or
    /// `"storage.backend"`, and saves. The whole tree is re-validated, so a
    /// value of the wrong type is rejected and nothing changes.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut tree = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;
        replace_at_path(&mut tree, key, value)?;

        self.settings = serde_json::from_value(tree).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        debug!(key = %key, "updated setting");

        self.save()
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = AppSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
