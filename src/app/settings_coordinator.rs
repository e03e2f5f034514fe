//! Console settings persistence.
//!
//! Column widths, dark mode and the last visited screen survive restarts.
//! Values are stored as JSON strings in eframe's storage; anything missing or
//! unreadable falls back to the defaults.

use crate::app::AppState;
use crate::state::LayoutState;
use opsdesk::Screen;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage key for per-table column widths
pub const COLUMN_WIDTHS_KEY: &str = "opsdesk_column_widths";
/// Storage key for the dark mode flag
pub const DARK_MODE_KEY: &str = "opsdesk_dark_mode";
/// Storage key for the screen shown when the console was closed
pub const LAST_SCREEN_KEY: &str = "opsdesk_last_screen";

/// Coordinates settings persistence.
///
/// Type-safe loading and saving of serializable settings to eframe's
/// persistent storage, plus the console's own settings on top of them.
pub struct SettingsCoordinator;

impl SettingsCoordinator {
    /// Loads a setting from persistent storage with a default fallback.
    ///
    /// # Type Parameters
    /// * `T` - The type to deserialize, must implement Deserialize and Default
    ///
    /// # Arguments
    /// * `storage` - The eframe storage interface
    /// * `key` - The storage key for this setting
    ///
    /// # Returns
    /// The deserialized value if found and valid, otherwise the default value for type T
    pub fn load_setting<T>(storage: Option<&dyn eframe::Storage>, key: &str) -> T
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        if let Some(storage) = storage {
            if let Some(json_str) = storage.get_string(key) {
                if let Ok(value) = serde_json::from_str(&json_str) {
                    return value;
                }
            }
        }
        T::default()
    }

    /// Saves a setting to persistent storage.
    ///
    /// # Type Parameters
    /// * `T` - The type to serialize, must implement Serialize
    ///
    /// # Arguments
    /// * `storage` - The eframe storage interface (mutable)
    /// * `key` - The storage key for this setting
    /// * `value` - The value to serialize and save
    pub fn save_setting<T>(storage: &mut dyn eframe::Storage, key: &str, value: &T)
    where
        T: Serialize,
    {
        if let Ok(json_str) = serde_json::to_string(value) {
            storage.set_string(key, json_str);
            storage.flush();
        }
    }

    /// Attempts to load a setting, returning None if not found or invalid.
    ///
    /// # Type Parameters
    /// * `T` - The type to deserialize, must implement Deserialize
    ///
    /// # Arguments
    /// * `storage` - The eframe storage interface
    /// * `key` - The storage key for this setting
    ///
    /// # Returns
    /// Some(value) if found and valid, None otherwise
    pub fn try_load_setting<T>(storage: Option<&dyn eframe::Storage>, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let storage = storage?;
        let json_str = storage.get_string(key)?;
        serde_json::from_str(&json_str).ok()
    }

    /// Restores the layout saved by the previous session.
    pub fn load_layout(storage: Option<&dyn eframe::Storage>) -> LayoutState {
        let widths: HashMap<String, Vec<f32>> = Self::load_setting(storage, COLUMN_WIDTHS_KEY);
        let dark_mode = Self::try_load_setting(storage, DARK_MODE_KEY).unwrap_or(true);
        LayoutState::with_settings(widths, dark_mode)
    }

    /// Screen to open on startup.
    pub fn load_last_screen(storage: Option<&dyn eframe::Storage>) -> Screen {
        Self::load_setting(storage, LAST_SCREEN_KEY)
    }

    /// Writes every persisted console setting.
    pub fn save_console_settings(storage: &mut dyn eframe::Storage, state: &AppState) {
        Self::save_setting(storage, COLUMN_WIDTHS_KEY, state.layout.all_column_widths());
        Self::save_setting(storage, DARK_MODE_KEY, &state.layout.dark_mode());
        Self::save_setting(storage, LAST_SCREEN_KEY, &state.active_screen());
    }
}
