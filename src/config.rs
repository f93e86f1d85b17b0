use crate::settings::{Keymap, Settings};
use eyre::Result;
use serde_json::{Map, Value};
use std::time::Duration;
use std::{fs, path::PathBuf};

/// User configuration. The file is only ever read; nothing is written back.
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub keymap: Keymap,
    filepath: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            keymap: Keymap::default(),
            filepath: PathBuf::new(),
        }
    }
}

fn read_string(map: &Map<String, Value>, key: &str, target: &mut String) {
    if let Some(val) = map.get(key).and_then(|v| v.as_str()) {
        *target = val.to_string();
    }
}

impl Config {
    /// Load `configuration.json` from the app data directory, or from
    /// `explicit` when given.
    pub fn new(explicit: Option<PathBuf>) -> Result<Self> {
        let filepath = match explicit {
            Some(path) => path,
            None => get_app_data_prefix()?.join("configuration.json"),
        };
        Self::load_from(filepath)
    }

    /// Get the configuration file path
    pub fn filepath(&self) -> &PathBuf {
        &self.filepath
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.request_timeout_secs.max(1))
    }

    /// Load configuration from a custom path. A missing file yields defaults;
    /// a file that is not valid JSON is reported and ignored.
    pub fn load_from(filepath: PathBuf) -> Result<Self> {
        let mut settings = Settings::default();
        let mut keymap = Keymap::default();

        if filepath.exists() {
            let config_str = fs::read_to_string(&filepath)?;
            match serde_json::from_str::<Value>(&config_str) {
                Ok(user_config) => {
                    if let Some(user_settings_map) =
                        user_config.get("Setting").and_then(|v| v.as_object())
                    {
                        if let Some(val) = user_settings_map
                            .get("library_folder")
                            .and_then(|v| v.as_str())
                        {
                            settings.library_folder = Some(PathBuf::from(val));
                        }
                        read_string(
                            user_settings_map,
                            "dictionary_endpoint",
                            &mut settings.dictionary_endpoint,
                        );
                        read_string(
                            user_settings_map,
                            "translation_endpoint",
                            &mut settings.translation_endpoint,
                        );
                        read_string(
                            user_settings_map,
                            "default_viewer",
                            &mut settings.default_viewer,
                        );
                        read_string(
                            user_settings_map,
                            "target_language",
                            &mut settings.target_language,
                        );
                        if let Some(val) = user_settings_map
                            .get("request_timeout_secs")
                            .and_then(|v| v.as_u64())
                        {
                            settings.request_timeout_secs = val;
                        }
                        if let Some(val) = user_settings_map
                            .get("show_progress_indicator")
                            .and_then(|v| v.as_bool())
                        {
                            settings.show_progress_indicator = val;
                        }
                    }

                    if let Some(user_keymap_map) =
                        user_config.get("Keymap").and_then(|v| v.as_object())
                    {
                        read_string(user_keymap_map, "next_chapter", &mut keymap.next_chapter);
                        read_string(user_keymap_map, "prev_chapter", &mut keymap.prev_chapter);
                        read_string(user_keymap_map, "scroll_up", &mut keymap.scroll_up);
                        read_string(user_keymap_map, "scroll_down", &mut keymap.scroll_down);
                        read_string(user_keymap_map, "select", &mut keymap.select);
                        read_string(user_keymap_map, "context_menu", &mut keymap.context_menu);
                        read_string(user_keymap_map, "quit", &mut keymap.quit);
                        read_string(user_keymap_map, "open_folder", &mut keymap.open_folder);
                        read_string(user_keymap_map, "show_images", &mut keymap.show_images);
                    }
                }
                Err(err) => {
                    log::warn!(
                        "Ignoring invalid configuration {}: {}",
                        filepath.display(),
                        err
                    );
                }
            }
        }

        Ok(Self {
            settings,
            keymap,
            filepath,
        })
    }
}

pub fn get_app_data_prefix() -> Result<PathBuf> {
    if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(config_home).join("bookleaf"));
    } else if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home.clone()).join(".config").join("bookleaf");
        if path.exists() {
            return Ok(path);
        } else {
            return Ok(PathBuf::from(home).join(".bookleaf"));
        }
    } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
        return Ok(PathBuf::from(user_profile).join(".bookleaf"));
    }

    Err(eyre::eyre!(
        "Could not determine application data directory"
    ))
}
