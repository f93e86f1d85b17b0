use crate::dictionary::DEFAULT_DICTIONARY_ENDPOINT;
use crate::translate::{DEFAULT_TARGET_LANGUAGE, DEFAULT_TRANSLATION_ENDPOINT};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library_folder: Option<PathBuf>,
    pub dictionary_endpoint: String,
    pub translation_endpoint: String,
    pub target_language: String,
    pub request_timeout_secs: u64,
    pub show_progress_indicator: bool,
    /// Image viewer command, or `auto` to try `feh` then `xdg-open`.
    pub default_viewer: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            library_folder: None,
            dictionary_endpoint: DEFAULT_DICTIONARY_ENDPOINT.to_string(),
            translation_endpoint: DEFAULT_TRANSLATION_ENDPOINT.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            request_timeout_secs: 10,
            show_progress_indicator: true,
            default_viewer: "auto".to_string(),
        }
    }
}

/// Single-character key bindings, overridable from the `Keymap` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Keymap {
    pub next_chapter: String,
    pub prev_chapter: String,
    pub scroll_up: String,
    pub scroll_down: String,
    pub select: String,
    pub context_menu: String,
    pub quit: String,
    pub open_folder: String,
    pub show_images: String,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            next_chapter: "L".to_string(),
            prev_chapter: "H".to_string(),
            scroll_up: "k".to_string(),
            scroll_down: "j".to_string(),
            select: "v".to_string(),
            context_menu: "m".to_string(),
            quit: "q".to_string(),
            open_folder: "o".to_string(),
            show_images: "i".to_string(),
        }
    }
}

impl Keymap {
    /// Whether `binding` is bound to the typed character.
    pub fn matches(binding: &str, typed: char) -> bool {
        let mut chars = binding.chars();
        chars.next() == Some(typed) && chars.next().is_none()
    }
}
