use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logging::DEFAULT_LOG_LEVEL;
use crate::utils::{self, Profile};

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

const CONFIG_FILE_NAME: &str = "config.toml";
const DATABASE_FILE_NAME: &str = "notepad.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Empty means "the profile's default database"
    #[serde(default)]
    pub database_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Category created on first run so new entries have a home
    #[serde(default = "default_category_name")]
    pub default_category: String,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_new_note")]
    pub new_note: String,
    #[serde(default = "default_new_todo")]
    pub new_todo: String,
    #[serde(default = "default_search")]
    pub search: String,
    #[serde(default = "default_category_filter")]
    pub category_filter: String,
    #[serde(default = "default_todo_filter")]
    pub todo_filter: String,
    #[serde(default = "default_categories")]
    pub categories: String,
    /// Open the selected row in the editor
    #[serde(default = "default_open")]
    pub open: String,
    #[serde(default = "default_context_menu")]
    pub context_menu: String,
    #[serde(default = "default_toggle_complete")]
    pub toggle_complete: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_copy")]
    pub copy: String,
    #[serde(default = "default_paste")]
    pub paste: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_save")]
    pub save: String,
    /// Delete from inside the editor
    #[serde(default = "default_editor_delete")]
    pub editor_delete: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    /// Leave empty to derive a readable color from `highlight_bg`
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_accent")]
    pub accent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: String::new(),
            log_level: default_log_level(),
            default_category: default_category_name(),
            key_bindings: KeyBindings::default(),
            theme: Theme::default(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            new_note: default_new_note(),
            new_todo: default_new_todo(),
            search: default_search(),
            category_filter: default_category_filter(),
            todo_filter: default_todo_filter(),
            categories: default_categories(),
            open: default_open(),
            context_menu: default_context_menu(),
            toggle_complete: default_toggle_complete(),
            delete: default_delete(),
            copy: default_copy(),
            paste: default_paste(),
            help: default_help(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            save: default_save(),
            editor_delete: default_editor_delete(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            accent: default_accent(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_category_name() -> String {
    "General".to_string()
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_new_note() -> String {
    "n".to_string()
}

fn default_new_todo() -> String {
    "t".to_string()
}

fn default_search() -> String {
    "/".to_string()
}

fn default_category_filter() -> String {
    "c".to_string()
}

fn default_todo_filter() -> String {
    "f".to_string()
}

fn default_categories() -> String {
    "m".to_string()
}

fn default_open() -> String {
    "Enter".to_string()
}

fn default_context_menu() -> String {
    "x".to_string()
}

fn default_toggle_complete() -> String {
    "Space".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_copy() -> String {
    "y".to_string()
}

fn default_paste() -> String {
    "p".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_save() -> String {
    "Ctrl+s".to_string()
}

fn default_editor_delete() -> String {
    "Ctrl+d".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_accent() -> String {
    "cyan".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

impl Config {
    /// Load the config for `profile`, or from `override_path` when given.
    /// A missing file is created with defaults.
    pub fn load(override_path: Option<&Path>, profile: Profile) -> Result<Self, ConfigError> {
        match override_path {
            Some(path) => Self::load_from(path, profile),
            None => Self::load_with_profile(profile),
        }
    }

    /// Load configuration from the profile's config directory
    pub fn load_with_profile(profile: Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_from(&config_path, profile)
    }

    /// Load configuration from an explicit file, creating it if missing
    pub fn load_from(config_path: &Path, profile: Profile) -> Result<Self, ConfigError> {
        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            toml::from_str::<Config>(&contents)?
        } else {
            let mut config = Config::default();
            if let Err(e) = config.save_to(config_path) {
                log::error!(
                    "event=config_save_failed path={} error={}",
                    config_path.display(),
                    e
                );
                return Err(e);
            }
            log::info!("event=config_created path={}", config_path.display());
            config
        };

        if config.database_path.trim().is_empty() {
            config.database_path = Self::default_database_path_for_profile(profile);
        }
        Ok(config)
    }

    /// Write the config to an explicit file
    pub fn save_to(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
            }
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile).ok_or_else(|| {
            ConfigError::ConfigDirError("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    /// Get default database path for a specific profile
    fn default_database_path_for_profile(profile: Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join(DATABASE_FILE_NAME).to_string_lossy().to_string()
        } else {
            format!("~/.local/share/{}/{}", profile.app_name(), DATABASE_FILE_NAME)
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    /// Theme with `highlight_fg` filled in when the user left it empty
    pub fn get_active_theme(&self) -> Theme {
        use crate::tui::widgets::color::{format_color_for_display, get_contrast_text_color, parse_color};

        let mut theme = self.theme.clone();
        if theme.highlight_fg.trim().is_empty() {
            let calculated_fg = get_contrast_text_color(parse_color(&theme.highlight_bg));
            theme.highlight_fg = format_color_for_display(&calculated_fg);
        }
        theme
    }
}
