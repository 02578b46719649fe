use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    /// Directory name used for this profile's config and data
    pub fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "notepad-dev",
            Profile::Prod => "notepad",
        }
    }
}

/// Configuration directory for a profile
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "notepad", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Data directory (database and logs) for a profile
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "notepad", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
}

/// Parsed key binding information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKeyBinding {
    pub key_code: KeyCode,
    pub requires_ctrl: bool,
}

impl ParsedKeyBinding {
    /// True when `key` is this binding. Bindings without Ctrl never match a
    /// Ctrl chord, so `s` and `Ctrl+s` stay distinct.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if has_primary_modifier(key.modifiers) != self.requires_ctrl {
            return false;
        }
        match (self.key_code, key.code) {
            // Terminals report Ctrl+letter in either case
            (KeyCode::Char(a), KeyCode::Char(b)) if self.requires_ctrl => {
                a.eq_ignore_ascii_case(&b)
            }
            (expected, actual) => expected == actual,
        }
    }
}

/// Check if a key event has the primary modifier (Ctrl on Windows/Linux, Option/Alt on macOS)
pub fn has_primary_modifier(modifiers: KeyModifiers) -> bool {
    #[cfg(target_os = "macos")]
    {
        modifiers.contains(KeyModifiers::CONTROL) || modifiers.contains(KeyModifiers::ALT)
    }

    #[cfg(not(target_os = "macos"))]
    {
        modifiers.contains(KeyModifiers::CONTROL)
    }
}

/// Format a key binding string for display, showing the platform-appropriate modifier
/// On macOS, "Ctrl+" is replaced with "Opt+"
pub fn format_key_binding_for_display(key_binding: &str) -> String {
    #[cfg(target_os = "macos")]
    {
        key_binding.replace("Ctrl+", "Opt+")
    }

    #[cfg(not(target_os = "macos"))]
    {
        key_binding.to_string()
    }
}

/// Parse a key binding string from config into a ParsedKeyBinding
/// Supports: single keys ("q", "n", "/"), special keys ("Enter", "Space", "F1"),
/// and Ctrl chords ("Ctrl+s")
pub fn parse_key_binding(key_str: &str) -> Result<ParsedKeyBinding, String> {
    let key_str = key_str.trim();

    if let Some(key_part) = key_str.strip_prefix("Ctrl+") {
        return Ok(ParsedKeyBinding {
            key_code: parse_key_code(key_part)?,
            requires_ctrl: true,
        });
    }

    Ok(ParsedKeyBinding {
        key_code: parse_key_code(key_str)?,
        requires_ctrl: false,
    })
}

/// Parse a key code from a string (without modifiers)
fn parse_key_code(key_str: &str) -> Result<KeyCode, String> {
    match key_str {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" | "Escape" => Ok(KeyCode::Esc),
        "Backspace" => Ok(KeyCode::Backspace),
        "Tab" => Ok(KeyCode::Tab),
        "Space" | " " => Ok(KeyCode::Char(' ')),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Delete" => Ok(KeyCode::Delete),
        _ => {
            if let Some(n) = key_str.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    return Ok(KeyCode::F(n));
                }
            }
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyCode::Char(c)),
                _ => Err(format!("Unknown key binding: {}", key_str)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_special_and_ctrl_bindings() {
        assert_eq!(
            parse_key_binding("q").unwrap(),
            ParsedKeyBinding {
                key_code: KeyCode::Char('q'),
                requires_ctrl: false
            }
        );
        assert_eq!(parse_key_binding("F1").unwrap().key_code, KeyCode::F(1));
        assert_eq!(parse_key_binding("Space").unwrap().key_code, KeyCode::Char(' '));
        let save = parse_key_binding("Ctrl+s").unwrap();
        assert!(save.requires_ctrl);
        assert!(parse_key_binding("Hyper+q").is_err());
        assert!(parse_key_binding("F13").is_err());
    }

    #[test]
    fn ctrl_bindings_do_not_match_plain_keys() {
        let save = parse_key_binding("Ctrl+s").unwrap();
        let plain = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        let chord = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(!save.matches(&plain));
        assert!(save.matches(&chord));

        let quit = parse_key_binding("q").unwrap();
        assert!(quit.matches(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(!quit.matches(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(
            parse_date(" 2024-12-31 ").unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
        assert!(parse_date("31/12/2024").is_err());
    }

    #[test]
    fn profiles_use_separate_directories() {
        assert_ne!(Profile::Dev.app_name(), Profile::Prod.app_name());
        assert_eq!(expand_path("/abs/path"), PathBuf::from("/abs/path"));
    }
}
