use crate::config::KeyBindings;
use crate::tui::error::TuiError;
use crate::utils::{parse_key_binding, ParsedKeyBinding};

/// Key bindings parsed once at startup so a typo in the config fails fast
/// instead of silently disabling a key.
#[derive(Debug, Clone)]
pub struct KeyMap {
    pub quit: ParsedKeyBinding,
    pub new_note: ParsedKeyBinding,
    pub new_todo: ParsedKeyBinding,
    pub search: ParsedKeyBinding,
    pub category_filter: ParsedKeyBinding,
    pub todo_filter: ParsedKeyBinding,
    pub categories: ParsedKeyBinding,
    pub open: ParsedKeyBinding,
    pub context_menu: ParsedKeyBinding,
    pub toggle_complete: ParsedKeyBinding,
    pub delete: ParsedKeyBinding,
    pub copy: ParsedKeyBinding,
    pub paste: ParsedKeyBinding,
    pub help: ParsedKeyBinding,
    pub list_up: ParsedKeyBinding,
    pub list_down: ParsedKeyBinding,
    pub save: ParsedKeyBinding,
    pub editor_delete: ParsedKeyBinding,
}

fn parse(name: &str, value: &str) -> Result<ParsedKeyBinding, TuiError> {
    parse_key_binding(value).map_err(|e| TuiError::KeyBindingError(format!("{}: {}", name, e)))
}

impl KeyMap {
    pub fn from_config(bindings: &KeyBindings) -> Result<Self, TuiError> {
        Ok(Self {
            quit: parse("quit", &bindings.quit)?,
            new_note: parse("new_note", &bindings.new_note)?,
            new_todo: parse("new_todo", &bindings.new_todo)?,
            search: parse("search", &bindings.search)?,
            category_filter: parse("category_filter", &bindings.category_filter)?,
            todo_filter: parse("todo_filter", &bindings.todo_filter)?,
            categories: parse("categories", &bindings.categories)?,
            open: parse("open", &bindings.open)?,
            context_menu: parse("context_menu", &bindings.context_menu)?,
            toggle_complete: parse("toggle_complete", &bindings.toggle_complete)?,
            delete: parse("delete", &bindings.delete)?,
            copy: parse("copy", &bindings.copy)?,
            paste: parse("paste", &bindings.paste)?,
            help: parse("help", &bindings.help)?,
            list_up: parse("list_up", &bindings.list_up)?,
            list_down: parse("list_down", &bindings.list_down)?,
            save: parse("save", &bindings.save)?,
            editor_delete: parse("editor_delete", &bindings.editor_delete)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_parse() {
        let keys = KeyMap::from_config(&KeyBindings::default()).unwrap();
        assert!(keys.save.requires_ctrl);
        assert!(keys.editor_delete.requires_ctrl);
        assert!(!keys.delete.requires_ctrl);
    }

    #[test]
    fn enter_opens_and_x_shows_row_actions() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let keys = KeyMap::from_config(&KeyBindings::default()).unwrap();
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(keys.open.matches(&enter));
        assert!(!keys.context_menu.matches(&enter));
        assert!(keys.context_menu.matches(&x));
        assert!(keys.paste.matches(&KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE)));
    }

    #[test]
    fn bad_binding_names_the_field() {
        let bindings = KeyBindings {
            copy: "Meta+y".to_string(),
            ..KeyBindings::default()
        };
        match KeyMap::from_config(&bindings) {
            Err(TuiError::KeyBindingError(message)) => assert!(message.starts_with("copy:")),
            other => panic!("expected a key binding error, got {:?}", other.map(|_| ())),
        }
    }
}
