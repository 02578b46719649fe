//! Commands of the list screen and the filter menus built from them.

use crate::filter::{CategoryFilter, TodoFilter};
use crate::models::{Category, NoteRecord};

pub const ALL_CATEGORIES_LABEL: &str = "All notes";

/// Every action the list screen's option menus can dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    AddNote,
    AddTodo,
    ToggleSearch,
    SubmitSearch(String),
    ClearSearch,
    ManageCategories,
    FilterCategory(CategoryFilter),
    FilterTodo(TodoFilter),
    /// New note from clipboard text
    Paste(String),
}

/// Per-row actions offered by the context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    Open,
    Copy,
    Delete,
    MarkComplete,
    MarkIncomplete,
}

impl ContextAction {
    pub fn label(self) -> &'static str {
        match self {
            ContextAction::Open => "Open",
            ContextAction::Copy => "Copy link",
            ContextAction::Delete => "Delete",
            ContextAction::MarkComplete => "Mark complete",
            ContextAction::MarkIncomplete => "Mark incomplete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption<C> {
    pub label: String,
    pub command: C,
}

impl<C> MenuOption<C> {
    pub fn new(label: impl Into<String>, command: C) -> Self {
        Self {
            label: label.into(),
            command,
        }
    }
}

/// "All notes" followed by one entry per category, in the order given
/// (the store returns categories by creation time ascending)
pub fn category_filter_options(categories: &[Category]) -> Vec<MenuOption<MenuCommand>> {
    let mut options = Vec::with_capacity(categories.len() + 1);
    options.push(MenuOption::new(
        ALL_CATEGORIES_LABEL,
        MenuCommand::FilterCategory(CategoryFilter::All),
    ));
    options.extend(categories.iter().map(|category| {
        MenuOption::new(
            category.name.clone(),
            MenuCommand::FilterCategory(CategoryFilter::Only {
                id: category.id,
                name: category.name.clone(),
            }),
        )
    }));
    options
}

pub fn todo_filter_options() -> Vec<MenuOption<MenuCommand>> {
    TodoFilter::MENU_ORDER
        .iter()
        .map(|filter| MenuOption::new(filter.menu_label(), MenuCommand::FilterTodo(*filter)))
        .collect()
}

/// Context menu for one row. Todos get exactly one of mark complete / mark
/// incomplete depending on their current state.
pub fn context_options(record: &NoteRecord) -> Vec<MenuOption<ContextAction>> {
    let mut actions = vec![ContextAction::Open, ContextAction::Copy, ContextAction::Delete];
    if record.is_todo {
        if record.is_completed {
            actions.push(ContextAction::MarkIncomplete);
        } else {
            actions.push(ContextAction::MarkComplete);
        }
    }
    actions
        .into_iter()
        .map(|action| MenuOption::new(action.label(), action))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    #[test]
    fn category_options_start_with_all_and_keep_order() {
        let categories = vec![
            Category {
                id: 7,
                name: "Work".to_string(),
                created_at: 1,
            },
            Category {
                id: 2,
                name: "Home".to_string(),
                created_at: 5,
            },
        ];
        let options = category_filter_options(&categories);
        let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec![ALL_CATEGORIES_LABEL, "Work", "Home"]);
        assert_eq!(
            options[2].command,
            MenuCommand::FilterCategory(CategoryFilter::Only {
                id: 2,
                name: "Home".to_string()
            })
        );
    }

    #[test]
    fn todo_options_are_the_fixed_four() {
        let commands: Vec<_> = todo_filter_options().into_iter().map(|o| o.command).collect();
        assert_eq!(
            commands,
            vec![
                MenuCommand::FilterTodo(TodoFilter::All),
                MenuCommand::FilterTodo(TodoFilter::TodosOnly),
                MenuCommand::FilterTodo(TodoFilter::NotesOnly),
                MenuCommand::FilterTodo(TodoFilter::IncompleteTodos),
            ]
        );
    }

    #[test]
    fn context_options_depend_on_completion() {
        let mut record = NoteRecord {
            id: 1,
            title: String::new(),
            body: String::new(),
            category_id: None,
            is_todo: false,
            is_completed: false,
            due_date: None,
            priority: Priority::Medium,
            created_at: 0,
            modified_at: 0,
        };
        assert_eq!(context_options(&record).len(), 3);

        record.is_todo = true;
        let actions: Vec<_> = context_options(&record).into_iter().map(|o| o.command).collect();
        assert!(actions.contains(&ContextAction::MarkComplete));
        assert!(!actions.contains(&ContextAction::MarkIncomplete));

        record.is_completed = true;
        let actions: Vec<_> = context_options(&record).into_iter().map(|o| o.command).collect();
        assert!(actions.contains(&ContextAction::MarkIncomplete));
        assert!(!actions.contains(&ContextAction::MarkComplete));
    }
}
