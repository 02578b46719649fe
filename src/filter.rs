//! Filter state for the notes list and its compilation into a store predicate.
//!
//! The three filter dimensions always combine with AND, in the fixed clause
//! order search, category, todo status. An empty search text adds no clause.

use rusqlite::types::Value;

/// Sort order handed to the store with every list query
pub const DEFAULT_SORT_ORDER: &str = "modified_at DESC";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TodoFilter {
    #[default]
    All,
    NotesOnly,
    TodosOnly,
    IncompleteTodos,
}

impl TodoFilter {
    /// Order used by the todo filter menu
    pub const MENU_ORDER: [TodoFilter; 4] = [
        TodoFilter::All,
        TodoFilter::TodosOnly,
        TodoFilter::NotesOnly,
        TodoFilter::IncompleteTodos,
    ];

    pub fn menu_label(self) -> &'static str {
        match self {
            TodoFilter::All => "All",
            TodoFilter::TodosOnly => "Todos only",
            TodoFilter::NotesOnly => "Notes only",
            TodoFilter::IncompleteTodos => "Incomplete todos",
        }
    }

    /// Label used as the first segment of the list screen title
    pub fn title_label(self) -> &'static str {
        match self {
            TodoFilter::All => "Notes",
            TodoFilter::NotesOnly => "Notes only",
            TodoFilter::TodosOnly => "Todos",
            TodoFilter::IncompleteTodos => "Incomplete todos",
        }
    }

    /// Literal clause for this filter, `None` for `All`
    fn clause(self) -> Option<&'static str> {
        match self {
            TodoFilter::All => None,
            TodoFilter::NotesOnly => Some("is_todo = 0"),
            TodoFilter::TodosOnly => Some("is_todo = 1"),
            TodoFilter::IncompleteTodos => Some("is_todo = 1 AND is_completed = 0"),
        }
    }

    /// Parse the value accepted by `notepad list --filter`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(TodoFilter::All),
            "notes" | "notes-only" => Some(TodoFilter::NotesOnly),
            "todos" | "todos-only" => Some(TodoFilter::TodosOnly),
            "incomplete" | "incomplete-todos" => Some(TodoFilter::IncompleteTodos),
            _ => None,
        }
    }
}

/// Category dimension of the filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only { id: i64, name: String },
}

impl CategoryFilter {
    pub fn id(&self) -> Option<i64> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only { id, .. } => Some(*id),
        }
    }
}

/// Filter state owned by the list controller. Passed by value to [`compile`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_text: String,
    pub category: CategoryFilter,
    pub todo: TodoFilter,
}

/// Compiled selection plus its positional arguments
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Predicate {
    pub clauses: Vec<String>,
    pub args: Vec<Value>,
}

impl Predicate {
    /// Selection string for the store, `None` meaning "match all"
    pub fn selection(&self) -> Option<String> {
        if self.clauses.is_empty() {
            None
        } else {
            Some(self.clauses.join(" AND "))
        }
    }

    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Wrap search text in LIKE wildcards. `%` and `_` inside the text keep their
/// LIKE meaning.
pub fn like_pattern(text: &str) -> String {
    format!("%{}%", text)
}

/// Compile filter state into a predicate for the notes query
pub fn compile(state: &FilterState) -> Predicate {
    let mut predicate = Predicate::default();

    if !state.search_text.is_empty() {
        predicate
            .clauses
            .push("(title LIKE ? OR body LIKE ?)".to_string());
        let pattern = like_pattern(&state.search_text);
        predicate.args.push(Value::Text(pattern.clone()));
        predicate.args.push(Value::Text(pattern));
    }

    if let Some(category_id) = state.category.id() {
        predicate.clauses.push("category_id = ?".to_string());
        predicate.args.push(Value::Integer(category_id));
    }

    if let Some(clause) = state.todo.clause() {
        predicate.clauses.push(clause.to_string());
    }

    predicate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(search: &str, category: Option<i64>, todo: TodoFilter) -> FilterState {
        FilterState {
            search_text: search.to_string(),
            category: match category {
                Some(id) => CategoryFilter::Only {
                    id,
                    name: format!("c{}", id),
                },
                None => CategoryFilter::All,
            },
            todo,
        }
    }

    #[test]
    fn default_state_matches_all() {
        let predicate = compile(&FilterState::default());
        assert!(predicate.is_match_all());
        assert_eq!(predicate.selection(), None);
        assert!(predicate.args.is_empty());
    }

    #[test]
    fn clause_order_is_search_category_todo() {
        let predicate = compile(&state("milk", Some(3), TodoFilter::IncompleteTodos));
        assert_eq!(
            predicate.selection().as_deref(),
            Some("(title LIKE ? OR body LIKE ?) AND category_id = ? AND is_todo = 1 AND is_completed = 0")
        );
        assert_eq!(
            predicate.args,
            vec![
                Value::Text("%milk%".to_string()),
                Value::Text("%milk%".to_string()),
                Value::Integer(3),
            ]
        );
    }

    #[test]
    fn every_combination_keeps_order_and_argument_count() {
        let todos = [
            TodoFilter::All,
            TodoFilter::NotesOnly,
            TodoFilter::TodosOnly,
            TodoFilter::IncompleteTodos,
        ];
        for search in ["", "x"] {
            for category in [None, Some(9)] {
                for todo in todos {
                    let predicate = compile(&state(search, category, todo));
                    let expected_args =
                        2 * usize::from(!search.is_empty()) + usize::from(category.is_some());
                    assert_eq!(predicate.args.len(), expected_args);

                    let mut expected = Vec::new();
                    if !search.is_empty() {
                        expected.push("(title LIKE ? OR body LIKE ?)");
                    }
                    if category.is_some() {
                        expected.push("category_id = ?");
                    }
                    if let Some(clause) = todo.clause() {
                        expected.push(clause);
                    }
                    assert_eq!(predicate.clauses, expected);
                }
            }
        }
    }

    #[test]
    fn compile_is_deterministic() {
        let filter = state("a_b", Some(1), TodoFilter::TodosOnly);
        assert_eq!(compile(&filter), compile(&filter));
        assert_eq!(compile(&filter).selection(), compile(&filter.clone()).selection());
    }

    #[test]
    fn incomplete_todos_is_todos_only_plus_not_completed() {
        let todos_only = compile(&state("", None, TodoFilter::TodosOnly));
        let incomplete = compile(&state("", None, TodoFilter::IncompleteTodos));
        let todos_selection = todos_only.selection().unwrap_or_default();
        assert_eq!(
            incomplete.selection(),
            Some(format!("{} AND is_completed = 0", todos_selection))
        );
    }

    #[test]
    fn parse_accepts_cli_spellings() {
        assert_eq!(TodoFilter::parse("incomplete"), Some(TodoFilter::IncompleteTodos));
        assert_eq!(TodoFilter::parse("Notes"), Some(TodoFilter::NotesOnly));
        assert_eq!(TodoFilter::parse("done"), None);
    }
}
