use notepad::database::{NoteColumn, NoteValues};
use notepad::filter::{CategoryFilter, TodoFilter};
use notepad::menu::{ContextAction, MenuCommand};
use notepad::models::{EntryKind, Priority};
use notepad::notes_list::{ListEffect, Navigation};
use notepad::todo_editor::EditorSession;
use notepad::{Database, ListController, NoteStore};

fn insert(db: &Database, title: &str, is_todo: bool, modified_at: i64) -> i64 {
    let mut values = NoteValues::new();
    values
        .put(NoteColumn::Title, title.to_string())
        .put(NoteColumn::Body, String::new())
        .put_bool(NoteColumn::IsTodo, is_todo)
        .put(NoteColumn::CreatedAt, modified_at)
        .put(NoteColumn::ModifiedAt, modified_at);
    db.insert_note(&values).unwrap()
}

#[test]
fn inserted_note_is_the_only_row_of_the_default_query() {
    let db = Database::open_in_memory().unwrap();
    let id = insert(&db, "新笔记", false, 10);

    let mut list = ListController::new();
    list.refresh(&db).unwrap();

    assert_eq!(list.records().len(), 1);
    assert_eq!(list.records()[0].id, id);
    assert_eq!(list.records()[0].title, "新笔记");
    assert_eq!(list.screen_title(), "Notes (1 items)");
}

#[test]
fn completed_todo_drops_out_of_incomplete_filter() {
    let db = Database::open_in_memory().unwrap();
    let todo = insert(&db, "Buy milk", true, 10);
    insert(&db, "Plain note", false, 20);

    let mut list = ListController::new();
    list.set_todo_filter(&db, TodoFilter::IncompleteTodos).unwrap();
    assert_eq!(list.records().len(), 1);

    let effect = list.context_action(&db, 0, ContextAction::MarkComplete).unwrap();
    assert!(matches!(effect, ListEffect::Notice(ref n) if n.message == "Marked complete"));
    assert!(list.records().is_empty());

    list.set_todo_filter(&db, TodoFilter::TodosOnly).unwrap();
    assert_eq!(list.records()[0].id, todo);
    assert!(list.records()[0].is_completed);
}

#[test]
fn filters_combine_and_search_survives_menu_changes() {
    let db = Database::open_in_memory().unwrap();
    let work = db.insert_category("Work").unwrap();
    let home = db.insert_category("Home").unwrap();

    let mut values = NoteValues::new();
    values
        .put(NoteColumn::Title, "report draft".to_string())
        .put(NoteColumn::CategoryId, work)
        .put_bool(NoteColumn::IsTodo, true)
        .put(NoteColumn::CreatedAt, 1)
        .put(NoteColumn::ModifiedAt, 1);
    db.insert_note(&values).unwrap();
    let mut values = NoteValues::new();
    values
        .put(NoteColumn::Title, "report ideas".to_string())
        .put(NoteColumn::CategoryId, home)
        .put(NoteColumn::CreatedAt, 2)
        .put(NoteColumn::ModifiedAt, 2);
    db.insert_note(&values).unwrap();

    let mut list = ListController::new();
    list.apply(&db, MenuCommand::SubmitSearch("  report ".to_string())).unwrap();
    assert_eq!(list.records().len(), 2);

    list.apply(
        &db,
        MenuCommand::FilterCategory(CategoryFilter::Only {
            id: work,
            name: "Work".to_string(),
        }),
    )
    .unwrap();
    assert_eq!(list.filter().search_text, "report");
    assert_eq!(list.records().len(), 1);
    assert_eq!(list.screen_title(), "Notes - Work - Search: report (1 items)");

    list.apply(&db, MenuCommand::FilterTodo(TodoFilter::NotesOnly)).unwrap();
    assert!(list.records().is_empty());
}

#[test]
fn new_todo_gets_defaults_and_opens_the_todo_editor() {
    let db = Database::open_in_memory().unwrap();
    let category = db.insert_category("General").unwrap();
    let mut list = ListController::new();

    let effect = list.apply(&db, MenuCommand::AddTodo).unwrap();
    assert_eq!(effect, ListEffect::Navigate(Navigation::PickCategory(EntryKind::Todo)));

    let id = list.create_entry(&db, EntryKind::Todo, Some(category)).unwrap();
    let record = db.get_note(id).unwrap().unwrap();
    assert_eq!(record.title, "New todo");
    assert!(record.is_todo);
    assert!(!record.is_completed);
    assert_eq!(record.priority, Priority::Medium);
    assert_eq!(record.category_id, Some(category));
    assert_eq!(record.created_at, record.modified_at);

    let effect = list.context_action(&db, 0, ContextAction::Open).unwrap();
    assert_eq!(effect, ListEffect::Navigate(Navigation::TodoEditor(id)));
}

#[test]
fn dropping_a_session_saves_the_working_set() {
    let db = Database::open_in_memory().unwrap();
    let id = insert(&db, "Draft", true, 10);

    {
        let mut session = EditorSession::open(&db, id).unwrap();
        session.editor_mut().set_title("Final");
        session.editor_mut().set_priority(Some(Priority::High));
    }

    let record = db.get_note(id).unwrap().unwrap();
    assert_eq!(record.title, "Final");
    assert_eq!(record.priority, Priority::High);
    assert!(record.modified_at > 10);
}

#[test]
fn deleted_entry_is_not_written_back_on_exit() {
    let db = Database::open_in_memory().unwrap();
    let id = insert(&db, "Throwaway", true, 10);

    let mut session = EditorSession::open(&db, id).unwrap();
    session.editor_mut().set_title("edited before delete");
    let notice = session.delete().unwrap();
    assert_eq!(notice.message, "Todo deleted");
    assert_eq!(session.close().unwrap(), None);

    assert!(db.get_note(id).unwrap().is_none());
    let mut list = ListController::new();
    list.refresh(&db).unwrap();
    assert!(list.records().is_empty());
}

#[test]
fn deleting_a_category_uncategorizes_its_notes() {
    let db = Database::open_in_memory().unwrap();
    let work = db.insert_category("Work").unwrap();
    let mut list = ListController::new();
    let id = list.create_entry(&db, EntryKind::Note, Some(work)).unwrap();

    assert_eq!(db.count_notes_in_category(work).unwrap(), 1);
    db.delete_category(work).unwrap();

    assert_eq!(db.get_note(id).unwrap().unwrap().category_id, None);
    let rows = list.present_rows(&db);
    assert!(rows[0].preview.starts_with("Unknown category"));
}

#[test]
fn copied_link_pastes_as_a_duplicate_note() {
    let db = Database::open_in_memory().unwrap();
    let original = insert(&db, "Packing list", false, 10);
    let mut list = ListController::new();
    list.refresh(&db).unwrap();

    let ListEffect::CopyToClipboard(link) = list.context_action(&db, 0, ContextAction::Copy).unwrap() else {
        panic!("copy should hand a link to the clipboard");
    };
    let effect = list.apply(&db, MenuCommand::Paste(link)).unwrap();
    let ListEffect::Navigate(Navigation::NoteEditor(copy)) = effect else {
        panic!("paste should open the new note, got {:?}", effect);
    };

    assert_ne!(copy, original);
    assert_eq!(db.get_note(copy).unwrap().unwrap().title, "Packing list");
    assert_eq!(list.records().len(), 2);

    let effect = list.apply(&db, MenuCommand::Paste("passport\ncharger".to_string())).unwrap();
    let ListEffect::Navigate(Navigation::NoteEditor(pasted)) = effect else {
        panic!("paste should open the new note, got {:?}", effect);
    };
    let record = db.get_note(pasted).unwrap().unwrap();
    assert_eq!(record.title, "passport");
    assert_eq!(record.body, "passport\ncharger");
}
