use clap::Parser;
use color_eyre::Result;
use std::io;
use std::rc::Rc;

use notepad::cli::{self, Cli, Commands};
use notepad::{Config, Database, Profile, logging, utils};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev selects a separate config and database
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = Config::load(cli.config.as_deref(), profile)?;

    // Logs live next to the profile's data; fall back to the database directory
    let db_path = config.get_database_path();
    let data_dir = utils::get_data_dir(profile)
        .or_else(|| db_path.parent().map(|p| p.to_path_buf()))
        .unwrap_or_default();
    let _logger = match logging::init_logging(&config.log_level, &logging::log_dir(&data_dir)) {
        Ok(handle) => Some(handle),
        Err(e) => {
            // The terminal is still ours here; the TUI has not started yet
            eprintln!("warning: file logging disabled: {}", e);
            None
        }
    };

    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;
    db.ensure_default_category(&config.default_category)?;

    let mut out = io::stdout().lock();
    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            drop(out);
            let app = notepad::tui::App::new(config, Rc::new(db))?;
            notepad::tui::run_event_loop(app)?;
        }
        Commands::AddNote { title, body, category } => {
            cli::handle_add_note(title, body, category, &db, &mut out)?;
        }
        Commands::AddTodo {
            title,
            body,
            category,
            due,
            priority,
        } => {
            cli::handle_add_todo(title, body, category, due, priority, &db, &mut out)?;
        }
        Commands::List {
            search,
            category,
            filter,
            json,
        } => {
            cli::handle_list(search, category, &filter, json, &db, &mut out)?;
        }
        Commands::Complete { id, undo } => {
            cli::handle_complete(id, undo, &db, &mut out)?;
        }
        Commands::Delete { id } => {
            cli::handle_delete(id, &db, &mut out)?;
        }
        Commands::Category(command) => {
            cli::handle_category(command, &db, &mut out)?;
        }
    }

    Ok(())
}
