//! Interactive terminal front end for the task list.
//!
//! # Responsibility
//! - Resolve configuration, start logging, open the durable store.
//! - Translate typed commands into the same interactions the widget has.

mod command;

use command::{parse_command, Command, HELP};
use log::info;
use std::io::{self, Write};
use std::process::ExitCode;
use tasklist_core::db::open_db;
use tasklist_core::{
    init_logging, CoreConfig, SqliteSlotRepository, StoreError, TaskStore, TextSurface,
    ViewEvent, ViewSync,
};

type ShellView<'conn> = ViewSync<SqliteSlotRepository<'conn>, TextSurface>;

fn main() -> ExitCode {
    let config = CoreConfig::from_env();
    if let Err(err) = init_logging(&config.log_level, &config.log_dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("error: cannot open `{}`: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };
    let store = match TaskStore::load(SqliteSlotRepository::new(&conn)) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: cannot load tasks: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut view = ViewSync::new(store, TextSurface::new(ask_yes_no));
    view.mount_all();
    info!(
        "event=cli_start module=cli status=ok total={}",
        view.store().tasks().len()
    );
    println!("{}", view.surface().render());

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let Some(line) = read_line() else {
            return ExitCode::SUCCESS;
        };
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Quit => return ExitCode::SUCCESS,
            Command::Help => println!("{HELP}"),
            Command::List => println!("{}", view.surface().render()),
            other => match apply(&mut view, other) {
                Ok(()) => println!("{}", view.surface().render()),
                Err(message) => println!("{message}"),
            },
        }
    }
}

fn apply(view: &mut ShellView<'_>, command: Command) -> Result<(), String> {
    let event = match command {
        Command::Add(text) => {
            view.surface_mut().set_input(text.clone());
            ViewEvent::Submit { input: text }
        }
        Command::Done(row) => checkbox(view, row, |_| true)?,
        Command::Undo(row) => checkbox(view, row, |_| false)?,
        Command::Toggle(row) => checkbox(view, row, |completed| !completed)?,
        Command::Delete(row) => ViewEvent::DeleteClicked {
            id: row_task(view, row)?.0,
        },
        Command::Clear => ViewEvent::ClearAllClicked,
        Command::List | Command::Help | Command::Quit => return Ok(()),
    };

    view.handle(event)
        .map(|_| ())
        .map_err(|err: StoreError| format!("error: {err}"))
}

fn checkbox(
    view: &ShellView<'_>,
    row: usize,
    next: impl FnOnce(bool) -> bool,
) -> Result<ViewEvent, String> {
    let (id, completed) = row_task(view, row)?;
    Ok(ViewEvent::CheckboxChanged {
        id,
        checked: next(completed),
    })
}

fn row_task(view: &ShellView<'_>, row: usize) -> Result<(i64, bool), String> {
    view.store()
        .tasks()
        .get(row - 1)
        .map(|task| (task.id, task.completed))
        .ok_or_else(|| format!("no task at row {row}"))
}

fn read_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}

fn ask_yes_no(message: &str) -> bool {
    print!("{message} [y/N] ");
    let _ = io::stdout().flush();
    read_line()
        .map(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
        .unwrap_or(false)
}
