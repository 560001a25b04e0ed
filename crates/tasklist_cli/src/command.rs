//! Line command parsing for the interactive shell.

/// One parsed shell line. Row numbers are 1-based as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Done(usize),
    Undo(usize),
    Toggle(usize),
    Delete(usize),
    Clear,
    List,
    Help,
    Quit,
}

pub const HELP: &str = "commands:
  add <text>     add a task
  done <n>       mark row n completed
  undo <n>       mark row n open
  toggle <n>     flip row n
  rm <n>         delete row n
  clear          delete all tasks (asks first)
  list           show tasks
  help           show this help
  quit           exit";

/// Parses one input line; `Err` carries a message for the user.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "add" | "a" => Ok(Command::Add(rest.to_string())),
        "done" | "check" => parse_row(rest).map(Command::Done),
        "undo" | "uncheck" => parse_row(rest).map(Command::Undo),
        "toggle" | "t" => parse_row(rest).map(Command::Toggle),
        "rm" | "delete" | "del" => parse_row(rest).map(Command::Delete),
        "clear" => Ok(Command::Clear),
        "list" | "ls" | "" => Ok(Command::List),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command `{other}`; type `help`")),
    }
}

fn parse_row(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(format!("expected a row number, got `{raw}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_command, Command};

    #[test]
    fn add_keeps_rest_of_line_verbatim() {
        assert_eq!(
            parse_command("add  Buy  milk ").unwrap(),
            Command::Add("Buy  milk".to_string())
        );
        assert_eq!(parse_command("add").unwrap(), Command::Add(String::new()));
    }

    #[test]
    fn row_commands_require_positive_numbers() {
        assert_eq!(parse_command("done 2").unwrap(), Command::Done(2));
        assert_eq!(parse_command("RM 1").unwrap(), Command::Delete(1));
        assert!(parse_command("done 0").is_err());
        assert!(parse_command("toggle x").is_err());
    }

    #[test]
    fn blank_line_lists_and_unknown_verbs_fail() {
        assert_eq!(parse_command("   ").unwrap(), Command::List);
        assert!(parse_command("frobnicate").is_err());
    }
}
