//! Interactive console editor
//!
//! Shows one record at a time and reads single-line commands:
//! `n` next, `p` previous, `g N` go to, `/TERM` search, `m` modify,
//! `o PATH` open, `?` help, `q` quit.

use std::path::PathBuf;

use dialoguer::Input;
use record_confirm_common::{Config, RecordForm, Session};
use tracing::warn;

use crate::error::{AppError, Result};
use crate::render::render_form;

const HELP: &str =
    "[n]ext [p]revious [g N] go to [/TERM] search [m]odify [o PATH] open [?] help [q]uit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Next,
    Previous,
    Goto(usize),
    Search(String),
    Modify,
    Open(PathBuf),
    Show,
    Help,
    Quit,
    Unknown(String),
}

/// What the console prints after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Form(RecordForm),
    Notice(String),
    Quit,
}

pub fn parse_command(input: &str) -> ConsoleCommand {
    let trimmed = input.trim();
    if let Some(term) = trimmed.strip_prefix('/') {
        return ConsoleCommand::Search(term.to_string());
    }
    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };

    match (head, rest) {
        ("" | "s", "") => ConsoleCommand::Show,
        ("n", "") => ConsoleCommand::Next,
        ("p", "") => ConsoleCommand::Previous,
        ("m", "") => ConsoleCommand::Modify,
        ("?" | "h", "") => ConsoleCommand::Help,
        ("q" | "Q", "") => ConsoleCommand::Quit,
        ("g", n) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => ConsoleCommand::Goto(n - 1),
            _ => ConsoleCommand::Unknown(trimmed.to_string()),
        },
        ("o", path) if !path.is_empty() => ConsoleCommand::Open(PathBuf::from(path)),
        _ => ConsoleCommand::Unknown(trimmed.to_string()),
    }
}

/// Run every command except `Modify`, which needs prompts.
pub fn execute(session: &mut Session, command: ConsoleCommand) -> Reply {
    match command {
        ConsoleCommand::Next => session
            .show_next()
            .map(Reply::Form)
            .unwrap_or_else(|| Reply::Notice("Already at the last record.".to_string())),
        ConsoleCommand::Previous => session
            .show_previous()
            .map(Reply::Form)
            .unwrap_or_else(|| Reply::Notice("Already at the first record.".to_string())),
        ConsoleCommand::Goto(index) => match session.display(index) {
            Ok(form) => Reply::Form(form),
            Err(err) => Reply::Notice(err.to_string()),
        },
        ConsoleCommand::Search(term) => match session.search(&term) {
            Ok(form) => Reply::Form(form),
            Err(err) if err.is_not_found() => Reply::Notice("Record not found.".to_string()),
            Err(err) => Reply::Notice(err.to_string()),
        },
        ConsoleCommand::Open(path) => match session.open(&path) {
            Ok(Some(form)) => Reply::Form(form),
            Ok(None) => Reply::Notice(format!("{} has no records.", path.display())),
            Err(err) => Reply::Notice(format!("Error: {err}")),
        },
        ConsoleCommand::Show => session
            .current_form()
            .map(Reply::Form)
            .unwrap_or_else(|| Reply::Notice("No record displayed.".to_string())),
        ConsoleCommand::Help | ConsoleCommand::Modify => Reply::Notice(HELP.to_string()),
        ConsoleCommand::Quit => Reply::Quit,
        ConsoleCommand::Unknown(input) => Reply::Notice(format!("Unknown command: {input}. {HELP}")),
    }
}

pub fn run_console(session: &mut Session, config: &Config) -> Result<()> {
    println!("{HELP}\n");
    if let Some(form) = session.current_form() {
        print_form(session, config, &form);
    }

    loop {
        report_saves(session);
        let input = prompt_line("command", "")?;
        let command = parse_command(&input);

        let reply = if command == ConsoleCommand::Modify {
            prompt_modify(session)?
        } else {
            execute(session, command)
        };

        match reply {
            Reply::Form(form) => print_form(session, config, &form),
            Reply::Notice(message) => println!("{message}\n"),
            Reply::Quit => break,
        }
    }

    println!("Saving...");
    session.flush();
    report_saves(session);
    Ok(())
}

fn prompt_modify(session: &mut Session) -> Result<Reply> {
    let Some(form) = session.current_form() else {
        return Ok(Reply::Notice("No record displayed.".to_string()));
    };
    let mut identifier = form.confirmed_identifier.clone();
    let mut results = form.confirmed_results.clone();

    // Re-prompt with the text as typed until it validates.
    loop {
        identifier = prompt_line("Confirmed identifier", &identifier)?;
        results = prompt_line("Confirmed results", &results)?;
        match session.modify(&identifier, &results) {
            Ok(Some(form)) => return Ok(Reply::Form(form)),
            Ok(None) => return Ok(Reply::Notice("No record displayed.".to_string())),
            Err(err) if err.is_validation() => println!("Error: {err}"),
            Err(err) => return Ok(Reply::Notice(format!("Error: {err}"))),
        }
    }
}

fn prompt_line(prompt: &str, initial: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| AppError::Prompt(e.to_string()))
}

fn print_form(session: &Session, config: &Config, form: &RecordForm) {
    println!("{}\n", render_form(form, session.base_dir(), config.max_image_edge));
}

fn report_saves(session: &Session) {
    for outcome in session.poll_saves() {
        match outcome.result {
            Ok(()) => println!("Saved {}", outcome.path.display()),
            Err(err) => {
                warn!(path = %outcome.path.display(), "save not written");
                println!("Save failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_confirm_common::store::{write_document, DEFAULT_INDENT};
    use record_confirm_common::Record;
    use tempfile::tempdir;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("n"), ConsoleCommand::Next);
        assert_eq!(parse_command(" p "), ConsoleCommand::Previous);
        assert_eq!(parse_command(""), ConsoleCommand::Show);
        assert_eq!(parse_command("g 3"), ConsoleCommand::Goto(2));
        assert_eq!(parse_command("/A1 B"), ConsoleCommand::Search("A1 B".to_string()));
        assert_eq!(parse_command("o /tmp/x.json"), ConsoleCommand::Open(PathBuf::from("/tmp/x.json")));
        assert_eq!(parse_command("m"), ConsoleCommand::Modify);
        assert_eq!(parse_command("q"), ConsoleCommand::Quit);
        assert_eq!(parse_command("g 0"), ConsoleCommand::Unknown("g 0".to_string()));
        assert_eq!(parse_command("o"), ConsoleCommand::Unknown("o".to_string()));
        assert_eq!(parse_command("x"), ConsoleCommand::Unknown("x".to_string()));
    }

    #[test]
    fn test_execute_navigation() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("records.json");
        write_document(
            &path,
            &[Record::new("A1", vec![1]), Record::new("B2", vec![2])],
            DEFAULT_INDENT,
        )
        .unwrap();
        let mut session = Session::new(DEFAULT_INDENT).unwrap();
        session.open(&path).unwrap();

        assert!(matches!(execute(&mut session, ConsoleCommand::Previous), Reply::Notice(_)));
        match execute(&mut session, ConsoleCommand::Next) {
            Reply::Form(form) => assert_eq!(form.identifier, "B2"),
            other => panic!("unexpected reply: {other:?}"),
        }
        assert_eq!(
            execute(&mut session, ConsoleCommand::Search("nope".to_string())),
            Reply::Notice("Record not found.".to_string())
        );
        assert_eq!(session.current_index(), Some(1));
        assert!(matches!(execute(&mut session, ConsoleCommand::Goto(5)), Reply::Notice(_)));
        assert_eq!(execute(&mut session, ConsoleCommand::Quit), Reply::Quit);
    }

    #[test]
    fn test_execute_open_bad_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{").unwrap();
        let mut session = Session::new(DEFAULT_INDENT).unwrap();

        match execute(&mut session, ConsoleCommand::Open(bad)) {
            Reply::Notice(message) => assert!(message.starts_with("Error: Invalid JSON file")),
            other => panic!("unexpected reply: {other:?}"),
        }
    }
}
