use crate::formatter::Formatter;
use anyhow::{Context, Result};
use bayan::Engine;
use inquire::error::InquireError;
use inquire::{Confirm, Text};

/// One line of REPL input
#[derive(Debug, PartialEq)]
enum Command<'a> {
    Quit,
    Help,
    List,
    Keywords,
    /// Statements to load into the session, such as `fact item(4);`
    Add(&'a str),
    Query(&'a str),
    Empty,
}

fn parse_command(input: &str) -> Command<'_> {
    let input = input.trim();
    match input {
        "" => Command::Empty,
        ":q" | ":quit" | ":exit" => Command::Quit,
        ":h" | ":help" => Command::Help,
        ":list" => Command::List,
        ":keywords" => Command::Keywords,
        _ => match input.strip_prefix(":add") {
            Some(code) => Command::Add(code.trim()),
            None => Command::Query(input.trim_end_matches(';').trim_end()),
        },
    }
}

const HELP: &str = "\
Enter goals to prove, e.g. parent(?X, \"Ali\")
  :add <statements>  load facts or rules, e.g. :add fact parent(\"Ali\", \"Zain\");
  :list              list predicates
  :keywords          show the keyword table
  :quit              leave";

/// Read queries until the user quits, printing solutions one at a time
pub fn run_repl(engine: &mut Engine) -> Result<()> {
    let formatter = Formatter::default();
    println!("Bayan REPL. Type :help for commands.");
    let mut added = 0usize;

    loop {
        let line = match Text::new("?-").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read query"),
        };

        match parse_command(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::List => print!(
                "{}",
                formatter.format_workspace_summary(engine.sources().len(), &engine.summary())
            ),
            Command::Keywords => print!("{}", formatter.format_keywords()),
            Command::Add(code) => {
                added += 1;
                match engine.load(code, &format!("repl_{}", added)) {
                    Ok(response) => print!("{}", formatter.format_response(&response)),
                    Err(e) => eprintln!("{}", crate::error_formatter::format_error(&e)),
                }
            }
            Command::Query(text) => {
                if let Err(e) = answer(engine, text) {
                    eprintln!("{}", e);
                }
            }
        }
    }

    Ok(())
}

/// Backtrack into the query for as long as the user asks for more
fn answer(engine: &Engine, text: &str) -> Result<()> {
    let mut solutions = match engine.run_query(text) {
        Ok(solutions) => solutions,
        Err(e) => {
            eprintln!("{}", crate::error_formatter::format_error(&e));
            return Ok(());
        }
    };

    loop {
        let Some(solution) = solutions.next() else {
            match solutions.error() {
                Some(e) => println!("stopped: {}", e),
                None => println!("false"),
            }
            return Ok(());
        };
        println!("{}", solution);

        let more = Confirm::new("More?")
            .with_default(false)
            .prompt()
            .context("Failed to read answer")?;
        if !more {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("  "), Command::Empty);
        assert_eq!(parse_command(":quit"), Command::Quit);
        assert_eq!(parse_command(":list"), Command::List);
        assert_eq!(
            parse_command(":add fact item(1);"),
            Command::Add("fact item(1);")
        );
        assert_eq!(
            parse_command("parent(?X, \"Ali\");"),
            Command::Query("parent(?X, \"Ali\")")
        );
        assert_eq!(parse_command("استعلام والد(?س، ?ص)"), Command::Query("استعلام والد(?س، ?ص)"));
    }
}
