//! Line commands typed at the prompt.

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Select(String),
    Email(String),
    Submit,
    /// `signup <activity> | <email>`: fill both fields, then submit.
    Signup { activity: String, email: String },
    /// 1-based row number as printed by `list`.
    Remove(usize),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  list                         redraw the page
  select <activity>            pick an activity in the signup form
  email <address>              fill in the email field
  submit                       submit the signup form
  signup <activity> | <email>  fill the form and submit it
  rm <row#>                    unregister the participant on that row
  help                         show this text
  quit                         exit";

pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" => Command::List,
        "select" => Command::Select(required(rest, "select <activity>")?.to_string()),
        "email" => Command::Email(rest.to_string()),
        "submit" => Command::Submit,
        "signup" => {
            let Some((activity, email)) = rest.split_once('|') else {
                bail!("usage: signup <activity> | <email>");
            };
            Command::Signup {
                activity: required(activity.trim(), "signup <activity> | <email>")?.to_string(),
                email: email.trim().to_string(),
            }
        }
        "rm" | "remove" | "unregister" => {
            let raw = required(rest, "rm <row#>")?.trim_start_matches('#');
            let row: usize = raw
                .parse()
                .with_context(|| format!("'{raw}' is not a row number"))?;
            if row == 0 {
                bail!("row numbers start at 1");
            }
            Command::Remove(row)
        }
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{other}'; type 'help'"),
    };
    Ok(Some(command))
}

fn required<'a>(value: &'a str, usage: &str) -> Result<&'a str> {
    if value.is_empty() {
        bail!("usage: {usage}");
    }
    Ok(value)
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
