//! Line-oriented operator interaction: reading input, recognising `exit`, and y/n confirmation
//! loops shared by the startup wizard and the command dispatcher.

use crate::types::ClientError;

pub use terminal::Terminal;

#[cfg(test)]
pub(crate) mod scripted;
mod terminal;

const EXIT_KEYWORD: &str = "exit";
pub(crate) const WRONG_INPUT: &str = "->Wrong input! Please try again.";

/// Where prompts go and where answers come from.
pub trait Console {
    /// Shows `prompt` and blocks until one line is available.
    fn read_line(&mut self, prompt: &str) -> Result<String, ClientError>;

    fn write_line(&mut self, line: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Affirmative,
    Negative,
    Unrecognized,
}

impl Confirmation {
    pub fn classify(line: &str) -> Self {
        if line.eq_ignore_ascii_case("y") || line.eq_ignore_ascii_case("yes") {
            Confirmation::Affirmative
        } else if line.eq_ignore_ascii_case("n") || line.eq_ignore_ascii_case("no") {
            Confirmation::Negative
        } else {
            Confirmation::Unrecognized
        }
    }
}

pub fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case(EXIT_KEYWORD)
}

/// Reads one line with its terminator stripped. `exit` surfaces as [`ClientError::Exit`].
pub fn read_input<C: Console>(console: &mut C, prompt: &str) -> Result<String, ClientError> {
    let line = console.read_line(prompt)?;
    let line = line.strip_suffix('\n').unwrap_or(&line);
    let line = line.strip_suffix('\r').unwrap_or(line);

    if is_exit(line) {
        return Err(ClientError::Exit);
    }
    Ok(line.to_string())
}

/// Asks `question` until the answer is a definite yes or no.
pub fn ask_yes_no<C: Console>(console: &mut C, question: &str) -> Result<bool, ClientError> {
    loop {
        let answer = read_input(console, question)?;
        match Confirmation::classify(&answer) {
            Confirmation::Affirmative => return Ok(true),
            Confirmation::Negative => return Ok(false),
            Confirmation::Unrecognized => console.write_line(WRONG_INPUT),
        }
    }
}

/// Collects a value and asks for confirmation of it. A rejected value is dropped and collection
/// starts over from scratch.
pub fn prompt_until_confirmed<C, T, F, P>(
    console: &mut C,
    mut collect: F,
    confirm_prompt: P,
    rejected_notice: Option<&str>,
) -> Result<T, ClientError>
where
    C: Console,
    F: FnMut(&mut C) -> Result<T, ClientError>,
    P: Fn(&T) -> String,
{
    loop {
        let value = collect(console)?;
        if ask_yes_no(console, &confirm_prompt(&value))? {
            return Ok(value);
        }
        if let Some(notice) = rejected_notice {
            console.write_line(notice);
        }
    }
}

/// Asks for a name and has the operator confirm it, e.g. the username or the channel. Names
/// failing `is_valid` are refused before the confirmation question.
pub fn confirmed_name<C, V>(console: &mut C, what: &str, is_valid: V) -> Result<String, ClientError>
where
    C: Console,
    V: Fn(&str) -> bool,
{
    prompt_until_confirmed(
        console,
        |console| loop {
            let name = read_input(console, &format!("-> Please enter your {what}: "))?;
            if is_valid(&name) {
                return Ok(name);
            }
            console.write_line(WRONG_INPUT);
        },
        |name| format!("-> Please confirm your {what} is {name}, [y/n]: "),
        None,
    )
}
