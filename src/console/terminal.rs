use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::console::Console;
use crate::types::ClientError;

/// Interactive terminal backed by a line editor with history.
pub struct Terminal {
    line: DefaultEditor,
}

impl Terminal {
    pub fn new() -> Result<Self, ClientError> {
        Ok(Self {
            line: DefaultEditor::new()?,
        })
    }
}

impl Console for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<String, ClientError> {
        match self.line.readline(prompt) {
            Ok(user_input) => {
                if !user_input.trim().is_empty() {
                    if let Err(error) = self.line.add_history_entry(user_input.as_str()) {
                        debug!("Could not record history entry: {}", error);
                    }
                }
                Ok(user_input)
            }
            // Ctrl-C and Ctrl-D leave the same way as typing exit
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Err(ClientError::Exit),
            Err(error) => Err(ClientError::Terminal(error)),
        }
    }

    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }
}
