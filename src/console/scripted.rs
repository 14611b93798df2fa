use std::collections::VecDeque;

use crate::console::Console;
use crate::types::ClientError;

/// Replays canned operator answers and records everything shown. Running out of answers behaves
/// like end of input.
pub(crate) struct ScriptedConsole {
    input: VecDeque<String>,
    prompts: Vec<String>,
    output: Vec<String>,
}

impl ScriptedConsole {
    pub(crate) fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            output: Vec::new(),
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.input.len()
    }

    pub(crate) fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub(crate) fn output(&self) -> &[String] {
        &self.output
    }

    pub(crate) fn count_output(&self, line: &str) -> usize {
        self.output.iter().filter(|written| written.as_str() == line).count()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String, ClientError> {
        self.prompts.push(prompt.to_string());
        self.input.pop_front().ok_or(ClientError::Exit)
    }

    fn write_line(&mut self, line: &str) {
        self.output.push(line.to_string());
    }
}
