// scripted stand-ins for the shell and the terminal

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::XmvError;
use crate::select::Prompter;
use crate::shell::{CommandOutput, CommandRunner};

/// answers each command line from a table; unknown lines exit 1
#[derive(Default)]
pub struct ScriptedRunner {
    outputs: HashMap<String, CommandOutput>,
    fail_to_spawn: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeeds(mut self, command: &str, stdout: &str) -> Self {
        self.outputs.insert(
            command.to_string(),
            CommandOutput {
                stdout: stdout.to_string(),
                exit_code: Some(0),
                ..CommandOutput::default()
            },
        );
        self
    }

    pub fn exits(mut self, command: &str, code: i32, stderr: &str) -> Self {
        self.outputs.insert(
            command.to_string(),
            CommandOutput {
                stderr: stderr.to_string(),
                exit_code: Some(code),
                ..CommandOutput::default()
            },
        );
        self
    }

    pub fn times_out(mut self, command: &str) -> Self {
        self.outputs
            .insert(command.to_string(), CommandOutput::timed_out());
        self
    }

    pub fn cannot_spawn(mut self, command: &str) -> Self {
        self.fail_to_spawn.push(command.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn execute(&self, command: &str, _limit: Duration) -> Result<CommandOutput, XmvError> {
        self.calls.lock().unwrap().push(command.to_string());

        if self.fail_to_spawn.iter().any(|c| c == command) {
            return Err(XmvError::Spawn {
                command: command.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }

        Ok(self.outputs.get(command).cloned().unwrap_or(CommandOutput {
            exit_code: Some(1),
            ..CommandOutput::default()
        }))
    }
}

/// replays canned answers and records the prompts it was shown
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, prompt: &str) -> Result<String, XmvError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        // running out of answers behaves like end of input
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or_default())
    }
}
