// selection - numbered menu of surviving patterns and a single-shot choice

use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::XmvError;
use crate::evaluate::EvaluationResult;

/// source of one line of user input per prompt
pub trait Prompter: Send + Sync {
    /// the answer without its line ending; end of input reads as empty
    fn input(&self, prompt: &str) -> Result<String, XmvError>;
}

/// how a prompt reads its answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptBackend {
    /// dialoguer, which draws on stderr and reads keys from the terminal
    Dialoguer,
    /// a prompt on stdout and one line from stdin
    Plain,
}

impl PromptBackend {
    /// dialoguer only works when both its output and our input are terminals
    pub fn for_streams(stdin_is_term: bool, stderr_is_term: bool) -> Self {
        if stdin_is_term && stderr_is_term {
            PromptBackend::Dialoguer
        } else {
            PromptBackend::Plain
        }
    }

    pub fn detect() -> Self {
        Self::for_streams(io::stdin().is_terminal(), console::user_attended_stderr())
    }
}

/// dialoguer prompts when someone is at the terminal, plain stdin otherwise
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn input(&self, prompt: &str) -> Result<String, XmvError> {
        match PromptBackend::detect() {
            PromptBackend::Dialoguer => Input::<String>::with_theme(&self.theme)
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error),
            PromptBackend::Plain => read_plain_line(prompt).map_err(XmvError::Prompt),
        }
    }
}

fn prompt_error(err: dialoguer::Error) -> XmvError {
    match err {
        dialoguer::Error::IO(io) => XmvError::Prompt(io),
    }
}

fn read_plain_line(prompt: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}: ")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// what the user typed at the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Quit,
    /// zero-based position in the menu
    Index(usize),
}

#[derive(Debug)]
pub enum Selection {
    Chosen(EvaluationResult),
    Cancelled,
}

/// interpret menu input against a menu of `count` entries
///
/// there is no retry: anything that is not a quit or a listed number is an error
pub fn parse_choice(input: &str, count: usize) -> Result<Choice, XmvError> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("q") {
        return Ok(Choice::Quit);
    }

    let number: i64 = input.parse().map_err(|_| XmvError::InvalidChoice {
        input: input.to_string(),
    })?;

    usize::try_from(number)
        .ok()
        .filter(|n| (1..=count).contains(n))
        .map(|n| Choice::Index(n - 1))
        .ok_or(XmvError::OutOfRange { max: count })
}

/// one styled line per result, numbered from 1
pub fn render_menu(results: &[EvaluationResult]) -> Vec<String> {
    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            format!(
                "{}. {} {}",
                style(index + 1).cyan().bold(),
                style(format!("[{} -> {}]", result.pattern.old, result.pattern.new)).yellow(),
                result.sample()
            )
        })
        .collect()
}

/// show the menu and read one choice
pub fn choose(
    mut results: Vec<EvaluationResult>,
    prompter: &dyn Prompter,
) -> Result<Selection, XmvError> {
    // stable order for this run only
    results.sort_by(|a, b| a.pattern.cmp(&b.pattern));

    for line in render_menu(&results) {
        println!("{line}");
    }
    println!("{}\n", style("q. quit").dim());

    let answer = prompter.input("choose option")?;
    match parse_choice(&answer, results.len())? {
        Choice::Quit => Ok(Selection::Cancelled),
        Choice::Index(index) => Ok(Selection::Chosen(results.swap_remove(index))),
    }
}
