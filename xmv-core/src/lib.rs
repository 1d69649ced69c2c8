// xmv-core/src/lib.rs

// declare modules
pub mod commands;
pub mod error;
pub mod evaluate;
pub mod execute;
pub mod select;
pub mod shell;
pub mod store;

#[cfg(test)]
mod testing;

// re-export key structs/functions for external use by the cli crate
pub use anyhow::{Context, Result}; // re-export for convenience
pub use clap::Parser; // re-export Parser for CLI crate
pub use console::style; // re-export for the CLI crate's error printing
pub use indicatif::{ProgressBar, ProgressStyle};
pub use std::time::Duration;

use std::path::PathBuf;
use std::sync::Arc;

pub use crate::commands::{CommandTemplates, DEFAULT_TOOL};
pub use crate::error::{exit_code_for, XmvError};
pub use crate::evaluate::{evaluate_all, EvaluationResult};
pub use crate::execute::{run_chosen, RunOutcome};
pub use crate::select::{choose, parse_choice, Choice, Prompter, Selection, TerminalPrompter};
pub use crate::shell::{CommandOutput, CommandRunner, ShellRunner, DEFAULT_SHELL};
pub use crate::store::{default_store_path, PatternPair, PatternStore};

// argument parsing struct, shared by the cli crate
#[derive(Parser, Debug, Clone)]
#[command(name = "xmv")]
#[command(about = "dry-run stored rename patterns and run the one you pick", long_about = None)]
pub struct CoreCliArgs {
    /// pattern pair to add to the store before evaluating; ignored unless exactly two are given.
    /// put `--` before them when a pattern starts with `-`
    #[arg(value_name = "OLD_PATTERN NEW_PATTERN", num_args = 0..)]
    pub patterns: Vec<String>,

    /// pattern store file (defaults to ~/.config/xmv)
    #[arg(short, long, env = "XMV_CONFIG")]
    pub config: Option<PathBuf>,

    /// seconds each rename tool invocation may run before it is killed
    #[arg(short, long, default_value = "10")]
    pub timeout: u64,

    /// shell used to run the rename tool, started interactively so its aliases load
    #[arg(long, env = "XMV_SHELL", default_value = DEFAULT_SHELL)]
    pub shell: String,

    /// rename tool invoked with `-n` for previews
    #[arg(long, default_value = DEFAULT_TOOL)]
    pub tool: String,

    /// show debug output, including why patterns did not apply
    #[arg(short, long)]
    pub verbose: bool,
}

impl CoreCliArgs {
    /// the pair to add when exactly two positionals were given
    pub fn new_pattern(&self) -> Option<PatternPair> {
        match self.patterns.as_slice() {
            [old, new] => Some(PatternPair::new(old.as_str(), new.as_str())),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// how a run that did not fail ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// no stored pattern applies to the current directory
    NothingToDo,
    /// quit at the menu
    Cancelled,
    /// declined at the confirmation prompt
    Aborted,
    Renamed,
}

/// load the store, evaluate every pattern, let the user pick one and run it
pub async fn execute_xmv_flow(args: CoreCliArgs, prompter: &dyn Prompter) -> Result<FlowOutcome> {
    let store_path = match &args.config {
        Some(path) => path.clone(),
        None => default_store_path()?,
    };
    let mut store = PatternStore::load(&store_path)?;

    if let Some(pair) = args.new_pattern() {
        if let Some(previous) = store.insert(pair.old.as_str(), pair.new.as_str()) {
            println!(
                "{}",
                style(format!("replacing [{} -> {}]", pair.old, previous)).dim()
            );
        }
        store.save()?;
        println!(
            "{}",
            style(format!("saved [{} -> {}] to {}", pair.old, pair.new, store.path().display())).dim()
        );
    }

    // a missing shell must be reported before any dry run is attempted
    let runner: Arc<dyn CommandRunner> = Arc::new(ShellRunner::locate(&args.shell)?);

    run_with(runner, &store, &args, prompter).await
}

/// the evaluate, choose and execute steps against an injected runner
pub async fn run_with(
    runner: Arc<dyn CommandRunner>,
    store: &PatternStore,
    args: &CoreCliArgs,
    prompter: &dyn Prompter,
) -> Result<FlowOutcome> {
    let templates = CommandTemplates::new(args.tool.as_str());
    let limit = args.timeout();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("trying {} patterns...", store.len()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let evaluated = evaluate_all(Arc::clone(&runner), store, &templates, limit).await;
    spinner.finish_and_clear();
    let results = evaluated?;

    if results.is_empty() {
        println!(
            "{}",
            style("no stored pattern applies to this directory").yellow()
        );
        return Ok(FlowOutcome::NothingToDo);
    }

    let chosen = match choose(results, prompter)? {
        Selection::Chosen(chosen) => chosen,
        Selection::Cancelled => return Ok(FlowOutcome::Cancelled),
    };

    let outcome = run_chosen(&chosen, runner.as_ref(), &templates, limit, prompter).await?;
    Ok(match outcome {
        RunOutcome::Renamed => FlowOutcome::Renamed,
        RunOutcome::Aborted => FlowOutcome::Aborted,
    })
}
