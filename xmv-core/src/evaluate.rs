// pattern evaluation - dry-run every stored pattern at once and keep the ones that apply

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::debug;

use crate::commands::CommandTemplates;
use crate::error::XmvError;
use crate::shell::CommandRunner;
use crate::store::{PatternPair, PatternStore};

/// a pattern whose dry run exited 0, with what it would do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    pub pattern: PatternPair,
    /// never empty; the first line is the menu sample
    pub preview: Vec<String>,
}

impl EvaluationResult {
    pub fn new(pattern: PatternPair, stdout: &str) -> Self {
        Self {
            pattern,
            preview: preview_lines(stdout),
        }
    }

    pub fn sample(&self) -> &str {
        self.preview.first().map_or("", String::as_str)
    }
}

/// split captured output into lines, keeping at least one
fn preview_lines(stdout: &str) -> Vec<String> {
    stdout
        .strip_suffix('\n')
        .unwrap_or(stdout)
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// dry-run every pattern in `store` concurrently, one task per pattern
///
/// returns once every task has finished; order of the results is unspecified
pub async fn evaluate_all(
    runner: Arc<dyn CommandRunner>,
    store: &PatternStore,
    templates: &CommandTemplates,
    limit: Duration,
) -> Result<Vec<EvaluationResult>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut tasks = JoinSet::new();

    for pattern in store.pairs() {
        let tx = tx.clone();
        let runner = Arc::clone(&runner);
        let command = templates.dry_run(&pattern);

        tasks.spawn(async move {
            let output = runner.execute(&command, limit).await?;

            if output.success() {
                // the receiver outlives every task, so this cannot fail
                let _ = tx.send(EvaluationResult::new(pattern, &output.stdout));
            } else {
                debug!(
                    old = %pattern.old,
                    new = %pattern.new,
                    exit_code = ?output.exit_code,
                    timed_out = output.timed_out,
                    stderr = %output.stderr.trim_end(),
                    "pattern does not apply"
                );
            }

            Ok::<_, XmvError>(())
        });
    }
    drop(tx);

    // join every task before treating the channel as complete
    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.context("dry-run task panicked")?;
        if let Err(err) = outcome {
            first_error.get_or_insert(err);
        }
    }
    if let Some(err) = first_error {
        return Err(err.into());
    }

    let mut results = Vec::with_capacity(store.len());
    while let Some(result) = rx.recv().await {
        results.push(result);
    }

    Ok(results)
}
