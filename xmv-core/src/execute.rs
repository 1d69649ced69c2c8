// execution - confirm the chosen pattern and run it for real

use console::style;
use std::time::Duration;
use tracing::debug;

use crate::commands::CommandTemplates;
use crate::error::XmvError;
use crate::evaluate::EvaluationResult;
use crate::select::Prompter;
use crate::shell::CommandRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Renamed,
    /// anything but `y` at the confirmation prompt
    Aborted,
}

/// show the full preview, ask once, then run the live command
///
/// unlike a dry run, a failing live run is fatal
pub async fn run_chosen(
    chosen: &EvaluationResult,
    runner: &dyn CommandRunner,
    templates: &CommandTemplates,
    limit: Duration,
    prompter: &dyn Prompter,
) -> Result<RunOutcome, XmvError> {
    for line in &chosen.preview {
        println!("{line}");
    }

    let answer = prompter.input("proceed? y/n")?;
    if !answer.trim().eq_ignore_ascii_case("y") {
        return Ok(RunOutcome::Aborted);
    }

    let command = templates.live(&chosen.pattern);
    debug!(command = %command, "running chosen pattern");
    let output = runner.execute(&command, limit).await?;

    if !output.success() {
        if output.timed_out {
            eprintln!("{}", style(format!("rename timed out after {limit:?}")).yellow());
        }
        if !output.stderr.trim().is_empty() {
            eprintln!("{}", output.stderr.trim_end());
        }
        return Err(XmvError::RunFailed {
            code: output.exit_code,
        });
    }

    println!("{}", output.stdout);
    Ok(RunOutcome::Renamed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PatternPair;
    use crate::testing::{ScriptedPrompter, ScriptedRunner};

    fn chosen() -> EvaluationResult {
        EvaluationResult::new(PatternPair::new("*.txt", "#1.bak"), "a.txt -> a.bak\n")
    }

    const LIVE: &str = "zmv '*.txt' '#1.bak'";

    #[tokio::test]
    async fn confirmed_run_executes_live_command() {
        let runner = ScriptedRunner::new().succeeds(LIVE, "");
        let prompter = ScriptedPrompter::new(&["Y"]);

        let outcome = run_chosen(
            &chosen(),
            &runner,
            &CommandTemplates::default(),
            Duration::from_secs(1),
            &prompter,
        )
        .await
        .unwrap();

        assert_eq!(outcome, RunOutcome::Renamed);
        assert_eq!(runner.calls(), vec![LIVE]);
        assert_eq!(prompter.prompts(), vec!["proceed? y/n"]);
    }

    #[tokio::test]
    async fn anything_but_y_aborts_without_running() {
        for answer in ["", "n", "yes", "no"] {
            let runner = ScriptedRunner::new().succeeds(LIVE, "");
            let prompter = ScriptedPrompter::new(&[answer]);

            let outcome = run_chosen(
                &chosen(),
                &runner,
                &CommandTemplates::default(),
                Duration::from_secs(1),
                &prompter,
            )
            .await
            .unwrap();

            assert_eq!(outcome, RunOutcome::Aborted, "answer {answer:?}");
            assert!(runner.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn failing_run_carries_its_exit_code() {
        let runner = ScriptedRunner::new().exits(LIVE, 2, "zmv: error(s) in substitution");
        let prompter = ScriptedPrompter::new(&["y"]);

        let err = run_chosen(
            &chosen(),
            &runner,
            &CommandTemplates::default(),
            Duration::from_secs(1),
            &prompter,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, XmvError::RunFailed { code: Some(2) }));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn timed_out_run_is_a_failure() {
        let runner = ScriptedRunner::new().times_out(LIVE);
        let prompter = ScriptedPrompter::new(&["y"]);

        let err = run_chosen(
            &chosen(),
            &runner,
            &CommandTemplates::default(),
            Duration::from_secs(1),
            &prompter,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, XmvError::RunFailed { code: None }));
        assert_eq!(err.exit_code(), 1);
    }
}
