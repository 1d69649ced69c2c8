// error taxonomy - the fatal conditions that end a run with a specific status

use thiserror::Error;

/// failures that terminate the process; store i/o failures travel as plain
/// `anyhow` errors and always map to exit status 1
#[derive(Debug, Error)]
pub enum XmvError {
    #[error("shell '{shell}' not found on PATH")]
    ShellNotFound {
        shell: String,
        #[source]
        source: which::Error,
    },

    #[error("failed to run '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{input}' is not a number")]
    InvalidChoice { input: String },

    #[error("choose between 1 and {max}")]
    OutOfRange { max: usize },

    #[error("rename failed ({})", describe_exit(.code))]
    RunFailed { code: Option<i32> },

    #[error("failed to read input")]
    Prompt(#[source] std::io::Error),
}

impl XmvError {
    /// process exit status for this failure; a failing rename passes its own
    /// status through when it has a positive one
    pub fn exit_code(&self) -> i32 {
        match self {
            XmvError::RunFailed { code: Some(code) } if *code > 0 => *code,
            _ => 1,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "killed".to_string(),
    }
}

/// exit status for any error returned by the flow
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<XmvError>())
        .map_or(1, XmvError::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn run_failure_passes_exit_code_through() {
        assert_eq!(XmvError::RunFailed { code: Some(3) }.exit_code(), 3);
        assert_eq!(XmvError::RunFailed { code: Some(-1) }.exit_code(), 1);
        assert_eq!(XmvError::RunFailed { code: None }.exit_code(), 1);
        assert_eq!(XmvError::OutOfRange { max: 2 }.exit_code(), 1);
    }

    #[test]
    fn exit_code_is_found_behind_context() {
        let err = Err::<(), _>(XmvError::RunFailed { code: Some(2) })
            .context("running chosen pattern")
            .unwrap_err();
        assert_eq!(exit_code_for(&err), 2);

        let plain = anyhow::anyhow!("store is malformed");
        assert_eq!(exit_code_for(&plain), 1);
    }

    #[test]
    fn out_of_range_message_names_the_bound() {
        assert_eq!(XmvError::OutOfRange { max: 1 }.to_string(), "choose between 1 and 1");
    }
}
