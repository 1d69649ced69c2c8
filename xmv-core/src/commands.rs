// command templates - turn a pattern pair into the shell line for the rename tool

use crate::store::PatternPair;

pub const DEFAULT_TOOL: &str = "zmv";

/// builds the dry-run and live invocations of the rename tool
#[derive(Debug, Clone)]
pub struct CommandTemplates {
    pub tool: String,
}

impl Default for CommandTemplates {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL)
    }
}

impl CommandTemplates {
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    /// preview form: prints the intended renames, touches nothing
    pub fn dry_run(&self, pair: &PatternPair) -> String {
        format!(
            "{} -n {} {}",
            self.tool,
            shell_quote(&pair.old),
            shell_quote(&pair.new)
        )
    }

    pub fn live(&self, pair: &PatternPair) -> String {
        format!(
            "{} {} {}",
            self.tool,
            shell_quote(&pair.old),
            shell_quote(&pair.new)
        )
    }
}

/// single-quote `text` for a posix-style shell
pub fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}
