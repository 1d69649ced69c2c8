use clap::Parser;
use tracing_subscriber::EnvFilter;
use xmv_core::{execute_xmv_flow, exit_code_for, style, CoreCliArgs, TerminalPrompter};

#[tokio::main]
async fn main() {
    let cli_args = CoreCliArgs::parse();
    init_logging(cli_args.verbose);

    let prompter = TerminalPrompter::default();
    if let Err(e) = execute_xmv_flow(cli_args, &prompter).await {
        eprintln!("{} {:#}", style("error:").red().bold(), style(&e).red());
        std::process::exit(exit_code_for(&e));
    }
}

/// diagnostics go to stderr; quiet unless --verbose or RUST_LOG asks otherwise
fn init_logging(verbose: bool) {
    let default = if verbose { "xmv_core=debug,xmv=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
