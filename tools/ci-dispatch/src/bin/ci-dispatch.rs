use ci_dispatch::collaborator::ProcessCollaborator;
use ci_dispatch::config::DispatcherConfig;
use ci_dispatch::dispatcher::execute_dispatch;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser)]
#[command(version, about, long_about = None)]
struct AppArgs {
    /// Collaborator configuration, written in RON. Defaults to the docker + gRPC setup.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Should the effective configuration be printed instead of dispatching?
    #[arg(long, default_value = "false")]
    print_config: bool,

    /// Mode flags (`-u`, `-p`, `-O`) and test identifiers, in any order.
    ///
    /// Everything from the first token on is taken verbatim, so options must come before it.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

fn main() -> miette::Result<()> {
    // Stdout carries the report, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .init();

    let args = AppArgs::parse();
    let config = match &args.config {
        Some(path) => DispatcherConfig::from_file(path)?,
        None => DispatcherConfig::default(),
    };
    if args.print_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    let summary = execute_dispatch(
        &args.tokens,
        &config,
        ProcessCollaborator,
        std::io::stdout().lock(),
    )?;
    tracing::info!(
        dispatched = summary.dispatched,
        failed = summary.failed,
        uploaded = ?summary.uploaded,
        "dispatch finished"
    );
    Ok(())
}
