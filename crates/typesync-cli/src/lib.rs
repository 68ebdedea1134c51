mod audit;
mod cli;
mod config;
mod literals;
mod report;
mod sync;
mod write;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TYPESYNC_LOG";

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    init_tracing();

    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Audit(args) => audit::run(args),
        cli::Command::Literals(args) => literals::run(args),
        cli::Command::Sync(args) => sync::run(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second call (tests running `run` repeatedly) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
