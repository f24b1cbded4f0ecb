use clap::Parser;
use tracing_subscriber::EnvFilter;

use opush::cli::Cli;
use opush::config::Config;
use opush::pusher::Pusher;
use opush::task_list::TaskList;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::new(cli.locals, cli.remotes);
    let task_list = TaskList::build(&config)?;
    if task_list.is_empty() {
        tracing::warn!("nothing to push");
        return Ok(());
    }
    Pusher::new(task_list).push(cli.concurrency, cli.json)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
