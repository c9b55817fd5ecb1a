use clap::Parser;
use scholariq_ai::config::ScholariqConfig;
use scholariq_core::error::AppError;

mod cli;
mod commands;

fn main() {
    if let Err(error) = run() {
        eprintln!("scholariq error: {error:#}");
        if let Some(app) = error.downcast_ref::<AppError>() {
            for v in &app.violations {
                eprintln!("  - {}: {} ({})", v.field, v.message, v.code);
            }
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = ScholariqConfig::load_with_dotenv(cli.config.as_deref())?;

    match &cli.command {
        cli::Commands::Write(args) => commands::write(args, &config),
        cli::Commands::Outline(args) => commands::outline(args, &config),
        cli::Commands::Score(args) => commands::score(args, &config),
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SCHOLARIQ_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
