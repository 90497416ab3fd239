use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wh_cli::commands::util::now_local;
use wh_cli::commands::{
    Accounting, Mutation, create, delete, list, start, stop, summary, today, update,
};
use wh_cli::{Cli, Commands, Config, calendar};

/// Load config and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(name) = &cli.calendar {
        config.calendar.clone_from(name);
    }
    if let Some(path) = &cli.events_file {
        config.events_file = Some(path.clone());
    }
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = load_config(&cli)?;
    let accounting = Accounting::from_config(&config)?;
    let mut calendar = calendar::open(&config)?;

    let (date, now) = now_local();
    let mutation = Mutation {
        force: cli.force,
        today: date,
        now,
    };
    let color = config.color && !cli.no_color;
    let mut stdout = std::io::stdout().lock();

    match command {
        Commands::Create(args) => create::run(&mut stdout, calendar.as_mut(), args, mutation)?,
        Commands::Start(args) => start::run(&mut stdout, calendar.as_mut(), args, mutation)?,
        Commands::Stop(args) => stop::run(&mut stdout, calendar.as_mut(), args, mutation)?,
        Commands::Update(args) => update::run(&mut stdout, calendar.as_mut(), args, mutation)?,
        Commands::Delete(args) => delete::run(&mut stdout, calendar.as_mut(), args, mutation)?,
        Commands::List(args) => list::run(&mut stdout, calendar.as_ref(), args, date)?,
        Commands::Summary(args) => {
            summary::run(&mut stdout, calendar.as_ref(), &accounting, args, date, color)?;
        }
        Commands::Today => today::run(&mut stdout, calendar.as_ref(), &accounting, date)?,
    }

    if command.is_mutation() {
        writeln!(stdout)?;
        today::run(&mut stdout, calendar.as_ref(), &accounting, date)?;
    }

    Ok(())
}
