//! Planbot - conversational planning assistant
//!
//! CLI entry point: interactive chat plus one-shot onboarding and planning.

use std::fs;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use planbot::chat::{ChatConsole, Dialogue, describe_profile};
use planbot::cli::{Cli, Command, generate_after_help, get_log_path};
use planbot::config::Config;
use planbot::llm::{Remote, remote_from_config};
use planbot::planner::{Availability, PlanGenerator, PlanSource};
use profilestore::{JsonProfileStore, Profile, ProfileStore};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized, writing to: {}", log_path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // The help footer reflects the default config; the real one needs parsed args
    let cmd = Cli::command().after_help(generate_after_help(&Config::default().llm));
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        model = %config.llm.model,
        days = config.planning.days,
        store = %config.storage.path.display(),
        "Planbot loaded config"
    );

    let store: Arc<dyn ProfileStore> = Arc::new(JsonProfileStore::open(&config.storage.path)?);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None => cmd_chat(&config, store, planbot::cli::DEFAULT_USER).await,
        Some(Command::Chat { user }) => cmd_chat(&config, store, &user).await,
        Some(Command::Onboard {
            name,
            role,
            availability,
            user,
        }) => cmd_onboard(store.as_ref(), &user, name, role, &availability),
        Some(Command::Plan {
            user,
            offline,
            verbose,
            goals,
        }) => cmd_plan(&config, store.as_ref(), &user, offline, verbose, &goals).await,
        Some(Command::Profile { user }) => cmd_profile(store.as_ref(), &user),
        Some(Command::Reset { user }) => cmd_reset(store.as_ref(), &user),
    }
}

fn build_generator(config: &Config, offline: bool) -> Result<PlanGenerator> {
    let remote = if offline {
        debug!("build_generator: offline requested");
        Remote::Absent
    } else {
        remote_from_config(&config.llm)
    };
    PlanGenerator::from_config(config, remote)
}

async fn cmd_chat(config: &Config, store: Arc<dyn ProfileStore>, user: &str) -> Result<()> {
    let generator = Arc::new(build_generator(config, false)?);
    let console = ChatConsole::new(Dialogue::new(store, generator), user);
    console.run().await
}

fn cmd_onboard(store: &dyn ProfileStore, user: &str, name: String, role: String, availability: &str) -> Result<()> {
    let parsed = Availability::parse(availability);
    let profile = Profile {
        name: name.trim().to_string(),
        role: role.trim().to_string(),
        hours_per_day: parsed.hours_per_day,
        hours_per_week: parsed.hours_per_week,
    };
    store.set(user, &profile)?;
    info!(%user, "Profile saved from command line");

    println!("{} Saved profile for {}", "✓".green(), user);
    println!("{}", describe_profile(&profile));
    Ok(())
}

async fn cmd_plan(
    config: &Config,
    store: &dyn ProfileStore,
    user: &str,
    offline: bool,
    verbose: bool,
    goals: &[String],
) -> Result<()> {
    if !goals.is_empty() {
        store.set_last_goal(user, &goals.join(" "))?;
    }

    let profile = store
        .get(user)?
        .ok_or_else(|| eyre!("No profile found for '{}'. Run `pb onboard` or /start in `pb chat` first.", user))?;
    let goals_text = store.get_last_goal(user)?;

    let generator = build_generator(config, offline)?;
    let plan = generator.generate(&profile, goals_text.as_deref()).await;

    if verbose {
        match &plan.source {
            PlanSource::Remote { truncated: false } => eprintln!("{} remote ({})", "source:".dimmed(), config.llm.model),
            PlanSource::Remote { truncated: true } => {
                eprintln!("{} remote ({}, cut off at max-tokens)", "source:".dimmed(), config.llm.model)
            }
            PlanSource::Fallback(reason) => eprintln!("{} fallback ({})", "source:".dimmed(), reason),
        }
    }
    println!("{}", plan.text);
    Ok(())
}

fn cmd_profile(store: &dyn ProfileStore, user: &str) -> Result<()> {
    match store.get(user)? {
        Some(profile) => println!("{}", describe_profile(&profile)),
        None => println!("No profile saved yet. Run `pb onboard` or /start in `pb chat`."),
    }
    Ok(())
}

fn cmd_reset(store: &dyn ProfileStore, user: &str) -> Result<()> {
    store.delete(user)?;
    println!("{} Cleared data for {}", "✓".green(), user);
    Ok(())
}
