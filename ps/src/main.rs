use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use profilestore::cli::{Cli, Command};
use profilestore::config::Config;
use profilestore::{JsonProfileStore, ProfileStore};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store_path = cli.path.unwrap_or(config.store_path);

    info!("profilestore starting ({})", store_path.display());
    let store = JsonProfileStore::open(&store_path)?;

    match cli.command {
        Command::List => {
            let users = store.list_users()?;
            if users.is_empty() {
                println!("No users found");
            } else {
                for user in users {
                    println!("{}", user);
                }
            }
        }
        Command::Show { user } => {
            let profile = store.get(&user)?;
            let goals = store.get_last_goal(&user)?;
            if profile.is_none() && goals.is_none() {
                println!("No record for user: {}", user.yellow());
                return Ok(());
            }

            println!("User: {}", user.cyan());
            match profile {
                Some(p) => {
                    println!("  Name: {}", p.name);
                    println!("  Role: {}", p.role);
                    println!("  Hours/day: {}", fmt_hours(p.hours_per_day));
                    println!("  Hours/week: {}", fmt_hours(p.hours_per_week));
                }
                None => println!("  Profile: {}", "none".dimmed()),
            }
            match goals {
                Some(g) => println!("  Last goals: {}", g),
                None => println!("  Last goals: {}", "none".dimmed()),
            }
        }
        Command::Delete { user } => {
            store.delete(&user)?;
            println!("{} Deleted user: {}", "✓".green(), user);
        }
    }

    Ok(())
}

fn fmt_hours(hours: Option<f64>) -> String {
    hours.map(|h| h.to_string()).unwrap_or_else(|| "-".to_string())
}
