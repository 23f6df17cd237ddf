//! CLI command definitions and subcommands

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::LlmConfig;

/// User id used when none is given
pub const DEFAULT_USER: &str = "local";

/// Planbot - conversational planning assistant
#[derive(Parser)]
#[command(
    name = "pb",
    about = "Conversational planning assistant with an offline fallback planner",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute; defaults to the interactive chat
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive chat (/start, /plan, /profile, /reset, free-text goals)
    Chat {
        /// User id to chat as
        #[arg(short, long, default_value = DEFAULT_USER)]
        user: String,
    },

    /// Save a profile without the interactive flow
    Onboard {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// What the user does or studies
        #[arg(short, long)]
        role: String,

        /// Free-form availability, e.g. "2h/day" or "10h/week"
        #[arg(short, long)]
        availability: String,

        /// User id
        #[arg(short, long, default_value = DEFAULT_USER)]
        user: String,
    },

    /// Generate a plan; goals given here are saved as the latest goals
    Plan {
        /// User id
        #[arg(short, long, default_value = DEFAULT_USER)]
        user: String,

        /// Skip the remote planner
        #[arg(long)]
        offline: bool,

        /// Print where the plan came from to stderr
        #[arg(short, long)]
        verbose: bool,

        /// Goals text (joined with spaces)
        goals: Vec<String>,
    },

    /// Show the saved profile
    Profile {
        /// User id
        #[arg(short, long, default_value = DEFAULT_USER)]
        user: String,
    },

    /// Delete the saved profile and goals
    Reset {
        /// User id
        #[arg(short, long, default_value = DEFAULT_USER)]
        user: String,
    },
}

/// Path of the log file written by `pb`
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planbot")
        .join("logs")
        .join("planbot.log")
}

/// Help footer showing remote planner status and the log location
pub fn generate_after_help(llm: &LlmConfig) -> String {
    debug!("generate_after_help: called");
    let mut help = String::new();

    help.push_str("Remote planner:\n");
    let (icon, status) = if llm.api_key().is_some() {
        ("\u{2705}", format!("{} via {}", llm.model, llm.base_url))
    } else {
        ("\u{274C}", format!("offline ({} not set)", llm.api_key_env))
    };
    help.push_str(&format!("  {} {}\n", icon, status));

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["pb"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_plan_args() {
        let cli = Cli::try_parse_from(["pb", "--log-level", "debug", "plan", "--offline", "-v", "thesis,", "guitar"])
            .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Some(Command::Plan {
                user,
                offline,
                verbose,
                goals,
            }) => {
                assert_eq!(user, DEFAULT_USER);
                assert!(offline);
                assert!(verbose);
                assert_eq!(goals, vec!["thesis,", "guitar"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_onboard_requires_fields() {
        assert!(Cli::try_parse_from(["pb", "onboard", "--name", "Ada"]).is_err());
        let cli = Cli::try_parse_from([
            "pb",
            "onboard",
            "--name",
            "Ada",
            "--role",
            "student",
            "--availability",
            "2h/day",
            "--user",
            "ada",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Command::Onboard { ref user, .. }) if user == "ada"));
    }

    #[test]
    fn test_after_help_mentions_key_env_when_offline() {
        let llm = LlmConfig {
            api_key_env: "PLANBOT_TEST_HELP_KEY_UNSET".to_string(),
            ..Default::default()
        };
        let help = generate_after_help(&llm);
        assert!(help.contains("offline (PLANBOT_TEST_HELP_KEY_UNSET not set)"));
        assert!(help.contains("planbot.log"));
    }
}
