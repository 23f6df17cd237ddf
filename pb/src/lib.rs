//! Planbot - conversational planning assistant
//!
//! Onboards a user (name, role, availability), keeps their latest goals,
//! and turns both into a short day-by-day plan. A remote chat-completion
//! model writes the plan when a credential is configured; otherwise, or
//! when the remote call fails for any reason, a deterministic local planner
//! produces one in the same Priorities / Plan / Notes shape.
//!
//! # Modules
//!
//! - [`planner`] - availability parsing, prompt building, fallback, orchestration
//! - [`llm`] - remote completion client and the `Remote` capability
//! - [`chat`] - onboarding dialogue and the interactive console
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod chat;
pub mod cli;
pub mod config;
pub mod llm;
pub mod planner;

pub use chat::{ChatConsole, Dialogue};
pub use config::Config;
pub use llm::{LlmClient, LlmError, Remote};
pub use planner::{FallbackPlanner, GeneratedPlan, PlanGenerator, PlanSource, PromptBuilder, parse_availability};
