//! Planning core
//!
//! Availability parsing, prompt construction, the heuristic fallback, and the
//! generator that ties them to the remote client.

mod availability;
mod fallback;
mod generator;
mod prompt;

pub use availability::{Availability, format_hours, parse_availability};
pub use fallback::{
    DEFAULT_CHUNKS, FallbackPlanner, HeuristicPlan, OFFLINE_NOTES, PlanItem, effective_hours_per_day, goal_chunks,
};
pub use generator::{FallbackReason, GeneratedPlan, PlanGenerator, PlanSource};
pub use prompt::{GOALS_NOT_PROVIDED, PLAN_TEMPLATE, PlanPromptContext, PromptBuilder, SYSTEM_PROMPT};
