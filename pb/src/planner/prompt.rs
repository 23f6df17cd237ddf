//! Plan prompt construction
//!
//! Renders the `plan` template (embedded, or overridden by `plan.pmt` in a
//! configured directory) with the profile, goals and planning horizon.

use std::path::Path;

use eyre::{Result, eyre};
use handlebars::Handlebars;
use profilestore::Profile;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::Availability;

/// Embedded plan prompt
pub const PLAN_TEMPLATE: &str = include_str!("../../prompts/plan.pmt");

/// System message sent with every plan request
pub const SYSTEM_PROMPT: &str = "You are a helpful planning assistant.";

/// Substituted when the user has not supplied goals
pub const GOALS_NOT_PROVIDED: &str = "Not provided.";

const TEMPLATE_NAME: &str = "plan";

/// Values available to the plan template
#[derive(Debug, Clone, Serialize)]
pub struct PlanPromptContext {
    /// Planning horizon in days
    pub days: u32,
    pub name: String,
    pub role: String,
    /// Availability description, e.g. "~2.0h/day" or "unspecified availability"
    pub availability: String,
    /// Trimmed goals text or "Not provided."
    pub goals: String,
}

impl PlanPromptContext {
    pub fn new(profile: &Profile, goals_text: Option<&str>, days: u32) -> Self {
        debug!(%days, has_goals = goals_text.is_some(), "PlanPromptContext::new: called");
        let goals = goals_text
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(GOALS_NOT_PROVIDED)
            .to_string();

        Self {
            days,
            name: profile.name.clone(),
            role: profile.role.clone(),
            availability: Availability::of(profile).describe(),
            goals,
        }
    }
}

/// Builds the instruction string for the remote model
pub struct PromptBuilder {
    hbs: Handlebars<'static>,
    planning_days: u32,
}

impl PromptBuilder {
    /// Create a builder using the embedded template
    pub fn new(planning_days: u32) -> Result<Self> {
        debug!(%planning_days, "PromptBuilder::new: called");
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.register_template_string(TEMPLATE_NAME, PLAN_TEMPLATE)
            .map_err(|e| eyre!("Embedded plan template is invalid: {}", e))?;
        Ok(Self { hbs, planning_days })
    }

    /// Create a builder preferring `{dir}/plan.pmt` over the embedded template
    ///
    /// A missing or unparsable override is logged and the embedded template is used.
    pub fn with_prompt_dir(planning_days: u32, dir: Option<&Path>) -> Result<Self> {
        let mut builder = Self::new(planning_days)?;

        let Some(dir) = dir else {
            debug!("PromptBuilder::with_prompt_dir: no override directory configured");
            return Ok(builder);
        };

        let path = dir.join(format!("{}.pmt", TEMPLATE_NAME));
        if !path.exists() {
            debug!(?path, "PromptBuilder::with_prompt_dir: override not found");
            return Ok(builder);
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match builder.hbs.register_template_string(TEMPLATE_NAME, content) {
                Ok(()) => info!("Using plan prompt override from {}", path.display()),
                Err(e) => {
                    warn!(?path, error = %e, "Plan prompt override does not parse, using embedded");
                    builder
                        .hbs
                        .register_template_string(TEMPLATE_NAME, PLAN_TEMPLATE)
                        .map_err(|e| eyre!("Embedded plan template is invalid: {}", e))?;
                }
            },
            Err(e) => warn!(?path, error = %e, "Failed to read plan prompt override, using embedded"),
        }

        Ok(builder)
    }

    pub fn planning_days(&self) -> u32 {
        self.planning_days
    }

    /// Render the plan prompt
    pub fn build(&self, profile: &Profile, goals_text: Option<&str>) -> Result<String> {
        let context = PlanPromptContext::new(profile, goals_text, self.planning_days);
        debug!(availability = %context.availability, "PromptBuilder::build: rendering");
        self.hbs
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| eyre!("Failed to render plan prompt: {}", e))
    }
}
