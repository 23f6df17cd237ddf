//! Plan generator
//!
//! The one seam between remote and offline planning. `generate_plan` always
//! returns non-empty text: every remote failure becomes a fallback plan.

use std::fmt;

use eyre::Result;
use profilestore::Profile;
use tracing::{debug, info, warn};

use super::{FallbackPlanner, PromptBuilder, SYSTEM_PROMPT};
use crate::config::Config;
use crate::llm::{CompletionRequest, LlmError, Message, Remote, StopReason};

/// Default sampling temperature for plan requests
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Default output budget for plan requests
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Why the heuristic planner produced the plan
#[derive(Debug)]
pub enum FallbackReason {
    /// No credential configured; the remote was never tried
    NoCredential,
    /// The prompt could not be rendered
    Prompt(String),
    /// The single remote attempt failed
    Remote(LlmError),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoCredential => write!(f, "no remote credential configured"),
            FallbackReason::Prompt(e) => write!(f, "prompt unavailable: {}", e),
            FallbackReason::Remote(e) => write!(f, "remote {} failure: {}", e.kind(), e),
        }
    }
}

/// Where a plan came from
#[derive(Debug)]
pub enum PlanSource {
    /// Written remotely; `truncated` when the model hit its output limit
    Remote { truncated: bool },
    Fallback(FallbackReason),
}

impl PlanSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, PlanSource::Fallback(_))
    }
}

/// A delivered plan and its source
#[derive(Debug)]
pub struct GeneratedPlan {
    pub text: String,
    pub source: PlanSource,
}

/// Composes prompt building, one remote attempt, and the heuristic fallback
pub struct PlanGenerator {
    remote: Remote,
    prompts: PromptBuilder,
    fallback: FallbackPlanner,
    temperature: f32,
    max_tokens: u32,
}

impl PlanGenerator {
    pub fn new(remote: Remote, prompts: PromptBuilder, fallback: FallbackPlanner) -> Self {
        debug!(?remote, planning_days = prompts.planning_days(), "PlanGenerator::new: called");
        Self {
            remote,
            prompts,
            fallback,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Build from configuration with an already-resolved remote capability
    pub fn from_config(config: &Config, remote: Remote) -> Result<Self> {
        let days = config.planning.days;
        let prompts = PromptBuilder::with_prompt_dir(days, config.planning.prompt_dir.as_deref())?;
        Ok(Self::new(remote, prompts, FallbackPlanner::new(days)).with_sampling(config.llm.temperature, config.llm.max_tokens))
    }

    /// Generator that never calls out
    pub fn offline(planning_days: u32) -> Result<Self> {
        Ok(Self::new(
            Remote::Absent,
            PromptBuilder::new(planning_days)?,
            FallbackPlanner::new(planning_days),
        ))
    }

    /// Override sampling parameters sent with each request
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn remote(&self) -> &Remote {
        &self.remote
    }

    pub fn planning_days(&self) -> u32 {
        self.prompts.planning_days()
    }

    /// Generate a plan and report where it came from
    pub async fn generate(&self, profile: &Profile, goals_text: Option<&str>) -> GeneratedPlan {
        debug!(has_goals = goals_text.is_some(), "PlanGenerator::generate: called");

        let client = match &self.remote {
            Remote::Configured(client) => client,
            Remote::Absent => return self.fall_back(profile, goals_text, FallbackReason::NoCredential),
        };

        let prompt = match self.prompts.build(profile, goals_text) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "Plan prompt could not be built");
                return self.fall_back(profile, goals_text, FallbackReason::Prompt(e.to_string()));
            }
        };

        let request = CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(prompt)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match client.complete(request).await {
            Ok(response) => match response.trimmed_content() {
                Some(content) => {
                    let truncated = response.stop_reason == StopReason::MaxTokens;
                    if truncated {
                        warn!(model = %client.model(), max_tokens = self.max_tokens, "Remote plan was cut off at the token limit");
                    }
                    info!(model = %client.model(), output_tokens = response.usage.output_tokens, "Plan generated remotely");
                    GeneratedPlan {
                        text: content.to_string(),
                        source: PlanSource::Remote { truncated },
                    }
                }
                None => {
                    warn!(model = %client.model(), "Remote plan response was empty");
                    self.fall_back(profile, goals_text, FallbackReason::Remote(LlmError::EmptyContent))
                }
            },
            Err(e) => {
                if e.is_auth() {
                    warn!(model = %client.model(), error = %e, "Remote planner rejected the credential");
                } else if e.is_quota() {
                    warn!(model = %client.model(), retry_after = ?e.retry_after(), error = %e, "Remote planner quota exhausted");
                } else {
                    warn!(model = %client.model(), kind = e.kind(), error = %e, "Remote plan request failed");
                }
                self.fall_back(profile, goals_text, FallbackReason::Remote(e))
            }
        }
    }

    /// Generate a plan; never empty, never an error
    pub async fn generate_plan(&self, profile: &Profile, goals_text: Option<&str>) -> String {
        self.generate(profile, goals_text).await.text
    }

    fn fall_back(&self, profile: &Profile, goals_text: Option<&str>, reason: FallbackReason) -> GeneratedPlan {
        info!(%reason, "Using heuristic fallback plan");
        GeneratedPlan {
            text: self.fallback.plan(profile, goals_text),
            source: PlanSource::Fallback(reason),
        }
    }
}
