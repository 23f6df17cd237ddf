//! Dialogue state machine
//!
//! Maps one input line from a user to the replies a transport should send.
//! Onboarding progress is kept per user in memory; everything durable goes
//! through the profile store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use eyre::{Result, eyre};
use profilestore::{Profile, ProfileStore};
use tracing::{debug, info};

use crate::planner::{Availability, PlanGenerator};

pub const ASK_NAME: &str = "Hi! I'm your planning bot. What's your name?";
pub const ASK_ROLE: &str = "Nice to meet you! What do you do or study?";
pub const ASK_AVAILABILITY: &str = "How much time can you dedicate? (e.g., '2h/day', '10h/week', or both)";
pub const ONBOARDED: &str = "Thanks! You can now send your goals or use /plan. Try sending a message like:\n\
'I can spend 2 hours during the week; thesis on SSL for MIR; follow up DB course; guitar tutorials. Give me a plan.'";
pub const NO_PROFILE_SAVED: &str = "No profile saved yet. Use /start to set it up.";
pub const NO_PROFILE_FOUND: &str = "No profile found. Use /start to set it up.";
pub const DATA_CLEARED: &str = "Your data has been cleared. Use /start to onboard again.";
pub const SAVED_WITHOUT_PROFILE: &str = "I saved your message. Use /start to set your profile first.";
pub const ONBOARDING_CANCELLED: &str = "Onboarding cancelled. Use /start to begin again.";
pub const NOTHING_TO_CANCEL: &str = "Nothing to cancel.";

pub const HELP: &str = "Commands:\n\
/start - set up your profile\n\
/profile - show your saved profile\n\
/plan - plan from your last goals\n\
/reset - clear your data\n\
/cancel - stop onboarding\n\
/help - show this help\n\
Any other message is saved as your goals and planned.";

/// Where a user is in the onboarding flow
#[derive(Debug, Clone, PartialEq)]
enum OnboardingStep {
    AskName,
    AskRole { name: String },
    AskAvailability { name: String, role: String },
}

/// Transport-independent conversation handler
pub struct Dialogue {
    store: Arc<dyn ProfileStore>,
    generator: Arc<PlanGenerator>,
    onboarding: Mutex<HashMap<String, OnboardingStep>>,
}

impl Dialogue {
    pub fn new(store: Arc<dyn ProfileStore>, generator: Arc<PlanGenerator>) -> Self {
        Self {
            store,
            generator,
            onboarding: Mutex::new(HashMap::new()),
        }
    }

    /// Whether the user is partway through onboarding
    pub fn is_onboarding(&self, user_id: &str) -> bool {
        self.onboarding
            .lock()
            .map(|steps| steps.contains_key(user_id))
            .unwrap_or(false)
    }

    /// Handle one input line and return the replies, in order
    pub async fn handle(&self, user_id: &str, input: &str) -> Result<Vec<String>> {
        debug!(%user_id, "Dialogue::handle: called");

        if let Some(command) = parse_command(input) {
            return self.handle_command(user_id, command).await;
        }

        if let Some(step) = self.current_step(user_id)? {
            return self.advance_onboarding(user_id, step, input);
        }

        self.free_text(user_id, input).await
    }

    async fn handle_command(&self, user_id: &str, command: &str) -> Result<Vec<String>> {
        debug!(%user_id, %command, "Dialogue::handle_command: called");
        match command {
            "start" => {
                self.set_step(user_id, OnboardingStep::AskName)?;
                Ok(vec![ASK_NAME.to_string()])
            }
            "cancel" => {
                let reply = if self.take_step(user_id)?.is_some() {
                    ONBOARDING_CANCELLED
                } else {
                    NOTHING_TO_CANCEL
                };
                Ok(vec![reply.to_string()])
            }
            "profile" => self.show_profile(user_id),
            "reset" => {
                self.take_step(user_id)?;
                self.store.delete(user_id)?;
                info!(%user_id, "User data cleared");
                Ok(vec![DATA_CLEARED.to_string()])
            }
            "plan" => self.plan(user_id).await,
            "help" => Ok(vec![HELP.to_string()]),
            other => Ok(vec![format!("Unknown command /{}. Use /help to see what I understand.", other)]),
        }
    }

    fn advance_onboarding(&self, user_id: &str, step: OnboardingStep, input: &str) -> Result<Vec<String>> {
        let answer = input.trim().to_string();
        match step {
            OnboardingStep::AskName => {
                self.set_step(user_id, OnboardingStep::AskRole { name: answer })?;
                Ok(vec![ASK_ROLE.to_string()])
            }
            OnboardingStep::AskRole { name } => {
                self.set_step(user_id, OnboardingStep::AskAvailability { name, role: answer })?;
                Ok(vec![ASK_AVAILABILITY.to_string()])
            }
            OnboardingStep::AskAvailability { name, role } => {
                let availability = Availability::parse(&answer);
                let profile = Profile {
                    name,
                    role,
                    hours_per_day: availability.hours_per_day,
                    hours_per_week: availability.hours_per_week,
                };
                // The step stays in place until the save succeeds, so a failed write can be retried
                self.store.set(user_id, &profile)?;
                self.take_step(user_id)?;
                info!(%user_id, "Onboarding complete");
                Ok(vec![ONBOARDED.to_string()])
            }
        }
    }

    fn show_profile(&self, user_id: &str) -> Result<Vec<String>> {
        let Some(profile) = self.store.get(user_id)? else {
            return Ok(vec![NO_PROFILE_SAVED.to_string()]);
        };
        Ok(vec![describe_profile(&profile)])
    }

    async fn plan(&self, user_id: &str) -> Result<Vec<String>> {
        let Some(profile) = self.store.get(user_id)? else {
            return Ok(vec![NO_PROFILE_FOUND.to_string()]);
        };
        let goals = self.store.get_last_goal(user_id)?;
        let plan = self.generator.generate_plan(&profile, goals.as_deref()).await;
        Ok(vec![plan])
    }

    async fn free_text(&self, user_id: &str, input: &str) -> Result<Vec<String>> {
        self.store.set_last_goal(user_id, input)?;

        let Some(profile) = self.store.get(user_id)? else {
            return Ok(vec![SAVED_WITHOUT_PROFILE.to_string()]);
        };
        let plan = self.generator.generate_plan(&profile, Some(input)).await;
        Ok(vec![plan])
    }

    fn current_step(&self, user_id: &str) -> Result<Option<OnboardingStep>> {
        let steps = self.onboarding.lock().map_err(|_| eyre!("Onboarding state lock poisoned"))?;
        Ok(steps.get(user_id).cloned())
    }

    fn take_step(&self, user_id: &str) -> Result<Option<OnboardingStep>> {
        let mut steps = self.onboarding.lock().map_err(|_| eyre!("Onboarding state lock poisoned"))?;
        Ok(steps.remove(user_id))
    }

    fn set_step(&self, user_id: &str, step: OnboardingStep) -> Result<()> {
        let mut steps = self.onboarding.lock().map_err(|_| eyre!("Onboarding state lock poisoned"))?;
        steps.insert(user_id.to_string(), step);
        Ok(())
    }
}

/// Profile summary: name, role, populated availability segments
pub fn describe_profile(profile: &Profile) -> String {
    format!(
        "Name: {}\nRole: {}\nAvailability: {}",
        profile.name,
        profile.role,
        Availability::of(profile).segments().join(", ")
    )
}

/// Command word of a `/command` line, without any `@botname` suffix
fn parse_command(input: &str) -> Option<&str> {
    let word = input.trim_start().split_whitespace().next()?;
    let command = word.strip_prefix('/')?;
    let command = command.split('@').next().unwrap_or(command);
    (!command.is_empty()).then_some(command)
}
