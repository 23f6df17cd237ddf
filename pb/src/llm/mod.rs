//! LLM Client module for planbot
//!
//! Provides the remote completion client and the capability value that says
//! whether remote planning is available at all.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

pub mod client;
mod error;
mod openai;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// Whether a remote completion client is available
///
/// Decided once at construction time. `Absent` means no credential is
/// configured and the remote path is skipped entirely.
#[derive(Clone)]
pub enum Remote {
    Configured(Arc<dyn LlmClient>),
    Absent,
}

impl Remote {
    /// Wrap a client as a configured remote
    pub fn configured(client: impl LlmClient + 'static) -> Self {
        Remote::Configured(Arc::new(client))
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Remote::Configured(_))
    }
}

impl fmt::Debug for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remote::Configured(client) => f.debug_tuple("Configured").field(&client.model()).finish(),
            Remote::Absent => f.write_str("Absent"),
        }
    }
}

/// Build the remote capability from configuration
///
/// No credential yields `Absent`. A client that cannot be constructed is
/// logged and also yields `Absent`, since plan generation must still work.
pub fn remote_from_config(config: &LlmConfig) -> Remote {
    debug!(api_key_env = %config.api_key_env, model = %config.model, "remote_from_config: called");
    let Some(api_key) = config.api_key() else {
        info!(
            "No API key in {}, remote planning disabled",
            config.api_key_env
        );
        return Remote::Absent;
    };

    match OpenAIClient::new(config, api_key) {
        Ok(client) => {
            debug!("remote_from_config: OpenAI client created");
            Remote::Configured(Arc::new(client))
        }
        Err(e) => {
            warn!(error = %e, "Failed to create LLM client, remote planning disabled");
            Remote::Absent
        }
    }
}
