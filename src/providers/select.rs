//! Provider selection: turns a provider name and model into a live client.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ProvidersConfig;
use crate::credentials::{resolve_anthropic_auth, resolve_openai_auth, Credentials};

use super::anthropic::AnthropicProvider;
use super::openai::OpenAiProvider;
use super::LlmProvider;

/// The supported chat-completion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic messages API.
    Anthropic,
    /// OpenAI chat completions API.
    #[value(name = "openai")]
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    /// Lowercase provider name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
        }
    }

    /// The environment variable operators are pointed at when no key is found.
    pub fn key_env_var(self) -> &'static str {
        match self {
            Self::Anthropic => crate::credentials::ANTHROPIC_API_KEY,
            Self::OpenAi => crate::credentials::OPENAI_API_KEY,
        }
    }

    /// Model used when neither the CLI nor the config names one.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "claude-haiku-4-5-20251001",
            Self::OpenAi => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider construction errors.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// Required API credential missing for selected provider.
    #[error("missing credential for provider '{provider}': set {key} or pass --api-key")]
    MissingCredential {
        /// Provider name.
        provider: ProviderKind,
        /// Expected environment variable.
        key: &'static str,
    },
    /// Model identifier was blank.
    #[error("model identifier must not be empty")]
    EmptyModel,
    /// HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Everything needed to build one provider instance.
#[derive(Debug, Clone)]
pub struct ProviderSpec<'a> {
    /// Which provider API to talk to.
    pub kind: ProviderKind,
    /// Model identifier, without provider prefix.
    pub model: &'a str,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Optional key taking precedence over the environment.
    pub api_key_override: Option<&'a str>,
}

/// Instantiate the provider described by `spec`.
///
/// Credentials are checked here so a missing key fails before any record is
/// processed.
///
/// # Errors
///
/// Returns [`SelectError`] when the credential is missing, the model is
/// blank, or the HTTP client cannot be built.
pub fn build_provider(
    spec: &ProviderSpec<'_>,
    endpoints: &ProvidersConfig,
    credentials: &Credentials,
) -> Result<Arc<dyn LlmProvider>, SelectError> {
    if spec.model.trim().is_empty() {
        return Err(SelectError::EmptyModel);
    }
    let missing = || SelectError::MissingCredential {
        provider: spec.kind,
        key: spec.kind.key_env_var(),
    };
    let client = reqwest::Client::builder().timeout(spec.timeout).build()?;

    match spec.kind {
        ProviderKind::Anthropic => {
            let auth = resolve_anthropic_auth(credentials, spec.api_key_override)
                .ok_or_else(missing)?;
            Ok(Arc::new(
                AnthropicProvider::new(spec.model.to_owned(), auth)
                    .with_endpoint(endpoints.anthropic_base_url.clone())
                    .with_client(client),
            ))
        }
        ProviderKind::OpenAi => {
            let auth =
                resolve_openai_auth(credentials, spec.api_key_override).ok_or_else(missing)?;
            Ok(Arc::new(
                OpenAiProvider::new(spec.model.to_owned(), auth)
                    .with_endpoint(endpoints.openai_base_url.clone())
                    .with_client(client),
            ))
        }
    }
}
