//! Credential loading from the process environment and an optional `.env` file.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

/// Environment variable holding the Anthropic API key.
pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
/// Environment variable holding an Anthropic OAuth access token.
pub const ANTHROPIC_OAUTH_TOKEN: &str = "ANTHROPIC_OAUTH_TOKEN";
/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding an OpenAI OAuth access token.
pub const OPENAI_OAUTH_TOKEN: &str = "OPENAI_OAUTH_TOKEN";

const KNOWN_KEYS: [&str; 4] = [
    ANTHROPIC_API_KEY,
    ANTHROPIC_OAUTH_TOKEN,
    OPENAI_API_KEY,
    OPENAI_OAUTH_TOKEN,
];

/// Provider credentials gathered at startup.
#[derive(Clone, Default)]
pub struct Credentials {
    vars: BTreeMap<String, String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .field("values", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Build credentials from a key-value map.
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    /// Returns a credential value for a key, if present and non-blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// Load provider credentials.
///
/// Values come from the process environment. When `env_file` is given and
/// exists, its entries fill in keys the environment does not set.
///
/// # Errors
///
/// Returns an error if the `.env` file exists but cannot be parsed.
pub fn load_credentials(env_file: Option<&Path>) -> anyhow::Result<Credentials> {
    load_credentials_with(env_file, |key| std::env::var(key).ok())
}

/// Load credentials using a custom environment resolver (for testing).
///
/// # Errors
///
/// Returns an error if the `.env` file exists but cannot be parsed.
pub fn load_credentials_with(
    env_file: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Credentials> {
    let mut vars = BTreeMap::new();

    if let Some(path) = env_file.filter(|p| p.exists()) {
        let iter = dotenvy::from_path_iter(path)
            .with_context(|| format!("failed to read credentials at {}", path.display()))?;
        for item in iter {
            let (key, value) = item.with_context(|| {
                format!(
                    "failed to parse key-value entry in credentials file {}",
                    path.display()
                )
            })?;
            if KNOWN_KEYS.contains(&key.as_str()) {
                vars.insert(key, value);
            }
        }
        debug!(path = %path.display(), "loaded credentials file");
    }

    for key in KNOWN_KEYS {
        if let Some(value) = env(key) {
            vars.insert(key.to_owned(), value);
        }
    }

    Ok(Credentials { vars })
}

// ---------------------------------------------------------------------------
// Anthropic
// ---------------------------------------------------------------------------

/// How requests authenticate with the Anthropic API.
#[derive(Clone, PartialEq, Eq)]
pub enum AnthropicAuth {
    /// OAuth Bearer token.
    OAuth {
        /// The access token sent as `Authorization: Bearer`.
        access_token: String,
    },
    /// Classic API key sent as `x-api-key` header.
    ApiKey(String),
}

impl std::fmt::Debug for AnthropicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OAuth { .. } => f
                .debug_struct("OAuth")
                .field("access_token", &"[REDACTED]")
                .finish(),
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"[REDACTED]").finish(),
        }
    }
}

/// Resolve Anthropic authentication.
///
/// Resolution order:
/// 1. explicit key override (`--api-key`)
/// 2. `ANTHROPIC_API_KEY`
/// 3. `ANTHROPIC_OAUTH_TOKEN`
///
/// Returns `None` if no source provides a value.
pub fn resolve_anthropic_auth(
    credentials: &Credentials,
    override_key: Option<&str>,
) -> Option<AnthropicAuth> {
    if let Some(key) = override_key.filter(|k| !k.trim().is_empty()) {
        debug!("using Anthropic API key from command line");
        return Some(AnthropicAuth::ApiKey(key.to_owned()));
    }
    if let Some(key) = credentials.get(ANTHROPIC_API_KEY) {
        debug!("using ANTHROPIC_API_KEY");
        return Some(AnthropicAuth::ApiKey(key.to_owned()));
    }
    if let Some(token) = credentials.get(ANTHROPIC_OAUTH_TOKEN) {
        debug!("using ANTHROPIC_OAUTH_TOKEN");
        return Some(AnthropicAuth::OAuth {
            access_token: token.to_owned(),
        });
    }
    None
}

// ---------------------------------------------------------------------------
// OpenAI
// ---------------------------------------------------------------------------

/// How requests authenticate with the OpenAI API.
#[derive(Clone, PartialEq, Eq)]
pub enum OpenAiAuth {
    /// OAuth access token sent as bearer.
    OAuthToken(String),
    /// API key sent as bearer.
    ApiKey(String),
}

impl std::fmt::Debug for OpenAiAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OAuthToken(_) => f.debug_tuple("OAuthToken").field(&"[REDACTED]").finish(),
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"[REDACTED]").finish(),
        }
    }
}

/// Resolve OpenAI authentication.
///
/// Resolution order: explicit override, `OPENAI_API_KEY`, `OPENAI_OAUTH_TOKEN`.
pub fn resolve_openai_auth(
    credentials: &Credentials,
    override_key: Option<&str>,
) -> Option<OpenAiAuth> {
    if let Some(key) = override_key.filter(|k| !k.trim().is_empty()) {
        debug!("using OpenAI API key from command line");
        return Some(OpenAiAuth::ApiKey(key.to_owned()));
    }
    if let Some(key) = credentials.get(OPENAI_API_KEY) {
        debug!("using OPENAI_API_KEY");
        return Some(OpenAiAuth::ApiKey(key.to_owned()));
    }
    credentials.get(OPENAI_OAUTH_TOKEN).map(|token| {
        debug!("using OPENAI_OAUTH_TOKEN");
        OpenAiAuth::OAuthToken(token.to_owned())
    })
}
