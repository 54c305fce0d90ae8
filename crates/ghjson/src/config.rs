use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use std::env;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_PATH: &str = "data/default.json";

const TOKEN_VARS: [&str; 2] = ["GHJSON_TOKEN", "GITHUB_TOKEN"];
const API_BASE_VAR: &str = "GHJSON_API_BASE";

/// Connection settings for the contents API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_base: String,
    token: Option<String>,
    user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            user_agent: format!("ghjson/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Reads the credential and base URL from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`ClientConfig::from_env`], with a caller-supplied lookup.
    ///
    /// `GHJSON_TOKEN` wins over `GITHUB_TOKEN`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new();
        config.token = TOKEN_VARS.iter().find_map(|key| present(*key));
        if let Some(base) = present(API_BASE_VAR) {
            config.api_base = base;
        }
        config
    }

    pub fn with_api_base<S: Into<String>>(mut self, api_base: S) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Sets the credential. An empty string clears it.
    pub fn with_token<S: Into<String>>(mut self, token: S) -> Self {
        let token = token.into();
        self.token = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// Commit messages used by the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    pub create_message: String,
    pub update_message: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            create_message: "Create default JSON".to_string(),
            update_message: "Update JSON data".to_string(),
        }
    }
}

/// Payload written when the target file does not exist yet.
pub fn default_document() -> Value {
    json!({
        "hello": "world",
        "createdAt": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
