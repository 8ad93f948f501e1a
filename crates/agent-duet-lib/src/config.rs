//! Environment-driven configuration.
//!
//! Uses Figment to layer `OPENROUTER_*` environment variables over built-in
//! defaults for the completion endpoint, and `DUET_*` variables for the
//! optional login pair. Nothing is read from or written to disk.

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "anthropic/claude-3-haiku";
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_REFERER: &str = "https://your-app.com";
pub const DEFAULT_TITLE: &str = "AgenticAI-Demo";

/// Merge `prefix`-ed environment variables into `figment`.
///
/// `Env` parses values, so `007` would become the integer 7 and `true` a
/// boolean. Keys in `raw_keys` bypass that and are merged as the exact
/// strings found in the environment.
fn merge_env(figment: Figment, prefix: &str, raw_keys: &[&str]) -> Figment {
    let mut figment = figment.merge(Env::prefixed(prefix).ignore(raw_keys));
    for (key, value) in Env::prefixed(prefix).only(raw_keys).iter() {
        figment = figment.merge(Serialized::default(
            &key.as_str().to_ascii_lowercase(),
            value,
        ));
    }
    figment
}

/// Settings for the remote chat-completion endpoint.
///
/// `api_key` stays optional here; a missing key is reported by the client on
/// first use rather than at load time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    /// Sent as `HTTP-Referer`.
    pub referer: String,
    /// Sent as `X-Title`.
    pub title: String,
    pub timeout_secs: Option<u64>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            timeout_secs: None,
        }
    }
}

impl CompletionConfig {
    /// Defaults overridden by `OPENROUTER_API_KEY`, `OPENROUTER_MODEL`,
    /// `OPENROUTER_API_URL`, `OPENROUTER_REFERER`, `OPENROUTER_TITLE` and
    /// `OPENROUTER_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, figment::Error> {
        merge_env(
            Figment::from(Serialized::defaults(CompletionConfig::default())),
            "OPENROUTER_",
            &["api_key", "model", "api_url", "referer", "title"],
        )
        .extract()
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Login pair provided by the environment (`DUET_USERNAME` / `DUET_PASSWORD`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Result<Self, figment::Error> {
        merge_env(
            Figment::from(Serialized::defaults(Credentials::default())),
            "DUET_",
            &["username", "password"],
        )
        .extract()
    }

    /// Whether a login pair is configured at all.
    pub fn required(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }

    /// Verbatim comparison against the configured pair.
    ///
    /// Returns `false` when no pair is configured.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => u == username && p == password,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn completion_defaults_without_env() {
        Jail::expect_with(|_jail| {
            let cfg = CompletionConfig::from_env()?;
            assert_eq!(cfg, CompletionConfig::default());
            assert!(cfg.api_key.is_none());
            Ok(())
        });
    }

    #[test]
    fn completion_env_overrides() {
        Jail::expect_with(|jail| {
            jail.set_env("OPENROUTER_API_KEY", "sk-test");
            jail.set_env("OPENROUTER_MODEL", "some/model");
            jail.set_env("OPENROUTER_TIMEOUT_SECS", "30");
            let cfg = CompletionConfig::from_env()?;
            assert_eq!(cfg.api_key.as_deref(), Some("sk-test"));
            assert_eq!(cfg.model, "some/model");
            assert_eq!(cfg.timeout_secs, Some(30));
            assert_eq!(cfg.api_url, DEFAULT_API_URL);
            Ok(())
        });
    }

    #[test]
    fn credentials_compare_verbatim() {
        Jail::expect_with(|jail| {
            jail.set_env("DUET_USERNAME", "alice");
            jail.set_env("DUET_PASSWORD", "s3cret");
            let creds = Credentials::from_env()?;
            assert!(creds.required());
            assert!(creds.verify("alice", "s3cret"));
            assert!(!creds.verify("Alice", "s3cret"));
            assert!(!creds.verify("alice", "s3cret "));
            Ok(())
        });
    }

    #[test]
    fn credentials_keep_numeric_and_boolean_text() {
        Jail::expect_with(|jail| {
            jail.set_env("DUET_USERNAME", "true");
            jail.set_env("DUET_PASSWORD", "007");
            let creds = Credentials::from_env()?;
            assert_eq!(creds.username.as_deref(), Some("true"));
            assert_eq!(creds.password.as_deref(), Some("007"));
            assert!(creds.verify("true", "007"));
            assert!(!creds.verify("true", "7"));

            jail.set_env("DUET_PASSWORD", "123456");
            let creds = Credentials::from_env()?;
            assert_eq!(creds.password.as_deref(), Some("123456"));
            Ok(())
        });
    }

    #[test]
    fn numeric_api_key_stays_text() {
        Jail::expect_with(|jail| {
            jail.set_env("OPENROUTER_API_KEY", "0123456789");
            jail.set_env("OPENROUTER_TITLE", "false");
            jail.set_env("OPENROUTER_TIMEOUT_SECS", "15");
            let cfg = CompletionConfig::from_env()?;
            assert_eq!(cfg.api_key.as_deref(), Some("0123456789"));
            assert_eq!(cfg.title, "false");
            assert_eq!(cfg.timeout_secs, Some(15));
            Ok(())
        });
    }

    #[test]
    fn missing_credentials_never_verify() {
        let creds = Credentials::default();
        assert!(!creds.required());
        assert!(!creds.verify("", ""));
    }
}
