//! Environment-driven configuration.

use thiserror::Error;
use tracing::info;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Please set a value for the environment variable \"{0}\".")]
    EnvironmentVariableNotSet(String),

    #[error("PORT must be a number between 0 and 65535, got \"{0}\".")]
    InvalidPort(String),
}

#[derive(Clone)]
pub struct Config {
    pub base_url: String,
    pub auth_user: String,
    pub auth_pass: String,
    pub mock_mode: bool,
    pub port: u16,
}

impl Config {
    /// Read the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        import_env_file();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = get_environment_variable(&lookup, "BASE_URL")?;
        let auth_user = get_environment_variable(&lookup, "AUTH_USER")?;
        let auth_pass = get_environment_variable(&lookup, "AUTH_PASS")?;

        let port = match lookup("PORT").filter(|value| !value.is_empty()) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_user,
            auth_pass,
            mock_mode: lookup("MOCK_MODE").as_deref().is_some_and(is_enabled),
            port,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("auth_user", &self.auth_user)
            .field("auth_pass", &"***")
            .field("mock_mode", &self.mock_mode)
            .field("port", &self.port)
            .finish()
    }
}

fn import_env_file() {
    if dotenvy::dotenv().is_ok() {
        info!("Imported environment variables from .env file");
    }
}

fn get_environment_variable(
    lookup: &impl Fn(&str) -> Option<String>,
    variable_name: &str,
) -> Result<String, ConfigError> {
    match lookup(variable_name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::EnvironmentVariableNotSet(variable_name.to_string())),
    }
}

fn is_enabled(value: &str) -> bool {
    matches!(value, "true" | "1")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("BASE_URL", "http://mtx:9997/"),
        ("AUTH_USER", "admin"),
        ("AUTH_PASS", "secret"),
    ];

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.base_url, "http://mtx:9997");
        assert_eq!(config.port, 8080);
        assert!(!config.mock_mode);
    }

    #[test]
    fn each_required_variable_is_enforced() {
        for missing in ["BASE_URL", "AUTH_USER", "AUTH_PASS"] {
            let pairs: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| *k != missing).collect();
            let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
            assert_eq!(err, ConfigError::EnvironmentVariableNotSet(missing.to_string()));
        }
    }

    #[test]
    fn empty_required_variable_counts_as_unset() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = ("AUTH_USER", "");
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn mock_mode_accepts_true_or_one() {
        for (value, expected) in [("true", true), ("1", true), ("yes", false), ("TRUE", false), ("0", false)] {
            let mut pairs = REQUIRED.to_vec();
            pairs.push(("MOCK_MODE", value));
            let config = Config::from_lookup(lookup(&pairs)).unwrap();
            assert_eq!(config.mock_mode, expected, "MOCK_MODE={value}");
        }
    }

    #[test]
    fn port_is_parsed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "9090"));
        assert_eq!(Config::from_lookup(lookup(&pairs)).unwrap().port, 9090);

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "http"));
        assert_eq!(
            Config::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::InvalidPort("http".to_string())
        );
    }

    #[test]
    fn debug_hides_password() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert!(!format!("{config:?}").contains("secret"));
    }
}
