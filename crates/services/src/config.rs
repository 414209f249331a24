use std::env;

use practice_core::model::UserId;
use url::Url;

use crate::error::ConfigError;

pub const API_URL_VAR: &str = "PRACTICE_API_URL";
pub const API_TOKEN_VAR: &str = "PRACTICE_API_TOKEN";
pub const DB_URL_VAR: &str = "PRACTICE_DB_URL";
pub const QUESTION_COUNT_VAR: &str = "PRACTICE_QUESTION_COUNT";
pub const SEED_VAR: &str = "PRACTICE_SEED";
pub const USER_ID_VAR: &str = "PRACTICE_USER_ID";

/// Where session, attempt and report calls are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendChoice {
    Http { base_url: Url, token: Option<String> },
    Sqlite { database_url: String },
    InMemory,
}

/// Runtime settings read from the environment.
///
/// Blank variables count as unset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PracticeConfig {
    pub api_url: Option<Url>,
    pub api_token: Option<String>,
    pub db_url: Option<String>,
    pub question_count: Option<usize>,
    pub seed: Option<u64>,
}

impl PracticeConfig {
    /// Read configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a set variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let api_url = get(API_URL_VAR)
            .map(|raw| parse_api_url(API_URL_VAR, &raw))
            .transpose()?;
        let question_count = get(QUESTION_COUNT_VAR)
            .map(|raw| parse_positive(QUESTION_COUNT_VAR, &raw))
            .transpose()?;
        let seed = get(SEED_VAR)
            .map(|raw| parse_number(SEED_VAR, &raw))
            .transpose()?;

        Ok(Self {
            api_url,
            api_token: get(API_TOKEN_VAR),
            db_url: get(DB_URL_VAR),
            question_count,
            seed,
        })
    }

    /// Remote API first, then a local database, else memory only.
    #[must_use]
    pub fn backend(&self) -> BackendChoice {
        if let Some(base_url) = &self.api_url {
            BackendChoice::Http {
                base_url: base_url.clone(),
                token: self.api_token.clone(),
            }
        } else if let Some(database_url) = &self.db_url {
            BackendChoice::Sqlite {
                database_url: database_url.clone(),
            }
        } else {
            BackendChoice::InMemory
        }
    }
}

/// The learner, as provisioned by whoever launched the client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity {
    user_id: Option<UserId>,
}

impl Identity {
    #[must_use]
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    #[must_use]
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// Read `PRACTICE_USER_ID` from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidNumber` if the variable is set but not an id.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidNumber` if the variable is set but not an id.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(raw) = lookup(USER_ID_VAR).filter(|v| !v.trim().is_empty()) else {
            return Ok(Self::anonymous());
        };
        let user_id = raw
            .parse::<UserId>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: USER_ID_VAR,
                value: raw.clone(),
            })?;
        Ok(Self::user(user_id))
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }
}

/// Parse and check an API base URL.
///
/// # Errors
///
/// Returns `ConfigError` for malformed URLs or non-HTTP schemes.
pub fn parse_api_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { var, source })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme {
            var,
            scheme: other.to_owned(),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: raw.to_owned(),
    })
}

/// Parse a count that must be at least one.
///
/// # Errors
///
/// Returns `ConfigError` for non-numeric input or zero.
pub fn parse_positive(var: &'static str, raw: &str) -> Result<usize, ConfigError> {
    match parse_number::<usize>(var, raw)? {
        0 => Err(ConfigError::Zero { var }),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_runs_in_memory() {
        let config = PracticeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PracticeConfig::default());
        assert_eq!(config.backend(), BackendChoice::InMemory);
    }

    #[test]
    fn api_url_wins_over_database() {
        let config = PracticeConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://practice.example.com/"),
            (API_TOKEN_VAR, "secret"),
            (DB_URL_VAR, "sqlite://practice.db"),
        ]))
        .unwrap();
        match config.backend() {
            BackendChoice::Http { base_url, token } => {
                assert_eq!(base_url.host_str(), Some("practice.example.com"));
                assert_eq!(token.as_deref(), Some("secret"));
            }
            other => panic!("unexpected backend {other:?}"),
        }
    }

    #[test]
    fn database_used_without_api() {
        let config =
            PracticeConfig::from_lookup(lookup(&[(DB_URL_VAR, "sqlite://practice.db")])).unwrap();
        assert_eq!(
            config.backend(),
            BackendChoice::Sqlite {
                database_url: "sqlite://practice.db".into()
            }
        );
    }

    #[test]
    fn numbers_are_validated() {
        let config = PracticeConfig::from_lookup(lookup(&[
            (QUESTION_COUNT_VAR, " 12 "),
            (SEED_VAR, "99"),
        ]))
        .unwrap();
        assert_eq!(config.question_count, Some(12));
        assert_eq!(config.seed, Some(99));

        assert!(matches!(
            PracticeConfig::from_lookup(lookup(&[(QUESTION_COUNT_VAR, "0")])),
            Err(ConfigError::Zero { .. })
        ));
        assert!(matches!(
            PracticeConfig::from_lookup(lookup(&[(SEED_VAR, "abc")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn bad_urls_are_rejected() {
        assert!(matches!(
            PracticeConfig::from_lookup(lookup(&[(API_URL_VAR, "not a url")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            PracticeConfig::from_lookup(lookup(&[(API_URL_VAR, "ftp://example.com")])),
            Err(ConfigError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = PracticeConfig::from_lookup(lookup(&[(API_TOKEN_VAR, "   ")])).unwrap();
        assert_eq!(config.api_token, None);
    }

    #[test]
    fn identity_is_optional() {
        assert_eq!(Identity::from_lookup(lookup(&[])).unwrap().user_id(), None);
        let identity = Identity::from_lookup(lookup(&[(USER_ID_VAR, "42")])).unwrap();
        assert_eq!(identity.user_id(), Some(UserId::new(42)));
        assert!(Identity::from_lookup(lookup(&[(USER_ID_VAR, "me")])).is_err());
    }
}
