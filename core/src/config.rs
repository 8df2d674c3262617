//! Reseller credentials and endpoint selection.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RESELLER_ID` | (required) | Numeric reseller id, sent as `auth-userid` |
//! | `RESELLER_API_KEY` | (required) | API key, sent as `api-key` |
//! | `RESELLER_ENV` | `test` | `production` or `test` |
//! | `RESELLER_BASE_URL` | (absent) | Overrides the environment's host |

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;
use crate::validate::is_numeric;

/// Which upstream host a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Test,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://httpapi.com/api",
            Environment::Test => "https://test.httpapi.com/api",
        }
    }
}

impl FromStr for Environment {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" | "live" => Ok(Environment::Production),
            "test" | "sandbox" => Ok(Environment::Test),
            other => Err(ApiError::Config(format!("unknown environment {other:?}"))),
        }
    }
}

/// Credentials plus base URL. `Debug` never prints the API key.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    reseller_id: String,
    api_key: String,
    base_url: String,
}

impl ClientConfig {
    pub fn new(
        reseller_id: impl Into<String>,
        api_key: impl Into<String>,
        environment: Environment,
    ) -> Result<Self, ApiError> {
        let reseller_id = reseller_id.into();
        let api_key = api_key.into();
        if !is_numeric(&reseller_id) {
            return Err(ApiError::Config(format!(
                "reseller id {reseller_id:?} is not numeric"
            )));
        }
        if api_key.is_empty() {
            return Err(ApiError::Config("api key is empty".into()));
        }
        Ok(Self {
            reseller_id,
            api_key,
            base_url: environment.base_url().to_string(),
        })
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Build from `RESELLER_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; `from_env` uses the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ApiError::Config(format!("{key} is not set")))
        };

        let environment = match lookup("RESELLER_ENV") {
            Some(env) => env.parse()?,
            None => Environment::default(),
        };
        let config = Self::new(require("RESELLER_ID")?, require("RESELLER_API_KEY")?, environment)?;
        Ok(match lookup("RESELLER_BASE_URL").filter(|v| !v.is_empty()) {
            Some(url) => config.with_base_url(&url),
            None => config,
        })
    }

    pub fn reseller_id(&self) -> &str {
        &self.reseller_id
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("reseller_id", &self.reseller_id)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
