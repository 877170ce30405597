//! Layered configuration for a Performance Advisor run.
//!
//! Values are read, lowest precedence first, from built-in defaults, an
//! optional config file, `ATLAS_ADVISOR_*` environment variables and finally
//! command-line overrides.
//!
//! ```toml
//! project_id = "5e2211c17a3e5a48f5497de3"
//! public_key = "abcdefgh"
//! private_key = "00000000-0000-0000-0000-000000000000"
//! since_hours = 24
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::advisor::FetchMode;
use crate::AtlasError;

/// Prefix for environment variables, e.g. `ATLAS_ADVISOR_PRIVATE_KEY`.
pub const ENV_PREFIX: &str = "ATLAS_ADVISOR";

/// Default Atlas Administration API root.
pub const DEFAULT_BASE_URL: &str = "https://cloud.mongodb.com/api/atlas/v1.0";

/// Settings for a single run.
#[derive(Clone, Deserialize)]
pub struct AdvisorConfig {
    /// Atlas project (group) identifier.
    pub project_id: String,
    /// Public half of the programmatic API key.
    pub public_key: String,
    /// Private half of the programmatic API key.
    pub private_key: String,
    /// How far back to look, in hours.
    #[serde(default = "default_since_hours")]
    pub since_hours: u64,
    /// API root the endpoint paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Run the two fetches concurrently once the primary is known.
    #[serde(default)]
    pub concurrent: bool,
}

fn default_since_hours() -> u64 {
    24
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Values supplied on the command line. `None` leaves lower layers in place.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub project_id: Option<String>,
    pub public_key: Option<String>,
    pub private_key: Option<String>,
    pub since_hours: Option<u32>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u32>,
    pub concurrent: Option<bool>,
}

impl AdvisorConfig {
    /// Load configuration from an optional file, the process environment and
    /// the given overrides.
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, AtlasError> {
        Self::load_with_env(path, overrides, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(
        path: Option<&Path>,
        overrides: ConfigOverrides,
        env: Environment,
    ) -> Result<Self, AtlasError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(env)
            .set_override_option("project_id", overrides.project_id)?
            .set_override_option("public_key", overrides.public_key)?
            .set_override_option("private_key", overrides.private_key)?
            .set_override_option("since_hours", overrides.since_hours.map(i64::from))?
            .set_override_option("base_url", overrides.base_url)?
            .set_override_option("timeout_secs", overrides.timeout_secs.map(i64::from))?
            .set_override_option("concurrent", overrides.concurrent)?
            .build()?;

        let settings: AdvisorConfig = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), AtlasError> {
        for (key, value) in [
            ("project_id", &self.project_id),
            ("public_key", &self.public_key),
            ("private_key", &self.private_key),
            ("base_url", &self.base_url),
        ] {
            if value.trim().is_empty() {
                return Err(AtlasError::Config(format!("{} must not be empty", key)));
            }
        }
        if self.timeout_secs == 0 {
            return Err(AtlasError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// How the two fetches are scheduled.
    pub fn fetch_mode(&self) -> FetchMode {
        if self.concurrent {
            FetchMode::Concurrent
        } else {
            FetchMode::Sequential
        }
    }
}

impl fmt::Debug for AdvisorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisorConfig")
            .field("project_id", &self.project_id)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("since_hours", &self.since_hours)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("concurrent", &self.concurrent)
            .finish()
    }
}
