//! Castlist engine configuration.
//!
//! Every table and key is optional; omitted values fall back to the defaults
//! below. Unknown keys are rejected so typos surface at load time instead of
//! silently changing behavior.

use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Members rendered on one roster page.
pub const DEFAULT_MEMBERS_PER_PAGE: u32 = 25;

/// Prefix that marks an interaction identifier as castlist navigation state.
pub const DEFAULT_TOKEN_PREFIX: &str = "cl1:";

/// Hard interaction-identifier length limit enforced by the transport.
pub const DEFAULT_MAX_TOKEN_LEN: usize = 100;

/// Roster name the resolver falls back to when nothing else matches.
pub const DEFAULT_ROSTER_NAME: &str = "default";

// Smallest token budget that can still carry a prefix and a short payload.
const MIN_TOKEN_PAYLOAD_LEN: usize = 16;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

///
/// CastlistConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CastlistConfig {
    pub page: PageConfig,
    pub nav: NavConfig,
    pub resolve: ResolveConfig,
}

impl CastlistConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page.members_per_page == 0 {
            return Err(ConfigError::invalid("page.members_per_page must be at least 1"));
        }

        let prefix = &self.nav.token_prefix;
        if prefix.is_empty() {
            return Err(ConfigError::invalid("nav.token_prefix must not be empty"));
        }
        if !prefix.is_ascii() || prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid(
                "nav.token_prefix must be ASCII without whitespace",
            ));
        }
        if self.nav.max_token_len < prefix.len() + MIN_TOKEN_PAYLOAD_LEN {
            return Err(ConfigError::invalid(format!(
                "nav.max_token_len {} leaves no room for a payload after prefix '{prefix}'",
                self.nav.max_token_len
            )));
        }

        if self.resolve.default_roster_name.trim().is_empty() {
            return Err(ConfigError::invalid(
                "resolve.default_roster_name must not be blank",
            ));
        }

        Ok(())
    }
}

///
/// PageConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub members_per_page: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            members_per_page: DEFAULT_MEMBERS_PER_PAGE,
        }
    }
}

///
/// NavConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    pub token_prefix: String,
    pub max_token_len: usize,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            token_prefix: DEFAULT_TOKEN_PREFIX.to_string(),
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }
}

///
/// ResolveConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveConfig {
    pub default_roster_name: String,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            default_roster_name: DEFAULT_ROSTER_NAME.to_string(),
        }
    }
}

///
/// TESTS
///
