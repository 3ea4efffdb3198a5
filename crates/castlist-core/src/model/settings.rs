//! Closed roster settings record and the sort strategy vocabulary.

use serde::{Deserialize, Serialize};
use std::{fmt, num::NonZeroU32, str::FromStr};
use thiserror::Error as ThisError;

///
/// SettingsError
///

#[derive(Debug, ThisError)]
pub enum SettingsError {
    #[error("invalid roster settings: {0}")]
    Invalid(String),

    #[error("unknown sort strategy '{0}'")]
    UnknownStrategy(String),
}

///
/// SortStrategy
///
/// Closed set of member orderings. Adding a strategy means adding a variant
/// here and one arm in the sorter's dispatch.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortStrategy {
    #[default]
    Alphabetical,
    ReverseAlphabetical,
    #[serde(alias = "placements", alias = "alumni_placements")]
    Ranked,
    Age,
    Timezone,
    JoinDate,
    Custom,
}

impl SortStrategy {
    pub const ALL: [Self; 7] = [
        Self::Alphabetical,
        Self::ReverseAlphabetical,
        Self::Ranked,
        Self::Age,
        Self::Timezone,
        Self::JoinDate,
        Self::Custom,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alphabetical => "alphabetical",
            Self::ReverseAlphabetical => "reverse_alphabetical",
            Self::Ranked => "ranked",
            Self::Age => "age",
            Self::Timezone => "timezone",
            Self::JoinDate => "join_date",
            Self::Custom => "custom",
        }
    }

    /// Strategies that read profile data from the profile source.
    #[must_use]
    pub const fn needs_profiles(self) -> bool {
        matches!(self, Self::Age | Self::Timezone | Self::JoinDate)
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortStrategy {
    type Err = SettingsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();

        match normalized.as_str() {
            "alphabetical" => Ok(Self::Alphabetical),
            "reverse_alphabetical" => Ok(Self::ReverseAlphabetical),
            "ranked" | "placements" | "alumni_placements" => Ok(Self::Ranked),
            "age" => Ok(Self::Age),
            "timezone" => Ok(Self::Timezone),
            "join_date" => Ok(Self::JoinDate),
            "custom" => Ok(Self::Custom),
            _ => Err(SettingsError::UnknownStrategy(raw.to_string())),
        }
    }
}

///
/// RosterSettings
///
/// Every recognized roster option with its default. Unknown keys are
/// rejected when the owning roster record is loaded.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RosterSettings {
    /// Roster-level ordering; a group's own override wins over this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_strategy: Option<SortStrategy>,

    pub show_rankings: bool,

    /// Cap on members shown per group section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_display: Option<NonZeroU32>,
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self {
            sort_strategy: None,
            show_rankings: true,
            max_display: None,
        }
    }
}

impl RosterSettings {
    #[must_use]
    pub fn with_sort_strategy(mut self, strategy: SortStrategy) -> Self {
        self.sort_strategy = Some(strategy);
        self
    }

    /// Parse a raw settings object from the store document.
    ///
    /// `null` (or an absent object) yields the defaults.
    pub fn from_value(raw: &serde_json::Value) -> Result<Self, SettingsError> {
        if raw.is_null() {
            return Ok(Self::default());
        }

        Self::deserialize(raw).map_err(|err| SettingsError::Invalid(err.to_string()))
    }

    /// Render the settings back into the raw store shape.
    pub fn to_value(&self) -> Result<serde_json::Value, SettingsError> {
        serde_json::to_value(self).map_err(|err| SettingsError::Invalid(err.to_string()))
    }
}

///
/// TESTS
///
