//! Raw community document as persisted by the store.
//!
//! These types mirror the stored JSON and are deliberately lenient at two
//! levels. Missing fields default to empty, and a record whose fields have
//! the wrong shape is kept verbatim as `Stored::Undecodable`. Either way one
//! bad record is detected and skipped during catalog materialization
//! instead of failing the whole document decode, and survives a save.

use crate::{
    ids::{GroupId, MemberId, RosterId, SeasonId},
    model::roster::RosterKind,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;

///
/// CommunityData
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommunityData {
    pub memberships: Vec<Stored<MembershipRecord>>,

    /// Native roster records keyed by roster id.
    pub rosters: BTreeMap<RosterId, Stored<NativeRosterRecord>>,

    /// Placement namespace key -> member -> placement.
    pub placements: BTreeMap<String, BTreeMap<MemberId, Stored<PlacementEntry>>>,

    pub active_context: Stored<ActiveContext>,
}

impl CommunityData {
    /// Decoded membership record for `group`, if one exists.
    pub fn membership_mut(&mut self, group: &GroupId) -> Option<&mut MembershipRecord> {
        self.memberships
            .iter_mut()
            .filter_map(Stored::decoded_mut)
            .find(|record| &record.group_id == group)
    }

    /// Every decoded membership record, for in-place edits.
    pub fn memberships_mut(&mut self) -> impl Iterator<Item = &mut MembershipRecord> {
        self.memberships.iter_mut().filter_map(Stored::decoded_mut)
    }

    #[must_use]
    pub fn active_season(&self) -> Option<&SeasonId> {
        self.active_context
            .decoded()
            .and_then(|context| context.active_season_id.as_ref())
    }

    pub fn set_active_season(&mut self, season: Option<SeasonId>) {
        self.active_context = ActiveContext {
            active_season_id: season,
        }
        .into();
    }
}

///
/// Stored
///
/// One stored record. A record that does not fit `T` is kept as raw JSON so
/// it can be reported as malformed and written back unchanged.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Stored<T> {
    Decoded(T),
    Undecodable(serde_json::Value),
}

impl<T> Stored<T> {
    #[must_use]
    pub const fn decoded(&self) -> Option<&T> {
        match self {
            Self::Decoded(record) => Some(record),
            Self::Undecodable(_) => None,
        }
    }

    pub const fn decoded_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Decoded(record) => Some(record),
            Self::Undecodable(_) => None,
        }
    }

    /// A string field of an undecodable record, used to name it in errors.
    #[must_use]
    pub fn raw_str(&self, field: &str) -> Option<&str> {
        match self {
            Self::Decoded(_) => None,
            Self::Undecodable(raw) => raw.get(field).and_then(serde_json::Value::as_str),
        }
    }
}

impl<T: DeserializeOwned> Stored<T> {
    /// The decoded record, or the reason it could not be decoded.
    pub fn get(&self) -> Result<&T, String> {
        match self {
            Self::Decoded(record) => Ok(record),
            Self::Undecodable(raw) => Err(match serde_json::from_value::<T>(raw.clone()) {
                Err(err) => err.to_string(),
                Ok(_) => "record could not be decoded".to_string(),
            }),
        }
    }
}

impl<T> From<T> for Stored<T> {
    fn from(record: T) -> Self {
        Self::Decoded(record)
    }
}

impl<T: Default> Default for Stored<T> {
    fn default() -> Self {
        Self::Decoded(T::default())
    }
}

///
/// MembershipRecord
/// One group's roster assignments, legacy and native.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MembershipRecord {
    pub group_id: GroupId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_tag: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roster_ids: Vec<RosterId>,

    /// Raw strategy name; validated when the catalog is built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_override: Option<String>,
}

impl MembershipRecord {
    #[must_use]
    pub fn new(group_id: impl Into<GroupId>) -> Self {
        Self {
            group_id: group_id.into(),
            ..Self::default()
        }
    }
}

///
/// NativeRosterRecord
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NativeRosterRecord {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: RosterKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_id: Option<SeasonId>,

    /// Raw settings object; parsed into `RosterSettings` on read.
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub settings: serde_json::Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

///
/// PlacementEntry
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct PlacementEntry {
    pub placement: Option<i64>,
}

impl PlacementEntry {
    #[must_use]
    pub fn new(placement: u32) -> Self {
        Self {
            placement: Some(i64::from(placement)),
        }
    }
}

///
/// ActiveContext
/// Community-wide pointer to the season unqualified requests default to.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActiveContext {
    pub active_season_id: Option<SeasonId>,
}

///
/// TESTS
///
