use crate::{
    ids::{RosterId, SeasonId},
    model::{
        placement::PlacementNamespace,
        settings::{RosterSettings, SortStrategy},
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// RosterKind
/// Variant tag selecting sort/display behavior.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterKind {
    #[default]
    Default,
    #[serde(alias = "alumni_placements")]
    Ranked,
}

impl RosterKind {
    /// Ordering implied by the roster type when nothing more specific is set.
    #[must_use]
    pub const fn default_strategy(self) -> Option<SortStrategy> {
        match self {
            Self::Default => None,
            Self::Ranked => Some(SortStrategy::Ranked),
        }
    }
}

///
/// RosterOrigin
///
/// Which persisted representation a roster was read from. Legacy rosters are
/// synthesized from inline membership tags on every read and never written.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterOrigin {
    Legacy,
    Native,
}

///
/// RosterEntity
/// The unit of display: one castlist.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntity {
    pub id: RosterId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RosterKind,
    pub season_id: Option<SeasonId>,
    pub settings: RosterSettings,
    pub origin: RosterOrigin,
    pub created_at: Option<DateTime<Utc>>,
}

impl RosterEntity {
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        matches!(self.origin, RosterOrigin::Legacy)
    }

    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(self.origin, RosterOrigin::Native)
    }

    /// Placement namespace this roster's ranks are recorded under.
    #[must_use]
    pub fn placement_namespace(&self) -> PlacementNamespace {
        PlacementNamespace::for_season(self.season_id.as_ref())
    }

    /// Ordering for one group: its override, else the roster setting, else
    /// the roster type's ordering, else alphabetical.
    #[must_use]
    pub fn effective_strategy(&self, group_override: Option<SortStrategy>) -> SortStrategy {
        group_override
            .or(self.settings.sort_strategy)
            .or(self.kind.default_strategy())
            .unwrap_or_default()
    }

    // Deterministic tie-break shared by the catalog and the resolver:
    // creation time ascending (undated last), then name, then id.
    pub(crate) fn cmp_by_age_then_name(&self, other: &Self) -> Ordering {
        let created = match (&self.created_at, &other.created_at) {
            (Some(left), Some(right)) => left.cmp(right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        created
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.id.cmp(&other.id))
    }
}

///
/// TESTS
///
