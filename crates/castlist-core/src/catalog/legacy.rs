//! Legacy tag virtualization.
//!
//! Invariants:
//! - A legacy roster id depends only on its tag string.
//! - Synthesized rosters are never written back to the native collection.

use crate::{
    ids::RosterId,
    model::{
        roster::{RosterEntity, RosterKind, RosterOrigin},
        settings::{RosterSettings, SortStrategy},
    },
};
use xxhash_rust::xxh3::xxh3_64;

/// Id prefix reserved for synthesized legacy rosters.
pub const LEGACY_ID_PREFIX: &str = "legacy_";

/// Derive the stable roster id for a legacy tag.
#[must_use]
pub fn legacy_roster_id(tag: &str) -> RosterId {
    RosterId::new(format!("{LEGACY_ID_PREFIX}{:016x}", xxh3_64(tag.as_bytes())))
}

/// True when `id` lives in the reserved legacy id space.
#[must_use]
pub fn is_legacy_id(id: &RosterId) -> bool {
    id.as_str().starts_with(LEGACY_ID_PREFIX)
}

/// Build the virtual roster entity standing in for `tag`.
pub(super) fn synthesize(tag: &str) -> RosterEntity {
    RosterEntity {
        id: legacy_roster_id(tag),
        name: tag.to_string(),
        kind: RosterKind::Default,
        season_id: None,
        settings: RosterSettings::default().with_sort_strategy(SortStrategy::Alphabetical),
        origin: RosterOrigin::Legacy,
        created_at: None,
    }
}

///
/// TESTS
///
