//! Shared fixtures for unit tests.

use crate::{
    catalog::{CommunitySnapshot, RosterCatalog},
    ids::RosterId,
    model::{
        document::CommunityData,
        member::Member,
        roster::{RosterEntity, RosterKind, RosterOrigin},
        settings::RosterSettings,
    },
};
use chrono::{DateTime, Utc};
use serde_json::json;

pub(crate) fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).expect("fixture timestamp should be in range")
}

pub(crate) fn native_roster(id: &str, name: &str) -> RosterEntity {
    RosterEntity {
        id: RosterId::new(id),
        name: name.to_string(),
        kind: RosterKind::Default,
        season_id: None,
        settings: RosterSettings::default(),
        origin: RosterOrigin::Native,
        created_at: None,
    }
}

pub(crate) fn member(id: &str, name: &str) -> Member {
    Member::new(id, name)
}

pub(crate) fn document(value: serde_json::Value) -> CommunityData {
    serde_json::from_value(value).expect("fixture document should decode")
}

pub(crate) fn catalog(value: serde_json::Value) -> RosterCatalog {
    RosterCatalog::from_document(&document(value))
}

pub(crate) fn snapshot(value: serde_json::Value) -> CommunitySnapshot {
    CommunitySnapshot::from_document(&document(value))
}

/// A community mid-migration: two native rosters (one season-linked), two
/// legacy tags of which one is shadowed by a native roster, and placements
/// in both the season and global namespaces.
pub(crate) fn mixed_community() -> serde_json::Value {
    json!({
        "memberships": [
            { "groupId": "role-red", "legacyTag": "Tribe X" },
            { "groupId": "role-blue", "legacyTag": "Tribe Y", "sortOverride": "age" },
            { "groupId": "role-green", "rosterIds": ["castlist_s1"] },
            { "groupId": "role-gold", "rosterIds": ["castlist_s1", "castlist_alumni"] },
        ],
        "rosters": {
            "castlist_s1": {
                "name": "Season One",
                "seasonId": "S1",
                "createdAt": "2024-01-01T00:00:00Z",
            },
            "castlist_alumni": {
                "name": "Tribe Y",
                "type": "ranked",
                "settings": { "sortStrategy": "ranked" },
                "createdAt": "2023-06-01T00:00:00Z",
            },
        },
        "placements": {
            "S1": { "m1": { "placement": 2 }, "m2": { "placement": 1 } },
            "global": { "m3": { "placement": 1 } },
        },
        "activeContext": { "activeSeasonId": "S1" },
    })
}
