//! Document mutations behind the management actions.
//!
//! Every function edits a loaded `CommunityData` in place; persisting it is
//! the caller's job. Virtual rosters are never written: they exist only as
//! tags on membership records.

use super::{CatalogError, RosterCatalog, native_entity};
use crate::{
    ids::{GroupId, MemberId, RosterId, SeasonId},
    model::{
        MalformedRecord, RecordKind,
        document::{CommunityData, MembershipRecord, NativeRosterRecord, PlacementEntry},
        placement::PlacementNamespace,
        roster::{RosterEntity, RosterKind},
        settings::RosterSettings,
    },
};
use chrono::{DateTime, Utc};
use std::num::NonZeroU32;
use ulid::Ulid;
use xxhash_rust::xxh3::xxh3_128;

/// Id prefix for rosters created through the management actions.
pub const NATIVE_ID_PREFIX: &str = "castlist_";

/// Mint a native roster id from its creation time and name.
///
/// Deterministic for a given `(created_at, name)`; the name hash fills the
/// ULID's random field.
#[must_use]
pub fn mint_roster_id(name: &str, created_at: DateTime<Utc>) -> RosterId {
    let millis = u64::try_from(created_at.timestamp_millis()).unwrap_or(0);
    let ulid = Ulid::from_parts(millis, xxh3_128(name.as_bytes()));

    RosterId::new(format!("{NATIVE_ID_PREFIX}{ulid}"))
}

///
/// NewRoster
/// Input to roster creation.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NewRoster {
    pub name: String,
    pub kind: RosterKind,
    pub season_id: Option<SeasonId>,
    pub settings: RosterSettings,
}

impl NewRoster {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: RosterKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_season(mut self, season: impl Into<SeasonId>) -> Self {
        self.season_id = Some(season.into());
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: RosterSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Insert a new native roster. A native roster may reuse a legacy tag's
/// name; it then takes over the groups carrying that tag.
pub fn create_roster(
    data: &mut CommunityData,
    new: NewRoster,
    now: DateTime<Utc>,
) -> Result<RosterEntity, CatalogError> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(MalformedRecord::new(RecordKind::Roster, "", "missing roster name").into());
    }

    let catalog = RosterCatalog::from_document(data);
    if let Some(existing) = catalog.native().find(|roster| roster.name == name) {
        return Err(CatalogError::NameTaken {
            name: name.to_string(),
            existing: existing.id.clone(),
        });
    }

    let id = mint_roster_id(name, now);
    if data.rosters.contains_key(&id) {
        return Err(CatalogError::NameTaken {
            name: name.to_string(),
            existing: id,
        });
    }

    let record = NativeRosterRecord {
        name: name.to_string(),
        kind: new.kind,
        season_id: new.season_id,
        settings: new.settings.to_value()?,
        created_at: Some(now),
    };
    let entity = native_entity(&id, &record)?;
    data.rosters.insert(id, record.into());

    tracing::debug!(roster = %entity.id, name = %entity.name, "created roster");

    Ok(entity)
}

/// Remove a native roster and every group link to it.
pub fn delete_roster(data: &mut CommunityData, id: &RosterId) -> Result<(), CatalogError> {
    if data.rosters.remove(id).is_none() {
        return Err(missing_or_virtual(data, id));
    }

    for membership in data.memberships_mut() {
        membership.roster_ids.retain(|linked| linked != id);
    }

    tracing::debug!(roster = %id, "deleted roster");

    Ok(())
}

/// Link `group` to a native roster, creating its membership record if
/// needed. Linking twice is a no-op.
pub fn assign_group(
    data: &mut CommunityData,
    group: &GroupId,
    id: &RosterId,
) -> Result<(), CatalogError> {
    if group.is_blank() {
        return Err(MalformedRecord::new(RecordKind::Membership, "", "missing group id").into());
    }

    let catalog = RosterCatalog::from_document(data);
    match catalog.by_id(id) {
        Some(roster) if roster.is_native() => {}
        _ => return Err(missing_or_virtual(data, id)),
    }

    if data.membership_mut(group).is_none() {
        data.memberships.push(MembershipRecord::new(group.clone()).into());
    }
    if let Some(membership) = data.membership_mut(group)
        && !membership.roster_ids.contains(id)
    {
        membership.roster_ids.push(id.clone());
    }

    tracing::debug!(roster = %id, group = %group, "assigned group");

    Ok(())
}

/// Record (or overwrite) one member's placement in a namespace.
pub fn record_placement(
    data: &mut CommunityData,
    namespace: &PlacementNamespace,
    member: &MemberId,
    placement: NonZeroU32,
) -> Result<(), CatalogError> {
    if member.is_blank() {
        return Err(MalformedRecord::new(RecordKind::Member, "", "missing member id").into());
    }

    data.placements
        .entry(namespace.key().to_string())
        .or_default()
        .insert(member.clone(), PlacementEntry::new(placement.get()).into());

    Ok(())
}

pub fn set_active_season(data: &mut CommunityData, season: Option<SeasonId>) {
    data.set_active_season(season.filter(|season| !season.is_blank()));
}

// Classify an id that is not a stored native roster.
fn missing_or_virtual(data: &CommunityData, id: &RosterId) -> CatalogError {
    let catalog = RosterCatalog::from_document(data);

    match catalog.by_id(id) {
        Some(roster) if roster.is_legacy() => CatalogError::virtual_roster(id),
        _ => CatalogError::unknown_roster(id),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::legacy_roster_id,
        model::document::Stored,
        test_fixtures::{at, document, mixed_community},
    };

    #[test]
    fn minted_ids_are_deterministic_and_prefixed() {
        let first = mint_roster_id("Season Two", at(1_700_000_000));
        let again = mint_roster_id("Season Two", at(1_700_000_000));
        let other = mint_roster_id("Season Three", at(1_700_000_000));

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert!(first.as_str().starts_with(NATIVE_ID_PREFIX));
        assert_eq!(first.as_str().len(), NATIVE_ID_PREFIX.len() + 26);
    }

    #[test]
    fn created_roster_takes_over_same_named_tag() {
        let mut data = document(mixed_community());

        let created = create_roster(&mut data, NewRoster::new(" Tribe X "), at(1_750_000_000))
            .expect("legacy names may be claimed");
        let catalog = RosterCatalog::from_document(&data);

        assert_eq!(created.name, "Tribe X");
        assert!(catalog.by_id(&legacy_roster_id("Tribe X")).is_none());
        let groups: Vec<_> = catalog.groups_for(&created).map(|a| a.group_id.as_str()).collect();
        assert_eq!(groups, ["role-red"]);
    }

    #[test]
    fn duplicate_native_name_is_rejected() {
        let mut data = document(mixed_community());

        let err = create_roster(&mut data, NewRoster::new("Season One"), at(1_750_000_000))
            .expect_err("name already used");

        assert!(matches!(
            err,
            CatalogError::NameTaken { existing, .. } if existing.as_str() == "castlist_s1"
        ));
    }

    #[test]
    fn blank_name_is_malformed() {
        let mut data = CommunityData::default();

        let err = create_roster(&mut data, NewRoster::new("  "), at(0)).expect_err("blank name");

        assert!(matches!(err, CatalogError::Malformed(_)));
        assert!(data.rosters.is_empty());
    }

    #[test]
    fn delete_unlinks_groups() {
        let mut data = document(mixed_community());

        delete_roster(&mut data, &RosterId::new("castlist_s1")).expect("native roster deletes");

        assert!(!data.rosters.contains_key(&RosterId::new("castlist_s1")));
        assert!(
            data.memberships
                .iter()
                .filter_map(Stored::decoded)
                .all(|m| !m.roster_ids.contains(&RosterId::new("castlist_s1")))
        );
    }

    #[test]
    fn virtual_and_unknown_rosters_cannot_be_written() {
        let mut data = document(mixed_community());
        let legacy = legacy_roster_id("Tribe X");

        assert!(matches!(
            delete_roster(&mut data, &legacy),
            Err(CatalogError::VirtualRoster { .. })
        ));
        assert!(matches!(
            assign_group(&mut data, &GroupId::new("role-new"), &legacy),
            Err(CatalogError::VirtualRoster { .. })
        ));
        assert!(matches!(
            delete_roster(&mut data, &RosterId::new("castlist_nope")),
            Err(CatalogError::UnknownRoster { .. })
        ));
    }

    #[test]
    fn assigning_creates_membership_once() {
        let mut data = document(mixed_community());
        let group = GroupId::new("role-new");
        let roster = RosterId::new("castlist_alumni");

        assign_group(&mut data, &group, &roster).expect("assigns");
        assign_group(&mut data, &group, &roster).expect("assigns again");

        let record = data.membership_mut(&group).expect("membership created");
        assert_eq!(record.roster_ids, [roster]);
    }

    #[test]
    fn placements_and_active_season_are_written() {
        let mut data = CommunityData::default();
        let season = PlacementNamespace::Season(SeasonId::new("S9"));

        record_placement(&mut data, &season, &MemberId::new("m1"), NonZeroU32::MIN)
            .expect("records placement");
        set_active_season(&mut data, Some(SeasonId::new("S9")));

        assert_eq!(data.placements["S9"][&MemberId::new("m1")], PlacementEntry::new(1).into());
        assert_eq!(data.active_season(), Some(&SeasonId::new("S9")));

        set_active_season(&mut data, Some(SeasonId::new(" ")));
        assert_eq!(data.active_season(), None);
    }
}
