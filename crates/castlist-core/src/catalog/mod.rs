//! Module: catalog
//! Responsibility: materialize every roster of a community, native and
//! virtualized legacy, behind one read-only view.
//! Does not own: choosing which roster to show, member ordering, or writes.
//! Boundary: the only module that knows legacy tags and native records are
//! two shapes of the same concept.

mod legacy;
mod write;


pub use legacy::{LEGACY_ID_PREFIX, is_legacy_id, legacy_roster_id};
pub use write::{
    NATIVE_ID_PREFIX, NewRoster, assign_group, create_roster, delete_roster, mint_roster_id,
    record_placement, set_active_season,
};

use crate::{
    ids::{CommunityId, GroupId, RosterId, SeasonId},
    model::{
        MalformedRecord, RecordKind,
        document::{CommunityData, NativeRosterRecord},
        membership::GroupAssignment,
        placement::PlacementTable,
        roster::{RosterEntity, RosterOrigin},
        settings::{RosterSettings, SettingsError},
    },
    store::{CommunityStore, StoreError},
};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// CatalogError
///

#[derive(Debug, ThisError)]
pub enum CatalogError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("roster '{id}' does not exist")]
    UnknownRoster { id: RosterId },

    #[error("roster '{id}' is virtualized from a legacy tag and cannot be modified")]
    VirtualRoster { id: RosterId },

    #[error("roster '{existing}' already uses the name '{name}'")]
    NameTaken { name: String, existing: RosterId },

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Malformed(#[from] MalformedRecord),
}

impl CatalogError {
    pub(crate) fn unknown_roster(id: &RosterId) -> Self {
        Self::UnknownRoster { id: id.clone() }
    }

    pub(crate) fn virtual_roster(id: &RosterId) -> Self {
        Self::VirtualRoster { id: id.clone() }
    }
}

/// Load one community and materialize its full roster catalog.
///
/// A store failure fails the whole call; no partial catalog is returned.
pub fn list_all_rosters<S>(
    store: &S,
    community: &CommunityId,
) -> Result<RosterCatalog, CatalogError>
where
    S: CommunityStore + ?Sized,
{
    let data = store.load_community(community)?;

    Ok(RosterCatalog::from_document(&data))
}

///
/// RosterCatalog
///
/// Result of one virtualization pass over a community document. Rosters are
/// ordered natives first (creation time, then name), then legacy rosters by
/// name. Rebuilding from an unchanged document yields identical output.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RosterCatalog {
    rosters: Vec<RosterEntity>,
    assignments: Vec<GroupAssignment>,
    skipped: Vec<MalformedRecord>,
}

impl RosterCatalog {
    #[must_use]
    pub fn from_document(data: &CommunityData) -> Self {
        let mut skipped = Vec::new();

        let mut natives: Vec<RosterEntity> = Vec::with_capacity(data.rosters.len());
        for (id, stored) in &data.rosters {
            let entity = stored
                .get()
                .map_err(|reason| MalformedRecord::new(RecordKind::Roster, id.as_str(), reason))
                .and_then(|record| native_entity(id, record));
            match entity {
                Ok(entity) => natives.push(entity),
                Err(err) => skip(&mut skipped, err),
            }
        }
        natives.sort_by(RosterEntity::cmp_by_age_then_name);

        let mut assignments: Vec<GroupAssignment> = Vec::with_capacity(data.memberships.len());
        for stored in &data.memberships {
            let assignment = stored
                .get()
                .map_err(|reason| {
                    let key = stored.raw_str("groupId").unwrap_or_default();
                    MalformedRecord::new(RecordKind::Membership, key, reason)
                })
                .and_then(GroupAssignment::from_record);
            match assignment {
                Ok(assignment) if assignments.iter().any(|a| a.group_id == assignment.group_id) => {
                    skip(
                        &mut skipped,
                        MalformedRecord::new(
                            RecordKind::Membership,
                            assignment.group_id.as_str(),
                            "duplicate membership record for group",
                        ),
                    );
                }
                Ok(assignment) => assignments.push(assignment),
                Err(err) => skip(&mut skipped, err),
            }
        }

        let legacy = virtualize_tags(&natives, &assignments, &mut skipped);

        let mut rosters = natives;
        rosters.extend(legacy);

        Self {
            rosters,
            assignments,
            skipped,
        }
    }

    /// Every roster in catalog order.
    #[must_use]
    pub fn rosters(&self) -> &[RosterEntity] {
        &self.rosters
    }

    pub fn ids(&self) -> impl Iterator<Item = &RosterId> {
        self.rosters.iter().map(|roster| &roster.id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rosters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rosters.is_empty()
    }

    pub fn native(&self) -> impl Iterator<Item = &RosterEntity> {
        self.rosters.iter().filter(|roster| roster.is_native())
    }

    pub fn legacy(&self) -> impl Iterator<Item = &RosterEntity> {
        self.rosters.iter().filter(|roster| roster.is_legacy())
    }

    #[must_use]
    pub fn by_id(&self, id: &RosterId) -> Option<&RosterEntity> {
        self.rosters.iter().find(|roster| &roster.id == id)
    }

    /// First roster named `name` in catalog order, natives first.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&RosterEntity> {
        let name = name.trim();

        self.rosters.iter().find(|roster| roster.name == name)
    }

    /// Rosters linked to `season`, in catalog order.
    pub fn for_season<'a>(
        &'a self,
        season: &'a SeasonId,
    ) -> impl Iterator<Item = &'a RosterEntity> {
        self.rosters
            .iter()
            .filter(move |roster| roster.season_id.as_ref() == Some(season))
    }

    /// Validated group assignments in stored order.
    #[must_use]
    pub fn assignments(&self) -> &[GroupAssignment] {
        &self.assignments
    }

    #[must_use]
    pub fn assignment(&self, group: &GroupId) -> Option<&GroupAssignment> {
        self.assignments.iter().find(|a| &a.group_id == group)
    }

    /// Groups displayed under `roster`, in stored order.
    ///
    /// A group belongs to a roster when it lists the roster id, or when its
    /// legacy tag equals the roster name. The second rule is what lets a
    /// native roster take over a same-named legacy tag.
    pub fn groups_for<'a>(
        &'a self,
        roster: &'a RosterEntity,
    ) -> impl Iterator<Item = &'a GroupAssignment> {
        self.assignments
            .iter()
            .filter(move |assignment| belongs_to(assignment, roster))
    }

    /// Rosters `group` is displayed under, in catalog order.
    #[must_use]
    pub fn rosters_for_group(&self, group: &GroupId) -> Vec<&RosterEntity> {
        let Some(assignment) = self.assignment(group) else {
            return Vec::new();
        };

        self.rosters
            .iter()
            .filter(|roster| belongs_to(assignment, roster))
            .collect()
    }

    /// Records excluded from this catalog as malformed.
    #[must_use]
    pub fn skipped(&self) -> &[MalformedRecord] {
        &self.skipped
    }
}

///
/// CommunitySnapshot
///
/// Everything one request reads from a community document, decoded once.
///

#[derive(Clone, Debug, Default)]
pub struct CommunitySnapshot {
    pub catalog: RosterCatalog,
    pub placements: PlacementTable,
    pub active_season: Option<SeasonId>,
}

impl CommunitySnapshot {
    #[must_use]
    pub fn from_document(data: &CommunityData) -> Self {
        Self {
            catalog: RosterCatalog::from_document(data),
            placements: PlacementTable::from_raw(&data.placements),
            active_season: active_season(data),
        }
    }

    pub fn load<S>(store: &S, community: &CommunityId) -> Result<Self, CatalogError>
    where
        S: CommunityStore + ?Sized,
    {
        let data = store.load_community(community)?;

        Ok(Self::from_document(&data))
    }
}

// The stored active season; an undecodable context counts as none.
fn active_season(data: &CommunityData) -> Option<SeasonId> {
    match data.active_context.get() {
        Ok(context) => context.active_season_id.clone(),
        Err(reason) => {
            tracing::warn!(%reason, "ignoring malformed active context");
            None
        }
    }
}

fn belongs_to(assignment: &GroupAssignment, roster: &RosterEntity) -> bool {
    assignment.roster_ids.contains(&roster.id)
        || assignment.legacy_tag.as_deref() == Some(roster.name.as_str())
}

fn skip(skipped: &mut Vec<MalformedRecord>, err: MalformedRecord) {
    tracing::warn!(
        kind = %err.kind,
        key = %err.key,
        reason = %err.reason,
        "skipping malformed record"
    );
    skipped.push(err);
}

// Validate one stored native roster record.
fn native_entity(
    id: &RosterId,
    record: &NativeRosterRecord,
) -> Result<RosterEntity, MalformedRecord> {
    let malformed = |reason: String| MalformedRecord::new(RecordKind::Roster, id.as_str(), reason);

    if id.is_blank() {
        return Err(malformed("missing roster id".to_string()));
    }
    if is_legacy_id(id) {
        return Err(malformed(format!(
            "native roster id uses reserved prefix '{LEGACY_ID_PREFIX}'"
        )));
    }

    let name = record.name.trim();
    if name.is_empty() {
        return Err(malformed("missing roster name".to_string()));
    }

    let settings =
        RosterSettings::from_value(&record.settings).map_err(|err| malformed(err.to_string()))?;

    Ok(RosterEntity {
        id: id.clone(),
        name: name.to_string(),
        kind: record.kind,
        season_id: record.season_id.clone().filter(|season| !season.is_blank()),
        settings,
        origin: RosterOrigin::Native,
        created_at: record.created_at,
    })
}

// Synthesize one virtual roster per distinct legacy tag not shadowed by a
// native roster of the same name. Output is ordered by tag.
fn virtualize_tags(
    natives: &[RosterEntity],
    assignments: &[GroupAssignment],
    skipped: &mut Vec<MalformedRecord>,
) -> Vec<RosterEntity> {
    let native_names: BTreeSet<&str> = natives.iter().map(|roster| roster.name.as_str()).collect();
    let tags: BTreeSet<&str> = assignments
        .iter()
        .filter_map(|assignment| assignment.legacy_tag.as_deref())
        .filter(|tag| !native_names.contains(tag))
        .collect();

    let mut seen: BTreeMap<RosterId, &str> = BTreeMap::new();
    let mut legacy = Vec::with_capacity(tags.len());

    for tag in tags {
        let entity = legacy::synthesize(tag);

        if let Some(existing) = seen.get(&entity.id) {
            skip(
                skipped,
                MalformedRecord::new(
                    RecordKind::Membership,
                    tag,
                    format!("legacy tag id collides with tag '{existing}'"),
                ),
            );
            continue;
        }

        seen.insert(entity.id.clone(), tag);
        legacy.push(entity);
    }

    legacy
}
