//! Module: sort
//! Responsibility: order one group's members under the effective strategy.
//! Does not own: choosing the roster or fetching the member list.
//! Boundary: total over optional data; only a member without an id fails.

mod timezone;

#[cfg(test)]
mod tests;

pub use timezone::utc_offset_minutes;

use crate::{
    ids::MemberId,
    model::{
        MalformedRecord, RecordKind,
        member::{Member, OrderedMember, Profile},
        placement::PlacementTable,
        roster::RosterEntity,
        settings::SortStrategy,
    },
    store::{ProfileSource, ProfileSourceError},
};
use std::{cmp::Ordering, collections::BTreeMap};
use thiserror::Error as ThisError;

///
/// SortError
///

#[derive(Debug, ThisError)]
pub enum SortError {
    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecord),
}

///
/// SortContext
///
/// Optional data the strategies may consult. A missing source is treated
/// like an offline one: the strategy needing it falls back to alphabetical.
///

#[derive(Clone, Copy, Default)]
pub struct SortContext<'a> {
    pub placements: Option<&'a PlacementTable>,
    pub profiles: Option<&'a dyn ProfileSource>,
    pub custom_order: &'a [MemberId],
}

impl<'a> SortContext<'a> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            placements: None,
            profiles: None,
            custom_order: &[],
        }
    }

    #[must_use]
    pub const fn with_placements(mut self, placements: &'a PlacementTable) -> Self {
        self.placements = Some(placements);
        self
    }

    #[must_use]
    pub fn with_profiles(mut self, profiles: &'a dyn ProfileSource) -> Self {
        self.profiles = Some(profiles);
        self
    }

    #[must_use]
    pub const fn with_custom_order(mut self, order: &'a [MemberId]) -> Self {
        self.custom_order = order;
        self
    }
}

impl std::fmt::Debug for SortContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortContext")
            .field("placements", &self.placements)
            .field("profiles", &self.profiles.is_some())
            .field("custom_order", &self.custom_order)
            .finish()
    }
}

///
/// SortedMembers
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortedMembers {
    pub members: Vec<OrderedMember>,

    /// Strategy selected by override/setting precedence.
    pub requested: SortStrategy,

    /// Strategy actually applied; differs only after a data-source fallback.
    pub applied: SortStrategy,
}

impl SortedMembers {
    #[must_use]
    pub fn fell_back(&self) -> bool {
        self.requested != self.applied
    }
}

// Why a data-dependent strategy could not run.
#[derive(Debug)]
struct Unavailable(String);

impl From<ProfileSourceError> for Unavailable {
    fn from(err: ProfileSourceError) -> Self {
        Self(err.to_string())
    }
}

// Member plus its precomputed case-folded sort key.
struct Keyed<'m> {
    member: &'m Member,
    folded: String,
}

impl<'m> Keyed<'m> {
    fn new(member: &'m Member) -> Self {
        Self {
            member,
            folded: member.display_name.to_lowercase(),
        }
    }

    fn alphabetical(&self, other: &Self) -> Ordering {
        self.folded
            .cmp(&other.folded)
            .then_with(|| self.member.id.cmp(&other.member.id))
    }

    fn plain(&self) -> OrderedMember {
        OrderedMember::plain(self.member.clone())
    }
}

/// Order `members` for display under `roster`.
///
/// The output is always a permutation of the input. Placements are read
/// from the roster's own namespace.
pub fn sort_members(
    members: &[Member],
    roster: &RosterEntity,
    group_override: Option<SortStrategy>,
    ctx: &SortContext<'_>,
) -> Result<SortedMembers, SortError> {
    if let Some(member) = members.iter().find(|member| member.id.is_blank()) {
        return Err(MalformedRecord::new(
            RecordKind::Member,
            member.display_name.clone(),
            "missing member id",
        )
        .into());
    }

    let requested = roster.effective_strategy(group_override);
    let keyed: Vec<Keyed<'_>> = members.iter().map(Keyed::new).collect();

    let outcome = match requested {
        SortStrategy::Alphabetical => Ok(alphabetical(keyed)),
        SortStrategy::ReverseAlphabetical => Ok(reverse_alphabetical(keyed)),
        SortStrategy::Ranked => ranked(keyed, roster, ctx),
        SortStrategy::Age => by_profile(keyed, ctx, |profile| profile.age),
        SortStrategy::Timezone => by_profile(keyed, ctx, |profile| {
            profile.timezone.as_deref().and_then(utc_offset_minutes)
        }),
        SortStrategy::JoinDate => by_profile(keyed, ctx, |profile| profile.joined_at),
        SortStrategy::Custom => Ok(custom(keyed, ctx.custom_order)),
    };

    match outcome {
        Ok(members) => Ok(SortedMembers {
            members,
            requested,
            applied: requested,
        }),
        Err(Unavailable(reason)) => {
            tracing::warn!(
                roster = %roster.id,
                strategy = %requested,
                %reason,
                "sort data unavailable; falling back to alphabetical"
            );

            Ok(SortedMembers {
                members: alphabetical(members.iter().map(Keyed::new).collect()),
                requested,
                applied: SortStrategy::Alphabetical,
            })
        }
    }
}

fn alphabetical(mut keyed: Vec<Keyed<'_>>) -> Vec<OrderedMember> {
    keyed.sort_by(Keyed::alphabetical);
    keyed.iter().map(Keyed::plain).collect()
}

// Names descend; equal names still order by ascending id.
fn reverse_alphabetical(mut keyed: Vec<Keyed<'_>>) -> Vec<OrderedMember> {
    keyed.sort_by(|left, right| {
        right
            .folded
            .cmp(&left.folded)
            .then_with(|| left.member.id.cmp(&right.member.id))
    });
    keyed.iter().map(Keyed::plain).collect()
}

fn ranked(
    keyed: Vec<Keyed<'_>>,
    roster: &RosterEntity,
    ctx: &SortContext<'_>,
) -> Result<Vec<OrderedMember>, Unavailable> {
    let table = ctx
        .placements
        .ok_or_else(|| Unavailable("no placement data".to_string()))?;
    let namespace = roster.placement_namespace();

    let mut rows: Vec<_> = keyed
        .into_iter()
        .map(|entry| (table.placement(&namespace, &entry.member.id), entry))
        .collect();
    rows.sort_by(|(left_rank, left), (right_rank, right)| {
        present_first(left_rank.as_ref(), right_rank.as_ref())
            .then_with(|| left.alphabetical(right))
    });

    Ok(rows
        .into_iter()
        .map(|(rank, entry)| OrderedMember {
            member: entry.member.clone(),
            prefix: rank.map(|rank| format!("{rank}) ")),
        })
        .collect())
}

// Ascending by a profile-derived key; members without one go last.
fn by_profile<K: Ord>(
    keyed: Vec<Keyed<'_>>,
    ctx: &SortContext<'_>,
    key_of: impl Fn(&Profile) -> Option<K>,
) -> Result<Vec<OrderedMember>, Unavailable> {
    let profiles = ctx
        .profiles
        .ok_or_else(|| Unavailable("no profile source".to_string()))?;

    let mut rows = Vec::with_capacity(keyed.len());
    for entry in keyed {
        let key = profiles
            .profile(&entry.member.id)?
            .as_ref()
            .and_then(&key_of);
        rows.push((key, entry));
    }
    rows.sort_by(|(left_key, left), (right_key, right)| {
        present_first(left_key.as_ref(), right_key.as_ref())
            .then_with(|| left.alphabetical(right))
    });

    Ok(rows.iter().map(|(_, entry)| entry.plain()).collect())
}

fn custom(keyed: Vec<Keyed<'_>>, order: &[MemberId]) -> Vec<OrderedMember> {
    // First occurrence wins when the explicit list repeats an id.
    let mut position = BTreeMap::new();
    for (index, id) in order.iter().enumerate() {
        position.entry(id).or_insert(index);
    }

    let mut rows: Vec<_> = keyed
        .into_iter()
        .map(|entry| (position.get(&entry.member.id).copied(), entry))
        .collect();
    rows.sort_by(|(left_pos, left), (right_pos, right)| {
        present_first(left_pos.as_ref(), right_pos.as_ref())
            .then_with(|| left.alphabetical(right))
    });

    rows.iter().map(|(_, entry)| entry.plain()).collect()
}

fn present_first<K: Ord>(left: Option<&K>, right: Option<&K>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
