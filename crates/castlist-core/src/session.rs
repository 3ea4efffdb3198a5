//! Module: session
//! Responsibility: the exposed castlist API over one store and one profile
//! source, composing catalog, resolver, sorter, pagination and navigation.
//! Does not own: transport, text rendering, or retry policy.
//! Boundary: every public method returns the public `Error`.

use crate::{
    catalog::{self, CatalogError, CommunitySnapshot, NewRoster, RosterCatalog},
    error::Error,
    ids::{CommunityId, GroupId, MemberId, RosterId, SeasonId},
    model::{
        document::CommunityData,
        member::Member,
        placement::PlacementNamespace,
        roster::RosterEntity,
        settings::SortStrategy,
    },
    nav::{NavCodec, NavState},
    page::{Page, Section, paginate},
    resolve::{CastlistRequest, ResolutionStep, ResolveError, Resolver},
    sort::{SortContext, SortedMembers, sort_members},
    store::{CommunityStore, ProfileSource},
    view::{CastlistView, apply_display},
};
use castlist_config::CastlistConfig;
use chrono::{DateTime, Utc};
use std::{collections::BTreeMap, num::NonZeroU32};

///
/// GroupMembers
///
/// Members per group as supplied by the transport for one request, plus an
/// optional explicit ordering used by the `custom` strategy.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GroupMembers {
    groups: BTreeMap<GroupId, Vec<Member>>,
    custom_order: Vec<MemberId>,
}

impl GroupMembers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_group(
        mut self,
        group: impl Into<GroupId>,
        members: impl IntoIterator<Item = Member>,
    ) -> Self {
        self.groups.insert(group.into(), members.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_custom_order(mut self, order: impl IntoIterator<Item = MemberId>) -> Self {
        self.custom_order = order.into_iter().collect();
        self
    }

    #[must_use]
    pub fn group(&self, group: &GroupId) -> Option<&[Member]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    #[must_use]
    pub fn custom_order(&self) -> &[MemberId] {
        &self.custom_order
    }
}

///
/// ResolvedCastlist
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedCastlist {
    pub roster: RosterEntity,
    pub step: ResolutionStep,
}

///
/// CastlistSession
///
/// Each read performs exactly one store load; each management action one
/// load and one save. Nothing is cached between calls.
///

#[derive(Debug)]
pub struct CastlistSession<S, P> {
    store: S,
    profiles: P,
    config: CastlistConfig,
    codec: NavCodec,
}

impl<S, P> CastlistSession<S, P>
where
    S: CommunityStore,
    P: ProfileSource,
{
    pub fn new(store: S, profiles: P, config: CastlistConfig) -> Result<Self, Error> {
        config.validate()?;
        let codec = NavCodec::from_config(&config.nav);

        Ok(Self {
            store,
            profiles,
            config,
            codec,
        })
    }

    #[must_use]
    pub fn with_defaults(store: S, profiles: P) -> Self {
        let config = CastlistConfig::default();
        let codec = NavCodec::from_config(&config.nav);

        Self {
            store,
            profiles,
            config,
            codec,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &CastlistConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Every roster of the community, native and virtualized legacy.
    pub fn list_all_rosters(&self, community: &CommunityId) -> Result<RosterCatalog, Error> {
        Ok(catalog::list_all_rosters(&self.store, community)?)
    }

    /// Decide which roster `request` means.
    ///
    /// When the request carries no active season, the community's stored
    /// active season is used.
    pub fn resolve_castlist(
        &self,
        community: &CommunityId,
        request: &CastlistRequest,
    ) -> Result<ResolvedCastlist, Error> {
        let snapshot = CommunitySnapshot::load(&self.store, community)?;

        self.resolve_in(&snapshot, request)
    }

    /// Order one group's members under `roster`.
    pub fn sorted_members(
        &self,
        roster: &RosterEntity,
        group_override: Option<SortStrategy>,
        members: &[Member],
        ctx: &SortContext<'_>,
    ) -> Result<SortedMembers, Error> {
        Ok(sort_members(members, roster, group_override, ctx)?)
    }

    pub fn encode_nav_state(&self, state: &NavState) -> Result<String, Error> {
        Ok(self.codec.encode(state)?)
    }

    /// Decode a token and confirm its roster still exists.
    ///
    /// A store failure is reported as such, not as invalid state.
    pub fn decode_nav_state(
        &self,
        community: &CommunityId,
        token: &str,
    ) -> Result<NavState, Error> {
        let catalog = catalog::list_all_rosters(&self.store, community)?;

        Ok(self.codec.decode_in(token, &catalog)?)
    }

    /// Resolve, sort every group, paginate, and return the first page.
    pub fn render(
        &self,
        community: &CommunityId,
        request: &CastlistRequest,
        members: &GroupMembers,
    ) -> Result<CastlistView, Error> {
        let snapshot = CommunitySnapshot::load(&self.store, community)?;
        let resolved = self.resolve_in(&snapshot, request)?;
        let pages = self.pages_for(&snapshot, &resolved.roster, members)?;

        Ok(CastlistView::build(&resolved.roster, pages, 0, &self.codec)?)
    }

    /// Render the page a navigation token points at.
    ///
    /// A stale or corrupt token falls back to the default roster's first
    /// page. If the roster shrank, the page is clamped to its last page.
    pub fn navigate(
        &self,
        community: &CommunityId,
        token: &str,
        members: &GroupMembers,
    ) -> Result<CastlistView, Error> {
        let snapshot = CommunitySnapshot::load(&self.store, community)?;

        let (roster, page_index) = match self.codec.decode_in(token, &snapshot.catalog) {
            Ok(state) => {
                let roster = snapshot
                    .catalog
                    .by_id(state.roster_id())
                    .ok_or_else(|| CatalogError::unknown_roster(state.roster_id()))?;

                (roster, state.page_index())
            }
            Err(err) => {
                let roster = self
                    .resolver(&snapshot.catalog)
                    .fallback()
                    .ok_or(ResolveError::NoRosters)?;
                tracing::warn!(
                    %community,
                    error = %err,
                    fallback = %roster.id,
                    "navigation token rejected; showing default roster"
                );

                (roster, 0)
            }
        };

        let pages = self.pages_for(&snapshot, roster, members)?;

        Ok(CastlistView::build(roster, pages, page_index, &self.codec)?)
    }

    // ------------------------------------------------------------------
    // Management actions
    // ------------------------------------------------------------------

    pub fn create_roster(
        &self,
        community: &CommunityId,
        roster: NewRoster,
    ) -> Result<RosterEntity, Error> {
        self.create_roster_at(community, roster, Utc::now())
    }

    /// Create with an explicit creation time; ids are minted from it.
    pub fn create_roster_at(
        &self,
        community: &CommunityId,
        roster: NewRoster,
        now: DateTime<Utc>,
    ) -> Result<RosterEntity, Error> {
        self.update(community, |data| catalog::create_roster(data, roster, now))
    }

    pub fn delete_roster(&self, community: &CommunityId, id: &RosterId) -> Result<(), Error> {
        self.update(community, |data| catalog::delete_roster(data, id))
    }

    pub fn assign_group_to_roster(
        &self,
        community: &CommunityId,
        group: &GroupId,
        id: &RosterId,
    ) -> Result<(), Error> {
        self.update(community, |data| catalog::assign_group(data, group, id))
    }

    pub fn record_placement(
        &self,
        community: &CommunityId,
        namespace: &PlacementNamespace,
        member: &MemberId,
        placement: NonZeroU32,
    ) -> Result<(), Error> {
        self.update(community, |data| {
            catalog::record_placement(data, namespace, member, placement)
        })
    }

    pub fn set_active_season(
        &self,
        community: &CommunityId,
        season: Option<SeasonId>,
    ) -> Result<(), Error> {
        self.update(community, |data| {
            catalog::set_active_season(data, season);
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn resolver<'c>(&'c self, catalog: &'c RosterCatalog) -> Resolver<'c> {
        Resolver::new(catalog, &self.config.resolve.default_roster_name)
    }

    fn resolve_in(
        &self,
        snapshot: &CommunitySnapshot,
        request: &CastlistRequest,
    ) -> Result<ResolvedCastlist, Error> {
        let mut request = request.clone();
        if request.active_season.is_none() {
            request.active_season.clone_from(&snapshot.active_season);
        }

        let resolution = self.resolver(&snapshot.catalog).resolve(&request)?;

        Ok(ResolvedCastlist {
            roster: resolution.roster.clone(),
            step: resolution.step,
        })
    }

    // Sort each group shown under `roster` and pack the result into pages.
    fn pages_for(
        &self,
        snapshot: &CommunitySnapshot,
        roster: &RosterEntity,
        members: &GroupMembers,
    ) -> Result<Vec<Page>, Error> {
        let ctx = SortContext::new()
            .with_placements(&snapshot.placements)
            .with_profiles(&self.profiles)
            .with_custom_order(members.custom_order());

        let mut sections = Vec::new();
        for assignment in snapshot.catalog.groups_for(roster) {
            let Some(group_members) = members.group(&assignment.group_id) else {
                continue;
            };

            let sorted = sort_members(group_members, roster, assignment.sort_override, &ctx)?;
            let (shown, hidden) = apply_display(&roster.settings, sorted.members);
            sections.push(Section {
                group_id: assignment.group_id.clone(),
                strategy: sorted.applied,
                members: shown,
                hidden,
            });
        }

        Ok(paginate(sections, self.config.page.members_per_page))
    }

    // One load, one mutation, one save. Nothing is saved on error.
    fn update<T>(
        &self,
        community: &CommunityId,
        mutate: impl FnOnce(&mut CommunityData) -> Result<T, CatalogError>,
    ) -> Result<T, Error> {
        let mut data = self.store.load_community(community)?;
        let out = mutate(&mut data)?;
        self.store.save_community(community, &data)?;

        Ok(out)
    }
}
