//! Module: resolve
//! Responsibility: decide which single roster a request means.
//! Does not own: virtualization (catalog) or mutation of the active context.
//! Boundary: pure function over an already materialized `RosterCatalog`.


use crate::{
    catalog::RosterCatalog,
    ids::{GroupId, MemberId, RosterId, SeasonId},
    model::roster::RosterEntity,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// ResolveError
///

#[derive(Debug, ThisError)]
pub enum ResolveError {
    /// The request named a roster that does not exist.
    #[error("roster {reference} not found")]
    NotFound { reference: RosterRef },

    /// The caller's groups point at more than one roster.
    #[error("caller matches {} rosters; a choice is required", .candidates.len())]
    Ambiguous { candidates: Vec<RosterId> },

    /// The community has no rosters at all.
    #[error("community has no rosters")]
    NoRosters,
}

///
/// RosterRef
/// Explicit roster reference carried by a request.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RosterRef {
    Id(RosterId),
    Name(String),
}

impl fmt::Display for RosterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id '{id}'"),
            Self::Name(name) => write!(f, "name '{name}'"),
        }
    }
}

///
/// CallerContext
/// Identity of the member making the request.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CallerContext {
    pub member_id: Option<MemberId>,
    pub group_ids: Vec<GroupId>,
}

impl CallerContext {
    #[must_use]
    pub fn new(
        member_id: impl Into<MemberId>,
        group_ids: impl IntoIterator<Item = GroupId>,
    ) -> Self {
        Self {
            member_id: Some(member_id.into()),
            group_ids: group_ids.into_iter().collect(),
        }
    }
}

///
/// CastlistRequest
///
/// Everything resolution may consult. The active season is an explicit
/// field rather than ambient state so resolution stays a pure function.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CastlistRequest {
    pub roster: Option<RosterRef>,
    pub caller: CallerContext,
    pub active_season: Option<SeasonId>,
}

impl CastlistRequest {
    #[must_use]
    pub fn for_id(id: impl Into<RosterId>) -> Self {
        Self {
            roster: Some(RosterRef::Id(id.into())),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn for_name(name: impl Into<String>) -> Self {
        Self {
            roster: Some(RosterRef::Name(name.into())),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_caller(mut self, caller: CallerContext) -> Self {
        self.caller = caller;
        self
    }

    #[must_use]
    pub fn with_active_season(mut self, season: impl Into<SeasonId>) -> Self {
        self.active_season = Some(season.into());
        self
    }
}

///
/// ResolutionStep
/// Which precedence rule produced a resolution.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolutionStep {
    Explicit,
    ActiveSeason,
    CallerDefault,
    Fallback,
}

///
/// Resolution
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolution<'a> {
    pub roster: &'a RosterEntity,
    pub step: ResolutionStep,
}

///
/// Resolver
///
/// Applies the precedence order, first match wins:
/// 1. explicit reference (missing target is an error, never a fallback);
/// 2. the active season's roster when that season has exactly one;
/// 3. the single roster the caller's groups belong to;
/// 4. the configured default-named native roster, else the earliest native
///    roster, else the first legacy roster by name.
///

#[derive(Clone, Copy, Debug)]
pub struct Resolver<'c> {
    catalog: &'c RosterCatalog,
    default_name: &'c str,
}

impl<'c> Resolver<'c> {
    #[must_use]
    pub const fn new(catalog: &'c RosterCatalog, default_name: &'c str) -> Self {
        Self {
            catalog,
            default_name,
        }
    }

    pub fn resolve(&self, request: &CastlistRequest) -> Result<Resolution<'c>, ResolveError> {
        if let Some(reference) = &request.roster {
            let roster = self
                .explicit(reference)
                .ok_or_else(|| ResolveError::NotFound {
                    reference: reference.clone(),
                })?;

            return Ok(Self::resolved(roster, ResolutionStep::Explicit));
        }

        if let Some(roster) = request
            .active_season
            .as_ref()
            .and_then(|season| self.sole_season_roster(season))
        {
            return Ok(Self::resolved(roster, ResolutionStep::ActiveSeason));
        }

        if let Some(roster) = self.caller_default(&request.caller)? {
            return Ok(Self::resolved(roster, ResolutionStep::CallerDefault));
        }

        self.fallback()
            .map(|roster| Self::resolved(roster, ResolutionStep::Fallback))
            .ok_or(ResolveError::NoRosters)
    }

    /// Step 4 alone; also used when navigation state turns out to be stale.
    #[must_use]
    pub fn fallback(&self) -> Option<&'c RosterEntity> {
        let default_name = self.default_name.trim();

        self.catalog
            .native()
            .find(|roster| roster.name == default_name)
            .or_else(|| self.catalog.native().next())
            .or_else(|| self.catalog.legacy().next())
    }

    fn explicit(&self, reference: &RosterRef) -> Option<&'c RosterEntity> {
        match reference {
            RosterRef::Id(id) => self.catalog.by_id(id),
            RosterRef::Name(name) => self.catalog.by_name(name),
        }
    }

    fn sole_season_roster(&self, season: &SeasonId) -> Option<&'c RosterEntity> {
        let mut linked = self
            .catalog
            .rosters()
            .iter()
            .filter(|roster| roster.season_id.as_ref() == Some(season));
        let first = linked.next()?;

        linked.next().is_none().then_some(first)
    }

    fn caller_default(
        &self,
        caller: &CallerContext,
    ) -> Result<Option<&'c RosterEntity>, ResolveError> {
        let mut candidates: Vec<&'c RosterEntity> = Vec::new();

        for group in &caller.group_ids {
            for roster in self.catalog.rosters_for_group(group) {
                if !candidates.iter().any(|known| known.id == roster.id) {
                    candidates.push(roster);
                }
            }
        }

        match candidates.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(*only)),
            many => {
                // Report candidates in catalog order, independent of group order.
                let ids: Vec<RosterId> = self
                    .catalog
                    .ids()
                    .filter(|id| many.iter().any(|roster| &roster.id == *id))
                    .cloned()
                    .collect();

                Err(ResolveError::Ambiguous { candidates: ids })
            }
        }
    }

    fn resolved(roster: &'c RosterEntity, step: ResolutionStep) -> Resolution<'c> {
        tracing::debug!(roster = %roster.id, name = %roster.name, ?step, "resolved castlist");

        Resolution { roster, step }
    }
}
