use crate::{
    catalog::CatalogError, ids::RosterId, model::settings::SettingsError, nav::NavError,
    resolve::ResolveError, sort::SortError, store::StoreError,
};
use castlist_config::ConfigError;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }

    #[must_use]
    pub const fn is_invalid_state(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidState)
    }

    /// Candidate rosters when the error is an ambiguity, else empty.
    #[must_use]
    pub fn candidates(&self) -> &[RosterId] {
        match &self.kind {
            ErrorKind::Ambiguous { candidates } => candidates,
            _ => &[],
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        let kind = match err {
            StoreError::Unavailable { .. } => ErrorKind::StoreUnavailable,
            StoreError::Corrupt { .. } => ErrorKind::MalformedRecord,
        };

        Self::new(kind, ErrorOrigin::Store, err.to_string())
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        let kind = match err {
            CatalogError::Store(err) => return err.into(),
            CatalogError::Settings(err) => return err.into(),
            CatalogError::UnknownRoster { .. } => ErrorKind::NotFound,
            CatalogError::VirtualRoster { .. } => ErrorKind::InvalidState,
            CatalogError::Malformed(_) => ErrorKind::MalformedRecord,
            CatalogError::NameTaken { ref existing, .. } => ErrorKind::Ambiguous {
                candidates: vec![existing.clone()],
            },
        };

        Self::new(kind, ErrorOrigin::Catalog, err.to_string())
    }
}

impl From<SettingsError> for Error {
    fn from(err: SettingsError) -> Self {
        Self::new(ErrorKind::MalformedRecord, ErrorOrigin::Catalog, err.to_string())
    }
}

impl From<ResolveError> for Error {
    fn from(err: ResolveError) -> Self {
        let kind = match err {
            ResolveError::NotFound { .. } | ResolveError::NoRosters => ErrorKind::NotFound,
            ResolveError::Ambiguous { ref candidates } => ErrorKind::Ambiguous {
                candidates: candidates.clone(),
            },
        };

        Self::new(kind, ErrorOrigin::Resolve, err.to_string())
    }
}

impl From<SortError> for Error {
    fn from(err: SortError) -> Self {
        match err {
            SortError::MalformedRecord(_) => {
                Self::new(ErrorKind::MalformedRecord, ErrorOrigin::Sort, err.to_string())
            }
        }
    }
}

impl From<NavError> for Error {
    fn from(err: NavError) -> Self {
        Self::new(ErrorKind::InvalidState, ErrorOrigin::Nav, err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::InvalidState, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorKind
/// Closed taxonomy; every component error maps onto exactly one kind.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// An explicit reference names nothing that exists.
    NotFound,

    /// Several rosters are equally valid; the caller must choose.
    Ambiguous { candidates: Vec<RosterId> },

    /// Stale or corrupt navigation state, or an operation the target's
    /// current state does not allow.
    InvalidState,

    StoreUnavailable,

    /// A mandatory field is missing or invalid.
    MalformedRecord,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Store,
    Catalog,
    Resolve,
    Sort,
    Nav,
    Config,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ids::CommunityId,
        model::{MalformedRecord, RecordKind},
        resolve::RosterRef,
    };

    #[test]
    fn store_errors_keep_unavailable_distinct_from_corrupt() {
        let community = CommunityId::new("c1");

        let offline: Error = StoreError::unavailable(&community, "timeout").into();
        assert_eq!(offline.kind, ErrorKind::StoreUnavailable);
        assert_eq!(offline.origin, ErrorOrigin::Store);

        let corrupt: Error = StoreError::corrupt(&community, "bad json").into();
        assert_eq!(corrupt.kind, ErrorKind::MalformedRecord);
    }

    #[test]
    fn catalog_store_errors_report_store_origin() {
        let store = StoreError::unavailable(&CommunityId::new("c1"), "down");
        let err: Error = CatalogError::Store(store).into();

        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
        assert_eq!(err.origin, ErrorOrigin::Store);
    }

    #[test]
    fn virtual_roster_writes_are_invalid_state() {
        let err: Error = CatalogError::virtual_roster(&RosterId::new("legacy_00")).into();

        assert!(err.is_invalid_state());
        assert_eq!(err.origin, ErrorOrigin::Catalog);
    }

    #[test]
    fn ambiguity_carries_candidates() {
        let err: Error = ResolveError::Ambiguous {
            candidates: vec![RosterId::new("a"), RosterId::new("b")],
        }
        .into();

        assert_eq!(err.candidates(), [RosterId::new("a"), RosterId::new("b")]);
        assert_eq!(err.message, "caller matches 2 rosters; a choice is required");
    }

    #[test]
    fn resolve_not_found_and_no_rosters_share_kind() {
        let missing: Error = ResolveError::NotFound {
            reference: RosterRef::Name("Ghosts".to_string()),
        }
        .into();
        let empty: Error = ResolveError::NoRosters.into();

        assert!(missing.is_not_found());
        assert!(empty.is_not_found());
        assert_eq!(missing.message, "roster name 'Ghosts' not found");
    }

    #[test]
    fn sort_and_nav_errors_map_to_their_kinds() {
        let record = MalformedRecord::new(RecordKind::Member, "Ghost", "missing member id");
        let sort: Error = SortError::from(record).into();
        assert_eq!(sort.kind, ErrorKind::MalformedRecord);
        assert_eq!(sort.origin, ErrorOrigin::Sort);

        let nav: Error = NavError::UnsupportedVersion { version: 7 }.into();
        assert!(nav.is_invalid_state());
        assert_eq!(nav.origin, ErrorOrigin::Nav);
    }
}
