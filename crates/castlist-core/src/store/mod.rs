//! Module: store
//! Responsibility: the external collaborator boundary (document store and
//! profile source).
//! Does not own: retries, caching, or any roster semantics.

mod memory;

pub use memory::{MemoryProfiles, MemoryStore};

use crate::{
    ids::{CommunityId, MemberId},
    model::{document::CommunityData, member::Profile},
};
use thiserror::Error as ThisError;

///
/// StoreError
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("store unavailable for community '{community}': {reason}")]
    Unavailable { community: String, reason: String },

    #[error("community document '{community}' could not be decoded: {reason}")]
    Corrupt { community: String, reason: String },
}

impl StoreError {
    pub fn unavailable(community: &CommunityId, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            community: community.to_string(),
            reason: reason.into(),
        }
    }

    pub fn corrupt(community: &CommunityId, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            community: community.to_string(),
            reason: reason.into(),
        }
    }
}

///
/// CommunityStore
///
/// Whole-document, last-write-wins persistence. A community with no stored
/// document loads as an empty one.
///

pub trait CommunityStore {
    fn load_community(&self, community: &CommunityId) -> Result<CommunityData, StoreError>;

    fn save_community(&self, community: &CommunityId, data: &CommunityData)
    -> Result<(), StoreError>;
}

impl<T: CommunityStore + ?Sized> CommunityStore for &T {
    fn load_community(&self, community: &CommunityId) -> Result<CommunityData, StoreError> {
        (**self).load_community(community)
    }

    fn save_community(
        &self,
        community: &CommunityId,
        data: &CommunityData,
    ) -> Result<(), StoreError> {
        (**self).save_community(community, data)
    }
}

///
/// ProfileSourceError
///

#[derive(Debug, ThisError)]
pub enum ProfileSourceError {
    /// The data source is offline; no profile can be read right now.
    #[error("profile source unavailable: {0}")]
    Unavailable(String),
}

///
/// ProfileSource
///
/// Per-member profile lookup. `Ok(None)` means the member simply has no
/// profile; only `Err` signals the source itself is down.
///

pub trait ProfileSource {
    fn profile(&self, member: &MemberId) -> Result<Option<Profile>, ProfileSourceError>;
}

impl<T: ProfileSource + ?Sized> ProfileSource for &T {
    fn profile(&self, member: &MemberId) -> Result<Option<Profile>, ProfileSourceError> {
        (**self).profile(member)
    }
}
