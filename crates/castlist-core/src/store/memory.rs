use crate::{
    ids::{CommunityId, MemberId},
    model::{document::CommunityData, member::Profile},
    store::{CommunityStore, ProfileSource, ProfileSourceError, StoreError},
};
use serde::Deserialize;
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

///
/// MemoryStore
///
/// In-process document store. Documents round-trip through JSON on every
/// load and save so callers see exactly what a persisted store would return.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RefCell<BTreeMap<CommunityId, serde_json::Value>>,
    offline: Cell<bool>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw JSON document, bypassing typed encoding.
    pub fn insert_raw(&self, community: impl Into<CommunityId>, document: serde_json::Value) {
        self.documents.borrow_mut().insert(community.into(), document);
    }

    /// Simulate the backing store going away (or coming back).
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    fn check_online(&self, community: &CommunityId) -> Result<(), StoreError> {
        if self.offline.get() {
            return Err(StoreError::unavailable(community, "memory store is offline"));
        }

        Ok(())
    }
}

impl CommunityStore for MemoryStore {
    fn load_community(&self, community: &CommunityId) -> Result<CommunityData, StoreError> {
        self.check_online(community)?;

        let documents = self.documents.borrow();
        let Some(raw) = documents.get(community) else {
            return Ok(CommunityData::default());
        };

        CommunityData::deserialize(raw)
            .map_err(|err| StoreError::corrupt(community, err.to_string()))
    }

    fn save_community(
        &self,
        community: &CommunityId,
        data: &CommunityData,
    ) -> Result<(), StoreError> {
        self.check_online(community)?;

        let raw = serde_json::to_value(data)
            .map_err(|err| StoreError::corrupt(community, err.to_string()))?;
        self.documents.borrow_mut().insert(community.clone(), raw);

        Ok(())
    }
}

///
/// MemoryProfiles
///

#[derive(Debug, Default)]
pub struct MemoryProfiles {
    profiles: BTreeMap<MemberId, Profile>,
    offline: Cell<bool>,
}

impl MemoryProfiles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, member: impl Into<MemberId>, profile: Profile) -> Self {
        self.profiles.insert(member.into(), profile);
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }
}

impl ProfileSource for MemoryProfiles {
    fn profile(&self, member: &MemberId) -> Result<Option<Profile>, ProfileSourceError> {
        if self.offline.get() {
            return Err(ProfileSourceError::Unavailable(
                "memory profile source is offline".to_string(),
            ));
        }

        Ok(self.profiles.get(member).cloned())
    }
}

///
/// TESTS
///
