use crate::{
    ids::{MemberId, SeasonId},
    model::document::{PlacementEntry, Stored},
};
use std::{collections::BTreeMap, fmt, num::NonZeroU32};

/// Store key of the season-independent placement namespace.
pub const GLOBAL_NAMESPACE_KEY: &str = "global";

///
/// PlacementNamespace
///
/// Scope placements are recorded and looked up under. A roster linked to a
/// season reads only that season's placements; an unlinked roster reads only
/// the global namespace.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PlacementNamespace {
    Global,
    Season(SeasonId),
}

impl PlacementNamespace {
    #[must_use]
    pub fn for_season(season: Option<&SeasonId>) -> Self {
        season.map_or(Self::Global, |season| Self::Season(season.clone()))
    }

    /// Decode a store key. The reserved global key always means `Global`.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        if key == GLOBAL_NAMESPACE_KEY {
            Self::Global
        } else {
            Self::Season(SeasonId::new(key))
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Global => GLOBAL_NAMESPACE_KEY,
            Self::Season(season) => season.as_str(),
        }
    }
}

impl fmt::Display for PlacementNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

///
/// PlacementTable
/// Validated placements keyed by namespace, then member.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PlacementTable {
    namespaces: BTreeMap<PlacementNamespace, BTreeMap<MemberId, NonZeroU32>>,
}

impl PlacementTable {
    /// Build from the raw store shape, dropping unusable entries.
    ///
    /// An entry with a blank member id, a mistyped value, or a non-positive
    /// placement is a malformed record; it is logged and excluded, the rest
    /// still load.
    #[must_use]
    pub fn from_raw(raw: &BTreeMap<String, BTreeMap<MemberId, Stored<PlacementEntry>>>) -> Self {
        let mut namespaces = BTreeMap::new();

        for (key, entries) in raw {
            if key.trim().is_empty() {
                tracing::warn!(
                    entries = entries.len(),
                    "skipping placements under blank namespace key"
                );
                continue;
            }

            let namespace = PlacementNamespace::from_key(key);
            let mut ranks = BTreeMap::new();

            for (member, entry) in entries {
                let placement = entry
                    .decoded()
                    .and_then(|entry| entry.placement)
                    .and_then(|raw| u32::try_from(raw).ok())
                    .and_then(NonZeroU32::new);
                match placement {
                    Some(placement) if !member.is_blank() => {
                        ranks.insert(member.clone(), placement);
                    }
                    _ => {
                        tracing::warn!(
                            namespace = %namespace,
                            member = %member,
                            entry = ?entry,
                            "skipping malformed placement record"
                        );
                    }
                }
            }

            namespaces.insert(namespace, ranks);
        }

        Self { namespaces }
    }

    /// Placement of `member` in exactly `namespace`; other namespaces are
    /// never consulted.
    #[must_use]
    pub fn placement(
        &self,
        namespace: &PlacementNamespace,
        member: &MemberId,
    ) -> Option<NonZeroU32> {
        self.namespaces
            .get(namespace)
            .and_then(|ranks| ranks.get(member))
            .copied()
    }

    pub fn insert(
        &mut self,
        namespace: PlacementNamespace,
        member: MemberId,
        placement: NonZeroU32,
    ) {
        self.namespaces
            .entry(namespace)
            .or_default()
            .insert(member, placement);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_fixture() -> BTreeMap<String, BTreeMap<MemberId, Stored<PlacementEntry>>> {
        let mut raw = BTreeMap::new();
        raw.insert(
            "S1".to_string(),
            BTreeMap::from([
                (MemberId::new("a"), PlacementEntry::new(2).into()),
                (MemberId::new("b"), PlacementEntry::new(1).into()),
                (MemberId::new("zero"), PlacementEntry::new(0).into()),
                (
                    MemberId::new("text"),
                    Stored::Undecodable(serde_json::json!({ "placement": "3" })),
                ),
            ]),
        );
        raw.insert(
            GLOBAL_NAMESPACE_KEY.to_string(),
            BTreeMap::from([(MemberId::new("c"), PlacementEntry::new(7).into())]),
        );

        raw
    }

    #[test]
    fn lookups_are_scoped_to_one_namespace() {
        let table = PlacementTable::from_raw(&raw_fixture());
        let season = PlacementNamespace::Season(SeasonId::new("S1"));

        assert_eq!(table.placement(&season, &MemberId::new("a")).map(NonZeroU32::get), Some(2));
        assert_eq!(table.placement(&PlacementNamespace::Global, &MemberId::new("a")), None);
        assert_eq!(
            table.placement(&PlacementNamespace::Global, &MemberId::new("c")).map(NonZeroU32::get),
            Some(7)
        );
        assert_eq!(table.placement(&season, &MemberId::new("c")), None);
    }

    #[test]
    fn non_positive_placements_are_skipped() {
        let table = PlacementTable::from_raw(&raw_fixture());
        let season = PlacementNamespace::Season(SeasonId::new("S1"));

        assert_eq!(table.placement(&season, &MemberId::new("zero")), None);
        assert_eq!(table.placement(&season, &MemberId::new("text")), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn namespace_keys_round_trip() {
        assert_eq!(PlacementNamespace::from_key("global"), PlacementNamespace::Global);
        assert_eq!(PlacementNamespace::Global.key(), GLOBAL_NAMESPACE_KEY);
        assert_eq!(PlacementNamespace::from_key("S9").key(), "S9");
    }
}
