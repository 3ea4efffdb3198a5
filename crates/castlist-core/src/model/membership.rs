use crate::{
    ids::{GroupId, RosterId},
    model::{
        MalformedRecord, RecordKind,
        document::MembershipRecord,
        settings::SortStrategy,
    },
};

///
/// GroupAssignment
///
/// Validated membership record: which rosters one group belongs to and how
/// its members are ordered.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupAssignment {
    pub group_id: GroupId,

    /// Trimmed, non-empty legacy roster tag.
    pub legacy_tag: Option<String>,

    /// Native roster ids in stored order, duplicates removed.
    pub roster_ids: Vec<RosterId>,

    pub sort_override: Option<SortStrategy>,
}

impl GroupAssignment {
    pub fn from_record(record: &MembershipRecord) -> Result<Self, MalformedRecord> {
        if record.group_id.is_blank() {
            return Err(MalformedRecord::new(
                RecordKind::Membership,
                record.legacy_tag.clone().unwrap_or_default(),
                "missing group id",
            ));
        }

        let malformed = |reason: String| {
            MalformedRecord::new(RecordKind::Membership, record.group_id.as_str(), reason)
        };

        let legacy_tag = match record.legacy_tag.as_deref().map(str::trim) {
            None => None,
            Some("") => return Err(malformed("legacy tag is blank".to_string())),
            Some(tag) => Some(tag.to_string()),
        };

        let sort_override = record
            .sort_override
            .as_deref()
            .map(str::parse::<SortStrategy>)
            .transpose()
            .map_err(|err| malformed(err.to_string()))?;

        let mut roster_ids: Vec<RosterId> = Vec::with_capacity(record.roster_ids.len());
        for id in &record.roster_ids {
            if id.is_blank() {
                return Err(malformed("blank roster id".to_string()));
            }
            if !roster_ids.contains(id) {
                roster_ids.push(id.clone());
            }
        }

        Ok(Self {
            group_id: record.group_id.clone(),
            legacy_tag,
            roster_ids,
            sort_override,
        })
    }

    /// True when the group uses only the inline legacy mechanism.
    #[must_use]
    pub fn is_legacy_only(&self) -> bool {
        self.legacy_tag.is_some() && self.roster_ids.is_empty()
    }
}

///
/// TESTS
///
