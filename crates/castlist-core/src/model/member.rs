use crate::ids::MemberId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

///
/// Member
/// One member of a group as supplied by the transport layer.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub display_name: String,
}

impl Member {
    #[must_use]
    pub fn new(id: impl Into<MemberId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

///
/// Profile
/// Optional per-member data used by the profile-driven strategies.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub age: Option<u32>,

    /// Free-form zone label, e.g. `"EST"` or `"UTC+5:30"`.
    pub timezone: Option<String>,

    pub joined_at: Option<DateTime<Utc>>,
}

///
/// OrderedMember
/// A member in display order with an optional label such as a rank.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedMember {
    pub member: Member,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl OrderedMember {
    #[must_use]
    pub const fn plain(member: Member) -> Self {
        Self {
            member,
            prefix: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &MemberId {
        &self.member.id
    }

    /// Display line as rendered: prefix followed by the name.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{}", self.member.display_name),
            None => self.member.display_name.clone(),
        }
    }
}
