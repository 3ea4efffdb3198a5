pub mod document;
pub mod member;
pub mod membership;
pub mod placement;
pub mod roster;
pub mod settings;

use std::fmt;
use thiserror::Error as ThisError;

///
/// RecordKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordKind {
    Membership,
    Roster,
    Member,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Membership => "membership",
            Self::Roster => "roster",
            Self::Member => "member",
        })
    }
}

///
/// MalformedRecord
///
/// A stored record missing a mandatory field or carrying an invalid value.
/// Catalog reads exclude such records and keep going.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("malformed {kind} record '{key}': {reason}")]
pub struct MalformedRecord {
    pub kind: RecordKind,
    pub key: String,
    pub reason: String,
}

impl MalformedRecord {
    pub(crate) fn new(kind: RecordKind, key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            reason: reason.into(),
        }
    }
}
