use crate::ids::RosterId;
use serde::{Deserialize, Serialize};

///
/// NavTokenVersion
///
/// Wire-level navigation token version. Keeps version parsing and
/// compatibility behavior in one place.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum NavTokenVersion {
    V1,
}

impl NavTokenVersion {
    const V1_TAG: u8 = 1;

    pub(super) const CURRENT: Self = Self::V1;

    pub(super) const fn decode(raw: u8) -> Option<Self> {
        match raw {
            Self::V1_TAG => Some(Self::V1),
            _ => None,
        }
    }

    pub(super) const fn encode(self) -> u8 {
        match self {
            Self::V1 => Self::V1_TAG,
        }
    }
}

///
/// NavStateWire
///
/// Positional tuple so CBOR carries no field names; the token has to fit
/// in a transport identifier.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(super) struct NavStateWire(
    pub(super) u8,
    pub(super) RosterId,
    pub(super) u32,
    pub(super) u32,
);
