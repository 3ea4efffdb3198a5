//! String identifiers used across the castlist document.
//!
//! All ids are opaque strings owned by the host application. They are kept as
//! distinct newtypes so a group id can never be passed where a roster id is
//! expected.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Debug, Default, Deserialize, Display, Eq, From, Hash, Ord, PartialEq,
            PartialOrd, Serialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the id is empty or only whitespace.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }

            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    ///
    /// CommunityId
    /// Key of one community document in the store.
    ///
    CommunityId
}

string_id! {
    ///
    /// RosterId
    /// Stable roster identifier, unique within a community.
    ///
    RosterId
}

string_id! {
    ///
    /// GroupId
    /// Sub-team identifier (typically a role).
    ///
    GroupId
}

string_id! {
    ///
    /// MemberId
    ///
    MemberId
}

string_id! {
    ///
    /// SeasonId
    ///
    SeasonId
}

///
/// TESTS
///
