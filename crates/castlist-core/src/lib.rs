//! Castlist engine: roster virtualization, resolution, member ordering and
//! navigation state for multi-page roster views.
#![warn(unreachable_pub)]

pub mod catalog;
pub mod error;
pub mod ids;
pub mod model;
pub mod nav;
pub mod page;
pub mod resolve;
pub mod session;
pub mod sort;
pub mod store;
pub mod view;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use castlist_config::CastlistConfig;
pub use error::{Error, ErrorKind, ErrorOrigin};
pub use session::{CastlistSession, GroupMembers, ResolvedCastlist};

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores or sessions are re-exported here.
///

pub mod prelude {
    pub use crate::{
        ids::{CommunityId, GroupId, MemberId, RosterId, SeasonId},
        model::{
            member::{Member, OrderedMember, Profile},
            placement::PlacementNamespace,
            roster::{RosterEntity, RosterKind, RosterOrigin},
            settings::{RosterSettings, SortStrategy},
        },
        nav::{NavAction, NavState},
        resolve::{CallerContext, CastlistRequest, RosterRef},
    };
}
