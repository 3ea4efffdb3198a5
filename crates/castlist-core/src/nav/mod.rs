//! Module: nav
//! Responsibility: carry `(roster, page, total)` across stateless follow-up
//! requests as a short opaque token, plus page wrap arithmetic.
//! Does not own: choosing a replacement roster when a token goes stale.
//! Boundary: every decode failure is `NavError`, surfaced as invalid state.

mod codec;
mod wire;


pub use codec::{TokenDecodeError, decode_token, encode_token};

use crate::{catalog::RosterCatalog, ids::RosterId};
use castlist_config::NavConfig;
use thiserror::Error as ThisError;
use wire::{NavStateWire, NavTokenVersion};

///
/// NavError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum NavError {
    #[error(transparent)]
    Token(#[from] TokenDecodeError),

    #[error("failed to encode navigation token: {0}")]
    Encode(String),

    #[error("failed to decode navigation token: {0}")]
    Decode(String),

    #[error("unsupported navigation token version: {version}")]
    UnsupportedVersion { version: u8 },

    #[error("encoded navigation token is {len} chars, over the {max} char limit")]
    EncodedTooLong { len: usize, max: usize },

    #[error("invalid navigation state: {0}")]
    InvalidState(String),

    #[error("roster '{id}' no longer exists")]
    StaleRoster { id: RosterId },
}

impl NavError {
    fn encode(reason: impl Into<String>) -> Self {
        Self::Encode(reason.into())
    }

    fn decode(reason: impl Into<String>) -> Self {
        Self::Decode(reason.into())
    }

    fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState(reason.into())
    }
}

///
/// NavAction
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NavAction {
    First,
    Previous,
    Next,
    Last,
}

///
/// NavState
///
/// Position within a paginated roster. `total_pages == 0` is the valid
/// empty-roster state, always at page 0.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NavState {
    roster_id: RosterId,
    page_index: u32,
    total_pages: u32,
}

impl NavState {
    pub fn new(roster_id: RosterId, page_index: u32, total_pages: u32) -> Result<Self, NavError> {
        if roster_id.is_blank() {
            return Err(NavError::invalid_state("missing roster id"));
        }

        let in_range = if total_pages == 0 {
            page_index == 0
        } else {
            page_index < total_pages
        };
        if !in_range {
            return Err(NavError::invalid_state(format!(
                "page {page_index} out of range for {total_pages} pages"
            )));
        }

        Ok(Self {
            roster_id,
            page_index,
            total_pages,
        })
    }

    /// First page of a roster; always valid.
    #[must_use]
    pub const fn first(roster_id: RosterId, total_pages: u32) -> Self {
        Self {
            roster_id,
            page_index: 0,
            total_pages,
        }
    }

    #[must_use]
    pub const fn roster_id(&self) -> &RosterId {
        &self.roster_id
    }

    #[must_use]
    pub const fn page_index(&self) -> u32 {
        self.page_index
    }

    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub const fn is_empty_roster(&self) -> bool {
        self.total_pages == 0
    }

    /// Apply one navigation action. Moving past either end wraps around;
    /// an empty roster stays at page 0.
    #[must_use]
    pub fn step(&self, action: NavAction) -> Self {
        let total = self.total_pages;
        let page_index = if total == 0 {
            0
        } else {
            match action {
                NavAction::First => 0,
                NavAction::Last => total - 1,
                NavAction::Next => (self.page_index + 1) % total,
                NavAction::Previous if self.page_index == 0 => total - 1,
                NavAction::Previous => self.page_index - 1,
            }
        };

        Self {
            roster_id: self.roster_id.clone(),
            page_index,
            total_pages: total,
        }
    }

    /// Re-point at a roster whose page count changed since this state was
    /// issued, keeping the page when it still exists.
    #[must_use]
    pub fn with_total_pages(&self, total_pages: u32) -> Self {
        let page_index = if total_pages == 0 {
            0
        } else {
            self.page_index.min(total_pages - 1)
        };

        Self {
            roster_id: self.roster_id.clone(),
            page_index,
            total_pages,
        }
    }

    /// Confirm the roster still exists in a freshly listed catalog.
    pub fn revalidate(self, catalog: &RosterCatalog) -> Result<Self, NavError> {
        if catalog.by_id(&self.roster_id).is_none() {
            return Err(NavError::StaleRoster { id: self.roster_id });
        }

        Ok(self)
    }
}

///
/// NavCodec
///
/// Token encoder/decoder bound to a prefix and a transport length limit.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NavCodec {
    prefix: String,
    max_len: usize,
}

impl NavCodec {
    #[must_use]
    pub fn new(prefix: impl Into<String>, max_len: usize) -> Self {
        Self {
            prefix: prefix.into(),
            max_len,
        }
    }

    #[must_use]
    pub fn from_config(config: &NavConfig) -> Self {
        Self::new(config.token_prefix.clone(), config.max_token_len)
    }

    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn encode(&self, state: &NavState) -> Result<String, NavError> {
        let wire = NavStateWire(
            NavTokenVersion::CURRENT.encode(),
            state.roster_id.clone(),
            state.page_index,
            state.total_pages,
        );
        let bytes = serde_cbor::to_vec(&wire).map_err(|err| NavError::encode(err.to_string()))?;
        let token = encode_token(&self.prefix, &bytes);

        if token.len() > self.max_len {
            return Err(NavError::EncodedTooLong {
                len: token.len(),
                max: self.max_len,
            });
        }

        Ok(token)
    }

    /// Decode a token and confirm its roster is still in `catalog`.
    ///
    /// This is the decode to use for tokens coming back from a client;
    /// `CastlistSession::decode_nav_state` wraps it with a fresh catalog.
    pub fn decode_in(&self, token: &str, catalog: &RosterCatalog) -> Result<NavState, NavError> {
        self.decode(token)?.revalidate(catalog)
    }

    /// Decode a token's payload only. The roster may no longer exist; use
    /// `decode_in` unless the catalog is checked some other way.
    pub fn decode(&self, token: &str) -> Result<NavState, NavError> {
        let bytes = decode_token(&self.prefix, self.max_len, token)?;
        let NavStateWire(version, roster_id, page_index, total_pages) =
            serde_cbor::from_slice(&bytes).map_err(|err| NavError::decode(err.to_string()))?;

        match NavTokenVersion::decode(version) {
            Some(NavTokenVersion::V1) => NavState::new(roster_id, page_index, total_pages),
            None => Err(NavError::UnsupportedVersion { version }),
        }
    }
}

impl Default for NavCodec {
    fn default() -> Self {
        Self::from_config(&NavConfig::default())
    }
}
