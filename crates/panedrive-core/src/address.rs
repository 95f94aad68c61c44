//! Dotted pane address: `<session>.<window>[.<pane>]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Address grammar violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error(
        "invalid address {address:?}: expected '<session>.<window>' or '<session>.<window>.<pane>', got {parts} component(s)"
    )]
    ComponentCount { address: String, parts: usize },

    #[error("invalid pane index {token:?} in address {address:?}")]
    InvalidPaneIndex { address: String, token: String },
}

/// A parsed pane address.
///
/// `pane_index` is signed on purpose: `"s.w.-1"` is a well-formed address
/// whose index is rejected later, when it is resolved against a window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub session: String,
    pub window: String,
    pub pane_index: i64,
}

impl Address {
    pub fn new(session: impl Into<String>, window: impl Into<String>, pane_index: i64) -> Self {
        Self {
            session: session.into(),
            window: window.into(),
            pane_index,
        }
    }

    /// Parse `<session>.<window>` (pane 0) or `<session>.<window>.<pane>`.
    pub fn parse(address: &str) -> Result<Self, AddressError> {
        let parts: Vec<&str> = address.split('.').collect();
        let pane_index = match parts.as_slice() {
            [_, _] => 0,
            [_, _, pane] => parse_pane_index(pane).ok_or_else(|| AddressError::InvalidPaneIndex {
                address: address.to_string(),
                token: (*pane).to_string(),
            })?,
            _ => {
                return Err(AddressError::ComponentCount {
                    address: address.to_string(),
                    parts: parts.len(),
                });
            }
        };
        Ok(Self::new(parts[0], parts[1], pane_index))
    }

    /// The window token read as a window index, for the lookup that runs
    /// after an exact name match fails.
    pub fn window_index_hint(&self) -> Option<u32> {
        self.window.parse().ok()
    }
}

/// Decimal integer with an optional leading `-`. A leading `+` is refused so
/// every accepted address renders back to the text it was parsed from.
fn parse_pane_index(token: &str) -> Option<i64> {
    if token.starts_with('+') {
        return None;
    }
    token.parse().ok()
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Always the explicit 3-part form.
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.session, self.window, self.pane_index)
    }
}
