//! Conversation state carried through Slack's `private_metadata`.
//!
//! The bot keeps no session store. Each modal it opens carries the state
//! accumulated so far as a compact JSON string; Slack hands the string back
//! untouched on submission and the next step decodes it. Fields are added one
//! step at a time, so every order field is optional and a decoder for a later
//! step accepts what an earlier step wrote.
//!
//! Decoding never falls back to a default: a payload that cannot be read
//! aborts the step, because a guessed channel id could send the summary to
//! the wrong place.

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Current encoding version.
pub const STATE_VERSION: u32 = 1;

/// Slack rejects `private_metadata` longer than this.
pub const MAX_ENCODED_LEN: usize = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    #[serde(rename = "v")]
    pub version: u32,
    /// Where the final summary is posted.
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// The order fields of a completed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderDetails<'a> {
    pub menu: &'a str,
    pub preparation: &'a str,
    pub note: &'a str,
    pub amount: &'a str,
}

impl ConversationState {
    /// State created when the order form is first opened.
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            version: STATE_VERSION,
            channel_id: channel_id.into(),
            menu: None,
            preparation: None,
            note: None,
            amount: None,
        }
    }

    /// Merge the order form's fields, keeping the channel.
    pub fn with_order(
        self,
        menu: impl Into<String>,
        preparation: impl Into<String>,
        note: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            menu: Some(menu.into()),
            preparation: Some(preparation.into()),
            note: Some(note.into()),
            amount: Some(amount.into()),
            ..self
        }
    }

    /// Borrow the order fields, failing on the first missing one.
    pub fn order(&self) -> Result<OrderDetails<'_>, StateError> {
        Ok(OrderDetails {
            menu: self.menu.as_deref().ok_or(StateError::MissingField("menu"))?,
            preparation: self
                .preparation
                .as_deref()
                .ok_or(StateError::MissingField("preparation"))?,
            note: self.note.as_deref().ok_or(StateError::MissingField("note"))?,
            amount: self
                .amount
                .as_deref()
                .ok_or(StateError::MissingField("amount"))?,
        })
    }

    pub fn encode(&self) -> Result<String, StateError> {
        if self.channel_id.is_empty() {
            return Err(StateError::MissingChannel);
        }
        let encoded = serde_json::to_string(self)?;
        if encoded.len() > MAX_ENCODED_LEN {
            return Err(StateError::TooLarge {
                len: encoded.len(),
                limit: MAX_ENCODED_LEN,
            });
        }
        Ok(encoded)
    }

    pub fn decode(raw: &str) -> Result<Self, StateError> {
        if raw.trim().is_empty() {
            return Err(StateError::Empty);
        }
        let state: Self = serde_json::from_str(raw)?;
        if state.version == 0 || state.version > STATE_VERSION {
            return Err(StateError::UnsupportedVersion(state.version));
        }
        if state.channel_id.is_empty() {
            return Err(StateError::MissingChannel);
        }
        Ok(state)
    }
}
