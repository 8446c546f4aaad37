//! Parsed inbound callbacks.
//!
//! Slack delivers two body shapes: Events API callbacks as raw JSON, and
//! interactivity callbacks as `application/x-www-form-urlencoded` with the
//! JSON under a single `payload` field. Both end up as an [`InboundCallback`].
//! Callers must verify the signature of the raw body first.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::CallbackParseError;

/// One authenticated request from Slack, reduced to the shapes the bot acts on.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundCallback {
    /// Endpoint ownership handshake; the challenge must be echoed verbatim.
    UrlVerification { challenge: String },
    /// The bot was @mentioned in a channel.
    Mention(MentionEvent),
    /// A Block Kit button (or other block element) was pressed.
    ButtonAction(ButtonAction),
    /// A modal was submitted.
    FormSubmission(FormSubmission),
    /// Anything else Slack may send (`view_closed`, `shortcut`, other events).
    Unsupported { kind: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MentionEvent {
    #[serde(default)]
    pub user: Option<String>,
    pub channel: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChannelRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlockAction {
    pub action_id: String,
    #[serde(default)]
    pub block_id: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// `block_actions` interaction payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ButtonAction {
    pub user: UserRef,
    /// Single-use token for opening a modal in response.
    #[serde(default)]
    pub trigger_id: String,
    #[serde(default)]
    pub channel: Option<ChannelRef>,
    #[serde(default)]
    pub actions: Vec<BlockAction>,
    /// Present when the button lives inside an already rendered modal.
    #[serde(default)]
    pub view: Option<View>,
}

impl ButtonAction {
    /// Hash of the modal the button lives in, if any.
    pub fn form_hash(&self) -> Option<&str> {
        self.view
            .as_ref()
            .map(|v| v.hash.as_str())
            .filter(|h| !h.is_empty())
    }

    pub fn channel_id(&self) -> Option<&str> {
        self.channel.as_ref().map(|c| c.id.as_str())
    }

    /// Value of the first action in the payload.
    pub fn first_value(&self) -> Option<&str> {
        self.actions.first().and_then(|a| a.value.as_deref())
    }
}

/// `view_submission` interaction payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormSubmission {
    pub user: UserRef,
    #[serde(default)]
    pub trigger_id: String,
    pub view: View,
}

impl FormSubmission {
    /// The step tag the bot attached to the modal when opening it.
    pub fn callback_id(&self) -> &str {
        &self.view.callback_id
    }

    /// The opaque state the bot attached to the modal when opening it.
    pub fn private_metadata(&self) -> &str {
        &self.view.private_metadata
    }

    /// Typed text of a `plain_text_input` element.
    pub fn text_value(&self, block_id: &str, action_id: &str) -> Option<&str> {
        self.field(block_id, action_id)
            .and_then(|f| f.value.as_deref())
    }

    /// Value of the chosen option of a select or radio element.
    pub fn selected_value(&self, block_id: &str, action_id: &str) -> Option<&str> {
        self.field(block_id, action_id)
            .and_then(|f| f.selected_option.as_ref())
            .map(|o| o.value.as_str())
    }

    fn field(&self, block_id: &str, action_id: &str) -> Option<&FieldValue> {
        self.view.state.values.get(block_id)?.get(action_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct View {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub callback_id: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub private_metadata: String,
    #[serde(default)]
    pub state: ViewState,
}

/// Submitted values keyed by `block_id`, then `action_id`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub values: HashMap<String, HashMap<String, FieldValue>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldValue {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub selected_option: Option<SelectedOption>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectedOption {
    pub value: String,
}

#[derive(Deserialize)]
struct InteractionForm {
    payload: Option<String>,
}

/// Parse an Events API request body.
pub fn parse_event_body(body: &[u8]) -> Result<InboundCallback, CallbackParseError> {
    let raw: Value = serde_json::from_slice(body)?;
    from_json(raw)
}

/// Parse an interactivity request body (`payload=<urlencoded JSON>`).
pub fn parse_interaction_body(body: &[u8]) -> Result<InboundCallback, CallbackParseError> {
    let form: InteractionForm = serde_urlencoded::from_bytes(body)?;
    let payload = form.payload.ok_or(CallbackParseError::MissingPayload)?;
    let raw: Value = serde_json::from_str(&payload)?;
    from_json(raw)
}

fn from_json(mut raw: Value) -> Result<InboundCallback, CallbackParseError> {
    let kind = raw["type"].as_str().unwrap_or_default().to_string();
    let callback = match kind.as_str() {
        "url_verification" => InboundCallback::UrlVerification {
            challenge: raw["challenge"].as_str().unwrap_or_default().to_string(),
        },
        "event_callback" => {
            let event = raw["event"].take();
            match event["type"].as_str() {
                Some("app_mention") => InboundCallback::Mention(serde_json::from_value(event)?),
                other => InboundCallback::Unsupported {
                    kind: format!("event_callback/{}", other.unwrap_or("")),
                },
            }
        }
        "block_actions" => InboundCallback::ButtonAction(serde_json::from_value(raw)?),
        "view_submission" => InboundCallback::FormSubmission(serde_json::from_value(raw)?),
        _ => InboundCallback::Unsupported { kind },
    };
    Ok(callback)
}
