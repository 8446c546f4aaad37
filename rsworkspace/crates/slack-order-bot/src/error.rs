//! Error types for slack-order-bot.
//!
//! None of these reach Slack: the HTTP boundary logs them and answers with an
//! empty `200 OK`. The only failure a user ever sees is a field-level
//! validation message, which is a normal step outcome rather than an error.

use thiserror::Error;

/// Why an inbound request failed authentication.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing X-Slack-Signature header")]
    MissingSignature,

    #[error("malformed X-Slack-Signature header")]
    MalformedSignature,

    #[error("missing X-Slack-Request-Timestamp header")]
    MissingTimestamp,

    #[error("malformed X-Slack-Request-Timestamp header")]
    MalformedTimestamp,

    #[error("request timestamp outside the {max_age_secs}s window (skew {skew_secs}s)")]
    Stale { skew_secs: i64, max_age_secs: u64 },

    #[error("signature mismatch")]
    Mismatch,
}

/// The verified body could not be turned into a callback.
#[derive(Debug, Error)]
pub enum CallbackParseError {
    #[error("invalid form body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    #[error("form body has no payload field")]
    MissingPayload,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The opaque conversation state could not be encoded or decoded.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("conversation state is empty")]
    Empty,

    #[error("conversation state is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported conversation state version {0}")]
    UnsupportedVersion(u32),

    #[error("conversation state has no channel id")]
    MissingChannel,

    #[error("conversation state is missing `{0}`")]
    MissingField(&'static str),

    #[error("conversation state is {len} bytes, limit is {limit}")]
    TooLarge { len: usize, limit: usize },
}

/// A Slack Web API call failed.
#[derive(Debug, Error)]
pub enum SlackApiError {
    #[error("HTTP error calling {method}: {source}")]
    Http {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} failed: {error}")]
    Api { method: &'static str, error: String },
}

/// Missing or unusable configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} has an invalid value")]
    Invalid(&'static str),
}

/// A conversation step could not complete.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    SlackApi(#[from] SlackApiError),

    #[error("callback is missing {0}")]
    MissingField(&'static str),

    #[error("invalid amount {value:?} in conversation state")]
    InvalidStoredAmount { value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_signature_display() {
        let err = SignatureError::Stale {
            skew_secs: 900,
            max_age_secs: 300,
        };
        assert_eq!(
            err.to_string(),
            "request timestamp outside the 300s window (skew 900s)"
        );
    }

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::Missing("SLACK_BOT_TOKEN").to_string(),
            "SLACK_BOT_TOKEN must be set"
        );
    }

    #[test]
    fn state_error_converts_into_handler_error() {
        let err: HandlerError = StateError::MissingChannel.into();
        assert_eq!(err.to_string(), "conversation state has no channel id");
    }

    #[test]
    fn api_error_display() {
        let err = SlackApiError::Api {
            method: "views.open",
            error: "expired_trigger_id".to_string(),
        };
        assert_eq!(err.to_string(), "views.open failed: expired_trigger_id");
    }

    #[test]
    fn json_error_converts_into_parse_error() {
        let json_err = serde_json::from_str::<i32>("nope").unwrap_err();
        let err: CallbackParseError = json_err.into();
        assert!(err.to_string().starts_with("invalid JSON:"));
    }
}
