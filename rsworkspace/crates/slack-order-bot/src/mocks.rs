//! Recording [`SlackApi`] double for unit tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use serde_json::Value;

use crate::error::SlackApiError;
use crate::slack::SlackApi;

#[derive(Debug, Clone, PartialEq)]
pub enum SlackCall {
    PostMessage {
        channel: String,
        text: String,
        blocks: Value,
    },
    OpenView {
        trigger_id: String,
        view: Value,
    },
}

/// Records every call; answers `ok` unless told to fail.
#[derive(Clone, Default)]
pub struct MockSlackApi {
    calls: Arc<Mutex<Vec<SlackCall>>>,
    fail: Arc<AtomicBool>,
}

impl MockSlackApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call return an API error.
    pub fn fail_calls(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<SlackCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: SlackCall, method: &'static str) -> Result<(), SlackApiError> {
        self.calls.lock().unwrap().push(call);
        if self.fail.load(Ordering::SeqCst) {
            return Err(SlackApiError::Api {
                method,
                error: "mock_failure".to_string(),
            });
        }
        Ok(())
    }
}

impl SlackApi for MockSlackApi {
    async fn post_message(&self, channel: &str, text: &str, blocks: Value) -> Result<(), SlackApiError> {
        self.record(
            SlackCall::PostMessage {
                channel: channel.to_string(),
                text: text.to_string(),
                blocks,
            },
            "chat.postMessage",
        )
    }

    async fn open_view(&self, trigger_id: &str, view: Value) -> Result<(), SlackApiError> {
        self.record(
            SlackCall::OpenView {
                trigger_id: trigger_id.to_string(),
                view,
            },
            "views.open",
        )
    }
}
