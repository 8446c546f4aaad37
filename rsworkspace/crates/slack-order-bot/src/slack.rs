use std::future::Future;

use reqwest::Client as HttpClient;
use serde_json::Value;

use crate::error::SlackApiError;

/// Outbound Slack Web API calls made by the conversation steps.
pub trait SlackApi: Send + Sync + Clone + 'static {
    /// `chat.postMessage` with Block Kit blocks and a notification fallback text.
    fn post_message(
        &self,
        channel: &str,
        text: &str,
        blocks: Value,
    ) -> impl Future<Output = Result<(), SlackApiError>> + Send;

    /// `views.open` for a trigger token received on the current callback.
    fn open_view(
        &self,
        trigger_id: &str,
        view: Value,
    ) -> impl Future<Output = Result<(), SlackApiError>> + Send;
}

/// [`SlackApi`] over HTTPS with a bot token.
#[derive(Clone)]
pub struct SlackWebClient {
    http: HttpClient,
    api_base: String,
    bot_token: String,
}

impl SlackWebClient {
    pub fn new(http: HttpClient, api_base: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            bot_token: bot_token.into(),
        }
    }

    async fn call(&self, method: &'static str, body: Value) -> Result<(), SlackApiError> {
        let url = format!("{}/api/{method}", self.api_base);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.bot_token)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| SlackApiError::Http { method, source })?;

        let body: Value = resp
            .json()
            .await
            .map_err(|source| SlackApiError::Http { method, source })?;

        if body["ok"].as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(SlackApiError::Api {
                method,
                error: body["error"].as_str().unwrap_or("unknown").to_string(),
            })
        }
    }
}

impl SlackApi for SlackWebClient {
    async fn post_message(&self, channel: &str, text: &str, blocks: Value) -> Result<(), SlackApiError> {
        let body = serde_json::json!({
            "channel": channel,
            "text": text,
            "blocks": blocks,
        });
        self.call("chat.postMessage", body).await
    }

    async fn open_view(&self, trigger_id: &str, view: Value) -> Result<(), SlackApiError> {
        let body = serde_json::json!({
            "trigger_id": trigger_id,
            "view": view,
        });
        self.call("views.open", body).await
    }
}
