use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{error, info, instrument, warn};

use crate::callback::{self, InboundCallback};
use crate::classify::{Step, classify};
use crate::clock::{Clock, SystemClock};
use crate::config::{HEALTH_PATH, OrderBotConfig};
use crate::error::HandlerError;
use crate::flow::{self, StepOutcome};
use crate::signature;
use crate::slack::{SlackApi, SlackWebClient};

/// Shared, read-only state of both entry points.
#[derive(Clone)]
pub struct AppState<S, C> {
    signing_secret: Arc<str>,
    signature_max_age: Duration,
    slack: S,
    clock: C,
}

impl<S: SlackApi, C: Clock + Clone> AppState<S, C> {
    pub fn new(signing_secret: &str, signature_max_age: Duration, slack: S, clock: C) -> Self {
        Self {
            signing_secret: Arc::from(signing_secret),
            signature_max_age,
            slack,
            clock,
        }
    }
}

/// What an entry point answers Slack with.
///
/// Every failure is answered with [`WebhookResponse::Ack`] so that Slack
/// neither retries nor learns why a request was dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookResponse {
    /// `200 OK`, empty body.
    Ack,
    /// `200 OK`, the URL verification challenge as plain text.
    Challenge(String),
    /// `200 OK`, a JSON `response_action` body.
    Json(serde_json::Value),
}

impl From<StepOutcome> for WebhookResponse {
    fn from(outcome: StepOutcome) -> Self {
        match outcome.response_body() {
            Some(body) => Self::Json(body),
            None => Self::Ack,
        }
    }
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ack => StatusCode::OK.into_response(),
            Self::Challenge(challenge) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain")],
                challenge,
            )
                .into_response(),
            Self::Json(body) => (StatusCode::OK, Json(body)).into_response(),
        }
    }
}

/// Mention Listener: Events API callbacks.
#[instrument(
    name = "slack.events",
    skip_all,
    fields(step = tracing::field::Empty)
)]
pub async fn handle_event_request<S: SlackApi, C: Clock + Clone>(
    state: &AppState<S, C>,
    headers: &HeaderMap,
    body: &[u8],
) -> WebhookResponse {
    if !authenticate(state, headers, body) {
        return WebhookResponse::Ack;
    }

    let callback = match callback::parse_event_body(body) {
        Ok(cb) => cb,
        Err(e) => {
            warn!(error = %e, "Failed to parse event body");
            return WebhookResponse::Ack;
        }
    };

    let step = classify(&callback);
    tracing::Span::current().record("step", step.kind().as_str());

    match step {
        Step::UrlVerification { challenge } => WebhookResponse::Challenge(challenge.to_string()),
        Step::Mention(event) => finish(flow::on_mention(&state.slack, event).await),
        Step::MenuChoice(_)
        | Step::OrderFormSubmission(_)
        | Step::ConfirmationSubmission(_)
        | Step::Unknown => {
            log_ignored(&callback);
            WebhookResponse::Ack
        }
    }
}

/// Interaction Router: button presses and modal submissions.
#[instrument(
    name = "slack.interactions",
    skip_all,
    fields(step = tracing::field::Empty)
)]
pub async fn handle_interaction_request<S: SlackApi, C: Clock + Clone>(
    state: &AppState<S, C>,
    headers: &HeaderMap,
    body: &[u8],
) -> WebhookResponse {
    if !authenticate(state, headers, body) {
        return WebhookResponse::Ack;
    }

    let callback = match callback::parse_interaction_body(body) {
        Ok(cb) => cb,
        Err(e) => {
            warn!(error = %e, "Failed to parse interaction payload");
            return WebhookResponse::Ack;
        }
    };

    let step = classify(&callback);
    tracing::Span::current().record("step", step.kind().as_str());

    match step {
        Step::UrlVerification { challenge } => WebhookResponse::Challenge(challenge.to_string()),
        Step::MenuChoice(action) => {
            finish(flow::on_menu_choice(&state.slack, &state.clock, action).await)
        }
        Step::OrderFormSubmission(submission) => {
            finish(flow::on_order_submission(&state.clock, submission))
        }
        Step::ConfirmationSubmission(submission) => {
            finish(flow::on_confirmation_submission(&state.slack, submission).await)
        }
        Step::Mention(_) | Step::Unknown => {
            log_ignored(&callback);
            WebhookResponse::Ack
        }
    }
}

fn authenticate<S, C: Clock>(state: &AppState<S, C>, headers: &HeaderMap, body: &[u8]) -> bool {
    match signature::verify(
        &state.signing_secret,
        headers,
        body,
        state.clock.unix_secs(),
        state.signature_max_age,
    ) {
        Ok(()) => true,
        Err(e) => {
            warn!(reason = %e, "Rejected request with invalid Slack signature");
            false
        }
    }
}

fn finish(result: Result<StepOutcome, HandlerError>) -> WebhookResponse {
    match result {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            error!(error = %e, "Step failed");
            WebhookResponse::Ack
        }
    }
}

fn log_ignored(callback: &InboundCallback) {
    let kind = match callback {
        InboundCallback::UrlVerification { .. } => "url_verification",
        InboundCallback::Mention(_) => "app_mention",
        InboundCallback::ButtonAction(_) => "block_actions",
        InboundCallback::FormSubmission(_) => "view_submission",
        InboundCallback::Unsupported { kind } => kind.as_str(),
    };
    info!(kind, "Ignoring callback that matches no conversation step");
}

async fn events_endpoint<S: SlackApi, C: Clock + Clone>(
    State(state): State<AppState<S, C>>,
    headers: HeaderMap,
    body: Bytes,
) -> WebhookResponse {
    handle_event_request(&state, &headers, &body).await
}

async fn interactions_endpoint<S: SlackApi, C: Clock + Clone>(
    State(state): State<AppState<S, C>>,
    headers: HeaderMap,
    body: Bytes,
) -> WebhookResponse {
    handle_interaction_request(&state, &headers, &body).await
}

async fn healthz() -> &'static str {
    "ok"
}

/// Routes both entry points plus `GET /healthz`.
///
/// Paths must be valid distinct routes, as checked by
/// [`OrderBotConfig::from_env`]; axum panics otherwise.
pub fn router<S: SlackApi, C: Clock + Clone>(
    state: AppState<S, C>,
    events_path: &str,
    interactions_path: &str,
) -> Router {
    Router::new()
        .route(events_path, post(events_endpoint::<S, C>))
        .route(interactions_path, post(interactions_endpoint::<S, C>))
        .route(HEALTH_PATH, get(healthz))
        .with_state(state)
}

/// Starts the order bot HTTP server.
pub async fn serve(config: OrderBotConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let slack = SlackWebClient::new(reqwest::Client::new(), &config.api_base, &config.bot_token);
    let state = AppState::new(
        &config.signing_secret,
        config.signature_max_age,
        slack,
        SystemClock,
    );
    let app = router(state, &config.events_path, &config.interactions_path);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(
        addr = %addr,
        events_path = %config.events_path,
        interactions_path = %config.interactions_path,
        "Slack order bot listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl+C");
            }
            info!("Received Ctrl+C, shutting down");
        })
        .await?;

    Ok(())
}
