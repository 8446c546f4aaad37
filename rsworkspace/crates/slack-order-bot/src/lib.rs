//! # slack-order-bot
//!
//! A Slack bot that takes a burger order over several modals, with no
//! server-side session. Every step is an independent, signed webhook callback.
//!
//! ## How it works
//!
//! 1. A user @mentions the bot. Slack POSTs an Events API callback to
//!    `SLACK_EVENTS_PATH`; the bot answers by posting a three-shop menu.
//! 2. Pressing the hamburger shop's button POSTs an interactivity callback to
//!    `SLACK_INTERACTIONS_PATH`; the bot opens the order form.
//! 3. Submitting the order form replaces it with a confirmation form that also
//!    asks for an optional extra amount.
//! 4. Submitting the confirmation form posts a summary with the total to the
//!    channel the bot was first mentioned in.
//!
//! Every request is authenticated with Slack's `v0` HMAC-SHA256 signature
//! over the raw body before it is parsed. Steps are told apart by the shape
//! of the callback and the `callback_id` the bot put on each modal. The data
//! gathered so far rides along in each modal's `private_metadata`
//! ([`state::ConversationState`]).
//!
//! Whatever goes wrong, Slack gets an empty `200 OK`. Only a non-numeric extra
//! amount is reported back, as a field error on the still-open form.
//!
//! ## Configuration (env vars)
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `SLACK_SIGNING_SECRET` | required | Slack app signing secret |
//! | `SLACK_BOT_TOKEN` | required | Bot user OAuth token (`xoxb-...`) |
//! | `SLACK_ORDER_BOT_PORT` | `3000` | HTTP listening port |
//! | `SLACK_EVENTS_PATH` | `/slack/events` | Events API request URL path |
//! | `SLACK_INTERACTIONS_PATH` | `/slack/interactions` | Interactivity request URL path |
//! | `SLACK_SIGNATURE_MAX_AGE_SECS` | `300` | Accepted request timestamp skew |
//! | `SLACK_API_BASE` | `https://slack.com` | Web API base URL |

pub mod amount;
pub mod callback;
pub mod classify;
pub mod clock;
pub mod config;
pub mod env;
pub mod error;
pub mod flow;
#[cfg(test)]
mod mocks;
pub mod server;
pub mod signature;
pub mod slack;
pub mod state;
pub mod views;

pub use config::OrderBotConfig;
pub use server::{AppState, WebhookResponse, handle_event_request, handle_interaction_request, router, serve};
