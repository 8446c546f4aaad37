//! The conversation steps.
//!
//! ```text
//! Start ──mention──▶ menu message
//! MenuChoice ──hamburger──▶ order form            state {channel}
//! OrderFormSubmission ─────▶ confirmation form    state {channel, order, amount}
//! ConfirmationSubmission ──▶ summary message      (end)
//!            └─ invalid extra amount ─▶ field error, form stays open
//! ```

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info};

use crate::amount::{BASE_AMOUNT, format_total, parse_amount};
use crate::callback::{ButtonAction, FormSubmission, MentionEvent};
use crate::clock::Clock;
use crate::error::HandlerError;
use crate::slack::SlackApi;
use crate::state::ConversationState;
use crate::views::{
    self, EXTRA_AMOUNT_ACTION_ID, EXTRA_AMOUNT_BLOCK_ID, MENU_ACTION_ID, MENU_BLOCK_ID,
    NOTE_ACTION_ID, NOTE_BLOCK_ID, PREPARATION_ACTION_ID, PREPARATION_BLOCK_ID, SHOP_HAMBURGER,
    SHOP_RAMEN, SHOP_SUSHI,
};

pub const EXTRA_AMOUNT_ERROR: &str = "Please enter a number.";

/// What the step wants sent back on the HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Empty `200 OK`. On a modal submission this closes the modal.
    Ack,
    /// Replace the open modal with `view`.
    UpdateView(Value),
    /// Keep the modal open and show these messages under the given blocks.
    FieldErrors(BTreeMap<String, String>),
}

impl StepOutcome {
    /// JSON body for the response, if any.
    pub fn response_body(&self) -> Option<Value> {
        match self {
            Self::Ack => None,
            Self::UpdateView(view) => Some(serde_json::json!({
                "response_action": "update",
                "view": view,
            })),
            Self::FieldErrors(errors) => Some(serde_json::json!({
                "response_action": "errors",
                "errors": errors,
            })),
        }
    }
}

/// Post the shop menu to the channel the bot was mentioned in.
pub async fn on_mention<S: SlackApi>(
    slack: &S,
    event: &MentionEvent,
) -> Result<StepOutcome, HandlerError> {
    slack
        .post_message(&event.channel, "What do you want to have?", views::menu_message_blocks())
        .await?;
    info!(channel = %event.channel, "Posted menu");
    Ok(StepOutcome::Ack)
}

/// A shop button was pressed. Only the hamburger shop takes orders.
pub async fn on_menu_choice<S: SlackApi, C: Clock>(
    slack: &S,
    clock: &C,
    action: &ButtonAction,
) -> Result<StepOutcome, HandlerError> {
    let choice = action
        .first_value()
        .ok_or(HandlerError::MissingField("action value"))?;

    match choice {
        SHOP_HAMBURGER => {
            let channel_id = action
                .channel_id()
                .ok_or(HandlerError::MissingField("channel"))?;
            if action.trigger_id.is_empty() {
                return Err(HandlerError::MissingField("trigger_id"));
            }

            let state = ConversationState::new(channel_id).encode()?;
            let view = views::order_form(&external_id(clock, &action.user.id), &state);
            slack.open_view(&action.trigger_id, view).await?;
            info!(channel = channel_id, "Opened order form");
        }
        SHOP_SUSHI | SHOP_RAMEN => {
            debug!(choice, "Shop does not take orders yet");
        }
        other => {
            debug!(choice = other, "Ignoring unknown menu choice");
        }
    }
    Ok(StepOutcome::Ack)
}

/// The order form was submitted. Any combination of selections is accepted.
pub fn on_order_submission<C: Clock>(
    clock: &C,
    submission: &FormSubmission,
) -> Result<StepOutcome, HandlerError> {
    let menu = submission
        .selected_value(MENU_BLOCK_ID, MENU_ACTION_ID)
        .unwrap_or_default();
    let preparation = submission
        .selected_value(PREPARATION_BLOCK_ID, PREPARATION_ACTION_ID)
        .unwrap_or_default();
    let note = submission
        .text_value(NOTE_BLOCK_ID, NOTE_ACTION_ID)
        .unwrap_or_default();

    let state = ConversationState::decode(submission.private_metadata())?
        .with_order(menu, preparation, note, BASE_AMOUNT)
        .encode()?;

    let view = views::confirmation_form(
        menu,
        preparation,
        note,
        BASE_AMOUNT,
        &external_id(clock, &submission.user.id),
        &state,
    );
    info!(menu, preparation, "Order form submitted");
    Ok(StepOutcome::UpdateView(view))
}

/// The confirmation form was submitted. The extra amount must be a number.
pub async fn on_confirmation_submission<S: SlackApi>(
    slack: &S,
    submission: &FormSubmission,
) -> Result<StepOutcome, HandlerError> {
    let raw_extra = submission
        .text_value(EXTRA_AMOUNT_BLOCK_ID, EXTRA_AMOUNT_ACTION_ID)
        .unwrap_or_default();
    let Some(extra) = parse_amount(raw_extra) else {
        debug!("Rejected non-numeric extra amount");
        return Ok(StepOutcome::FieldErrors(BTreeMap::from([(
            EXTRA_AMOUNT_BLOCK_ID.to_string(),
            EXTRA_AMOUNT_ERROR.to_string(),
        )])));
    };

    let state = ConversationState::decode(submission.private_metadata())?;
    let order = state.order()?;
    let base = parse_amount(order.amount).ok_or_else(|| HandlerError::InvalidStoredAmount {
        value: order.amount.to_string(),
    })?;
    let total = format_total(base, extra);

    slack
        .post_message(
            &state.channel_id,
            &format!("Thank you for your order! Total: $ {total}"),
            views::summary_blocks(order.menu, order.preparation, order.note, &total),
        )
        .await?;
    info!(channel = %state.channel_id, total = %total, "Posted order summary");
    Ok(StepOutcome::Ack)
}

fn external_id<C: Clock>(clock: &C, user_id: &str) -> String {
    format!("{user_id}{}", clock.unix_nanos())
}
