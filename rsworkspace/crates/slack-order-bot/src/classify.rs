//! Maps a callback to the conversation step it belongs to.
//!
//! Slack sends no session or step number, so the step is recovered from the
//! callback's shape: whether a button press came from inside a rendered modal,
//! and which step tag (`callback_id`) the bot attached to a submitted modal.

use crate::callback::{ButtonAction, FormSubmission, InboundCallback, MentionEvent};

/// Step tag of the order form. Must not be a substring of any other tag.
pub const ORDER_FORM_CALLBACK_ID: &str = "order_form_submission";
/// Step tag of the confirmation form. Must not be a substring of any other tag.
pub const CONFIRMATION_FORM_CALLBACK_ID: &str = "confirmation_form_submission";

/// The step a callback was routed to, borrowing the payload that step needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step<'a> {
    UrlVerification { challenge: &'a str },
    Mention(&'a MentionEvent),
    MenuChoice(&'a ButtonAction),
    OrderFormSubmission(&'a FormSubmission),
    ConfirmationSubmission(&'a FormSubmission),
    Unknown,
}

/// Payload-free tag of a [`Step`], for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    UrlVerification,
    Mention,
    MenuChoice,
    OrderFormSubmission,
    ConfirmationSubmission,
    Unknown,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UrlVerification => "url_verification",
            Self::Mention => "mention",
            Self::MenuChoice => "menu_choice",
            Self::OrderFormSubmission => "order_form_submission",
            Self::ConfirmationSubmission => "confirmation_submission",
            Self::Unknown => "unknown",
        }
    }
}

impl Step<'_> {
    pub fn kind(&self) -> StepKind {
        match self {
            Step::UrlVerification { .. } => StepKind::UrlVerification,
            Step::Mention(_) => StepKind::Mention,
            Step::MenuChoice(_) => StepKind::MenuChoice,
            Step::OrderFormSubmission(_) => StepKind::OrderFormSubmission,
            Step::ConfirmationSubmission(_) => StepKind::ConfirmationSubmission,
            Step::Unknown => StepKind::Unknown,
        }
    }
}

/// Classify a verified callback. First match wins:
///
/// 1. URL verification handshake
/// 2. bot mention
/// 3. button pressed outside any modal (no view hash) → menu choice
/// 4. modal submitted whose tag contains the order-form marker
/// 5. modal submitted whose tag contains the confirmation-form marker
/// 6. anything else → unknown
pub fn classify(callback: &InboundCallback) -> Step<'_> {
    match callback {
        InboundCallback::UrlVerification { challenge } => Step::UrlVerification { challenge },
        InboundCallback::Mention(event) => Step::Mention(event),
        InboundCallback::ButtonAction(action) if action.form_hash().is_none() => {
            Step::MenuChoice(action)
        }
        InboundCallback::FormSubmission(submission)
            if submission.callback_id().contains(ORDER_FORM_CALLBACK_ID) =>
        {
            Step::OrderFormSubmission(submission)
        }
        InboundCallback::FormSubmission(submission)
            if submission.callback_id().contains(CONFIRMATION_FORM_CALLBACK_ID) =>
        {
            Step::ConfirmationSubmission(submission)
        }
        InboundCallback::ButtonAction(_)
        | InboundCallback::FormSubmission(_)
        | InboundCallback::Unsupported { .. } => Step::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::{BlockAction, UserRef, View};

    fn button(hash: Option<&str>) -> InboundCallback {
        InboundCallback::ButtonAction(ButtonAction {
            user: UserRef { id: "U1".into() },
            trigger_id: "trigger".into(),
            channel: None,
            actions: vec![BlockAction {
                action_id: "order_hamburger".into(),
                block_id: None,
                value: Some("hamburger".into()),
            }],
            view: hash.map(|h| View {
                hash: h.into(),
                ..View::default()
            }),
        })
    }

    fn submission(callback_id: &str) -> InboundCallback {
        InboundCallback::FormSubmission(FormSubmission {
            user: UserRef { id: "U1".into() },
            trigger_id: "trigger".into(),
            view: View {
                callback_id: callback_id.into(),
                hash: "h".into(),
                ..View::default()
            },
        })
    }

    #[test]
    fn challenge_is_classified_first() {
        let cb = InboundCallback::UrlVerification {
            challenge: "abc".into(),
        };
        assert_eq!(classify(&cb), Step::UrlVerification { challenge: "abc" });
    }

    #[test]
    fn mention_is_classified() {
        let cb = InboundCallback::Mention(MentionEvent {
            user: None,
            channel: "C1".into(),
            text: String::new(),
        });
        assert_eq!(classify(&cb).kind(), StepKind::Mention);
    }

    #[test]
    fn button_outside_modal_is_menu_choice() {
        assert_eq!(classify(&button(None)).kind(), StepKind::MenuChoice);
    }

    #[test]
    fn button_with_empty_hash_is_menu_choice() {
        assert_eq!(classify(&button(Some(""))).kind(), StepKind::MenuChoice);
    }

    #[test]
    fn button_inside_modal_is_unknown() {
        assert_eq!(classify(&button(Some("1234.abcd"))).kind(), StepKind::Unknown);
    }

    #[test]
    fn order_form_submission_is_classified() {
        assert_eq!(
            classify(&submission(ORDER_FORM_CALLBACK_ID)).kind(),
            StepKind::OrderFormSubmission
        );
    }

    #[test]
    fn confirmation_submission_is_classified() {
        assert_eq!(
            classify(&submission(CONFIRMATION_FORM_CALLBACK_ID)).kind(),
            StepKind::ConfirmationSubmission
        );
    }

    #[test]
    fn tags_are_matched_as_substrings() {
        let tagged = format!("v2:{CONFIRMATION_FORM_CALLBACK_ID}:U1");
        assert_eq!(
            classify(&submission(&tagged)).kind(),
            StepKind::ConfirmationSubmission
        );
    }

    #[test]
    fn step_tags_do_not_contain_each_other() {
        assert!(!ORDER_FORM_CALLBACK_ID.contains(CONFIRMATION_FORM_CALLBACK_ID));
        assert!(!CONFIRMATION_FORM_CALLBACK_ID.contains(ORDER_FORM_CALLBACK_ID));
    }

    #[test]
    fn submission_with_foreign_tag_is_unknown() {
        for tag in ["", "user_settings", "order", "confirmation", "ORDER_FORM_SUBMISSION"] {
            assert_eq!(classify(&submission(tag)).kind(), StepKind::Unknown, "tag {tag:?}");
        }
    }

    #[test]
    fn unsupported_is_unknown() {
        let cb = InboundCallback::Unsupported {
            kind: "view_closed".into(),
        };
        assert_eq!(classify(&cb), Step::Unknown);
    }

    #[test]
    fn step_kind_names_are_stable() {
        assert_eq!(StepKind::MenuChoice.as_str(), "menu_choice");
        assert_eq!(StepKind::Unknown.as_str(), "unknown");
    }
}
