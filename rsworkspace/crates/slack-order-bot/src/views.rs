use serde_json::Value;

use crate::classify::{CONFIRMATION_FORM_CALLBACK_ID, ORDER_FORM_CALLBACK_ID};

pub const MENU_BLOCK_ID: &str = "menu_block";
pub const MENU_ACTION_ID: &str = "menu_select";
pub const PREPARATION_BLOCK_ID: &str = "preparation_block";
pub const PREPARATION_ACTION_ID: &str = "preparation_select";
pub const NOTE_BLOCK_ID: &str = "note_block";
pub const NOTE_ACTION_ID: &str = "note_input";
/// Longest note Slack lets the user type, in characters. Even with every
/// character JSON-escaped to six bytes the encoded state stays well under
/// the 3000-byte `private_metadata` limit.
pub const NOTE_MAX_LENGTH: usize = 400;
pub const EXTRA_AMOUNT_BLOCK_ID: &str = "extra_amount_block";
pub const EXTRA_AMOUNT_ACTION_ID: &str = "extra_amount_input";

pub const SHOP_HAMBURGER: &str = "hamburger";
pub const SHOP_SUSHI: &str = "sushi";
pub const SHOP_RAMEN: &str = "ramen";

const FORM_TITLE: &str = "Hungryman Hamburgers";

/// `(button value, heading, tagline)` for each shop on the menu message.
const SHOPS: [(&str, &str, &str); 3] = [
    (
        SHOP_HAMBURGER,
        ":hamburger: *Hungryman Hamburgers*",
        "Only for the hungriest of the hungry.",
    ),
    (
        SHOP_SUSHI,
        ":sushi: *Ace Wasabi Rock-n-Roll Sushi Bar*",
        "Fresh raw fish and wasabi.",
    ),
    (
        SHOP_RAMEN,
        ":ramen: *Sazanami Ramen*",
        "Why don't you try Japanese soul food?",
    ),
];

/// `(value, label)` pairs for the menu radio buttons.
pub const BURGERS: [(&str, &str); 5] = [
    ("hamburger", "Hamburger"),
    ("cheese_burger", "Cheese Burger"),
    ("blt_burger", "BLT Burger"),
    ("big_burger", "Big Burger"),
    ("king_burger", "King Burger"),
];

/// `(value, label)` pairs for the preparation select.
pub const PREPARATIONS: [(&str, &str); 4] = [
    ("well_done", "well done"),
    ("medium", "medium"),
    ("rare", "rare"),
    ("blue", "blue"),
];

/// Label for `value`, or `value` itself when it is not a known option.
pub fn label_for<'a>(options: &[(&'a str, &'a str)], value: &'a str) -> &'a str {
    options
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
        .unwrap_or(value)
}

fn option(value: &str, label: &str) -> Value {
    serde_json::json!({
        "text": { "type": "plain_text", "text": label, "emoji": true },
        "value": value
    })
}

fn mrkdwn_section(text: String) -> Value {
    serde_json::json!({ "type": "section", "text": { "type": "mrkdwn", "text": text } })
}

/// Blocks of the menu message posted when the bot is mentioned.
pub fn menu_message_blocks() -> Value {
    let mut blocks = vec![
        mrkdwn_section("What do you want to have?".to_string()),
        serde_json::json!({ "type": "divider" }),
    ];
    blocks.extend(SHOPS.iter().map(|(value, heading, tagline)| {
        serde_json::json!({
            "type": "section",
            "block_id": format!("shop_{value}"),
            "text": { "type": "mrkdwn", "text": format!("{heading}\n{tagline}") },
            "accessory": {
                "type": "button",
                "action_id": format!("order_{value}"),
                "text": { "type": "plain_text", "text": "Order", "emoji": true },
                "value": value
            }
        })
    }));
    Value::Array(blocks)
}

/// The order form opened after the hamburger button is pressed.
pub fn order_form(external_id: &str, private_metadata: &str) -> Value {
    let burgers: Vec<Value> = BURGERS.iter().map(|(v, l)| option(v, l)).collect();
    let preparations: Vec<Value> = PREPARATIONS.iter().map(|(v, l)| option(v, l)).collect();

    serde_json::json!({
        "type": "modal",
        "callback_id": ORDER_FORM_CALLBACK_ID,
        "external_id": external_id,
        "private_metadata": private_metadata,
        "title": { "type": "plain_text", "text": FORM_TITLE },
        "submit": { "type": "plain_text", "text": "Submit" },
        "close": { "type": "plain_text", "text": "Cancel" },
        "blocks": [
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": ":hamburger: *Hey! Thank you for choosing us! We promise you'll leave full.*"
                }
            },
            { "type": "divider" },
            {
                "type": "input",
                "block_id": MENU_BLOCK_ID,
                "label": { "type": "plain_text", "text": "Which one do you want to have?" },
                "element": {
                    "type": "radio_buttons",
                    "action_id": MENU_ACTION_ID,
                    "options": burgers
                }
            },
            {
                "type": "input",
                "block_id": PREPARATION_BLOCK_ID,
                "label": { "type": "plain_text", "text": "How do you like your steak?" },
                "element": {
                    "type": "static_select",
                    "action_id": PREPARATION_ACTION_ID,
                    "placeholder": { "type": "plain_text", "text": "Select ..." },
                    "options": preparations
                }
            },
            {
                "type": "input",
                "block_id": NOTE_BLOCK_ID,
                "label": { "type": "plain_text", "text": "Anything else you want to tell us?" },
                "element": {
                    "type": "plain_text_input",
                    "action_id": NOTE_ACTION_ID,
                    "multiline": true,
                    "max_length": NOTE_MAX_LENGTH
                },
                "optional": true
            }
        ]
    })
}

/// The confirmation form that replaces the order form on submission.
pub fn confirmation_form(
    menu: &str,
    preparation: &str,
    note: &str,
    amount: &str,
    external_id: &str,
    private_metadata: &str,
) -> Value {
    serde_json::json!({
        "type": "modal",
        "callback_id": CONFIRMATION_FORM_CALLBACK_ID,
        "external_id": external_id,
        "private_metadata": private_metadata,
        "title": { "type": "plain_text", "text": FORM_TITLE },
        "submit": { "type": "plain_text", "text": "Order!" },
        "close": { "type": "plain_text", "text": "Cancel" },
        "blocks": [
            mrkdwn_section(":wave: *Order confirmation*".to_string()),
            { "type": "divider" },
            mrkdwn_section(format!("*Menu :hamburger:*\n{}", label_for(&BURGERS, menu))),
            mrkdwn_section(format!(
                "*How do you like your steak?*\n{}",
                label_for(&PREPARATIONS, preparation)
            )),
            mrkdwn_section(format!("*Anything else you want to tell us?*\n{note}")),
            { "type": "divider" },
            mrkdwn_section(format!("*Amount :moneybag:*\n$ {amount}")),
            {
                "type": "input",
                "block_id": EXTRA_AMOUNT_BLOCK_ID,
                "label": { "type": "plain_text", "text": "Tip ($)" },
                "hint": { "type": "plain_text", "text": "Thank you for your kindness!" },
                "element": {
                    "type": "plain_text_input",
                    "action_id": EXTRA_AMOUNT_ACTION_ID
                },
                "optional": true
            }
        ]
    })
}

/// Blocks of the summary message posted once the order is confirmed.
pub fn summary_blocks(menu: &str, preparation: &str, note: &str, total: &str) -> Value {
    serde_json::json!([
        mrkdwn_section(":hamburger: *Thank you for your order!*".to_string()),
        { "type": "divider" },
        mrkdwn_section(format!("*Menu*\n{}", label_for(&BURGERS, menu))),
        mrkdwn_section(format!(
            "*How do you like your steak?*\n{}",
            label_for(&PREPARATIONS, preparation)
        )),
        mrkdwn_section(format!("*Anything else you want to tell us?*\n{note}")),
        { "type": "divider" },
        mrkdwn_section(format!("*Total amount :moneybag:*\n$ {total}"))
    ])
}
