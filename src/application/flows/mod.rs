//! Conversational flows and the handler contract they implement.

mod command_handler;
mod configure_flow;
mod prompts;
mod reply_flow;

pub use command_handler::{
    build_handler, CancelReason, CommandHandler, FlowError, FlowServices, CANCELLED_MESSAGE,
    GENERIC_FAILURE_MESSAGE, NOT_FOUND_MESSAGE,
};
pub use configure_flow::{
    invalid_field_prompt, menu_text, set_button_data, ConfigureFlow, BACK_BUTTON_DATA,
    CLEAR_BUTTON_DATA, DONE_BUTTON_DATA,
};
pub use prompts::delete_best_effort;
pub use reply_flow::{
    result_message, ReplyFlow, INVALID_TWEET_LINK, INVALID_TWEET_TEXT, TWEET_LINK_PROMPT,
    TWEET_TEXT_PROMPT,
};
