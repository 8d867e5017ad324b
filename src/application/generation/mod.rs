//! Reply generation for redeemed links.

mod redeem_link;
mod reply_generator;

pub use redeem_link::{intent_url, RedeemError, RedeemLinkHandler, RedeemedLink};
pub use reply_generator::{ReplyGenerationError, ReplyGenerator};
