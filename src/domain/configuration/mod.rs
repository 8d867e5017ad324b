//! Configuration module - per-chat promotion settings.
//!
//! A chat's configuration record holds the token name, hashtags, cashtags and
//! community description used as extra context when generating replies.

mod field;
mod record;
mod step;

pub use field::{ConfigField, MAX_COMMUNITY_CHARS};
pub use record::ConfigurationRecord;
pub use step::ConfigStep;
