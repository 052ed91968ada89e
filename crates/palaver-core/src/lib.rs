//! palaver-core
//!
//! Pure domain types, stream framing, and conversation-store conventions.
//! No AWS SDK dependency. This is the shared vocabulary of the Palaver handlers.

pub mod clock;
pub mod error;
pub mod models;
pub mod store_keys;
