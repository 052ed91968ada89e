//! Conversation-table conventions.
//!
//! Pure constants and functions, no AWS SDK dependency. Attribute names and
//! the expiry horizon are part of the stored-data contract.

/// Partition key attribute.
pub const USER_ID: &str = "user_id";

/// Sort key attribute.
pub const CONVERSATION_ID: &str = "conversation_id";

/// Days a conversation survives after its last save.
pub const HISTORY_TTL_DAYS: i64 = 90;

/// Messages kept per conversation on save (most recent first to go).
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// TTL attribute value for a record saved at `now_seconds`.
pub fn ttl_from(now_seconds: i64) -> i64 {
    now_seconds + HISTORY_TTL_DAYS * SECONDS_PER_DAY
}

/// The trailing `limit` items of `items`.
pub fn recent_window<T>(items: &[T], limit: usize) -> &[T] {
    let start = items.len().saturating_sub(limit);
    &items[start..]
}
