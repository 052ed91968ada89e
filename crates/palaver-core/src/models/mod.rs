pub mod conversation;
pub mod message;
pub mod stream_event;
