//! palaver-bedrock
//!
//! Claude invocation on Bedrock (blocking and streamed) and prompt assembly.

pub mod anthropic;
pub mod client;
pub mod context;
pub mod error;
