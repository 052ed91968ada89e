//! palaver-auth
//!
//! Caller identity from bearer credentials and pre-verified claims.
//! Tokens are issued and verified upstream (Cognito / API Gateway); this
//! crate only reads the subject out of them.

pub mod claims;
pub mod error;
