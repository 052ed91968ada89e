use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer scheme")]
    MissingBearer,

    #[error("malformed token: expected 3 segments, got {0}")]
    SegmentCount(usize),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid claims payload: {0}")]
    Claims(#[from] serde_json::Error),

    #[error("claims carry no subject")]
    MissingSubject,
}
