use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::AuthError;

/// JWT segments are base64url and usually unpadded; accept either form.
const JWT_SEGMENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The subset of token claims we read.
#[derive(Debug, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
}

/// Decode the claims of a `Bearer <jwt>` header value without verifying
/// the signature.
pub fn decode_bearer(header: &str) -> Result<TokenClaims, AuthError> {
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingBearer)?
        .trim();

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::SegmentCount(segments.len()));
    }

    let payload = JWT_SEGMENT.decode(segments[1])?;
    let claims: TokenClaims = serde_json::from_slice(&payload)?;
    Ok(claims)
}

/// User id from an `Authorization` header. `None` for anything malformed.
pub fn user_id_from_bearer(header: Option<&str>) -> Option<String> {
    let header = header?;
    let result = decode_bearer(header).and_then(|claims| {
        claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or(AuthError::MissingSubject)
    });

    match result {
        Ok(sub) => Some(sub),
        Err(e) => {
            debug!(error = %e, "rejecting bearer credential");
            None
        }
    }
}

/// User id from an already-verified claims map.
pub fn user_id_from_claims(claims: &Value) -> Option<String> {
    claims
        .get("sub")
        .and_then(Value::as_str)
        .filter(|sub| !sub.is_empty())
        .map(str::to_string)
}

/// User id from an API Gateway request context, when the gateway's
/// authorizer already verified the caller.
///
/// REST APIs put Cognito claims at `authorizer.claims`; HTTP APIs with a JWT
/// authorizer put them at `authorizer.jwt.claims`.
pub fn user_id_from_request_context(context: &Value) -> Option<String> {
    ["/authorizer/claims", "/authorizer/jwt/claims"]
        .iter()
        .filter_map(|path| context.pointer(path))
        .find_map(user_id_from_claims)
}
