pub mod chat;
pub mod conversations;
pub mod files;
pub mod health;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Parse a JSON object body, listing every absent required field at once.
pub(crate) fn validate_json_body<T: DeserializeOwned>(
    body: &[u8],
    required: &[&str],
) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::BadRequest("Invalid JSON body".to_string()))?;

    let Some(object) = value.as_object() else {
        return Err(ApiError::BadRequest("Invalid JSON body".to_string()));
    };

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|field| object.get(*field).is_none_or(Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Missing fields: {}",
            missing.join(", ")
        )));
    }

    serde_json::from_value(value)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))
}

pub(crate) async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub(crate) async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        a: String,
        #[allow(dead_code)]
        b: Option<String>,
    }

    fn message(err: ApiError) -> String {
        match err {
            ApiError::BadRequest(msg) => msg,
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_rejected() {
        let err = validate_json_body::<Body>(b"{not json", &["a"]).unwrap_err();
        assert_eq!(message(err), "Invalid JSON body");

        let err = validate_json_body::<Body>(b"[1,2]", &["a"]).unwrap_err();
        assert_eq!(message(err), "Invalid JSON body");
    }

    #[test]
    fn all_missing_fields_are_listed() {
        let err = validate_json_body::<Body>(b"{\"b\":null}", &["a", "b"]).unwrap_err();
        assert_eq!(message(err), "Missing fields: a, b");
    }

    #[test]
    fn valid_body_is_parsed() {
        let body: Body = validate_json_body(b"{\"a\":\"x\"}", &["a"]).unwrap();
        assert_eq!(body.a, "x");
    }
}
