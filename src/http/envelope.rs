use serde::{Deserialize, de::DeserializeOwned};

use super::error::{ApiError, ApiResult};

pub const SUCCESS_CODE: i64 = 200;

/// `{code, message, data}` wrapper every JSON endpoint answers with.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == Some(SUCCESS_CODE)
    }
}

/// Decodes a body into its envelope and applies the success rule: transport
/// status 2xx and `code == 200`. The message of a successful envelope is
/// returned next to the data.
pub fn decode<T: DeserializeOwned>(status: u16, body: &[u8]) -> ApiResult<(Option<T>, Option<String>)> {
    let envelope: Envelope<serde_json::Value> = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) if (200..300).contains(&status) => return Err(ApiError::Decode(e.to_string())),
        Err(_) => {
            return Err(ApiError::Api {
                status,
                code: None,
                message: None,
            });
        }
    };

    if !(200..300).contains(&status) || !envelope.is_success() {
        return Err(ApiError::Api {
            status,
            code: envelope.code,
            message: envelope.message,
        });
    }

    let data = match envelope.data {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => Some(serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?),
    };

    Ok((data, envelope.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListPayload, LoginLog};

    #[test]
    fn success_requires_code_200() {
        let (data, message) =
            decode::<ListPayload<LoginLog>>(200, br#"{"code":200,"message":"ok","data":{"list":[]}}"#)
                .unwrap();
        assert!(data.unwrap().list.is_empty());
        assert_eq!(message.as_deref(), Some("ok"));

        let err = decode::<serde_json::Value>(200, br#"{"code":500,"message":"upstream down"}"#)
            .unwrap_err();
        assert_eq!(err.user_message("Search failed"), "upstream down");
    }

    #[test]
    fn http_failure_with_good_code_is_still_a_failure() {
        let err = decode::<serde_json::Value>(401, br#"{"code":200}"#).unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message("Request failed"), "Request failed");
    }

    #[test]
    fn non_json_error_bodies_fall_back() {
        let err = decode::<serde_json::Value>(502, b"<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.user_message("Failed to load charts"), "Failed to load charts");

        let err = decode::<serde_json::Value>(200, b"not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
