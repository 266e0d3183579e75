//! Request and response bodies shared by the handlers and the client.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// Missing and `null` fields deserialize as empty strings so they fail
// validation with a readable message instead of a serde rejection.
#[derive(ToSchema, Serialize, Deserialize, Default, Clone)]
pub struct SignupRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Default, Clone)]
pub struct SigninRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub password: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_request_fields_default_to_empty() {
        let request: SignupRequest = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert!(request.username.is_empty());
        assert_eq!(request.email, "a@x.com");
        assert!(request.password.is_empty());

        let request: SigninRequest = serde_json::from_str("{}").unwrap();
        assert!(request.email.is_empty());
    }

    #[test]
    fn null_request_fields_read_as_empty() {
        let request: SignupRequest =
            serde_json::from_str(r#"{"username":null,"email":"a@x.com","password":null}"#)
                .unwrap();
        assert!(request.username.is_empty());
        assert_eq!(request.email, "a@x.com");
        assert!(request.password.is_empty());

        let request: SigninRequest = serde_json::from_str(r#"{"email":null}"#).unwrap();
        assert!(request.email.is_empty());
    }

    #[test]
    fn wrong_field_type_is_still_rejected() {
        assert!(serde_json::from_str::<SigninRequest>(r#"{"email":42}"#).is_err());
    }
}
