//! Transport layer: JSON wire format (serialization/deserialization) and the
//! snake_case <-> domain transforms.

mod templates;
mod verify;
mod webhooks;

use serde::{Deserialize, Deserializer};

pub use templates::{
    decode_template_json_response, decode_template_list_json_response,
    decode_template_preview_json_response, encode_create_template_json,
    encode_template_preview_json, encode_update_template_json,
};
pub use verify::{
    decode_check_verification_json_response, decode_send_verification_json_response,
    decode_session_validation_json_response, decode_verification_json_response,
    decode_verification_list_json_response, decode_verify_session_json_response,
    encode_check_verification_json, encode_create_session_json, encode_list_verifications_query,
    encode_send_verification_json, encode_validate_session_json,
};
pub use webhooks::{
    decode_deliveries_json_response, decode_event_types_json_response,
    decode_secret_rotation_json_response, decode_webhook_created_json_response,
    decode_webhook_json_response, decode_webhook_list_json_response,
    decode_webhook_test_json_response, encode_create_webhook_json, encode_update_webhook_json,
};

/// Error envelope returned by the API with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorJson {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Decode the API error envelope. Returns `None` for bodies that are not the envelope.
pub fn decode_api_error(json: &str) -> Option<ApiErrorBody> {
    let parsed: ApiErrorJson = serde_json::from_str(json).ok()?;
    let body = ApiErrorBody {
        code: non_empty(parsed.error),
        message: non_empty(parsed.message),
    };
    if body.code.is_none() && body.message.is_none() {
        return None;
    }
    Some(body)
}

/// Decode an explicit `null` like a missing field: the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The API sends `""` for several unset text fields; treat it like a missing field.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|it| !it.is_empty())
}
