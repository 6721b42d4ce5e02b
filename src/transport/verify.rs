use serde::{Deserialize, Serialize};

use super::{non_empty, null_as_default};
use crate::domain::{
    CheckVerification, CheckVerificationResponse, CreateSession, ListVerifications, Metadata,
    Pagination, SendVerification, SendVerificationResponse, SessionValidation, ValidateSession,
    ValidatedSession, Verification, VerificationId, VerificationList, VerifySession,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response contains invalid verification id: {value:?}")]
    InvalidVerificationId { value: String },
}

#[derive(Debug, Clone, Serialize)]
struct SendVerificationJsonRequest<'a> {
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_length: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
struct CheckVerificationJsonRequest<'a> {
    code: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct CreateSessionJsonRequest<'a> {
    success_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancel_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    brand_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    brand_color: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a Metadata>,
}

#[derive(Debug, Clone, Serialize)]
struct ValidateSessionJsonRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct SendVerificationJsonResponse {
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    expires_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    sandbox: bool,
    #[serde(default)]
    sandbox_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CheckVerificationJsonResponse {
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    phone: String,
    #[serde(default)]
    verified_at: Option<String>,
    #[serde(default)]
    remaining_attempts: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct VerificationJson {
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    delivery_status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    attempts: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    max_attempts: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    expires_at: String,
    #[serde(default)]
    verified_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    sandbox: bool,
    #[serde(default)]
    app_name: Option<String>,
    #[serde(default)]
    template_id: Option<String>,
    #[serde(default)]
    profile_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct VerificationListJson {
    #[serde(default, deserialize_with = "null_as_default")]
    verifications: Vec<VerificationJson>,
    #[serde(default, deserialize_with = "null_as_default")]
    pagination: PaginationJson,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PaginationJson {
    #[serde(default, deserialize_with = "null_as_default")]
    limit: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    has_more: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct VerifySessionJson {
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    success_url: String,
    #[serde(default)]
    cancel_url: Option<String>,
    #[serde(default)]
    brand_name: Option<String>,
    #[serde(default)]
    brand_color: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    verification_id: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    metadata: Option<Metadata>,
    #[serde(default, deserialize_with = "null_as_default")]
    expires_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ValidateSessionJsonResponse {
    #[serde(deserialize_with = "null_as_default")]
    valid: bool,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    verified_at: Option<String>,
    #[serde(default)]
    metadata: Option<Metadata>,
}

pub fn encode_send_verification_json(request: &SendVerification) -> Result<String, TransportError> {
    let options = request.options();
    let body = SendVerificationJsonRequest {
        to: request.to().raw(),
        template_id: options.template_id.as_ref().map(|id| id.as_str()),
        profile_id: options.profile_id.as_deref().filter(|it| !it.is_empty()),
        app_name: options.app_name.as_deref().filter(|it| !it.is_empty()),
        timeout_secs: options.timeout_secs.filter(|secs| *secs > 0),
        code_length: options.code_length.filter(|len| *len > 0),
    };
    Ok(serde_json::to_string(&body)?)
}

pub fn encode_check_verification_json(
    request: &CheckVerification,
) -> Result<String, TransportError> {
    let body = CheckVerificationJsonRequest {
        code: request.code().as_str(),
    };
    Ok(serde_json::to_string(&body)?)
}

/// Build the `GET /verify` query string, or `None` when no filter is set.
pub fn encode_list_verifications_query(request: &ListVerifications) -> Option<String> {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    let mut has_params = false;

    if let Some(limit) = request.limit.filter(|limit| *limit > 0) {
        query.append_pair("limit", &limit.to_string());
        has_params = true;
    }
    if let Some(status) = request.status.as_deref().filter(|status| !status.is_empty()) {
        query.append_pair("status", status);
        has_params = true;
    }

    has_params.then(|| query.finish())
}

pub fn encode_create_session_json(request: &CreateSession) -> Result<String, TransportError> {
    let body = CreateSessionJsonRequest {
        success_url: request.success_url().as_str(),
        cancel_url: request.cancel_url.as_ref().map(|url| url.as_str()),
        brand_name: request.brand_name.as_deref(),
        brand_color: request.brand_color.as_deref(),
        metadata: request.metadata.as_ref(),
    };
    Ok(serde_json::to_string(&body)?)
}

pub fn encode_validate_session_json(request: &ValidateSession) -> Result<String, TransportError> {
    let body = ValidateSessionJsonRequest {
        token: request.token().as_str(),
    };
    Ok(serde_json::to_string(&body)?)
}

fn verification_id(value: String) -> Result<VerificationId, TransportError> {
    VerificationId::from_response(value.clone())
        .map_err(|_| TransportError::InvalidVerificationId { value })
}

fn verification_from_json(parsed: VerificationJson) -> Result<Verification, TransportError> {
    Ok(Verification {
        id: verification_id(parsed.id)?,
        status: parsed.status,
        phone: parsed.phone,
        delivery_status: parsed.delivery_status,
        attempts: parsed.attempts,
        max_attempts: parsed.max_attempts,
        expires_at: parsed.expires_at,
        verified_at: non_empty(parsed.verified_at),
        created_at: parsed.created_at,
        sandbox: parsed.sandbox,
        app_name: non_empty(parsed.app_name),
        template_id: non_empty(parsed.template_id),
        profile_id: non_empty(parsed.profile_id),
    })
}

pub fn decode_send_verification_json_response(
    json: &str,
) -> Result<SendVerificationResponse, TransportError> {
    let parsed: SendVerificationJsonResponse = serde_json::from_str(json)?;
    Ok(SendVerificationResponse {
        id: verification_id(parsed.id)?,
        status: parsed.status,
        phone: parsed.phone,
        expires_at: parsed.expires_at,
        sandbox: parsed.sandbox,
        sandbox_code: non_empty(parsed.sandbox_code),
        message: non_empty(parsed.message),
    })
}

pub fn decode_check_verification_json_response(
    json: &str,
) -> Result<CheckVerificationResponse, TransportError> {
    let parsed: CheckVerificationJsonResponse = serde_json::from_str(json)?;
    Ok(CheckVerificationResponse {
        id: verification_id(parsed.id)?,
        status: parsed.status,
        phone: parsed.phone,
        verified_at: non_empty(parsed.verified_at),
        remaining_attempts: parsed.remaining_attempts,
    })
}

pub fn decode_verification_json_response(json: &str) -> Result<Verification, TransportError> {
    let parsed: VerificationJson = serde_json::from_str(json)?;
    verification_from_json(parsed)
}

pub fn decode_verification_list_json_response(
    json: &str,
) -> Result<VerificationList, TransportError> {
    let parsed: VerificationListJson = serde_json::from_str(json)?;
    let verifications = parsed
        .verifications
        .into_iter()
        .map(verification_from_json)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(VerificationList {
        verifications,
        pagination: Pagination {
            limit: parsed.pagination.limit,
            has_more: parsed.pagination.has_more,
        },
    })
}

pub fn decode_verify_session_json_response(json: &str) -> Result<VerifySession, TransportError> {
    let parsed: VerifySessionJson = serde_json::from_str(json)?;
    let bound_verification = non_empty(parsed.verification_id)
        .map(verification_id)
        .transpose()?;

    Ok(VerifySession {
        id: parsed.id,
        url: parsed.url,
        status: parsed.status,
        success_url: parsed.success_url,
        cancel_url: non_empty(parsed.cancel_url),
        brand_name: non_empty(parsed.brand_name),
        brand_color: non_empty(parsed.brand_color),
        phone: non_empty(parsed.phone),
        verification_id: bound_verification,
        token: non_empty(parsed.token),
        metadata: parsed.metadata,
        expires_at: parsed.expires_at,
        created_at: parsed.created_at,
    })
}

pub fn decode_session_validation_json_response(
    json: &str,
) -> Result<SessionValidation, TransportError> {
    let parsed: ValidateSessionJsonResponse = serde_json::from_str(json)?;
    if !parsed.valid {
        return Ok(SessionValidation::Invalid);
    }

    Ok(SessionValidation::Valid(ValidatedSession {
        session_id: non_empty(parsed.session_id),
        phone: non_empty(parsed.phone),
        verified_at: non_empty(parsed.verified_at),
        metadata: parsed.metadata,
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::{RawPhoneNumber, SendVerificationOptions, TemplateId};

    use super::*;

    fn to_value(body: String) -> serde_json::Value {
        serde_json::from_str(&body).unwrap()
    }

    #[test]
    fn encode_send_verification_omits_unset_options() {
        let request = SendVerification::new(
            RawPhoneNumber::new("+15550001111").unwrap(),
            SendVerificationOptions::default(),
        );
        assert_eq!(
            to_value(encode_send_verification_json(&request).unwrap()),
            json!({"to": "+15550001111"})
        );
    }

    #[test]
    fn encode_send_verification_includes_set_options() {
        let request = SendVerification::new(
            RawPhoneNumber::new("+15550001111").unwrap(),
            SendVerificationOptions {
                template_id: Some(TemplateId::new("tpl_otp").unwrap()),
                profile_id: Some("prof_1".to_owned()),
                app_name: Some("Acme".to_owned()),
                timeout_secs: Some(300),
                code_length: Some(6),
            },
        );
        assert_eq!(
            to_value(encode_send_verification_json(&request).unwrap()),
            json!({
                "to": "+15550001111",
                "template_id": "tpl_otp",
                "profile_id": "prof_1",
                "app_name": "Acme",
                "timeout_secs": 300,
                "code_length": 6
            })
        );
    }

    #[test]
    fn encode_send_verification_treats_zero_as_unset() {
        let request = SendVerification::new(
            RawPhoneNumber::new("+15550001111").unwrap(),
            SendVerificationOptions {
                timeout_secs: Some(0),
                code_length: Some(0),
                app_name: Some(String::new()),
                ..Default::default()
            },
        );
        assert_eq!(
            to_value(encode_send_verification_json(&request).unwrap()),
            json!({"to": "+15550001111"})
        );
    }

    #[test]
    fn list_query_is_omitted_without_filters() {
        assert_eq!(
            encode_list_verifications_query(&ListVerifications::default()),
            None
        );
        let zeroed = ListVerifications {
            limit: Some(0),
            status: Some(String::new()),
        };
        assert_eq!(encode_list_verifications_query(&zeroed), None);
    }

    #[test]
    fn list_query_encodes_each_filter() {
        let limit_only = ListVerifications {
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(
            encode_list_verifications_query(&limit_only).as_deref(),
            Some("limit=10")
        );

        let status_only = ListVerifications {
            status: Some("pending".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            encode_list_verifications_query(&status_only).as_deref(),
            Some("status=pending")
        );

        let both = ListVerifications {
            limit: Some(5),
            status: Some("verified".to_owned()),
        };
        assert_eq!(
            encode_list_verifications_query(&both).as_deref(),
            Some("limit=5&status=verified")
        );
    }

    #[test]
    fn decode_send_response_in_sandbox_mode() {
        let json = r#"
        {
          "id": "ver_1",
          "status": "pending",
          "phone": "+15550001111",
          "expires_at": "2025-01-01T00:10:00Z",
          "sandbox": true,
          "sandbox_code": "123456"
        }
        "#;
        let response = decode_send_verification_json_response(json).unwrap();
        assert_eq!(response.id.as_str(), "ver_1");
        assert!(response.sandbox);
        assert_eq!(response.sandbox_code.as_deref(), Some("123456"));
        assert_eq!(response.message, None);
    }

    #[test]
    fn decode_send_response_in_production_has_no_code() {
        let json = r#"{"id": "ver_1", "status": "pending", "sandbox": false, "sandbox_code": ""}"#;
        let response = decode_send_verification_json_response(json).unwrap();
        assert!(!response.sandbox);
        assert_eq!(response.sandbox_code, None);
    }

    #[test]
    fn decode_check_response_reports_remaining_attempts_when_present() {
        let json = r#"{"id": "ver_1", "status": "pending", "phone": "+1", "remaining_attempts": 2}"#;
        let response = decode_check_verification_json_response(json).unwrap();
        assert_eq!(response.remaining_attempts, Some(2));
        assert_eq!(response.verified_at, None);

        let json = r#"{"id": "ver_1", "status": "verified", "phone": "+1", "verified_at": "2025-01-01T00:01:00Z"}"#;
        let response = decode_check_verification_json_response(json).unwrap();
        assert_eq!(response.remaining_attempts, None);
        assert_eq!(response.verified_at.as_deref(), Some("2025-01-01T00:01:00Z"));
    }

    #[test]
    fn decode_list_maps_records_and_pagination() {
        let json = r#"
        {
          "verifications": [
            {
              "id": "ver_1",
              "status": "verified",
              "phone": "+15550001111",
              "delivery_status": "delivered",
              "attempts": 1,
              "max_attempts": 3,
              "expires_at": "2025-01-01T00:10:00Z",
              "verified_at": "2025-01-01T00:01:00Z",
              "created_at": "2025-01-01T00:00:00Z",
              "sandbox": false,
              "app_name": "Acme",
              "template_id": ""
            }
          ],
          "pagination": {"limit": 20, "has_more": true}
        }
        "#;
        let list = decode_verification_list_json_response(json).unwrap();
        assert_eq!(list.pagination, Pagination { limit: 20, has_more: true });
        assert_eq!(list.verifications.len(), 1);

        let record = &list.verifications[0];
        assert_eq!(record.delivery_status, "delivered");
        assert_eq!(record.attempts, 1);
        assert_eq!(record.max_attempts, 3);
        assert_eq!(record.app_name.as_deref(), Some("Acme"));
        assert_eq!(record.template_id, None);
        assert_eq!(record.profile_id, None);
    }

    #[test]
    fn decode_verification_rejects_blank_id() {
        let err = decode_verification_json_response(r#"{"id": " "}"#).unwrap_err();
        assert!(matches!(err, TransportError::InvalidVerificationId { .. }));
    }

    #[test]
    fn encode_create_session_omits_unset_fields() {
        let request = CreateSession::new("https://app.example.com/ok").unwrap();
        assert_eq!(
            to_value(encode_create_session_json(&request).unwrap()),
            json!({"success_url": "https://app.example.com/ok"})
        );

        let mut metadata = Metadata::new();
        metadata.insert("user_id".to_owned(), json!(42));
        let request = request
            .with_cancel_url("https://app.example.com/cancel")
            .unwrap()
            .with_brand("Acme", "#ff0000")
            .with_metadata(metadata);
        assert_eq!(
            to_value(encode_create_session_json(&request).unwrap()),
            json!({
                "success_url": "https://app.example.com/ok",
                "cancel_url": "https://app.example.com/cancel",
                "brand_name": "Acme",
                "brand_color": "#ff0000",
                "metadata": {"user_id": 42}
            })
        );
    }

    #[test]
    fn decode_pending_session_has_no_completion_fields() {
        let json = r#"
        {
          "id": "vs_1",
          "url": "https://verify.sendly.live/s/vs_1",
          "status": "pending",
          "success_url": "https://app.example.com/ok",
          "expires_at": "2025-01-01T00:30:00Z",
          "created_at": "2025-01-01T00:00:00Z"
        }
        "#;
        let session = decode_verify_session_json_response(json).unwrap();
        assert_eq!(session.url, "https://verify.sendly.live/s/vs_1");
        assert_eq!(session.status, "pending");
        assert_eq!(session.phone, None);
        assert_eq!(session.verification_id, None);
        assert_eq!(session.token, None);
        assert_eq!(session.metadata, None);
    }

    #[test]
    fn decode_completed_session_binds_verification() {
        let json = r#"
        {
          "id": "vs_1",
          "url": "https://verify.sendly.live/s/vs_1",
          "status": "verified",
          "success_url": "https://app.example.com/ok",
          "phone": "+15550001111",
          "verification_id": "ver_9",
          "token": "tok_abc",
          "metadata": {"user_id": 42},
          "expires_at": "2025-01-01T00:30:00Z",
          "created_at": "2025-01-01T00:00:00Z"
        }
        "#;
        let session = decode_verify_session_json_response(json).unwrap();
        assert_eq!(session.phone.as_deref(), Some("+15550001111"));
        assert_eq!(
            session.verification_id.as_ref().map(VerificationId::as_str),
            Some("ver_9")
        );
        assert_eq!(session.token.as_deref(), Some("tok_abc"));
        assert_eq!(session.metadata.unwrap()["user_id"], json!(42));
    }

    #[test]
    fn decode_valid_session_token() {
        let json = r#"
        {
          "valid": true,
          "session_id": "vs_1",
          "phone": "+15550001111",
          "verified_at": "2025-01-01T00:02:00Z",
          "metadata": {"user_id": 42}
        }
        "#;
        match decode_session_validation_json_response(json).unwrap() {
            SessionValidation::Valid(session) => {
                assert_eq!(session.session_id.as_deref(), Some("vs_1"));
                assert_eq!(session.phone.as_deref(), Some("+15550001111"));
                assert_eq!(session.verified_at.as_deref(), Some("2025-01-01T00:02:00Z"));
                assert!(session.metadata.is_some());
            }
            other => panic!("unexpected validation: {other:?}"),
        }
    }

    #[test]
    fn decode_invalid_session_token_discards_other_fields() {
        let json = r#"{"valid": false, "session_id": "vs_1", "phone": "+15550001111"}"#;
        assert_eq!(
            decode_session_validation_json_response(json).unwrap(),
            SessionValidation::Invalid
        );
    }

    #[test]
    fn encode_check_and_validate_bodies() {
        let check = CheckVerification::new("123456").unwrap();
        assert_eq!(
            encode_check_verification_json(&check).unwrap(),
            r#"{"code":"123456"}"#
        );
        let validate = ValidateSession::new("tok_abc").unwrap();
        assert_eq!(
            encode_validate_session_json(&validate).unwrap(),
            r#"{"token":"tok_abc"}"#
        );
    }

    #[test]
    fn decode_verification_treats_null_like_missing() {
        let json = r#"
        {
          "verifications": [{
            "id": "ver_1",
            "status": null,
            "phone": null,
            "delivery_status": null,
            "attempts": null,
            "max_attempts": null,
            "expires_at": null,
            "created_at": null,
            "sandbox": null,
            "app_name": null
          }],
          "pagination": {"limit": null, "has_more": null}
        }
        "#;
        let list = decode_verification_list_json_response(json).unwrap();
        let verification = &list.verifications[0];
        assert_eq!(verification.status, "");
        assert_eq!(verification.attempts, 0);
        assert!(!verification.sandbox);
        assert_eq!(verification.app_name, None);
        assert_eq!(list.pagination.limit, 0);
        assert!(!list.pagination.has_more);

        let list =
            decode_verification_list_json_response(r#"{"verifications": null, "pagination": null}"#)
                .unwrap();
        assert!(list.verifications.is_empty());
    }

    #[test]
    fn decode_send_and_session_accept_nulls() {
        let sent = decode_send_verification_json_response(
            r#"{"id": "ver_1", "status": null, "phone": null, "expires_at": null, "sandbox": null}"#,
        )
        .unwrap();
        assert!(!sent.sandbox);
        assert_eq!(sent.phone, "");

        let session = decode_verify_session_json_response(
            r#"{"id": "vs_1", "url": null, "status": null, "success_url": null, "expires_at": null, "created_at": null}"#,
        )
        .unwrap();
        assert_eq!(session.url, "");
        assert_eq!(session.success_url, "");

        let validation =
            decode_session_validation_json_response(r#"{"valid": null, "phone": "+15550001111"}"#)
                .unwrap();
        assert_eq!(validation, SessionValidation::Invalid);
    }

    #[test]
    fn decode_keeps_server_ids_untrimmed() {
        let sent = decode_send_verification_json_response(r#"{"id": " ver_1 "}"#).unwrap();
        assert_eq!(sent.id.as_str(), " ver_1 ");

        assert!(matches!(
            decode_verification_json_response(r#"{"id": ""}"#),
            Err(TransportError::InvalidVerificationId { .. })
        ));
    }
}
