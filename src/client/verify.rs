use reqwest::Method;

use super::{SendlyClient, SendlyError, encode_error, parse_error, path_segment};
use crate::domain::{
    CheckVerification, CheckVerificationResponse, CreateSession, ListVerifications,
    SendVerification, SendVerificationResponse, SessionValidation, ValidateSession, Verification,
    VerificationId, VerificationList, VerifySession,
};
use crate::transport::{
    decode_check_verification_json_response, decode_send_verification_json_response,
    decode_session_validation_json_response, decode_verification_json_response,
    decode_verification_list_json_response, decode_verify_session_json_response,
    encode_check_verification_json, encode_create_session_json, encode_list_verifications_query,
    encode_send_verification_json, encode_validate_session_json,
};

/// One-time password verification (`/verify`).
#[derive(Clone, Copy)]
pub struct Verify<'a> {
    client: &'a SendlyClient,
}

impl<'a> Verify<'a> {
    pub(super) fn new(client: &'a SendlyClient) -> Self {
        Self { client }
    }

    /// Hosted verification sessions.
    pub fn sessions(&self) -> Sessions<'a> {
        Sessions {
            client: self.client,
        }
    }

    /// Send a one-time code to a phone number.
    ///
    /// With a sandbox API key nothing is delivered and the code is returned in
    /// [`SendVerificationResponse::sandbox_code`].
    pub async fn send(
        &self,
        request: SendVerification,
    ) -> Result<SendVerificationResponse, SendlyError> {
        let body = encode_send_verification_json(&request).map_err(encode_error)?;
        let json = self
            .client
            .execute(Method::POST, "/verify", Some(body))
            .await?;
        decode_send_verification_json_response(&json).map_err(parse_error)
    }

    pub async fn resend(
        &self,
        id: &VerificationId,
    ) -> Result<SendVerificationResponse, SendlyError> {
        let path = format!("{}/resend", verification_path(id));
        let json = self.client.execute(Method::POST, &path, None).await?;
        decode_send_verification_json_response(&json).map_err(parse_error)
    }

    /// Check a code the end user typed in.
    ///
    /// A wrong code is not an error: inspect `status` and `remaining_attempts`.
    pub async fn check(
        &self,
        id: &VerificationId,
        request: CheckVerification,
    ) -> Result<CheckVerificationResponse, SendlyError> {
        let body = encode_check_verification_json(&request).map_err(encode_error)?;
        let path = format!("{}/check", verification_path(id));
        let json = self.client.execute(Method::POST, &path, Some(body)).await?;
        decode_check_verification_json_response(&json).map_err(parse_error)
    }

    pub async fn get(&self, id: &VerificationId) -> Result<Verification, SendlyError> {
        let json = self
            .client
            .execute(Method::GET, &verification_path(id), None)
            .await?;
        decode_verification_json_response(&json).map_err(parse_error)
    }

    pub async fn list(&self, request: &ListVerifications) -> Result<VerificationList, SendlyError> {
        let path = match encode_list_verifications_query(request) {
            Some(query) => format!("/verify?{query}"),
            None => "/verify".to_owned(),
        };
        let json = self.client.execute(Method::GET, &path, None).await?;
        decode_verification_list_json_response(&json).map_err(parse_error)
    }
}

/// Hosted verification sessions (`/verify/sessions`).
///
/// The end user is redirected to [`VerifySession::url`], completes the OTP flow there and
/// comes back to `success_url` with a token that [`Sessions::validate`] exchanges for the
/// verified phone number.
#[derive(Clone, Copy)]
pub struct Sessions<'a> {
    client: &'a SendlyClient,
}

impl Sessions<'_> {
    pub async fn create(&self, request: CreateSession) -> Result<VerifySession, SendlyError> {
        let body = encode_create_session_json(&request).map_err(encode_error)?;
        let json = self
            .client
            .execute(Method::POST, "/verify/sessions", Some(body))
            .await?;
        decode_verify_session_json_response(&json).map_err(parse_error)
    }

    pub async fn validate(
        &self,
        request: ValidateSession,
    ) -> Result<SessionValidation, SendlyError> {
        let body = encode_validate_session_json(&request).map_err(encode_error)?;
        let json = self
            .client
            .execute(Method::POST, "/verify/sessions/validate", Some(body))
            .await?;
        decode_session_validation_json_response(&json).map_err(parse_error)
    }
}

fn verification_path(id: &VerificationId) -> String {
    format!("/verify/{}", path_segment(id.as_str()))
}
