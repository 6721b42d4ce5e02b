use crate::domain::Metadata;
use crate::domain::value::{
    CircuitState, DeliveryId, DeliveryStatus, TemplateId, TemplateStatus, VerificationId,
    WebhookId, WebhookMode,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Webhook {
    pub id: WebhookId,
    pub url: String,
    pub events: Vec<String>,
    pub description: Option<String>,
    pub mode: WebhookMode,
    pub is_active: bool,
    pub failure_count: u32,
    pub last_failure_at: Option<String>,
    pub circuit_state: CircuitState,
    pub circuit_opened_at: Option<String>,
    pub api_version: String,
    pub metadata: Metadata,
    pub total_deliveries: u64,
    pub successful_deliveries: u64,
    pub success_rate: f64,
    pub last_delivery_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Result of creating a webhook.
///
/// `secret` is the signing secret in plaintext. It is only ever returned here.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookCreated {
    pub webhook: Webhook,
    pub secret: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebhookSecretRotation {
    pub webhook: Webhook,
    pub new_secret: String,
    /// The previous secret keeps verifying signatures until this time.
    pub old_secret_expires_at: String,
    pub message: Option<String>,
}

/// Outcome of a synthetic test delivery.
///
/// The payload is not remapped from snake_case like other webhook responses: the typed
/// fields are read with camelCase keys and `raw` holds the body exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookTestResult {
    pub success: bool,
    pub status_code: Option<u16>,
    pub response_time_ms: Option<u64>,
    pub error: Option<String>,
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookDelivery {
    pub id: DeliveryId,
    pub webhook_id: WebhookId,
    pub event_id: String,
    pub event_type: String,
    pub attempt_number: u32,
    pub max_attempts: u32,
    pub status: DeliveryStatus,
    pub response_status_code: Option<u16>,
    pub response_time_ms: Option<u64>,
    pub error_message: Option<String>,
    pub error_code: Option<String>,
    pub next_retry_at: Option<String>,
    pub created_at: String,
    pub delivered_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendVerificationResponse {
    pub id: VerificationId,
    pub status: String,
    pub phone: String,
    pub expires_at: String,
    pub sandbox: bool,
    /// The OTP itself; only returned in sandbox mode.
    pub sandbox_code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckVerificationResponse {
    pub id: VerificationId,
    pub status: String,
    pub phone: String,
    pub verified_at: Option<String>,
    /// Absent once the verification is exhausted or verified.
    pub remaining_attempts: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub id: VerificationId,
    pub status: String,
    pub phone: String,
    pub delivery_status: String,
    pub attempts: u32,
    pub max_attempts: u32,
    pub expires_at: String,
    pub verified_at: Option<String>,
    pub created_at: String,
    pub sandbox: bool,
    pub app_name: Option<String>,
    pub template_id: Option<String>,
    pub profile_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationList {
    pub verifications: Vec<Verification>,
    pub pagination: Pagination,
}

/// Hosted verification session.
///
/// `phone`, `verification_id` and `token` are only filled in after the end user finishes
/// the hosted flow.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifySession {
    pub id: String,
    pub url: String,
    pub status: String,
    pub success_url: String,
    pub cancel_url: Option<String>,
    pub brand_name: Option<String>,
    pub brand_color: Option<String>,
    pub phone: Option<String>,
    pub verification_id: Option<VerificationId>,
    pub token: Option<String>,
    pub metadata: Option<Metadata>,
    pub expires_at: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionValidation {
    /// The token is unknown, expired or already used.
    Invalid,
    Valid(ValidatedSession),
}

impl SessionValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSession {
    pub session_id: Option<String>,
    pub phone: Option<String>,
    pub verified_at: Option<String>,
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariable {
    pub key: String,
    /// Wire field `type`.
    pub kind: String,
    pub fallback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub text: String,
    pub variables: Vec<TemplateVariable>,
    pub is_preset: bool,
    pub preset_slug: Option<String>,
    pub status: TemplateStatus,
    pub version: u32,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePreview {
    pub id: TemplateId,
    pub name: String,
    pub original_text: String,
    pub preview_text: String,
    pub variables: Vec<TemplateVariable>,
}
