//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    CheckVerification, CreateSession, CreateTemplate, CreateWebhook, ListVerifications,
    SendVerification, SendVerificationOptions, UpdateTemplate, UpdateWebhook, ValidateSession,
};
pub use response::{
    CheckVerificationResponse, Pagination, SendVerificationResponse, SessionValidation, Template,
    TemplatePreview, TemplateVariable, ValidatedSession, Verification, VerificationList,
    VerifySession, Webhook, WebhookCreated, WebhookDelivery, WebhookSecretRotation,
    WebhookTestResult,
};
pub use validation::ValidationError;
pub use value::{
    ApiKey, CircuitState, DeliveryId, DeliveryStatus, EventTypes, KnownCircuitState,
    KnownDeliveryStatus, KnownTemplateStatus, KnownWebhookMode, PhoneNumber, RawPhoneNumber,
    RedirectUrl, SessionToken, TemplateId, TemplateStatus, VerificationCode, VerificationId,
    WebhookId, WebhookMode, WebhookUrl,
};

/// Free-form JSON object attached to webhooks and hosted sessions.
pub type Metadata = serde_json::Map<String, serde_json::Value>;
