//! Typed Rust client for the Sendly messaging API.
//!
//! Three service areas are covered: webhook endpoint management, one-time password
//! verification (including hosted verification sessions) and message templates. The crate
//! is split into a domain layer of strong types, a transport layer for the JSON wire format
//! and a small client layer that issues one HTTP request per operation.
//!
//! ```rust,no_run
//! use sendly::{ApiKey, CheckVerification, RawPhoneNumber, SendVerification, SendlyClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sendly::SendlyError> {
//!     let client = SendlyClient::new(ApiKey::new("sk_test_...")?);
//!     let phone = RawPhoneNumber::new("+15550001111")?;
//!     let sent = client
//!         .verify()
//!         .send(SendVerification::new(phone, Default::default()))
//!         .await?;
//!     let checked = client
//!         .verify()
//!         .check(&sent.id, CheckVerification::new("123456")?)
//!         .await?;
//!     println!("{}", checked.status);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    SendlyClient, SendlyClientBuilder, SendlyError, Sessions, Templates, Verify, Webhooks,
};
pub use domain::{
    ApiKey, CheckVerification, CheckVerificationResponse, CreateSession, CreateTemplate,
    CreateWebhook, DeliveryId, ListVerifications, Metadata, PhoneNumber, RawPhoneNumber,
    SendVerification, SendVerificationOptions, SendVerificationResponse, SessionValidation,
    Template, TemplateId, TemplatePreview, UpdateTemplate, UpdateWebhook, ValidateSession,
    ValidationError, Verification, VerificationId, VerificationList, VerifySession, Webhook,
    WebhookCreated, WebhookDelivery, WebhookId, WebhookMode, WebhookSecretRotation,
    WebhookTestResult,
};
