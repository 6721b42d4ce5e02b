use std::fmt;

use crate::domain::validation::ValidationError;

use phonenumber::country;

fn non_empty_trimmed(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_owned())
}

// Ids that end up as a single URL path segment must not be `.` or `..`.
fn path_segment(value: String, field: &'static str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value == "." || value == ".." {
        return Err(ValidationError::DotSegment { field, value });
    }
    Ok(value)
}

fn with_prefix(
    value: String,
    field: &'static str,
    prefix: &'static str,
) -> Result<String, ValidationError> {
    if !value.starts_with(prefix) {
        return Err(ValidationError::InvalidIdPrefix {
            field,
            prefix,
            actual: value,
        });
    }
    Ok(value)
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Sendly API key sent as a bearer token.
///
/// Invariant: non-empty after trimming. `Debug` output never contains the key.
pub struct ApiKey(String);

impl ApiKey {
    /// Environment variable read by [`ApiKey::from_env`].
    pub const ENV_VAR: &'static str = "SENDLY_API_KEY";

    const FIELD: &'static str = "api key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_empty_trimmed(value.into(), Self::FIELD)?))
    }

    /// Read the key from `SENDLY_API_KEY`.
    pub fn from_env() -> Result<Self, ValidationError> {
        let value = std::env::var(Self::ENV_VAR).unwrap_or_default();
        non_empty_trimmed(value, Self::ENV_VAR).map(Self)
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Webhook endpoint id.
///
/// Invariant: starts with `whk_`. Checked before any request that uses it.
pub struct WebhookId(String);

impl WebhookId {
    /// Required id prefix.
    pub const PREFIX: &'static str = "whk_";

    const FIELD: &'static str = "webhook id";

    /// Create a validated [`WebhookId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        with_prefix(value.into(), Self::FIELD, Self::PREFIX).map(Self)
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Webhook delivery id.
///
/// Invariant: starts with `del_`.
pub struct DeliveryId(String);

impl DeliveryId {
    /// Required id prefix.
    pub const PREFIX: &'static str = "del_";

    const FIELD: &'static str = "delivery id";

    /// Create a validated [`DeliveryId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        with_prefix(value.into(), Self::FIELD, Self::PREFIX).map(Self)
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// OTP verification id.
///
/// Invariant: non-empty after trimming and neither `.` nor `..`.
pub struct VerificationId(String);

impl VerificationId {
    const FIELD: &'static str = "verification id";

    /// Create a validated [`VerificationId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = non_empty_trimmed(value.into(), Self::FIELD)?;
        Ok(Self(path_segment(value, Self::FIELD)?))
    }

    /// Keep an id exactly as the API returned it.
    pub(crate) fn from_response(value: String) -> Result<Self, ValidationError> {
        Ok(Self(path_segment(value, Self::FIELD)?))
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Message template id.
///
/// Invariant: non-empty after trimming and neither `.` nor `..`.
pub struct TemplateId(String);

impl TemplateId {
    const FIELD: &'static str = "template id";

    /// Create a validated [`TemplateId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = non_empty_trimmed(value.into(), Self::FIELD)?;
        Ok(Self(path_segment(value, Self::FIELD)?))
    }

    /// Keep an id exactly as the API returned it.
    pub(crate) fn from_response(value: String) -> Result<Self, ValidationError> {
        Ok(Self(path_segment(value, Self::FIELD)?))
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// OTP code submitted by the end user.
///
/// Invariant: non-empty after trimming.
pub struct VerificationCode(String);

impl VerificationCode {
    /// JSON field name (`code`).
    pub const FIELD: &'static str = "code";

    /// Create a validated [`VerificationCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_empty_trimmed(value.into(), Self::FIELD)?))
    }

    /// Borrow the validated code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Token handed back to the success URL of a hosted verification session.
///
/// Invariant: non-empty after trimming.
pub struct SessionToken(String);

impl SessionToken {
    /// JSON field name (`token`).
    pub const FIELD: &'static str = "token";

    /// Create a validated [`SessionToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_empty_trimmed(value.into(), Self::FIELD)?))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Webhook endpoint URL.
///
/// Invariant: starts with `https://`.
pub struct WebhookUrl(String);

impl WebhookUrl {
    /// JSON field name (`url`).
    pub const FIELD: &'static str = "url";

    /// Create a validated [`WebhookUrl`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !value.starts_with("https://") {
            return Err(ValidationError::InsecureUrl {
                field: Self::FIELD,
                url: value,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the validated URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Redirect target for a hosted verification session (`success_url`, `cancel_url`).
///
/// Invariant: non-empty and parseable as an absolute URL. The original text is preserved.
pub struct RedirectUrl(String);

impl RedirectUrl {
    /// Create a validated [`RedirectUrl`]; `field` names the value in errors.
    pub fn new(field: &'static str, value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = non_empty_trimmed(value.into(), field)?;
        if url::Url::parse(&value).is_err() {
            return Err(ValidationError::InvalidUrl {
                field,
                input: value,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the validated URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Event types a webhook subscribes to, in the order given.
///
/// Invariant: at least one event type.
pub struct EventTypes(Vec<String>);

impl EventTypes {
    /// JSON field name (`events`).
    pub const FIELD: &'static str = "events";

    /// Create a validated [`EventTypes`] list.
    pub fn new<I, S>(events: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let events = events.into_iter().map(Into::into).collect::<Vec<_>>();
        if events.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(events))
    }

    /// Borrow the event types.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unvalidated phone number as sent to Sendly (`to`).
///
/// Invariant: non-empty after trimming. This type does not normalize; if you want E.164
/// normalization, parse into [`PhoneNumber`] and convert it into [`RawPhoneNumber`].
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// JSON field name (`to`).
    pub const FIELD: &'static str = "to";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_empty_trimmed(value.into(), Self::FIELD)?))
    }

    /// Raw (trimmed) value as sent to Sendly.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let raw = non_empty_trimmed(input.into(), RawPhoneNumber::FIELD)?;

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Which events a webhook receives (`mode`).
///
/// Missing or empty values on the wire decode as [`WebhookMode::ALL`]; any other string is
/// preserved as-is.
pub struct WebhookMode(String);

impl WebhookMode {
    /// The default mode.
    pub const ALL: &'static str = "all";

    /// Wrap a mode literal without validation.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Mode literal as sent by the server.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map the literal to a known mode, if one exists.
    pub fn known(&self) -> Option<KnownWebhookMode> {
        Some(match self.0.as_str() {
            "all" => KnownWebhookMode::All,
            "test" => KnownWebhookMode::Test,
            "live" => KnownWebhookMode::Live,
            _ => return None,
        })
    }
}

impl Default for WebhookMode {
    fn default() -> Self {
        Self(Self::ALL.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KnownWebhookMode {
    All,
    Test,
    Live,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Server-side circuit breaker state of a webhook (`circuit_state`).
///
/// Preserved as-is; the client never interprets it beyond [`CircuitState::known`].
pub struct CircuitState(String);

impl CircuitState {
    /// Wrap a circuit state literal without validation.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// State literal as sent by the server.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map the literal to a known state, if one exists.
    pub fn known(&self) -> Option<KnownCircuitState> {
        Some(match self.0.as_str() {
            "closed" => KnownCircuitState::Closed,
            "open" => KnownCircuitState::Open,
            "half_open" | "half-open" => KnownCircuitState::HalfOpen,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KnownCircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Status of a single webhook delivery attempt (`status`).
pub struct DeliveryStatus(String);

impl DeliveryStatus {
    /// Wrap a delivery status literal without validation.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Status literal as sent by the server.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map the literal to a known status, if one exists.
    pub fn known(&self) -> Option<KnownDeliveryStatus> {
        Some(match self.0.as_str() {
            "pending" => KnownDeliveryStatus::Pending,
            "success" => KnownDeliveryStatus::Success,
            "failed" => KnownDeliveryStatus::Failed,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KnownDeliveryStatus {
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Lifecycle status of a template (`status`).
///
/// The server owns the draft -> published transition.
pub struct TemplateStatus(String);

impl TemplateStatus {
    /// Wrap a template status literal without validation.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Status literal as sent by the server.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map the literal to a known status, if one exists.
    pub fn known(&self) -> Option<KnownTemplateStatus> {
        Some(match self.0.as_str() {
            "draft" => KnownTemplateStatus::Draft,
            "published" => KnownTemplateStatus::Published,
            _ => return None,
        })
    }

    /// Returns `true` once the template has been published.
    pub fn is_published(&self) -> bool {
        self.known() == Some(KnownTemplateStatus::Published)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KnownTemplateStatus {
    Draft,
    Published,
}
