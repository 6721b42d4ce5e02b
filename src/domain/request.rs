use crate::domain::Metadata;
use crate::domain::validation::ValidationError;
use crate::domain::value::{
    EventTypes, RawPhoneNumber, RedirectUrl, SessionToken, TemplateId, VerificationCode,
    WebhookMode, WebhookUrl,
};

/// Parameters for `POST /webhooks`.
#[derive(Debug, Clone)]
pub struct CreateWebhook {
    url: WebhookUrl,
    events: EventTypes,
    pub description: Option<String>,
    pub mode: Option<WebhookMode>,
    pub metadata: Option<Metadata>,
}

impl CreateWebhook {
    /// Validate the endpoint URL (HTTPS only) and the subscribed events (at least one).
    pub fn new<I, S>(url: impl Into<String>, events: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            url: WebhookUrl::new(url)?,
            events: EventTypes::new(events)?,
            description: None,
            mode: None,
            metadata: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_mode(mut self, mode: WebhookMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn url(&self) -> &WebhookUrl {
        &self.url
    }

    pub fn events(&self) -> &EventTypes {
        &self.events
    }
}

/// Partial update for `PATCH /webhooks/{id}`.
///
/// Only fields set to `Some` are sent.
#[derive(Debug, Clone, Default)]
pub struct UpdateWebhook {
    pub url: Option<WebhookUrl>,
    pub events: Option<EventTypes>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub mode: Option<WebhookMode>,
    pub metadata: Option<Metadata>,
}

impl UpdateWebhook {
    /// Set a new endpoint URL; rejects non-HTTPS values.
    pub fn with_url(mut self, url: impl Into<String>) -> Result<Self, ValidationError> {
        self.url = Some(WebhookUrl::new(url)?);
        Ok(self)
    }

    /// Replace the subscribed events; rejects an empty list.
    pub fn with_events<I, S>(mut self, events: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = Some(EventTypes::new(events)?);
        Ok(self)
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// Optional knobs for `POST /verify`.
#[derive(Debug, Clone, Default)]
pub struct SendVerificationOptions {
    pub template_id: Option<TemplateId>,
    pub profile_id: Option<String>,
    pub app_name: Option<String>,
    pub timeout_secs: Option<u32>,
    pub code_length: Option<u8>,
}

/// Parameters for `POST /verify`.
#[derive(Debug, Clone)]
pub struct SendVerification {
    to: RawPhoneNumber,
    options: SendVerificationOptions,
}

impl SendVerification {
    pub fn new(to: RawPhoneNumber, options: SendVerificationOptions) -> Self {
        Self { to, options }
    }

    pub fn to(&self) -> &RawPhoneNumber {
        &self.to
    }

    pub fn options(&self) -> &SendVerificationOptions {
        &self.options
    }
}

/// Parameters for `POST /verify/{id}/check`.
#[derive(Debug, Clone)]
pub struct CheckVerification {
    code: VerificationCode,
}

impl CheckVerification {
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            code: VerificationCode::new(code)?,
        })
    }

    pub fn code(&self) -> &VerificationCode {
        &self.code
    }
}

/// Filters for `GET /verify`.
///
/// A zero `limit` or an empty `status` is treated the same as `None`: the query
/// parameter is left out.
#[derive(Debug, Clone, Default)]
pub struct ListVerifications {
    pub limit: Option<u32>,
    pub status: Option<String>,
}

/// Parameters for `POST /verify/sessions`.
#[derive(Debug, Clone)]
pub struct CreateSession {
    success_url: RedirectUrl,
    pub cancel_url: Option<RedirectUrl>,
    pub brand_name: Option<String>,
    pub brand_color: Option<String>,
    pub metadata: Option<Metadata>,
}

impl CreateSession {
    pub const SUCCESS_URL_FIELD: &'static str = "success_url";
    pub const CANCEL_URL_FIELD: &'static str = "cancel_url";

    /// `success_url` is required; the end user is sent there after verifying.
    pub fn new(success_url: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            success_url: RedirectUrl::new(Self::SUCCESS_URL_FIELD, success_url)?,
            cancel_url: None,
            brand_name: None,
            brand_color: None,
            metadata: None,
        })
    }

    pub fn with_cancel_url(mut self, cancel_url: impl Into<String>) -> Result<Self, ValidationError> {
        self.cancel_url = Some(RedirectUrl::new(Self::CANCEL_URL_FIELD, cancel_url)?);
        Ok(self)
    }

    pub fn with_brand(mut self, name: impl Into<String>, color: impl Into<String>) -> Self {
        self.brand_name = Some(name.into());
        self.brand_color = Some(color.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn success_url(&self) -> &RedirectUrl {
        &self.success_url
    }
}

/// Parameters for `POST /verify/sessions/validate`.
#[derive(Debug, Clone)]
pub struct ValidateSession {
    token: SessionToken,
}

impl ValidateSession {
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            token: SessionToken::new(token)?,
        })
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }
}

/// Parameters for `POST /templates`.
#[derive(Debug, Clone)]
pub struct CreateTemplate {
    name: String,
    text: String,
}

impl CreateTemplate {
    pub const NAME_FIELD: &'static str = "name";
    pub const TEXT_FIELD: &'static str = "text";

    /// Both `name` and `text` must be non-empty after trimming; `text` is sent as given.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let text = text.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: Self::NAME_FIELD,
            });
        }
        if text.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: Self::TEXT_FIELD,
            });
        }
        Ok(Self {
            name: name.trim().to_owned(),
            text,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Partial update for `PATCH /templates/{id}`.
#[derive(Debug, Clone, Default)]
pub struct UpdateTemplate {
    pub name: Option<String>,
    pub text: Option<String>,
}
