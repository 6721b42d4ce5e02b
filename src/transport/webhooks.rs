use serde::{Deserialize, Serialize};

use super::{non_empty, null_as_default};
use crate::domain::{
    CircuitState, CreateWebhook, DeliveryId, DeliveryStatus, Metadata, UpdateWebhook, Webhook,
    WebhookCreated, WebhookDelivery, WebhookId, WebhookMode, WebhookSecretRotation,
    WebhookTestResult,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response contains invalid webhook id: {value}")]
    InvalidWebhookId { value: String },

    #[error("response contains invalid delivery id: {value}")]
    InvalidDeliveryId { value: String },

    #[error("response does not contain the webhook signing secret")]
    MissingSecret,
}

#[derive(Debug, Clone, Serialize)]
struct CreateWebhookJsonRequest<'a> {
    url: &'a str,
    events: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a Metadata>,
}

#[derive(Debug, Clone, Serialize)]
struct UpdateWebhookJsonRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a Metadata>,
}

#[derive(Debug, Clone, Deserialize)]
struct WebhookJson {
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    events: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    is_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    failure_count: u32,
    #[serde(default)]
    last_failure_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    circuit_state: String,
    #[serde(default)]
    circuit_opened_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    api_version: String,
    #[serde(default)]
    metadata: Option<Metadata>,
    #[serde(default, deserialize_with = "null_as_default")]
    created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    updated_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    total_deliveries: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    successful_deliveries: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    success_rate: f64,
    #[serde(default)]
    last_delivery_at: Option<String>,
    #[serde(default)]
    secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct WebhookDeliveryJson {
    id: String,
    webhook_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    event_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    event_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    attempt_number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    max_attempts: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
    #[serde(default)]
    response_status_code: Option<u16>,
    #[serde(default)]
    response_time_ms: Option<u64>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    next_retry_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    created_at: String,
    #[serde(default)]
    delivered_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SecretRotationJson {
    webhook: WebhookJson,
    #[serde(default, deserialize_with = "null_as_default")]
    new_secret: String,
    #[serde(default, deserialize_with = "null_as_default")]
    old_secret_expires_at: String,
    #[serde(default)]
    message: Option<String>,
}

// Test results come back with camelCase keys and are read as-is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WebhookTestJson {
    #[serde(deserialize_with = "null_as_default")]
    success: bool,
    status_code: Option<u16>,
    response_time_ms: Option<u64>,
    error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct EventTypesJson {
    #[serde(default, deserialize_with = "null_as_default")]
    events: Vec<EventTypeJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct EventTypeJson {
    #[serde(rename = "type")]
    kind: String,
}

pub fn encode_create_webhook_json(request: &CreateWebhook) -> Result<String, TransportError> {
    let body = CreateWebhookJsonRequest {
        url: request.url().as_str(),
        events: request.events().as_slice(),
        description: request.description.as_deref(),
        mode: request.mode.as_ref().map(WebhookMode::as_str),
        metadata: request.metadata.as_ref(),
    };
    Ok(serde_json::to_string(&body)?)
}

pub fn encode_update_webhook_json(request: &UpdateWebhook) -> Result<String, TransportError> {
    let body = UpdateWebhookJsonRequest {
        url: request.url.as_ref().map(|url| url.as_str()),
        events: request.events.as_ref().map(|events| events.as_slice()),
        description: request.description.as_deref(),
        is_active: request.is_active,
        mode: request.mode.as_ref().map(WebhookMode::as_str),
        metadata: request.metadata.as_ref(),
    };
    Ok(serde_json::to_string(&body)?)
}

fn webhook_from_json(parsed: WebhookJson) -> Result<Webhook, TransportError> {
    let id = WebhookId::new(parsed.id.clone())
        .map_err(|_| TransportError::InvalidWebhookId { value: parsed.id })?;
    let mode = parsed
        .mode
        .filter(|mode| !mode.is_empty())
        .map(WebhookMode::new)
        .unwrap_or_default();

    Ok(Webhook {
        id,
        url: parsed.url,
        events: parsed.events,
        description: non_empty(parsed.description),
        mode,
        is_active: parsed.is_active,
        failure_count: parsed.failure_count,
        last_failure_at: non_empty(parsed.last_failure_at),
        circuit_state: CircuitState::new(parsed.circuit_state),
        circuit_opened_at: non_empty(parsed.circuit_opened_at),
        api_version: parsed.api_version,
        metadata: parsed.metadata.unwrap_or_default(),
        total_deliveries: parsed.total_deliveries,
        successful_deliveries: parsed.successful_deliveries,
        success_rate: parsed.success_rate,
        last_delivery_at: non_empty(parsed.last_delivery_at),
        created_at: parsed.created_at,
        updated_at: parsed.updated_at,
    })
}

fn delivery_from_json(parsed: WebhookDeliveryJson) -> Result<WebhookDelivery, TransportError> {
    let id = DeliveryId::new(parsed.id.clone())
        .map_err(|_| TransportError::InvalidDeliveryId { value: parsed.id })?;
    let webhook_id = WebhookId::new(parsed.webhook_id.clone()).map_err(|_| {
        TransportError::InvalidWebhookId {
            value: parsed.webhook_id,
        }
    })?;

    Ok(WebhookDelivery {
        id,
        webhook_id,
        event_id: parsed.event_id,
        event_type: parsed.event_type,
        attempt_number: parsed.attempt_number,
        max_attempts: parsed.max_attempts,
        status: DeliveryStatus::new(parsed.status),
        response_status_code: parsed.response_status_code,
        response_time_ms: parsed.response_time_ms,
        error_message: non_empty(parsed.error_message),
        error_code: non_empty(parsed.error_code),
        next_retry_at: non_empty(parsed.next_retry_at),
        created_at: parsed.created_at,
        delivered_at: non_empty(parsed.delivered_at),
    })
}

pub fn decode_webhook_json_response(json: &str) -> Result<Webhook, TransportError> {
    let parsed: WebhookJson = serde_json::from_str(json)?;
    webhook_from_json(parsed)
}

pub fn decode_webhook_created_json_response(json: &str) -> Result<WebhookCreated, TransportError> {
    let mut parsed: WebhookJson = serde_json::from_str(json)?;
    let secret = parsed
        .secret
        .take()
        .filter(|secret| !secret.is_empty())
        .ok_or(TransportError::MissingSecret)?;

    Ok(WebhookCreated {
        webhook: webhook_from_json(parsed)?,
        secret,
    })
}

pub fn decode_webhook_list_json_response(json: &str) -> Result<Vec<Webhook>, TransportError> {
    let parsed: Vec<WebhookJson> = serde_json::from_str(json)?;
    parsed.into_iter().map(webhook_from_json).collect()
}

pub fn decode_webhook_test_json_response(json: &str) -> Result<WebhookTestResult, TransportError> {
    let raw: serde_json::Value = serde_json::from_str(json)?;
    let parsed: WebhookTestJson = serde_json::from_value(raw.clone())?;
    Ok(WebhookTestResult {
        success: parsed.success,
        status_code: parsed.status_code,
        response_time_ms: parsed.response_time_ms,
        error: parsed.error,
        raw,
    })
}

pub fn decode_secret_rotation_json_response(
    json: &str,
) -> Result<WebhookSecretRotation, TransportError> {
    let parsed: SecretRotationJson = serde_json::from_str(json)?;
    if parsed.new_secret.is_empty() {
        return Err(TransportError::MissingSecret);
    }

    Ok(WebhookSecretRotation {
        webhook: webhook_from_json(parsed.webhook)?,
        new_secret: parsed.new_secret,
        old_secret_expires_at: parsed.old_secret_expires_at,
        message: non_empty(parsed.message),
    })
}

pub fn decode_deliveries_json_response(json: &str) -> Result<Vec<WebhookDelivery>, TransportError> {
    let parsed: Vec<WebhookDeliveryJson> = serde_json::from_str(json)?;
    parsed.into_iter().map(delivery_from_json).collect()
}

pub fn decode_event_types_json_response(json: &str) -> Result<Vec<String>, TransportError> {
    let parsed: EventTypesJson = serde_json::from_str(json)?;
    Ok(parsed.events.into_iter().map(|event| event.kind).collect())
}
