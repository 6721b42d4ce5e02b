use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{non_empty, null_as_default};
use crate::domain::{
    CreateTemplate, Template, TemplateId, TemplatePreview, TemplateStatus, TemplateVariable,
    UpdateTemplate,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response contains invalid template id: {value:?}")]
    InvalidTemplateId { value: String },
}

#[derive(Debug, Clone, Serialize)]
struct CreateTemplateJsonRequest<'a> {
    name: &'a str,
    text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct UpdateTemplateJsonRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
struct PreviewJsonRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
struct TemplateVariableJson {
    key: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    kind: String,
    #[serde(default)]
    fallback: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TemplateJson {
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    variables: Vec<TemplateVariableJson>,
    #[serde(default, deserialize_with = "null_as_default")]
    is_preset: bool,
    #[serde(default)]
    preset_slug: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    version: u32,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TemplateListJson {
    #[serde(default, deserialize_with = "null_as_default")]
    templates: Vec<TemplateJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct TemplatePreviewJson {
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    original_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    preview_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    variables: Vec<TemplateVariableJson>,
}

pub fn encode_create_template_json(request: &CreateTemplate) -> Result<String, TransportError> {
    let body = CreateTemplateJsonRequest {
        name: request.name(),
        text: request.text(),
    };
    Ok(serde_json::to_string(&body)?)
}

pub fn encode_update_template_json(request: &UpdateTemplate) -> Result<String, TransportError> {
    let body = UpdateTemplateJsonRequest {
        name: request.name.as_deref(),
        text: request.text.as_deref(),
    };
    Ok(serde_json::to_string(&body)?)
}

/// `None` leaves the `variables` key out; `Some` of an empty map sends `{}` explicitly.
pub fn encode_template_preview_json(
    variables: Option<&BTreeMap<String, String>>,
) -> Result<String, TransportError> {
    Ok(serde_json::to_string(&PreviewJsonRequest { variables })?)
}

fn template_id(value: String) -> Result<TemplateId, TransportError> {
    TemplateId::from_response(value.clone())
        .map_err(|_| TransportError::InvalidTemplateId { value })
}

fn variables_from_json(variables: Vec<TemplateVariableJson>) -> Vec<TemplateVariable> {
    variables
        .into_iter()
        .map(|variable| TemplateVariable {
            key: variable.key,
            kind: variable.kind,
            fallback: non_empty(variable.fallback),
        })
        .collect()
}

fn template_from_json(parsed: TemplateJson) -> Result<Template, TransportError> {
    Ok(Template {
        id: template_id(parsed.id)?,
        name: parsed.name,
        text: parsed.text,
        variables: variables_from_json(parsed.variables),
        is_preset: parsed.is_preset,
        preset_slug: non_empty(parsed.preset_slug),
        status: TemplateStatus::new(parsed.status),
        version: parsed.version,
        published_at: non_empty(parsed.published_at),
        created_at: parsed.created_at,
        updated_at: parsed.updated_at,
    })
}

pub fn decode_template_json_response(json: &str) -> Result<Template, TransportError> {
    let parsed: TemplateJson = serde_json::from_str(json)?;
    template_from_json(parsed)
}

pub fn decode_template_list_json_response(json: &str) -> Result<Vec<Template>, TransportError> {
    let parsed: TemplateListJson = serde_json::from_str(json)?;
    parsed.templates.into_iter().map(template_from_json).collect()
}

pub fn decode_template_preview_json_response(
    json: &str,
) -> Result<TemplatePreview, TransportError> {
    let parsed: TemplatePreviewJson = serde_json::from_str(json)?;
    Ok(TemplatePreview {
        id: template_id(parsed.id)?,
        name: parsed.name,
        original_text: parsed.original_text,
        preview_text: parsed.preview_text,
        variables: variables_from_json(parsed.variables),
    })
}
