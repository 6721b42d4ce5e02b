use std::collections::BTreeMap;

use reqwest::Method;

use super::{SendlyClient, SendlyError, encode_error, parse_error, path_segment};
use crate::domain::{CreateTemplate, Template, TemplateId, TemplatePreview, UpdateTemplate};
use crate::transport::{
    decode_template_json_response, decode_template_list_json_response,
    decode_template_preview_json_response, encode_create_template_json,
    encode_template_preview_json, encode_update_template_json,
};

/// Message templates (`/templates`).
#[derive(Clone, Copy)]
pub struct Templates<'a> {
    client: &'a SendlyClient,
}

impl<'a> Templates<'a> {
    pub(super) fn new(client: &'a SendlyClient) -> Self {
        Self { client }
    }

    /// Templates owned by the account.
    pub async fn list(&self) -> Result<Vec<Template>, SendlyError> {
        self.fetch_list("/templates").await
    }

    /// Built-in templates provided by Sendly.
    pub async fn presets(&self) -> Result<Vec<Template>, SendlyError> {
        self.fetch_list("/templates/presets").await
    }

    pub async fn get(&self, id: &TemplateId) -> Result<Template, SendlyError> {
        let json = self
            .client
            .execute(Method::GET, &template_path(id), None)
            .await?;
        decode_template_json_response(&json).map_err(parse_error)
    }

    pub async fn create(&self, request: CreateTemplate) -> Result<Template, SendlyError> {
        let body = encode_create_template_json(&request).map_err(encode_error)?;
        let json = self
            .client
            .execute(Method::POST, "/templates", Some(body))
            .await?;
        decode_template_json_response(&json).map_err(parse_error)
    }

    pub async fn update(
        &self,
        id: &TemplateId,
        request: UpdateTemplate,
    ) -> Result<Template, SendlyError> {
        let body = encode_update_template_json(&request).map_err(encode_error)?;
        let json = self
            .client
            .execute(Method::PATCH, &template_path(id), Some(body))
            .await?;
        decode_template_json_response(&json).map_err(parse_error)
    }

    pub async fn delete(&self, id: &TemplateId) -> Result<(), SendlyError> {
        self.client
            .execute(Method::DELETE, &template_path(id), None)
            .await?;
        Ok(())
    }

    /// Publish a draft so it can be used for verifications.
    pub async fn publish(&self, id: &TemplateId) -> Result<Template, SendlyError> {
        let path = format!("{}/publish", template_path(id));
        let json = self.client.execute(Method::POST, &path, None).await?;
        decode_template_json_response(&json).map_err(parse_error)
    }

    /// Render a template with sample values.
    ///
    /// `None` lets the server use each variable's fallback; `Some` sends the map as given,
    /// even when empty.
    pub async fn preview(
        &self,
        id: &TemplateId,
        variables: Option<BTreeMap<String, String>>,
    ) -> Result<TemplatePreview, SendlyError> {
        let body = encode_template_preview_json(variables.as_ref()).map_err(encode_error)?;
        let path = format!("{}/preview", template_path(id));
        let json = self.client.execute(Method::POST, &path, Some(body)).await?;
        decode_template_preview_json_response(&json).map_err(parse_error)
    }

    async fn fetch_list(&self, path: &str) -> Result<Vec<Template>, SendlyError> {
        let json = self.client.execute(Method::GET, path, None).await?;
        decode_template_list_json_response(&json).map_err(parse_error)
    }
}

fn template_path(id: &TemplateId) -> String {
    format!("/templates/{}", path_segment(id.as_str()))
}
