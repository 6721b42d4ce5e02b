use reqwest::Method;

use super::{SendlyClient, SendlyError, encode_error, parse_error, path_segment};
use crate::domain::{
    CreateWebhook, DeliveryId, UpdateWebhook, Webhook, WebhookCreated, WebhookDelivery, WebhookId,
    WebhookSecretRotation, WebhookTestResult,
};
use crate::transport::{
    decode_deliveries_json_response, decode_event_types_json_response,
    decode_secret_rotation_json_response, decode_webhook_created_json_response,
    decode_webhook_json_response, decode_webhook_list_json_response,
    decode_webhook_test_json_response, encode_create_webhook_json, encode_update_webhook_json,
};

/// Webhook endpoint management (`/webhooks`).
#[derive(Clone, Copy)]
pub struct Webhooks<'a> {
    client: &'a SendlyClient,
}

impl<'a> Webhooks<'a> {
    pub(super) fn new(client: &'a SendlyClient) -> Self {
        Self { client }
    }

    /// Register a webhook endpoint.
    ///
    /// The returned [`WebhookCreated::secret`] is the only time the signing secret is shown.
    pub async fn create(&self, request: CreateWebhook) -> Result<WebhookCreated, SendlyError> {
        let body = encode_create_webhook_json(&request).map_err(encode_error)?;
        let json = self
            .client
            .execute(Method::POST, "/webhooks", Some(body))
            .await?;
        decode_webhook_created_json_response(&json).map_err(parse_error)
    }

    pub async fn list(&self) -> Result<Vec<Webhook>, SendlyError> {
        let json = self.client.execute(Method::GET, "/webhooks", None).await?;
        decode_webhook_list_json_response(&json).map_err(parse_error)
    }

    pub async fn get(&self, id: &WebhookId) -> Result<Webhook, SendlyError> {
        let json = self
            .client
            .execute(Method::GET, &webhook_path(id), None)
            .await?;
        decode_webhook_json_response(&json).map_err(parse_error)
    }

    /// Apply a partial update. Fields left as `None` are not sent.
    pub async fn update(
        &self,
        id: &WebhookId,
        request: UpdateWebhook,
    ) -> Result<Webhook, SendlyError> {
        let body = encode_update_webhook_json(&request).map_err(encode_error)?;
        let json = self
            .client
            .execute(Method::PATCH, &webhook_path(id), Some(body))
            .await?;
        decode_webhook_json_response(&json).map_err(parse_error)
    }

    pub async fn delete(&self, id: &WebhookId) -> Result<(), SendlyError> {
        self.client
            .execute(Method::DELETE, &webhook_path(id), None)
            .await?;
        Ok(())
    }

    /// Send a synthetic event to the endpoint.
    pub async fn test(&self, id: &WebhookId) -> Result<WebhookTestResult, SendlyError> {
        let path = format!("{}/test", webhook_path(id));
        let json = self.client.execute(Method::POST, &path, None).await?;
        decode_webhook_test_json_response(&json).map_err(parse_error)
    }

    /// Issue a new signing secret. The old one stays valid until
    /// [`WebhookSecretRotation::old_secret_expires_at`].
    pub async fn rotate_secret(
        &self,
        id: &WebhookId,
    ) -> Result<WebhookSecretRotation, SendlyError> {
        let path = format!("{}/rotate-secret", webhook_path(id));
        let json = self.client.execute(Method::POST, &path, None).await?;
        decode_secret_rotation_json_response(&json).map_err(parse_error)
    }

    pub async fn deliveries(&self, id: &WebhookId) -> Result<Vec<WebhookDelivery>, SendlyError> {
        let path = format!("{}/deliveries", webhook_path(id));
        let json = self.client.execute(Method::GET, &path, None).await?;
        decode_deliveries_json_response(&json).map_err(parse_error)
    }

    pub async fn retry_delivery(
        &self,
        id: &WebhookId,
        delivery_id: &DeliveryId,
    ) -> Result<(), SendlyError> {
        let path = format!(
            "{}/deliveries/{}/retry",
            webhook_path(id),
            path_segment(delivery_id.as_str())
        );
        self.client.execute(Method::POST, &path, None).await?;
        Ok(())
    }

    /// Event type names that can be subscribed to, in server order.
    pub async fn event_types(&self) -> Result<Vec<String>, SendlyError> {
        let json = self
            .client
            .execute(Method::GET, "/webhooks/event-types", None)
            .await?;
        decode_event_types_json_response(&json).map_err(parse_error)
    }
}

fn webhook_path(id: &WebhookId) -> String {
    format!("/webhooks/{}", path_segment(id.as_str()))
}

#[cfg(test)]
mod tests {
    use reqwest::Method;

    use super::super::testing::{FakeTransport, url};
    use crate::client::SendlyError;
    use crate::domain::{
        CreateWebhook, DeliveryId, KnownCircuitState, KnownWebhookMode, UpdateWebhook,
        ValidationError, WebhookId, WebhookMode,
    };

    const WEBHOOK_JSON: &str = r#"
    {
      "id": "whk_1",
      "url": "https://example.com/hooks",
      "events": ["message.delivered"],
      "mode": "live",
      "is_active": true,
      "failure_count": 0,
      "circuit_state": "closed",
      "api_version": "2024-01-01",
      "total_deliveries": 10,
      "successful_deliveries": 9,
      "success_rate": 0.9,
      "created_at": "2025-01-01T00:00:00Z",
      "updated_at": "2025-01-02T00:00:00Z"
    }
    "#;

    #[tokio::test]
    async fn create_posts_body_and_returns_secret() {
        let transport = FakeTransport::new(
            201,
            r#"{"id": "whk_1", "url": "https://example.com/hooks", "events": ["message.delivered"], "secret": "whsec_abc"}"#,
        );
        let client = transport.client();

        let request = CreateWebhook::new("https://example.com/hooks", ["message.delivered"])
            .unwrap()
            .with_mode(WebhookMode::new("test"));
        let created = client.webhooks().create(request).await.unwrap();
        assert_eq!(created.secret, "whsec_abc");
        assert_eq!(created.webhook.id.as_str(), "whk_1");
        assert_eq!(
            created.webhook.mode.known(),
            Some(KnownWebhookMode::All)
        );

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, url("/webhooks"));
        assert_eq!(
            request.json_body(),
            serde_json::json!({
                "url": "https://example.com/hooks",
                "events": ["message.delivered"],
                "mode": "test"
            })
        );
    }

    #[tokio::test]
    async fn create_without_secret_is_a_parse_error() {
        let client = FakeTransport::new(201, r#"{"id": "whk_1", "secret": ""}"#).client();
        let request = CreateWebhook::new("https://example.com/hooks", ["message.delivered"]).unwrap();
        let err = client.webhooks().create(request).await.unwrap_err();
        assert!(matches!(err, SendlyError::Parse(_)));
    }

    #[tokio::test]
    async fn created_webhook_can_be_fetched_back() {
        let transport = FakeTransport::new(
            200,
            r#"{"id": "whk_9", "url": "https://example.com/h", "events": ["message.sent"], "secret": "whsec_once"}"#,
        );
        let client = transport.client();

        let request = CreateWebhook::new("https://example.com/h", ["message.sent"]).unwrap();
        let created = client.webhooks().create(request).await.unwrap();
        assert!(created.webhook.id.as_str().starts_with(WebhookId::PREFIX));
        assert!(!created.secret.is_empty());

        let fetched = client.webhooks().get(&created.webhook.id).await.unwrap();
        assert_eq!(fetched, created.webhook);
        assert_eq!(transport.last_request().url, url("/webhooks/whk_9"));
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn create_rejects_plain_http_before_sending() {
        let err = CreateWebhook::new("http://example.com/hooks", ["message.delivered"]).unwrap_err();
        assert!(matches!(err, ValidationError::InsecureUrl { .. }));

        let err = CreateWebhook::new("https://example.com/hooks", Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "events" }));
    }

    #[tokio::test]
    async fn get_uses_webhook_path() {
        let transport = FakeTransport::new(200, WEBHOOK_JSON);
        let client = transport.client();

        let webhook = client
            .webhooks()
            .get(&WebhookId::new("whk_1").unwrap())
            .await
            .unwrap();
        assert_eq!(webhook.url, "https://example.com/hooks");
        assert_eq!(webhook.mode.known(), Some(KnownWebhookMode::Live));
        assert_eq!(
            webhook.circuit_state.known(),
            Some(KnownCircuitState::Closed)
        );
        assert_eq!(webhook.total_deliveries, 10);

        let request = transport.last_request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, url("/webhooks/whk_1"));
    }

    #[tokio::test]
    async fn list_keeps_server_order() {
        let transport = FakeTransport::new(200, r#"[{"id": "whk_2"}, {"id": "whk_1"}]"#);
        let webhooks = transport.client().webhooks().list().await.unwrap();
        let ids = webhooks
            .iter()
            .map(|webhook| webhook.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["whk_2", "whk_1"]);
        assert_eq!(transport.last_request().url, url("/webhooks"));
    }

    #[tokio::test]
    async fn update_sends_only_supplied_fields() {
        let transport = FakeTransport::new(200, WEBHOOK_JSON);
        let client = transport.client();

        let request = UpdateWebhook::default().with_active(false);
        client
            .webhooks()
            .update(&WebhookId::new("whk_1").unwrap(), request)
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.url, url("/webhooks/whk_1"));
        assert_eq!(request.json_body(), serde_json::json!({"is_active": false}));
    }

    #[tokio::test]
    async fn delete_ignores_response_body() {
        let transport = FakeTransport::new(204, "");
        transport
            .client()
            .webhooks()
            .delete(&WebhookId::new("whk_1").unwrap())
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.url, url("/webhooks/whk_1"));
    }

    #[tokio::test]
    async fn test_reads_camel_case_fields() {
        let transport = FakeTransport::new(
            200,
            r#"{"success": true, "statusCode": 200, "responseTimeMs": 87}"#,
        );
        let result = transport
            .client()
            .webhooks()
            .test(&WebhookId::new("whk_1").unwrap())
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.status_code, Some(200));
        assert_eq!(result.response_time_ms, Some(87));
        assert_eq!(result.raw["statusCode"], 200);

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, url("/webhooks/whk_1/test"));
        assert_eq!(request.body, None);
    }

    #[tokio::test]
    async fn rotate_secret_returns_new_secret() {
        let transport = FakeTransport::new(
            200,
            r#"
            {
              "webhook": {"id": "whk_1"},
              "new_secret": "whsec_new",
              "old_secret_expires_at": "2025-01-02T00:00:00Z",
              "message": "rotated"
            }
            "#,
        );
        let rotation = transport
            .client()
            .webhooks()
            .rotate_secret(&WebhookId::new("whk_1").unwrap())
            .await
            .unwrap();
        assert_eq!(rotation.new_secret, "whsec_new");
        assert_eq!(rotation.old_secret_expires_at, "2025-01-02T00:00:00Z");
        assert_eq!(
            transport.last_request().url,
            url("/webhooks/whk_1/rotate-secret")
        );
    }

    #[tokio::test]
    async fn deliveries_and_retry_use_nested_paths() {
        let transport = FakeTransport::new(
            200,
            r#"[{"id": "del_1", "webhook_id": "whk_1", "status": "failed", "attempt_number": 2}]"#,
        );
        let client = transport.client();
        let webhook_id = WebhookId::new("whk_1").unwrap();

        let deliveries = client.webhooks().deliveries(&webhook_id).await.unwrap();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].id.as_str(), "del_1");
        assert_eq!(deliveries[0].attempt_number, 2);
        assert_eq!(
            transport.last_request().url,
            url("/webhooks/whk_1/deliveries")
        );

        client
            .webhooks()
            .retry_delivery(&webhook_id, &DeliveryId::new("del_1").unwrap())
            .await
            .unwrap();
        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, url("/webhooks/whk_1/deliveries/del_1/retry"));
        assert_eq!(request.body, None);
    }

    #[tokio::test]
    async fn event_types_flattens_names() {
        let transport = FakeTransport::new(
            200,
            r#"{"events": [{"type": "message.sent"}, {"type": "message.delivered"}]}"#,
        );
        let names = transport.client().webhooks().event_types().await.unwrap();
        assert_eq!(names, vec!["message.sent", "message.delivered"]);
        assert_eq!(
            transport.last_request().url,
            url("/webhooks/event-types")
        );
    }

    #[tokio::test]
    async fn api_errors_pass_through() {
        let transport = FakeTransport::new(
            404,
            r#"{"error": "not_found", "message": "Webhook not found"}"#,
        );
        let err = transport
            .client()
            .webhooks()
            .get(&WebhookId::new("whk_missing").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SendlyError::Api {
                status: 404,
                ..
            }
        ));
    }
}
