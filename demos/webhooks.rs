use sendly::{CreateWebhook, SendlyClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sendly=debug")),
        )
        .with_target(false)
        .init();

    let client = SendlyClient::from_env()?;

    let event_types = client.webhooks().event_types().await?;
    println!("event types: {}", event_types.join(", "));

    if let Ok(url) = std::env::var("SENDLY_WEBHOOK_URL") {
        let created = client
            .webhooks()
            .create(CreateWebhook::new(url, event_types)?.with_description("sendly demo"))
            .await?;
        println!(
            "created {} (store this secret, it is not shown again: {})",
            created.webhook.id.as_str(),
            created.secret
        );
    }

    for webhook in client.webhooks().list().await? {
        println!(
            "{} {} active: {}, circuit: {}, success_rate: {:.2}",
            webhook.id.as_str(),
            webhook.url,
            webhook.is_active,
            webhook.circuit_state.as_str(),
            webhook.success_rate
        );
    }

    Ok(())
}
