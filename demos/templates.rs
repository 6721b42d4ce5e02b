use std::collections::BTreeMap;

use sendly::SendlyClient;
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

    let presets = client.templates().presets().await?;
    for template in &presets {
        println!(
            "{} [{}] {:?}: {}",
            template.id.as_str(),
            template.status.as_str(),
            template.preset_slug,
            template.text
        );
    }

    if let Some(template) = presets.first() {
        let mut variables = BTreeMap::new();
        variables.insert("code".to_owned(), "123456".to_owned());
        variables.insert("app_name".to_owned(), "Sendly demo".to_owned());
        let preview = client
            .templates()
            .preview(&template.id, Some(variables))
            .await?;
        println!("preview: {}", preview.preview_text);
    }

    Ok(())
}
