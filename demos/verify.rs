use std::io;

use sendly::{
    CheckVerification, PhoneNumber, SendVerification, SendVerificationOptions, SendlyClient,
    VerificationId,
};
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

    if let (Ok(id), Ok(code)) = (
        std::env::var("SENDLY_VERIFICATION_ID"),
        std::env::var("SENDLY_CODE"),
    ) {
        let checked = client
            .verify()
            .check(&VerificationId::new(id)?, CheckVerification::new(code)?)
            .await?;
        println!(
            "status: {}, verified_at: {:?}, remaining_attempts: {:?}",
            checked.status, checked.verified_at, checked.remaining_attempts
        );
        return Ok(());
    }

    let phone_raw = std::env::var("SENDLY_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SENDLY_PHONE environment variable is required when SENDLY_VERIFICATION_ID is not set",
        )
    })?;
    let phone = PhoneNumber::parse(None, phone_raw)?;

    let options = SendVerificationOptions {
        app_name: std::env::var("SENDLY_APP_NAME").ok(),
        ..Default::default()
    };
    let sent = client
        .verify()
        .send(SendVerification::new(phone.into(), options))
        .await?;

    println!(
        "id: {}, status: {}, expires_at: {}, sandbox_code: {:?}",
        sent.id.as_str(),
        sent.status,
        sent.expires_at,
        sent.sandbox_code
    );

    Ok(())
}
