use dotenv::dotenv;
use std::error::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};
use url::Url;
use vkauth::{ClientConfig, VkOAuth};

/// Walks through the VK login flow from the command line.
///
/// Without arguments, prints the authorization dialog URL. Called with the
/// URL the browser was redirected to, exchanges the code and prints the
/// user's profile.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    init_tracing();

    let cfg = ClientConfig::from_env()?;
    let client = VkOAuth::new(cfg, reqwest::Client::new());

    let Some(redirect) = std::env::args().nth(1) else {
        println!("{}", client.dialog_url()?);
        return Ok(());
    };

    let redirect = Url::parse(&redirect)?;
    let token = client.exchange_code(&redirect).await?;
    info!(user_id = token.user_id, expires_in = token.expires_in, "received access token");

    let profile = client
        .fetch_user_profile_with_token(token.user_id, &token)
        .await?;

    println!("id:       {}", profile.id);
    println!("name:     {}", profile.display_name);
    println!("gender:   {:?}", profile.gender);
    if let Some(email) = &token.email {
        println!("email:    {email}");
    }
    if let Some(photo) = &profile.photo_url {
        println!("photo:    {photo}");
    }
    if let Some(birthday) = profile.birthday {
        println!("birthday: {birthday}");
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
