use walldefect::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let gateway = GeminiGateway::with_config(config.gemini_config())?;

    println!("Available Gemini models:");
    for model in gateway.get_available_models().await? {
        let marker = if model == config.model { " (configured)" } else { "" };
        println!("  {}{}", model, marker);
    }

    Ok(())
}
