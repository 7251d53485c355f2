/// Image Analysis Demo
///
/// Runs one wall photo through the analyzer without the web front end.
///
/// Usage:
///   cargo run --example analyze_image -- path/to/wall.jpg ["optional prompt"]
///
/// Requirements:
///   - GOOGLE_API_KEY set in the environment or a .env file
use std::sync::Arc;
use walldefect::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("Usage: analyze_image <image.jpg|image.png> [prompt]");
        std::process::exit(2);
    };
    let prompt = args.next().unwrap_or_else(|| config.default_prompt.clone());

    let image = match read_image_file(&path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Analyzing {} ({}x{}) with {}...", path, image.width(), image.height(), config.model);
    println!();

    let gateway = GeminiGateway::with_config(config.gemini_config())?;
    let analyzer = ImageAnalyzer::new(config.model.clone(), Arc::new(gateway))
        .with_config(config.generation.clone());

    match analyzer.analyze_image(&image, prompt).await? {
        AnalysisResult::Success { text } => {
            println!("--- Response ---");
            println!("{}", text);
        }
        other => {
            eprintln!("{}", other.message().unwrap_or_default());
            std::process::exit(1);
        }
    }

    Ok(())
}
