use clap::Parser;
use leadgen_etl::utils::{logger, validation::Validate};
use leadgen_etl::{
    AppConfig, CliConfig, LeadEngine, LeadPipeline, LocalStorage, OpenRouterEvaluator,
    SerpApiSearch,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting leadgen-etl CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match AppConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    print_key_fingerprint("SERPAPI_KEY", &config.serpapi_key);
    print_key_fingerprint("OPENROUTER_API_KEY", &config.openrouter_key);

    let search = SerpApiSearch::new(config.serpapi_key.clone())
        .with_result_cap(config.result_cap)
        .with_exclude_keywords(config.targets.exclude_keywords.clone())
        .with_delay(Duration::from_millis(config.search_delay_ms));

    let mut evaluator =
        OpenRouterEvaluator::new(config.openrouter_key.clone()).with_model(config.model.clone());
    if let Some(site_url) = &config.site_url {
        evaluator = evaluator.with_referer(site_url.clone());
    }
    if let Some(app_name) = &config.app_name {
        evaluator = evaluator.with_app_title(app_name.clone());
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = LeadPipeline::new(search, evaluator, storage, config);
    let engine = LeadEngine::new(pipeline);

    match engine.run().await {
        Ok(Some(output_path)) => {
            tracing::info!("✅ Lead generation completed");
            println!("\n✅ Lead generation completed!");
            println!("📁 Output saved to: {}", output_path);
        }
        Ok(None) => {
            tracing::info!("Run completed with no qualifying leads");
        }
        Err(e) => {
            tracing::error!("❌ Lead generation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Startup sanity line: first and last characters of each secret, never the
/// whole key. Skipped when the key is absent.
fn print_key_fingerprint(name: &str, key: &str) {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() >= 10 {
        let head: String = chars[..5].iter().collect();
        let tail: String = chars[chars.len() - 5..].iter().collect();
        println!("{}: {}...{}", name, head, tail);
    } else {
        tracing::warn!("{} is not set; provider calls will fail", name);
    }
}
