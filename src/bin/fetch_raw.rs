use clap::Parser;
use leadgen_etl::config::targets::TargetsConfig;
use leadgen_etl::core::report;
use leadgen_etl::domain::ports::{BusinessSearch, Storage};
use leadgen_etl::utils::{logger, validation::Validate};
use leadgen_etl::{LocalStorage, SerpApiSearch};
use std::time::Duration;

/// Raw listing export: runs only the search stage over every configured
/// (location, category) pair and dumps the unevaluated records to CSV.
#[derive(Parser)]
#[command(name = "fetch-raw")]
#[command(about = "Fetch raw business listings for all configured targets into a CSV")]
struct Args {
    /// Path to a TOML targets file (locations, categories, exclusions)
    #[arg(short, long)]
    targets: Option<String>,

    #[arg(long, default_value = "./output")]
    output_path: String,

    #[arg(long, default_value = "raw_businesses.csv")]
    output_file: String,

    /// Maximum results requested per search
    #[arg(long, default_value = "20")]
    result_cap: usize,

    /// Delay after each maps-search call, in milliseconds
    #[arg(long, default_value = "1000")]
    search_delay_ms: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let targets = match &args.targets {
        Some(path) => TargetsConfig::from_file(path)?,
        None => TargetsConfig::default(),
    };
    targets.validate()?;

    let api_key = std::env::var("SERPAPI_KEY").unwrap_or_default();
    let search = SerpApiSearch::new(api_key)
        .with_result_cap(args.result_cap)
        .with_exclude_keywords(targets.exclude_keywords.clone())
        .with_delay(Duration::from_millis(args.search_delay_ms));
    let storage = LocalStorage::new(args.output_path.clone());

    let total = targets.locations.len() * targets.categories.len();
    let mut count = 0;
    let mut all_businesses = Vec::new();

    println!("Starting business search...");
    for location in &targets.locations {
        for category in &targets.categories {
            count += 1;
            println!("[{}/{}] 🔍 Searching: {} in {}", count, total, category, location);
            match search.search(location, category).await {
                Ok(batch) => all_businesses.extend(batch),
                Err(e) => {
                    tracing::error!("❌ Search failed for {} in {}: {}", category, location, e);
                }
            }
        }
    }

    println!("\nTotal businesses fetched: {}", all_businesses.len());
    if all_businesses.is_empty() {
        println!("No businesses to save.");
        return Ok(());
    }

    let bytes = report::raw_to_csv(&all_businesses)?;
    storage.write_file(&args.output_file, &bytes).await?;
    println!(
        "\n✅ Saved {} businesses to {}/{}",
        all_businesses.len(),
        args.output_path,
        args.output_file
    );

    println!("\n--- Sample of first 5 businesses ---");
    for (i, biz) in all_businesses.iter().take(5).enumerate() {
        println!(
            "{}. {} ({}) - {}",
            i + 1,
            biz.name,
            biz.category,
            biz.phone.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
