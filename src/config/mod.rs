pub mod targets;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use targets::TargetsConfig;

pub const DEFAULT_SITE_URL: &str = "https://altivonholdings.github.io";
pub const DEFAULT_APP_NAME: &str = "LeadGen AI Agent";

#[derive(Debug, Clone, Parser)]
#[command(name = "leadgen-etl")]
#[command(about = "Find local businesses that need a website and export outreach leads")]
pub struct CliConfig {
    /// Path to a TOML targets file (locations, categories, exclusions)
    #[arg(long)]
    pub targets: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "leads.csv")]
    pub leads_file: String,

    /// Chat model used for business evaluation
    #[arg(long, default_value = "openai/gpt-4o-mini")]
    pub model: String,

    /// Delay after each maps-search call, in milliseconds
    #[arg(long, default_value = "1000")]
    pub search_delay_ms: u64,

    /// Delay after each evaluation call, in milliseconds
    #[arg(long, default_value = "500")]
    pub eval_delay_ms: u64,

    /// Maximum results requested per search
    #[arg(long, default_value = "20")]
    pub result_cap: usize,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Everything a run needs, assembled once at startup and passed into the
/// pipeline. Secrets come from the environment; their absence is not
/// validated here - a missing key surfaces as provider call failures, which
/// the pipeline degrades through.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub serpapi_key: String,
    pub openrouter_key: String,
    pub model: String,
    pub site_url: Option<String>,
    pub app_name: Option<String>,
    pub targets: TargetsConfig,
    pub output_path: String,
    pub leads_file: String,
    pub search_delay_ms: u64,
    pub eval_delay_ms: u64,
    pub result_cap: usize,
}

impl AppConfig {
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let targets = match &cli.targets {
            Some(path) => TargetsConfig::from_file(path)?,
            None => TargetsConfig::default(),
        };

        Ok(Self {
            serpapi_key: std::env::var("SERPAPI_KEY").unwrap_or_default(),
            openrouter_key: std::env::var("OPENROUTER_API_KEY").unwrap_or_default(),
            model: cli.model.clone(),
            site_url: Some(DEFAULT_SITE_URL.to_string()),
            app_name: Some(DEFAULT_APP_NAME.to_string()),
            targets,
            output_path: cli.output_path.clone(),
            leads_file: cli.leads_file.clone(),
            search_delay_ms: cli.search_delay_ms,
            eval_delay_ms: cli.eval_delay_ms,
            result_cap: cli.result_cap,
        })
    }
}

impl ConfigProvider for AppConfig {
    fn locations(&self) -> &[String] {
        &self.targets.locations
    }

    fn categories(&self) -> &[String] {
        &self.targets.categories
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn leads_filename(&self) -> &str {
        &self.leads_file
    }

    fn evaluation_delay_ms(&self) -> u64 {
        self.eval_delay_ms
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("leads_file", &self.leads_file)?;
        validation::validate_non_empty_string("model", &self.model)?;
        validation::validate_positive_number("result_cap", self.result_cap, 1)?;
        if let Some(site_url) = &self.site_url {
            validation::validate_url("site_url", site_url)?;
        }
        self.targets.validate()
    }
}
