use crate::core::{outreach, report};
use crate::domain::model::{BusinessRecord, EvaluationVerdict, Lead, TransformResult};
use crate::domain::ports::{BusinessEvaluator, BusinessSearch, ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;
use std::time::Duration;

/// The lead-generation pipeline: search fan-out, per-record evaluation with
/// the degrade-to-exclude policy, and table/CSV reporting.
pub struct LeadPipeline<B, E, S, C>
where
    B: BusinessSearch,
    E: BusinessEvaluator,
    S: Storage,
    C: ConfigProvider,
{
    search: B,
    evaluator: E,
    storage: S,
    config: C,
}

impl<B, E, S, C> LeadPipeline<B, E, S, C>
where
    B: BusinessSearch,
    E: BusinessEvaluator,
    S: Storage,
    C: ConfigProvider,
{
    pub fn new(search: B, evaluator: E, storage: S, config: C) -> Self {
        Self {
            search,
            evaluator,
            storage,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<B, E, S, C> Pipeline for LeadPipeline<B, E, S, C>
where
    B: BusinessSearch,
    E: BusinessEvaluator,
    S: Storage,
    C: ConfigProvider,
{
    /// Location x category double loop, sequential. A failed query is logged
    /// and contributes zero records; the loop always runs to completion.
    async fn extract(&self) -> Result<Vec<BusinessRecord>> {
        let locations = self.config.locations();
        let categories = self.config.categories();
        let total = locations.len() * categories.len();
        let mut count = 0;
        let mut all_businesses = Vec::new();

        for location in locations {
            for category in categories {
                count += 1;
                println!("[{}/{}] 🔍 Searching: {} in {}", count, total, category, location);
                match self.search.search(location, category).await {
                    Ok(batch) => {
                        tracing::debug!(
                            "{} results for {} in {}",
                            batch.len(),
                            category,
                            location
                        );
                        all_businesses.extend(batch);
                    }
                    Err(e) => {
                        tracing::error!("❌ Search failed for {} in {}: {}", category, location, e);
                    }
                }
            }
        }

        Ok(all_businesses)
    }

    /// Evaluate each business once. Evaluation failures degrade to the
    /// forced-negative verdict instead of aborting. Only records whose
    /// verdict has needs_website=true survive; outreach is attached for
    /// High/Medium priority.
    async fn transform(&self, businesses: Vec<BusinessRecord>) -> Result<TransformResult> {
        let delay = Duration::from_millis(self.config.evaluation_delay_ms());
        let evaluated = businesses.len();
        let mut leads = Vec::new();

        for business in businesses {
            let verdict = match self.evaluator.evaluate(&business).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    tracing::error!("Error analyzing {}: {}", business.name, e);
                    EvaluationVerdict::analysis_failed()
                }
            };

            if verdict.needs_website {
                let outreach = verdict
                    .qualifies_for_outreach()
                    .then(|| outreach::generate_outreach(&business));
                leads.push(Lead {
                    record: business,
                    verdict,
                    outreach,
                });
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(TransformResult { leads, evaluated })
    }

    /// Print the summary table and outreach messages, write the CSV, and
    /// return the output file path.
    async fn load(&self, result: TransformResult) -> Result<String> {
        let leads = result.leads;

        println!("\n{}", "=".repeat(80));
        println!("LEADS SUMMARY");
        println!("{}", "=".repeat(80));
        println!("{}", report::render_table(&leads));

        let written =
            report::save_csv(&self.storage, self.config.leads_filename(), &leads).await?;
        let output_path = format!(
            "{}/{}",
            self.config.output_path(),
            self.config.leads_filename()
        );
        if written {
            println!("\n✅ Leads saved to {}", output_path);
        }

        if leads.iter().any(|lead| lead.outreach.is_some()) {
            println!("\n{}", "=".repeat(80));
            println!("OUTREACH MESSAGES");
            println!("{}", "=".repeat(80));
            for lead in &leads {
                if let Some(message) = &lead.outreach {
                    println!(
                        "\n--- {} ({}) ---",
                        lead.record.name,
                        lead.verdict.priority.as_str()
                    );
                    println!("{}", message);
                }
            }
        }

        Ok(output_path)
    }
}
