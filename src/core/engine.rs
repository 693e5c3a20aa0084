use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

pub struct LeadEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> LeadEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Run the full pipeline. Returns the output file path, or `None` when
    /// no business qualified and nothing was written.
    pub async fn run(&self) -> Result<Option<String>> {
        println!("Starting business search...");
        let businesses = self.pipeline.extract().await?;
        println!("\nTotal businesses found: {}", businesses.len());

        println!("\nAnalyzing each business with AI...");
        let result = self.pipeline.transform(businesses).await?;
        println!(
            "Qualified {} of {} businesses",
            result.leads.len(),
            result.evaluated
        );

        if result.leads.is_empty() {
            println!("No businesses found that need a website.");
            return Ok(None);
        }

        let output_path = self.pipeline.load(result).await?;
        Ok(Some(output_path))
    }
}
