use crate::domain::model::{BusinessRecord, EvaluationVerdict, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Maps-search provider: one call per (location, category) pair.
#[async_trait]
pub trait BusinessSearch: Send + Sync {
    async fn search(&self, location: &str, category: &str) -> Result<Vec<BusinessRecord>>;
}

/// Language-model verdict provider: one call per business, no retry.
#[async_trait]
pub trait BusinessEvaluator: Send + Sync {
    async fn evaluate(&self, business: &BusinessRecord) -> Result<EvaluationVerdict>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn locations(&self) -> &[String];
    fn categories(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn leads_filename(&self) -> &str;
    fn evaluation_delay_ms(&self) -> u64;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<BusinessRecord>>;
    async fn transform(&self, businesses: Vec<BusinessRecord>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
