pub mod engine;
pub mod outreach;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{BusinessRecord, EvaluationVerdict, Lead, TransformResult};
pub use crate::domain::ports::{
    BusinessEvaluator, BusinessSearch, ConfigProvider, Pipeline, Storage,
};
pub use crate::utils::error::Result;
