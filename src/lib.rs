pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{LocalStorage, OpenRouterEvaluator, SerpApiSearch};
pub use config::{AppConfig, CliConfig};
pub use crate::core::{engine::LeadEngine, pipeline::LeadPipeline};
pub use domain::model::{
    BusinessRecord, EvaluationVerdict, Lead, PresenceLevel, Priority, TransformResult,
};
pub use utils::error::{LeadGenError, Result};
