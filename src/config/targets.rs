use crate::adapters::search::DEFAULT_EXCLUDE_KEYWORDS;
use crate::utils::error::{LeadGenError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which locations and categories to sweep, and which listing names to drop.
/// Loaded from a TOML file when `--targets` is given; otherwise the
/// compiled-in defaults below are used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetsConfig {
    #[serde(default = "default_locations")]
    pub locations: Vec<String>,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_exclude_keywords")]
    pub exclude_keywords: Vec<String>,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            locations: default_locations(),
            categories: default_categories(),
            exclude_keywords: default_exclude_keywords(),
        }
    }
}

fn default_locations() -> Vec<String> {
    [
        "Chandauli, Uttar Pradesh",
        "Mirzapur, Uttar Pradesh",
        "Varanasi, Uttar Pradesh",
        "Sonbhadra, Uttar Pradesh",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_categories() -> Vec<String> {
    [
        "Private Schools",
        "Coaching Institutes",
        "Hospitals",
        "Private Clinics",
        "Diagnostic Centers",
        "Water Parks",
        "Resorts",
        "Hotels",
        "Restaurants",
        "Cafes",
        "Event Management Companies",
        "Banquet Halls",
        "Real Estate Agencies",
        "Jewellery Shops",
        "Car Showrooms",
        "Gyms",
        "Fitness Centers",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_exclude_keywords() -> Vec<String> {
    DEFAULT_EXCLUDE_KEYWORDS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl TargetsConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LeadGenError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LeadGenError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Substitute `${VAR_NAME}` placeholders from the environment. Unknown
    /// variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

impl Validate for TargetsConfig {
    fn validate(&self) -> Result<()> {
        if self.locations.is_empty() {
            return Err(LeadGenError::InvalidConfigValueError {
                field: "locations".to_string(),
                value: "[]".to_string(),
                reason: "At least one location is required".to_string(),
            });
        }
        if self.categories.is_empty() {
            return Err(LeadGenError::InvalidConfigValueError {
                field: "categories".to_string(),
                value: "[]".to_string(),
                reason: "At least one category is required".to_string(),
            });
        }
        Ok(())
    }
}
