use crate::domain::model::{BusinessRecord, GpsCoordinates};
use crate::domain::ports::BusinessSearch;
use crate::utils::error::{LeadGenError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_SERPAPI_BASE: &str = "https://serpapi.com";

/// Name substrings that disqualify a listing outright. Checked against the
/// business name only, never the address or category.
pub const DEFAULT_EXCLUDE_KEYWORDS: &[&str] = &["kirana", "paan", "street vendor", "small shop"];

/// Query text sent to the maps engine for one (location, category) pair.
pub fn build_query(category: &str, location: &str) -> String {
    format!("{} in {}", category, location)
}

/// Google-Maps search adapter backed by SerpAPI.
///
/// One capped request per (location, category) pair, no pagination, no
/// retry. A fixed delay runs after each successful call to respect the
/// provider's rate limits.
pub struct SerpApiSearch {
    client: Client,
    api_key: String,
    base_url: String,
    google_domain: String,
    country: String,
    language: String,
    result_cap: usize,
    exclude_keywords: Vec<String>,
    delay: Duration,
}

impl SerpApiSearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_SERPAPI_BASE.to_string(),
            google_domain: "google.co.in".to_string(),
            country: "in".to_string(),
            language: "en".to_string(),
            result_cap: 20,
            exclude_keywords: DEFAULT_EXCLUDE_KEYWORDS
                .iter()
                .map(|kw| kw.to_string())
                .collect(),
            delay: Duration::from_millis(1000),
        }
    }

    /// Set a custom base URL (for tests and proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_result_cap(mut self, cap: usize) -> Self {
        self.result_cap = cap;
        self
    }

    /// Replace the name-exclusion keywords. Stored lowercased so the match
    /// stays case-insensitive on both sides.
    pub fn with_exclude_keywords(mut self, keywords: Vec<String>) -> Self {
        self.exclude_keywords = keywords.into_iter().map(|kw| kw.to_lowercase()).collect();
        self
    }

    /// Set the post-call delay. Tests pass `Duration::ZERO`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn is_excluded(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.exclude_keywords.iter().any(|kw| lower.contains(kw))
    }
}

#[async_trait]
impl BusinessSearch for SerpApiSearch {
    async fn search(&self, location: &str, category: &str) -> Result<Vec<BusinessRecord>> {
        let query = build_query(category, location);
        let num = self.result_cap.to_string();

        tracing::debug!("Maps search request: {}", query);
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("engine", "google_maps"),
                ("type", "search"),
                ("q", query.as_str()),
                ("google_domain", self.google_domain.as_str()),
                ("gl", self.country.as_str()),
                ("hl", self.language.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LeadGenError::ProviderError {
                message: format!("search request for '{}' returned {}", query, status),
            });
        }

        let payload: SearchPayload = response.json().await?;

        if let Some(error) = payload.error {
            return Err(LeadGenError::ProviderError { message: error });
        }

        let businesses = match payload.local_results {
            Some(places) => places
                .into_iter()
                .map(|place| place.into_record(category, location))
                .filter(|biz| !self.is_excluded(&biz.name))
                .collect(),
            None => {
                let keys: Vec<&String> = payload.rest.keys().collect();
                tracing::warn!(
                    "No 'local_results' in response for '{}'. Response keys: {:?}",
                    query,
                    keys
                );
                Vec::new()
            }
        };

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(businesses)
    }
}

#[derive(Deserialize)]
struct SearchPayload {
    error: Option<String>,
    local_results: Option<Vec<LocalResult>>,
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct LocalResult {
    title: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    rating: Option<f64>,
    reviews: Option<u32>,
    address: Option<String>,
    // Providers sometimes send hours as a structured object instead of text.
    hours: Option<serde_json::Value>,
    gps_coordinates: Option<GpsCoordinates>,
    data_id: Option<String>,
}

impl LocalResult {
    fn into_record(self, category: &str, location: &str) -> BusinessRecord {
        BusinessRecord {
            name: self.title.unwrap_or_default(),
            category: category.to_string(),
            location: location.to_string(),
            phone: self.phone,
            website: self.website,
            rating: self.rating,
            reviews: self.reviews,
            address: self.address,
            hours: self.hours.map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            gps_coordinates: self.gps_coordinates,
            data_id: self.data_id,
        }
    }
}
