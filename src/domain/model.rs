use serde::{Deserialize, Serialize};

/// One candidate lead as returned by the maps search. Identity fields are
/// always present; everything else depends on what the provider listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub name: String,
    pub category: String,
    pub location: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub address: Option<String>,
    pub hours: Option<String>,
    pub gps_coordinates: Option<GpsCoordinates>,
    pub data_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl BusinessRecord {
    pub fn has_website(&self) -> bool {
        self.website.is_some()
    }

    pub fn has_phone(&self) -> bool {
        self.phone.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// Categorical estimate of a business's existing online footprint.
/// `Unknown` is never requested from the model; it only appears on the
/// degrade path when evaluation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceLevel {
    None,
    SocialOnly,
    BasicWebsite,
    GoodWebsite,
    Unknown,
}

impl PresenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceLevel::None => "none",
            PresenceLevel::SocialOnly => "social_only",
            PresenceLevel::BasicWebsite => "basic_website",
            PresenceLevel::GoodWebsite => "good_website",
            PresenceLevel::Unknown => "unknown",
        }
    }
}

/// The model's classification of a business's website opportunity.
/// Wire format matches the JSON the evaluator requests: `needs_website`,
/// `priority`, `reasoning`, `has_online_presence`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationVerdict {
    pub needs_website: bool,
    pub priority: Priority,
    pub reasoning: String,
    pub has_online_presence: PresenceLevel,
}

impl EvaluationVerdict {
    /// Forced-negative verdict assigned when the evaluation call or its
    /// response parse fails. Excludes the record without aborting the run.
    pub fn analysis_failed() -> Self {
        Self {
            needs_website: false,
            priority: Priority::Low,
            reasoning: "Analysis failed".to_string(),
            has_online_presence: PresenceLevel::Unknown,
        }
    }

    pub fn qualifies_for_outreach(&self) -> bool {
        self.needs_website && matches!(self.priority, Priority::High | Priority::Medium)
    }
}

/// A qualifying business with its merged verdict. `outreach` is `Some` only
/// when the verdict qualifies (need and High/Medium priority).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub record: BusinessRecord,
    pub verdict: EvaluationVerdict,
    pub outreach: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub leads: Vec<Lead>,
    pub evaluated: usize,
}
