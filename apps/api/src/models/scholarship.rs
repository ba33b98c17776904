use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::category::PriorityWeights;

/// A funding opportunity. Maintained by an external loader; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scholarship {
    pub id: Uuid,
    pub title: String,
    pub organization: String,
    pub description: String,
    pub criteria: String,
    pub amount: f64,
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub essay_prompts: Vec<EssayPrompt>,
    #[serde(default)]
    pub winner_stories: Vec<String>,
    #[serde(default)]
    pub requirements: ScholarshipRequirements,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Scholarship {
    pub fn summary(&self) -> ScholarshipSummary {
        ScholarshipSummary {
            id: self.id,
            title: self.title.clone(),
            organization: self.organization.clone(),
            amount: self.amount,
            deadline: self.deadline,
            tags: self.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayPrompt {
    pub question: String,
    pub word_limit: u32,
}

/// Structured eligibility constraints. Closed: unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScholarshipRequirements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa_min: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grade_level: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub citizenship: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_of_study: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<String>,
}

/// The slice of a scholarship returned alongside match results.
#[derive(Debug, Clone, Serialize)]
pub struct ScholarshipSummary {
    pub id: Uuid,
    pub title: String,
    pub organization: String,
    pub amount: f64,
    pub deadline: DateTime<Utc>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonalityProfile {
    #[serde(rename = "type")]
    pub kind: String,
    pub traits: Vec<String>,
    pub values: Vec<String>,
    pub tone: String,
}

/// The analysis content, before it has been stored.
/// Also the exact JSON shape requested from the completion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisBody {
    pub personality_profile: PersonalityProfile,
    pub priority_weights: PriorityWeights,
    pub hidden_priorities: Vec<String>,
    pub success_patterns: Vec<String>,
    pub messaging_strategy: String,
}

/// Cached interpretation of one scholarship. Keyed 1:1 by `scholarship_id`; never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipAnalysis {
    /// Absent when the analysis could not be stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub scholarship_id: Uuid,
    #[serde(flatten)]
    pub body: AnalysisBody,
    pub analyzed_at: DateTime<Utc>,
}
