use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored student profile. One per user; re-submission overwrites `record` wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub record: StudentRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The self-reported part of a profile, as submitted by the student.
/// Every list defaults to empty and every narrative field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub full_name: String,
    pub email: String,
    pub grade_level: Option<String>,
    pub gpa: Option<f64>,
    pub test_scores: Option<TestScores>,
    #[serde(default)]
    pub academic_achievements: Vec<String>,
    #[serde(default)]
    pub courses_taken: Vec<String>,
    #[serde(default)]
    pub extracurriculars: Vec<Extracurricular>,
    #[serde(default)]
    pub leadership_roles: Vec<LeadershipRole>,
    #[serde(default)]
    pub awards_honors: Vec<String>,
    #[serde(default)]
    pub volunteer_work: Vec<VolunteerWork>,
    pub community_impact: Option<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
    pub background_story: Option<String>,
    pub challenges_overcome: Option<String>,
    pub future_goals: Option<String>,
    #[serde(default)]
    pub personal_values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestScores {
    pub sat: Option<u32>,
    pub act: Option<u32>,
    #[serde(default)]
    pub ap_scores: Vec<ApScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApScore {
    pub subject: String,
    pub score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extracurricular {
    pub name: String,
    pub role: String,
    pub duration: String,
    pub description: String,
    pub impact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadershipRole {
    pub organization: String,
    pub position: String,
    pub duration: String,
    pub responsibilities: String,
    pub achievements: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolunteerWork {
    pub organization: String,
    pub role: String,
    pub hours: Option<f64>,
    pub impact: String,
    pub story: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub outcomes: String,
}

/// Body of `PUT /api/v1/students`: the full record, keyed by the owning user.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertStudentRequest {
    pub user_id: Option<Uuid>,
    #[serde(flatten)]
    pub record: StudentRecord,
}
