//! Test doubles shared by the inline test modules: a scripted completion
//! service, an in-memory store, and fixture builders.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::llm_client::{CompletionRequest, CompletionService, LlmError};
use crate::models::scholarship::{AnalysisBody, Scholarship, ScholarshipAnalysis};
use crate::models::student::{StudentProfile, StudentRecord};
use crate::store::{InsertOutcome, ScholarshipStore, StoreError};

/// Completion fake. Each rule pairs a prompt substring with a reply, or with a
/// failure. The first rule whose needle appears in the prompt wins; a prompt
/// that matches nothing fails.
#[derive(Default)]
pub struct ScriptedCompletion {
    rules: Vec<(String, Option<String>)>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, needle: &str, reply: impl Into<String>) -> Self {
        self.rules.push((needle.to_string(), Some(reply.into())));
        self
    }

    pub fn fail(mut self, needle: &str) -> Self {
        self.rules.push((needle.to_string(), None));
        self
    }

    /// Every call sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls mutex poisoned").len()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(request.prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let rule = self
            .rules
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()));
        match rule {
            Some((_, Some(reply))) => Ok(reply.clone()),
            Some((needle, None)) => Err(LlmError::Api {
                status: 500,
                message: format!("scripted failure for '{needle}'"),
            }),
            None => Err(LlmError::Api {
                status: 404,
                message: "no scripted reply for prompt".to_string(),
            }),
        }
    }
}

/// In-memory `ScholarshipStore`. Analysis inserts keep the first writer, like
/// the unique constraint in Postgres.
#[derive(Default)]
pub struct MemoryStore {
    scholarships: Mutex<Vec<Scholarship>>,
    students: Mutex<HashMap<Uuid, StudentProfile>>,
    analyses: Mutex<HashMap<Uuid, ScholarshipAnalysis>>,
    fail_inserts: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scholarship(mut self, scholarship: Scholarship) -> Self {
        self.scholarships
            .get_mut()
            .expect("scholarships mutex poisoned")
            .push(scholarship);
        self
    }

    pub fn with_student(mut self, student: StudentProfile) -> Self {
        self.students
            .get_mut()
            .expect("students mutex poisoned")
            .insert(student.id, student);
        self
    }

    pub fn with_analysis(mut self, analysis: ScholarshipAnalysis) -> Self {
        self.analyses
            .get_mut()
            .expect("analyses mutex poisoned")
            .insert(analysis.scholarship_id, analysis);
        self
    }

    /// Every `insert_analysis` call fails with `StoreError::Unavailable`.
    pub fn failing_inserts(mut self) -> Self {
        self.fail_inserts = true;
        self
    }

    pub fn analysis_count(&self) -> usize {
        self.analyses.lock().expect("analyses mutex poisoned").len()
    }
}

#[async_trait]
impl ScholarshipStore for MemoryStore {
    async fn get_scholarship(&self, id: Uuid) -> Result<Option<Scholarship>, StoreError> {
        let scholarships = self.scholarships.lock().expect("scholarships mutex poisoned");
        Ok(scholarships.iter().find(|s| s.id == id).cloned())
    }

    async fn get_student(&self, id: Uuid) -> Result<Option<StudentProfile>, StoreError> {
        let students = self.students.lock().expect("students mutex poisoned");
        Ok(students.get(&id).cloned())
    }

    async fn upsert_student(
        &self,
        user_id: Uuid,
        record: &StudentRecord,
    ) -> Result<StudentProfile, StoreError> {
        let mut students = self.students.lock().expect("students mutex poisoned");
        let now = Utc::now();
        let existing = students.values_mut().find(|p| p.user_id == user_id);
        let profile = match existing {
            Some(profile) => {
                profile.record = record.clone();
                profile.updated_at = now;
                profile.clone()
            }
            None => {
                let profile = StudentProfile {
                    id: Uuid::new_v4(),
                    user_id,
                    record: record.clone(),
                    created_at: now,
                    updated_at: now,
                };
                students.insert(profile.id, profile.clone());
                profile
            }
        };
        Ok(profile)
    }

    async fn get_analysis(
        &self,
        scholarship_id: Uuid,
    ) -> Result<Option<ScholarshipAnalysis>, StoreError> {
        let analyses = self.analyses.lock().expect("analyses mutex poisoned");
        Ok(analyses.get(&scholarship_id).cloned())
    }

    async fn insert_analysis(
        &self,
        scholarship_id: Uuid,
        body: &AnalysisBody,
    ) -> Result<InsertOutcome, StoreError> {
        if self.fail_inserts {
            return Err(StoreError::Unavailable("scripted insert failure".to_string()));
        }
        let mut analyses = self.analyses.lock().expect("analyses mutex poisoned");
        if let Some(existing) = analyses.get(&scholarship_id) {
            return Ok(InsertOutcome::AlreadyExists(existing.clone()));
        }
        let analysis = ScholarshipAnalysis {
            id: Some(Uuid::new_v4()),
            scholarship_id,
            body: body.clone(),
            analyzed_at: Utc::now(),
        };
        analyses.insert(scholarship_id, analysis.clone());
        Ok(InsertOutcome::Inserted(analysis))
    }

    async fn list_scholarships(
        &self,
        limit: usize,
    ) -> Result<Vec<(Scholarship, Option<ScholarshipAnalysis>)>, StoreError> {
        let mut scholarships = self
            .scholarships
            .lock()
            .expect("scholarships mutex poisoned")
            .clone();
        scholarships.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.id.cmp(&b.id)));

        let analyses = self.analyses.lock().expect("analyses mutex poisoned");
        Ok(scholarships
            .into_iter()
            .take(limit)
            .map(|s| {
                let analysis = analyses.get(&s.id).cloned();
                (s, analysis)
            })
            .collect())
    }
}

pub mod fixtures {
    use serde_json::json;

    use super::*;
    use crate::models::category::PriorityWeights;
    use crate::models::scholarship::{EssayPrompt, PersonalityProfile, ScholarshipRequirements};
    use crate::models::student::{
        ApScore, Extracurricular, LeadershipRole, Project, TestScores, VolunteerWork,
    };

    pub fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid fixture time")
    }

    pub fn student_record() -> StudentRecord {
        StudentRecord {
            full_name: "Maya Chen".to_string(),
            email: "maya.chen@example.com".to_string(),
            grade_level: Some("12th".to_string()),
            gpa: Some(3.9),
            test_scores: Some(TestScores {
                sat: Some(1480),
                act: None,
                ap_scores: vec![ApScore {
                    subject: "Calculus BC".to_string(),
                    score: 5,
                }],
            }),
            academic_achievements: vec!["National Merit Semifinalist".to_string()],
            courses_taken: vec!["AP Physics C".to_string(), "AP Chemistry".to_string()],
            extracurriculars: vec![Extracurricular {
                name: "Robotics Club".to_string(),
                role: "Captain".to_string(),
                duration: "3 years".to_string(),
                description: "Led a team of 12 students".to_string(),
                impact: "Won regional championship".to_string(),
            }],
            leadership_roles: vec![LeadershipRole {
                organization: "Student Council".to_string(),
                position: "Treasurer".to_string(),
                duration: "2 years".to_string(),
                responsibilities: "Managed the club budget".to_string(),
                achievements: "Cut event costs by a third".to_string(),
            }],
            awards_honors: vec!["AP Scholar with Distinction".to_string()],
            volunteer_work: vec![VolunteerWork {
                organization: "Food Bank".to_string(),
                role: "Shift Lead".to_string(),
                hours: Some(120.0),
                impact: "Served 2,000 meals".to_string(),
                story: "Started a weekend delivery route for seniors".to_string(),
            }],
            community_impact: Some("Organized a neighborhood STEM fair".to_string()),
            projects: vec![Project {
                title: "River Sensor".to_string(),
                description: "Low-cost water quality monitor".to_string(),
                technologies: vec!["Arduino".to_string(), "Python".to_string()],
                outcomes: "Data shared with the county".to_string(),
            }],
            background_story: Some("Grew up translating for my parents".to_string()),
            challenges_overcome: Some("Balanced school with a part-time job".to_string()),
            future_goals: Some("Study environmental engineering".to_string()),
            personal_values: vec!["curiosity".to_string(), "service".to_string()],
        }
    }

    pub fn student_profile() -> StudentProfile {
        StudentProfile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            record: student_record(),
            created_at: fixed_time(),
            updated_at: fixed_time(),
        }
    }

    pub fn scholarship(title: &str) -> Scholarship {
        Scholarship {
            id: Uuid::new_v4(),
            title: title.to_string(),
            organization: "Northfield Foundation".to_string(),
            description: "Supports students who turn curiosity into community benefit."
                .to_string(),
            criteria: "Strong academics and demonstrated service.".to_string(),
            amount: 5000.0,
            deadline: fixed_time(),
            essay_prompts: vec![EssayPrompt {
                question: "Describe a challenge you overcame.".to_string(),
                word_limit: 500,
            }],
            winner_stories: Vec::new(),
            requirements: ScholarshipRequirements {
                gpa_min: Some(3.5),
                grade_level: vec!["12th".to_string()],
                ..Default::default()
            },
            tags: vec!["merit".to_string(), "stem".to_string()],
        }
    }

    pub fn analysis_body() -> AnalysisBody {
        AnalysisBody {
            personality_profile: PersonalityProfile {
                kind: "Community Impact Champion".to_string(),
                traits: vec!["action-oriented".to_string()],
                values: vec!["service".to_string(), "excellence".to_string()],
                tone: "warm and purposeful".to_string(),
            },
            priority_weights: PriorityWeights {
                academic: 0.3,
                leadership: 0.2,
                service: 0.2,
                innovation: 0.1,
                personal_story: 0.1,
                extracurricular: 0.1,
            },
            hidden_priorities: vec!["Sustained commitment over one-off events".to_string()],
            success_patterns: Vec::new(),
            messaging_strategy: "Lead with measurable community outcomes.".to_string(),
        }
    }

    pub fn analysis_for(scholarship_id: Uuid) -> ScholarshipAnalysis {
        ScholarshipAnalysis {
            id: Some(Uuid::new_v4()),
            scholarship_id,
            body: analysis_body(),
            analyzed_at: fixed_time(),
        }
    }

    pub fn analysis_reply_json() -> String {
        serde_json::to_string(&analysis_body()).expect("fixture serializes")
    }

    /// Match reply whose six breakdown values all equal `breakdown`.
    pub fn match_reply_json(reported_score: f64, breakdown: f64) -> String {
        json!({
            "match_score": reported_score,
            "match_breakdown": {
                "academic": breakdown,
                "leadership": breakdown,
                "service": breakdown,
                "innovation": breakdown,
                "personal_story": breakdown,
                "extracurricular": breakdown
            },
            "match_explanation": "Strong service record.",
            "aligned_experiences": ["Food Bank shift lead"],
            "gaps": [],
            "recommendations": ["Quantify outcomes"]
        })
        .to_string()
    }

    pub fn essay_reply_json(content: &str, reported_word_count: u32) -> String {
        json!({
            "content": content,
            "word_count": reported_word_count,
            "reasoning": "Opened with the strongest evidence.",
            "highlighted_experiences": ["Robotics Club"]
        })
        .to_string()
    }
}
