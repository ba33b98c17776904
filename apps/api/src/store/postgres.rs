use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::scholarship::{AnalysisBody, Scholarship, ScholarshipAnalysis};
use crate::models::student::{StudentProfile, StudentRecord};
use crate::store::{InsertOutcome, ScholarshipStore, StoreError};

/// Postgres-backed store.
///
/// Rows are selected as `jsonb_strip_nulls(to_jsonb(row))` and decoded through
/// serde, so every row is checked against the closed domain types on the way in
/// and NULL columns fall back to the field defaults.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScholarshipStore for PgStore {
    async fn get_scholarship(&self, id: Uuid) -> Result<Option<Scholarship>, StoreError> {
        let row: Option<Value> = sqlx::query_scalar(
            "SELECT jsonb_strip_nulls(to_jsonb(s)) FROM scholarships s WHERE s.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|v| decode("scholarship", id, v)).transpose()
    }

    async fn get_student(&self, id: Uuid) -> Result<Option<StudentProfile>, StoreError> {
        let row: Option<Value> = sqlx::query_scalar(
            "SELECT jsonb_strip_nulls(to_jsonb(sp)) FROM student_profiles sp WHERE sp.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|v| decode("student_profile", id, v)).transpose()
    }

    async fn upsert_student(
        &self,
        user_id: Uuid,
        record: &StudentRecord,
    ) -> Result<StudentProfile, StoreError> {
        // Whole-record overwrite: every column is taken from EXCLUDED, never merged.
        let row: Value = sqlx::query_scalar(
            r#"
            INSERT INTO student_profiles AS sp
                (user_id, full_name, email, grade_level, gpa, test_scores,
                 academic_achievements, courses_taken, extracurriculars, leadership_roles,
                 awards_honors, volunteer_work, community_impact, projects,
                 background_story, challenges_overcome, future_goals, personal_values)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT (user_id) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                email = EXCLUDED.email,
                grade_level = EXCLUDED.grade_level,
                gpa = EXCLUDED.gpa,
                test_scores = EXCLUDED.test_scores,
                academic_achievements = EXCLUDED.academic_achievements,
                courses_taken = EXCLUDED.courses_taken,
                extracurriculars = EXCLUDED.extracurriculars,
                leadership_roles = EXCLUDED.leadership_roles,
                awards_honors = EXCLUDED.awards_honors,
                volunteer_work = EXCLUDED.volunteer_work,
                community_impact = EXCLUDED.community_impact,
                projects = EXCLUDED.projects,
                background_story = EXCLUDED.background_story,
                challenges_overcome = EXCLUDED.challenges_overcome,
                future_goals = EXCLUDED.future_goals,
                personal_values = EXCLUDED.personal_values,
                updated_at = now()
            RETURNING jsonb_strip_nulls(to_jsonb(sp))
            "#,
        )
        .bind(user_id)
        .bind(&record.full_name)
        .bind(&record.email)
        .bind(&record.grade_level)
        .bind(record.gpa)
        .bind(record.test_scores.as_ref().map(Json))
        .bind(&record.academic_achievements)
        .bind(&record.courses_taken)
        .bind(Json(&record.extracurriculars))
        .bind(Json(&record.leadership_roles))
        .bind(&record.awards_honors)
        .bind(Json(&record.volunteer_work))
        .bind(&record.community_impact)
        .bind(Json(&record.projects))
        .bind(&record.background_story)
        .bind(&record.challenges_overcome)
        .bind(&record.future_goals)
        .bind(&record.personal_values)
        .fetch_one(&self.pool)
        .await?;

        info!("Upserted student profile for user {user_id}");
        decode("student_profile", user_id, row)
    }

    async fn get_analysis(
        &self,
        scholarship_id: Uuid,
    ) -> Result<Option<ScholarshipAnalysis>, StoreError> {
        let row: Option<Value> = sqlx::query_scalar(
            r#"
            SELECT jsonb_strip_nulls(to_jsonb(a))
            FROM scholarship_analysis a
            WHERE a.scholarship_id = $1
            "#,
        )
        .bind(scholarship_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|v| decode("scholarship_analysis", scholarship_id, v))
            .transpose()
    }

    async fn insert_analysis(
        &self,
        scholarship_id: Uuid,
        body: &AnalysisBody,
    ) -> Result<InsertOutcome, StoreError> {
        // Relies on UNIQUE (scholarship_id): a concurrent loser inserts nothing.
        let inserted: Option<Value> = sqlx::query_scalar(
            r#"
            INSERT INTO scholarship_analysis AS a
                (scholarship_id, personality_profile, priority_weights,
                 hidden_priorities, success_patterns, messaging_strategy)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (scholarship_id) DO NOTHING
            RETURNING jsonb_strip_nulls(to_jsonb(a))
            "#,
        )
        .bind(scholarship_id)
        .bind(Json(&body.personality_profile))
        .bind(Json(&body.priority_weights))
        .bind(&body.hidden_priorities)
        .bind(&body.success_patterns)
        .bind(&body.messaging_strategy)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            return Ok(InsertOutcome::Inserted(decode(
                "scholarship_analysis",
                scholarship_id,
                row,
            )?));
        }

        debug!("Analysis insert for scholarship {scholarship_id} lost a race; reading winner");
        match self.get_analysis(scholarship_id).await? {
            Some(existing) => Ok(InsertOutcome::AlreadyExists(existing)),
            None => Err(StoreError::Unavailable(format!(
                "analysis for scholarship {scholarship_id} conflicted but could not be read back"
            ))),
        }
    }

    async fn list_scholarships(
        &self,
        limit: usize,
    ) -> Result<Vec<(Scholarship, Option<ScholarshipAnalysis>)>, StoreError> {
        let rows: Vec<(Value, Option<Value>)> = sqlx::query_as(
            r#"
            SELECT jsonb_strip_nulls(to_jsonb(s)), jsonb_strip_nulls(to_jsonb(a))
            FROM scholarships s
            LEFT JOIN scholarship_analysis a ON a.scholarship_id = s.id
            ORDER BY s.deadline ASC, s.id
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_listing(rows))
    }
}

/// Decodes listing rows one by one. A row that no longer fits the domain
/// types is logged and left out rather than failing the whole listing.
fn decode_listing(
    rows: Vec<(Value, Option<Value>)>,
) -> Vec<(Scholarship, Option<ScholarshipAnalysis>)> {
    rows.into_iter()
        .filter_map(|(scholarship, analysis)| {
            let id = row_id(&scholarship);
            let decoded = decode::<Scholarship>("scholarship", id, scholarship).and_then(|s| {
                let analysis = analysis
                    .map(|a| decode("scholarship_analysis", id, a))
                    .transpose()?;
                Ok((s, analysis))
            });
            match decoded {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!("Skipping scholarship {id} in listing: {e}");
                    None
                }
            }
        })
        .collect()
}

fn decode<T: DeserializeOwned>(entity: &'static str, id: Uuid, row: Value) -> Result<T, StoreError> {
    serde_json::from_value(row).map_err(|source| StoreError::Decode { entity, id, source })
}

fn row_id(row: &Value) -> Uuid {
    row.get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::nil)
}
