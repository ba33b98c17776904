//! Data-store seam. Pipelines talk to `ScholarshipStore`; `PgStore` is the
//! Postgres implementation, and tests use an in-memory one.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::scholarship::{AnalysisBody, Scholarship, ScholarshipAnalysis};
use crate::models::student::{StudentProfile, StudentRecord};

pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A row exists but does not fit the closed domain type.
    #[error("malformed {entity} row {id}: {source}")]
    Decode {
        entity: &'static str,
        id: Uuid,
        #[source]
        source: serde_json::Error,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result of an analysis insert. At most one analysis exists per scholarship,
/// so a losing concurrent insert gets the stored winner back.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    Inserted(ScholarshipAnalysis),
    AlreadyExists(ScholarshipAnalysis),
}

#[async_trait]
pub trait ScholarshipStore: Send + Sync {
    async fn get_scholarship(&self, id: Uuid) -> Result<Option<Scholarship>, StoreError>;

    async fn get_student(&self, id: Uuid) -> Result<Option<StudentProfile>, StoreError>;

    /// Full overwrite keyed by `user_id`.
    async fn upsert_student(
        &self,
        user_id: Uuid,
        record: &StudentRecord,
    ) -> Result<StudentProfile, StoreError>;

    async fn get_analysis(
        &self,
        scholarship_id: Uuid,
    ) -> Result<Option<ScholarshipAnalysis>, StoreError>;

    async fn insert_analysis(
        &self,
        scholarship_id: Uuid,
        body: &AnalysisBody,
    ) -> Result<InsertOutcome, StoreError>;

    /// Up to `limit` scholarships in listing order, each with its analysis if one exists.
    async fn list_scholarships(
        &self,
        limit: usize,
    ) -> Result<Vec<(Scholarship, Option<ScholarshipAnalysis>)>, StoreError>;
}
