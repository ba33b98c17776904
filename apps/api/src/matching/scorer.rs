//! Match Scorer: one completion call per (student, scholarship) pair.
//!
//! The service returns per-category strengths; the overall score is always
//! recomputed here as Σ breakdown[c] × weight[c] and clamped to [0, 100].
//! The service's own scalar is kept only as `reported_match_score`.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::analyzer::usable_weights;
use crate::errors::AppError;
use crate::llm_client::prompts::{
    fill_template, CATEGORY_KEYS_INSTRUCTION, JSON_ONLY_INSTRUCTION,
};
use crate::llm_client::{complete_json, CompletionRequest, CompletionService};
use crate::matching::prompts::{MATCHING_PROMPT_TEMPLATE, MATCHING_SYSTEM};
use crate::models::category::{MatchBreakdown, PriorityWeights};
use crate::models::scholarship::{
    PersonalityProfile, Scholarship, ScholarshipAnalysis, ScholarshipSummary,
};
use crate::profile::summary::{summarize, Verbosity};
use crate::store::ScholarshipStore;

const MATCH_TEMPERATURE: f32 = 0.5;
const MATCH_MAX_TOKENS: u32 = 1500;

/// Reported and recomputed scores further apart than this are logged.
const SCORE_DIVERGENCE_WARN: f64 = 5.0;

/// Exact reply shape requested from the completion service.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MatchReply {
    match_score: f64,
    match_breakdown: MatchBreakdown,
    match_explanation: String,
    aligned_experiences: Vec<String>,
    gaps: Vec<String>,
    recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Locally recomputed, clamped to [0, 100], one decimal place.
    pub match_score: f64,
    pub reported_match_score: f64,
    pub match_breakdown: MatchBreakdown,
    pub match_explanation: String,
    pub aligned_experiences: Vec<String>,
    pub gaps: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScholarshipMatch {
    pub scholarship: ScholarshipSummary,
    pub analysis: ScholarshipAnalysis,
    #[serde(flatten)]
    pub result: MatchResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub matches: Vec<ScholarshipMatch>,
}

/// Scores one student summary against one scholarship's weights and personality.
pub async fn score(
    llm: &dyn CompletionService,
    student_summary: &str,
    scholarship_title: &str,
    weights: &PriorityWeights,
    personality: &PersonalityProfile,
) -> Result<MatchResult, AppError> {
    let weights = usable_weights(scholarship_title, weights).map_err(|e| {
        AppError::Validation(format!(
            "Stored priority weights for '{scholarship_title}' are unusable: {e}"
        ))
    })?;

    let prompt = build_matching_prompt(student_summary, scholarship_title, &weights, personality)?;
    let reply: MatchReply = complete_json(
        llm,
        CompletionRequest {
            system: MATCHING_SYSTEM,
            prompt: &prompt,
            temperature: MATCH_TEMPERATURE,
            max_tokens: MATCH_MAX_TOKENS,
        },
    )
    .await
    .map_err(|e| AppError::Llm(format!("Match scoring for '{scholarship_title}' failed: {e}")))?;

    reply.match_breakdown.validate().map_err(|e| {
        AppError::Llm(format!(
            "Match breakdown for '{scholarship_title}' is out of range: {e}"
        ))
    })?;

    let match_score = round_score(weights.weighted_score(&reply.match_breakdown));
    if (match_score - reply.match_score).abs() > SCORE_DIVERGENCE_WARN {
        warn!(
            "Reported match score {} for '{scholarship_title}' differs from weighted score {match_score}",
            reply.match_score
        );
    }

    Ok(MatchResult {
        match_score,
        reported_match_score: reply.match_score,
        match_breakdown: reply.match_breakdown,
        match_explanation: reply.match_explanation,
        aligned_experiences: reply.aligned_experiences,
        gaps: reply.gaps,
        recommendations: reply.recommendations,
    })
}

/// Scores a student against up to `limit` listed scholarships.
///
/// Unanalyzed scholarships are skipped before any call is made. Each remaining
/// scholarship is scored independently, at most `concurrency` at a time; a
/// failed item is logged and omitted. Results come back sorted by score,
/// highest first, with ties in listing order.
///
/// An empty list is a valid outcome. The call only fails outright when there
/// was something to score and every item failed.
pub async fn match_scholarships(
    store: &dyn ScholarshipStore,
    llm: &dyn CompletionService,
    student_id: Uuid,
    limit: usize,
    concurrency: usize,
) -> Result<MatchResponse, AppError> {
    let student = store
        .get_student(student_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {student_id} not found")))?;

    let listed = store.list_scholarships(limit).await?;
    let listed_count = listed.len();
    let candidates: Vec<(Scholarship, ScholarshipAnalysis)> = listed
        .into_iter()
        .filter_map(|(scholarship, analysis)| match analysis {
            Some(analysis) => Some((scholarship, analysis)),
            None => {
                debug!("Skipping unanalyzed scholarship {}", scholarship.id);
                None
            }
        })
        .collect();

    info!(
        "Matching student {student_id} against {} analyzed scholarships ({listed_count} listed)",
        candidates.len()
    );
    if candidates.is_empty() {
        return Ok(MatchResponse {
            matches: Vec::new(),
        });
    }

    let summary = summarize(&student.record, Verbosity::Compact);
    let summary = summary.as_str();
    let attempted = candidates.len();

    let outcomes: Vec<Option<ScholarshipMatch>> = stream::iter(candidates)
        .map(|(scholarship, analysis)| async move {
            let result = score(
                llm,
                summary,
                &scholarship.title,
                &analysis.body.priority_weights,
                &analysis.body.personality_profile,
            )
            .await;
            match result {
                Ok(result) => Some(ScholarshipMatch {
                    scholarship: scholarship.summary(),
                    analysis,
                    result,
                }),
                Err(e) => {
                    warn!("Failed to score scholarship {}: {e}", scholarship.id);
                    None
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut matches: Vec<ScholarshipMatch> = outcomes.into_iter().flatten().collect();
    if matches.is_empty() {
        return Err(AppError::Generation(format!(
            "None of the {attempted} scholarships could be scored"
        )));
    }

    // Stable: equal scores keep listing order.
    matches.sort_by(|a, b| b.result.match_score.total_cmp(&a.result.match_score));

    info!(
        "Scored {}/{attempted} scholarships for student {student_id}",
        matches.len()
    );
    Ok(MatchResponse { matches })
}

fn build_matching_prompt(
    student_summary: &str,
    scholarship_title: &str,
    weights: &PriorityWeights,
    personality: &PersonalityProfile,
) -> Result<String, AppError> {
    let personality_json = serde_json::to_string_pretty(personality)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize personality: {e}")))?;
    let weights_json = serde_json::to_string_pretty(weights)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize weights: {e}")))?;

    Ok(fill_template(
        MATCHING_PROMPT_TEMPLATE,
        &[
            ("title", scholarship_title),
            ("personality_json", &personality_json),
            ("weights_json", &weights_json),
            ("student_summary", student_summary),
            ("category_keys_instruction", CATEGORY_KEYS_INSTRUCTION),
            ("json_only_instruction", JSON_ONLY_INSTRUCTION),
        ],
    ))
}

fn round_score(raw: f64) -> f64 {
    (raw.clamp(0.0, 100.0) * 10.0).round() / 10.0
}
