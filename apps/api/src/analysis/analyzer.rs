//! Scholarship analysis: one completion call per scholarship, validated at the
//! boundary and stored at most once.
//!
//! Flow: cache check → load scholarship → build prompt → LLM → validate and
//! renormalize weights → insert (ON CONFLICT DO NOTHING) → respond.

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::{
    fill_template, CATEGORY_KEYS_INSTRUCTION, JSON_ONLY_INSTRUCTION,
};
use crate::llm_client::{complete_json, CompletionRequest, CompletionService};
use crate::models::category::{CategoryError, PriorityWeights};
use crate::models::scholarship::{AnalysisBody, Scholarship, ScholarshipAnalysis};
use crate::store::{InsertOutcome, ScholarshipStore};

const ANALYSIS_TEMPERATURE: f32 = 0.7;
const ANALYSIS_MAX_TOKENS: u32 = 2048;

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: ScholarshipAnalysis,
    pub cached: bool,
}

/// Returns the stored analysis for a scholarship, computing and storing it first
/// if none exists.
///
/// A stored analysis is never recomputed: it is the live scoring basis for every
/// match against this scholarship.
pub async fn analyze_scholarship(
    store: &dyn ScholarshipStore,
    llm: &dyn CompletionService,
    scholarship_id: Uuid,
) -> Result<AnalyzeResponse, AppError> {
    if let Some(existing) = store.get_analysis(scholarship_id).await? {
        info!("Analysis cache hit for scholarship {scholarship_id}");
        return Ok(AnalyzeResponse {
            analysis: existing,
            cached: true,
        });
    }

    let scholarship = store
        .get_scholarship(scholarship_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Scholarship {scholarship_id} not found")))?;

    info!("Analyzing scholarship {} ({})", scholarship.id, scholarship.title);
    let body = analyze(llm, &scholarship).await?;

    match store.insert_analysis(scholarship_id, &body).await {
        Ok(InsertOutcome::Inserted(analysis)) => Ok(AnalyzeResponse {
            analysis,
            cached: false,
        }),
        Ok(InsertOutcome::AlreadyExists(analysis)) => {
            warn!(
                "Concurrent analysis of scholarship {scholarship_id} already stored; \
                 returning the stored one"
            );
            Ok(AnalyzeResponse {
                analysis,
                cached: true,
            })
        }
        Err(e) => {
            // The computation succeeded; hand it back uncached rather than dropping it.
            error!("Failed to store analysis for scholarship {scholarship_id}: {e}");
            Ok(AnalyzeResponse {
                analysis: ScholarshipAnalysis {
                    id: None,
                    scholarship_id,
                    body,
                    analyzed_at: Utc::now(),
                },
                cached: false,
            })
        }
    }
}

/// Runs the analysis request for one scholarship. No caching; see `analyze_scholarship`.
pub async fn analyze(
    llm: &dyn CompletionService,
    scholarship: &Scholarship,
) -> Result<AnalysisBody, AppError> {
    validate_scholarship(scholarship)?;

    let prompt = build_analysis_prompt(scholarship)?;
    let mut body: AnalysisBody = complete_json(
        llm,
        CompletionRequest {
            system: ANALYSIS_SYSTEM,
            prompt: &prompt,
            temperature: ANALYSIS_TEMPERATURE,
            max_tokens: ANALYSIS_MAX_TOKENS,
        },
    )
    .await
    .map_err(|e| AppError::Llm(format!("Analysis of scholarship {} failed: {e}", scholarship.id)))?;

    body.priority_weights = usable_weights(&scholarship.title, &body.priority_weights)
        .map_err(|e| {
            AppError::Llm(format!(
                "Analysis of scholarship {} returned unusable priority weights: {e}",
                scholarship.id
            ))
        })?;

    Ok(body)
}

/// Returns weights that satisfy the [0, 1] / sum-to-1.0 invariant.
///
/// A vector that fails validation but can be rescaled is logged as a data-quality
/// defect and renormalized. Non-finite, negative, or all-zero vectors are errors.
pub fn usable_weights(
    context: &str,
    weights: &PriorityWeights,
) -> Result<PriorityWeights, CategoryError> {
    match weights.validate() {
        Ok(()) => Ok(*weights),
        Err(issues) => {
            let normalized = weights.normalized()?;
            let issues: Vec<String> = issues.iter().map(ToString::to_string).collect();
            warn!(
                "Priority weights for '{context}' failed validation ({}); renormalized",
                issues.join("; ")
            );
            Ok(normalized)
        }
    }
}

fn validate_scholarship(scholarship: &Scholarship) -> Result<(), AppError> {
    for (field, value) in [
        ("title", &scholarship.title),
        ("description", &scholarship.description),
        ("criteria", &scholarship.criteria),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Scholarship {} has an empty {field}; cannot analyze",
                scholarship.id
            )));
        }
    }
    Ok(())
}

fn build_analysis_prompt(scholarship: &Scholarship) -> Result<String, AppError> {
    let requirements_json = serde_json::to_string_pretty(&scholarship.requirements)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize requirements: {e}")))?;

    let tags = if scholarship.tags.is_empty() {
        "(none)".to_string()
    } else {
        scholarship.tags.join(", ")
    };

    Ok(fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("title", &scholarship.title),
            ("organization", &scholarship.organization),
            ("description", &scholarship.description),
            ("criteria", &scholarship.criteria),
            ("requirements_json", &requirements_json),
            ("tags", &tags),
            ("winner_stories", &winner_stories_section(&scholarship.winner_stories)),
            ("category_keys_instruction", CATEGORY_KEYS_INSTRUCTION),
            ("json_only_instruction", JSON_ONLY_INSTRUCTION),
        ],
    ))
}

/// Enumerated past-winner narratives, or an empty string when there are none.
fn winner_stories_section(stories: &[String]) -> String {
    let stories: Vec<&str> = stories
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if stories.is_empty() {
        return String::new();
    }

    let enumerated = stories
        .iter()
        .enumerate()
        .map(|(i, story)| format!("\nWinner {}:\n{story}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!("\n**Past Winner Stories:**\n{enumerated}")
}
