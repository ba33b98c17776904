//! Essay Strategist: three drafts per essay prompt, one per angle.
//!
//! Flow: load student + scholarship + stored analysis → pick prompt → full
//! profile summary → one completion call per angle (bounded concurrency) →
//! recompute word counts → return drafts in angle order.
//!
//! A failed angle is logged and left out. Versions stay tied to the angle, so a
//! response may carry versions 1 and 3 only.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::essays::angles::EssayAngle;
use crate::essays::prompts::{ESSAY_PROMPT_TEMPLATE, ESSAY_SYSTEM, PRIMARY_FOCUS_TEMPLATE};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{complete_json, CompletionRequest, CompletionService};
use crate::models::scholarship::{EssayPrompt, Scholarship, ScholarshipAnalysis};
use crate::profile::summary::{summarize, Verbosity};
use crate::store::ScholarshipStore;

const ESSAY_TEMPERATURE: f32 = 0.8;
const ESSAY_MAX_TOKENS: u32 = 3000;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DraftReply {
    content: String,
    word_count: u32,
    reasoning: String,
    highlighted_experiences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EssayDraft {
    pub version: u8,
    pub angle: EssayAngle,
    pub angle_label: &'static str,
    pub content: String,
    /// Whitespace-delimited tokens in `content`, counted here.
    pub word_count: u32,
    /// The generator's own figure, kept for comparison.
    pub reported_word_count: u32,
    pub word_limit: u32,
    pub within_word_limit: bool,
    pub reasoning: String,
    pub highlighted_experiences: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EssayDraftsResponse {
    pub drafts: Vec<EssayDraft>,
    pub essay_prompt: EssayPrompt,
    pub scholarship_analysis: ScholarshipAnalysis,
}

/// Generates one draft for one angle.
pub async fn draft(
    llm: &dyn CompletionService,
    student_summary: &str,
    scholarship: &Scholarship,
    analysis: &ScholarshipAnalysis,
    essay_prompt: &EssayPrompt,
    angle: EssayAngle,
) -> Result<EssayDraft, AppError> {
    let prompt = build_essay_prompt(student_summary, scholarship, analysis, essay_prompt, angle)?;
    let reply: DraftReply = complete_json(
        llm,
        CompletionRequest {
            system: ESSAY_SYSTEM,
            prompt: &prompt,
            temperature: ESSAY_TEMPERATURE,
            max_tokens: ESSAY_MAX_TOKENS,
        },
    )
    .await
    .map_err(|e| AppError::Llm(format!("Essay draft ({angle}) failed: {e}")))?;

    let content = reply.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::Llm(format!("Essay draft ({angle}) has no content")));
    }

    let word_count = count_words(&content);
    let within_word_limit = word_count <= essay_prompt.word_limit;
    if !within_word_limit {
        warn!(
            "Essay draft ({angle}) for scholarship {} is {word_count} words, limit {}",
            scholarship.id, essay_prompt.word_limit
        );
    }

    Ok(EssayDraft {
        version: angle.version(),
        angle,
        angle_label: angle.label(),
        content,
        word_count,
        reported_word_count: reply.word_count,
        word_limit: essay_prompt.word_limit,
        within_word_limit,
        reasoning: reply.reasoning,
        highlighted_experiences: reply.highlighted_experiences,
    })
}

/// Produces up to three drafts for one of the scholarship's essay prompts.
///
/// Requires a stored analysis; this never triggers one. Fails only on a
/// precondition or when every angle fails.
pub async fn generate_essay_drafts(
    store: &dyn ScholarshipStore,
    llm: &dyn CompletionService,
    student_id: Uuid,
    scholarship_id: Uuid,
    prompt_index: usize,
    concurrency: usize,
) -> Result<EssayDraftsResponse, AppError> {
    let student = store
        .get_student(student_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {student_id} not found")))?;

    let scholarship = store
        .get_scholarship(scholarship_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Scholarship {scholarship_id} not found")))?;

    let analysis = store.get_analysis(scholarship_id).await?.ok_or_else(|| {
        AppError::Precondition(
            "Scholarship has not been analyzed yet. Please analyze it first.".to_string(),
        )
    })?;

    if scholarship.essay_prompts.is_empty() {
        return Err(AppError::Precondition(
            "No essay prompts available for this scholarship".to_string(),
        ));
    }
    let essay_prompt = scholarship
        .essay_prompts
        .get(prompt_index)
        .cloned()
        .ok_or_else(|| {
            AppError::Validation(format!(
                "essay_prompt_index {prompt_index} is out of range ({} prompts)",
                scholarship.essay_prompts.len()
            ))
        })?;

    info!(
        "Drafting essays for student {student_id}, scholarship {scholarship_id}, prompt {prompt_index}"
    );

    let summary = summarize(&student.record, Verbosity::Full);
    let (summary, scholarship_ref, analysis_ref, prompt_ref) =
        (summary.as_str(), &scholarship, &analysis, &essay_prompt);

    let outcomes: Vec<Option<EssayDraft>> = stream::iter(EssayAngle::ALL)
        .map(|angle| async move {
            match draft(llm, summary, scholarship_ref, analysis_ref, prompt_ref, angle).await {
                Ok(d) => Some(d),
                Err(e) => {
                    warn!("Essay angle {angle} failed for scholarship {scholarship_id}: {e}");
                    None
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let drafts: Vec<EssayDraft> = outcomes.into_iter().flatten().collect();
    if drafts.is_empty() {
        return Err(AppError::Generation(
            "No essay drafts could be generated".to_string(),
        ));
    }

    info!(
        "Generated {}/{} essay drafts for scholarship {scholarship_id}",
        drafts.len(),
        EssayAngle::ALL.len()
    );
    Ok(EssayDraftsResponse {
        drafts,
        essay_prompt,
        scholarship_analysis: analysis,
    })
}

fn build_essay_prompt(
    student_summary: &str,
    scholarship: &Scholarship,
    analysis: &ScholarshipAnalysis,
    essay_prompt: &EssayPrompt,
    angle: EssayAngle,
) -> Result<String, AppError> {
    let analysis_json = serde_json::to_string_pretty(analysis)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize analysis: {e}")))?;
    let word_limit = essay_prompt.word_limit.to_string();

    let angle_focus = match angle {
        EssayAngle::PrimaryStrength => {
            let ranked = analysis.body.priority_weights.ranked();
            let first = ranked[0].0.label();
            let second = ranked[1].0.label();
            fill_template(
                PRIMARY_FOCUS_TEMPLATE,
                &[("first", first), ("second", second)],
            )
        }
        EssayAngle::PersonalStory | EssayAngle::Balanced => String::new(),
    };

    Ok(fill_template(
        ESSAY_PROMPT_TEMPLATE,
        &[
            ("title", &scholarship.title),
            ("organization", &scholarship.organization),
            ("analysis_json", &analysis_json),
            ("question", &essay_prompt.question),
            ("word_limit", &word_limit),
            ("student_summary", student_summary),
            ("angle_instruction", angle.instruction()),
            ("angle_focus", &angle_focus),
            ("json_only_instruction", JSON_ONLY_INSTRUCTION),
        ],
    ))
}

fn count_words(content: &str) -> u32 {
    u32::try_from(content.split_whitespace().count()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MemoryStore, ScriptedCompletion};

    struct Seeded {
        store: MemoryStore,
        student_id: Uuid,
        scholarship_id: Uuid,
    }

    fn seeded(analyzed: bool) -> Seeded {
        let student = fixtures::student_profile();
        let scholarship = fixtures::scholarship("Alpha Merit Award");
        let (student_id, scholarship_id) = (student.id, scholarship.id);
        let mut store = MemoryStore::new()
            .with_student(student)
            .with_scholarship(scholarship);
        if analyzed {
            store = store.with_analysis(fixtures::analysis_for(scholarship_id));
        }
        Seeded {
            store,
            student_id,
            scholarship_id,
        }
    }

    fn every_angle_replies() -> ScriptedCompletion {
        let mut llm = ScriptedCompletion::new();
        for angle in EssayAngle::ALL {
            llm = llm.reply(
                angle.instruction(),
                fixtures::essay_reply_json(&format!("A {} essay about robotics.", angle.as_str()), 6),
            );
        }
        llm
    }

    #[test]
    fn test_count_words_uses_whitespace_tokens() {
        assert_eq!(count_words("one  two\nthree\tfour "), 4);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_primary_strength_prompt_names_top_categories() {
        let scholarship = fixtures::scholarship("Alpha Merit Award");
        let analysis = fixtures::analysis_for(scholarship.id);
        let prompt = &scholarship.essay_prompts[0];
        let ranked = analysis.body.priority_weights.ranked();

        let text = build_essay_prompt("", &scholarship, &analysis, prompt, EssayAngle::PrimaryStrength)
            .unwrap();
        assert!(text.contains(ranked[0].0.label()));
        assert!(text.contains(ranked[1].0.label()));
        assert!(text.contains("Highest-Weighted Priorities"));

        let balanced =
            build_essay_prompt("", &scholarship, &analysis, prompt, EssayAngle::Balanced).unwrap();
        assert!(!balanced.contains("Highest-Weighted Priorities"));
        assert!(balanced.contains(&format!("**Word Limit:** {} words", prompt.word_limit)));
    }

    #[tokio::test]
    async fn test_three_drafts_in_angle_order() {
        let s = seeded(true);
        let llm = every_angle_replies();

        let response = generate_essay_drafts(&s.store, &llm, s.student_id, s.scholarship_id, 0, 3)
            .await
            .unwrap();

        let versions: Vec<u8> = response.drafts.iter().map(|d| d.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
        assert_eq!(response.drafts[1].angle_label, "Personal Story Lead");
        assert_eq!(response.scholarship_analysis.scholarship_id, s.scholarship_id);
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn test_failed_angle_keeps_other_versions() {
        let s = seeded(true);
        let llm = ScriptedCompletion::new()
            .fail(EssayAngle::PersonalStory.instruction())
            .reply(
                EssayAngle::PrimaryStrength.instruction(),
                fixtures::essay_reply_json("First draft.", 2),
            )
            .reply(
                EssayAngle::Balanced.instruction(),
                fixtures::essay_reply_json("Third draft.", 2),
            );

        let response = generate_essay_drafts(&s.store, &llm, s.student_id, s.scholarship_id, 0, 1)
            .await
            .unwrap();

        let versions: Vec<u8> = response.drafts.iter().map(|d| d.version).collect();
        assert_eq!(versions, vec![1, 3]);
        assert_eq!(response.drafts[1].angle, EssayAngle::Balanced);
    }

    #[tokio::test]
    async fn test_all_angles_failing_is_an_error() {
        let s = seeded(true);
        let llm = ScriptedCompletion::new();

        let result =
            generate_essay_drafts(&s.store, &llm, s.student_id, s.scholarship_id, 0, 3).await;
        match result {
            Err(AppError::Generation(msg)) => {
                assert_eq!(msg, "No essay drafts could be generated")
            }
            other => panic!("expected generation failure, got {other:?}"),
        }
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn test_missing_analysis_is_precondition_failure() {
        let s = seeded(false);
        let llm = every_angle_replies();

        let result =
            generate_essay_drafts(&s.store, &llm, s.student_id, s.scholarship_id, 0, 3).await;
        assert!(matches!(result, Err(AppError::Precondition(_))));
        assert_eq!(llm.call_count(), 0);
        assert!(s.store.get_analysis(s.scholarship_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_prompt_index_out_of_range() {
        let s = seeded(true);
        let llm = every_angle_replies();

        let result =
            generate_essay_drafts(&s.store, &llm, s.student_id, s.scholarship_id, 7, 3).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_prompts_is_precondition_failure() {
        let student = fixtures::student_profile();
        let mut scholarship = fixtures::scholarship("Alpha Merit Award");
        scholarship.essay_prompts.clear();
        let (student_id, scholarship_id) = (student.id, scholarship.id);
        let store = MemoryStore::new()
            .with_student(student)
            .with_scholarship(scholarship)
            .with_analysis(fixtures::analysis_for(scholarship_id));
        let llm = every_angle_replies();

        let result = generate_essay_drafts(&store, &llm, student_id, scholarship_id, 0, 3).await;
        assert!(matches!(result, Err(AppError::Precondition(_))));
    }

    #[tokio::test]
    async fn test_unknown_scholarship_is_not_found() {
        let s = seeded(true);
        let llm = every_angle_replies();

        let result = generate_essay_drafts(&s.store, &llm, s.student_id, Uuid::new_v4(), 0, 3).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_word_count_is_recomputed_and_limit_flagged() {
        let scholarship = fixtures::scholarship("Alpha Merit Award");
        let analysis = fixtures::analysis_for(scholarship.id);
        let prompt = EssayPrompt {
            question: "Why you?".to_string(),
            word_limit: 3,
        };
        let llm = ScriptedCompletion::new().reply(
            EssayAngle::Balanced.instruction(),
            fixtures::essay_reply_json("I build robots for my town.", 250),
        );

        let d = draft(&llm, "", &scholarship, &analysis, &prompt, EssayAngle::Balanced)
            .await
            .unwrap();

        assert_eq!(d.word_count, 6);
        assert_eq!(d.reported_word_count, 250);
        assert!(!d.within_word_limit);
        assert_eq!(d.version, 3);
    }

    #[tokio::test]
    async fn test_blank_content_is_rejected() {
        let scholarship = fixtures::scholarship("Alpha Merit Award");
        let analysis = fixtures::analysis_for(scholarship.id);
        let llm = ScriptedCompletion::new().reply(
            EssayAngle::Balanced.instruction(),
            fixtures::essay_reply_json("   ", 0),
        );

        let result = draft(
            &llm,
            "",
            &scholarship,
            &analysis,
            &scholarship.essay_prompts[0],
            EssayAngle::Balanced,
        )
        .await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
