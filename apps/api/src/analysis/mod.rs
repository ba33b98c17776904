// Scholarship Analyzer: infers a personality profile and priority weights for a
// scholarship, cached 1:1 per scholarship.
// All LLM calls go through llm_client. No direct Anthropic calls here.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
