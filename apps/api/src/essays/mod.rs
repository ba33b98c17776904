// Essay Strategist: three angle-specific drafts per essay prompt, built on the
// scholarship's stored analysis.

pub mod angles;
pub mod handlers;
pub mod prompts;
pub mod strategist;
