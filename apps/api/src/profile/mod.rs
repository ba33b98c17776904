// Student profiles: submission (whole-record upsert) and the text summary fed to prompts.

pub mod handlers;
pub mod summary;
