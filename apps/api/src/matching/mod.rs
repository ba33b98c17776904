// Match Scorer: ranks a student against analyzed scholarships using each
// scholarship's stored priority weights.

pub mod handlers;
pub mod prompts;
pub mod scorer;
