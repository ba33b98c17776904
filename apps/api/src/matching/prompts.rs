// Prompt constants for the Match Scorer.

pub const MATCHING_SYSTEM: &str = "You are an expert at evaluating student-scholarship fit. \
    You analyze student profiles against scholarship priorities to calculate match scores and \
    provide detailed explanations of alignment.";

/// Replace: {title}, {personality_json}, {weights_json}, {student_summary},
///          {category_keys_instruction}, {json_only_instruction}
pub const MATCHING_PROMPT_TEMPLATE: &str = r#"Evaluate how well this student matches the scholarship based on the scholarship's adaptive priority weights.

**Scholarship:** {title}

**Scholarship Personality:**
{personality_json}

**Priority Weights (how much the scholarship values each area):**
{weights_json}

**Student Profile:**
{student_summary}

Calculate a match score (0-100) for each priority area and provide an overall assessment.

Respond in this JSON format:

{
  "match_score": 0.0,
  "match_breakdown": {
    "academic": 0.0,
    "leadership": 0.0,
    "service": 0.0,
    "innovation": 0.0,
    "personal_story": 0.0,
    "extracurricular": 0.0
  },
  "match_explanation": "A detailed explanation of why this is a good/moderate/poor match, citing specific student experiences",
  "aligned_experiences": [
    "Specific student experiences or achievements that align well with scholarship values"
  ],
  "gaps": [
    "Areas where the student is weaker relative to what the scholarship values"
  ],
  "recommendations": [
    "What aspects of their profile to emphasize in the application"
  ]
}

**Scoring Guidelines:**
- Each breakdown score is 0-100 representing how strong the student is in that area
- Overall match_score is a weighted average using the priority weights
- Be honest about gaps but also highlight strengths
- Align your analysis with the scholarship's personality
- {category_keys_instruction}

{json_only_instruction}"#;
