// Prompt constants for the Scholarship Analyzer.

pub const ANALYSIS_SYSTEM: &str = "You are an expert at analyzing scholarship programs to identify \
    their core values, hidden priorities, and success patterns. Your goal is to create a \
    comprehensive \"personality profile\" for each scholarship that will help students understand \
    what the scholarship truly values and how to best position their applications.";

/// Replace: {title}, {organization}, {description}, {criteria}, {requirements_json},
///          {tags}, {winner_stories}, {category_keys_instruction}, {json_only_instruction}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following scholarship to extract deep insights about what it truly values:

**Scholarship Title:** {title}
**Organization:** {organization}

**Description:**
{description}

**Stated Criteria:**
{criteria}

**Requirements:**
{requirements_json}

**Tags:** {tags}
{winner_stories}

Based on this information, provide a comprehensive analysis in the following JSON format:

{
  "personality_profile": {
    "type": "A concise label for this scholarship's personality (e.g., 'Merit-Driven Academic', 'Community Impact Champion', 'Innovation Pioneer')",
    "traits": ["Key personality traits this scholarship embodies"],
    "values": ["Core values the scholarship prioritizes"],
    "tone": "The tone/voice that would resonate (e.g., 'formal and academic', 'passionate and personal')"
  },
  "priority_weights": {
    "academic": 0.0,
    "leadership": 0.0,
    "service": 0.0,
    "innovation": 0.0,
    "personal_story": 0.0,
    "extracurricular": 0.0
  },
  "hidden_priorities": [
    "Implicit values or priorities not explicitly stated but evident from language and context"
  ],
  "success_patterns": [
    "Patterns identified from winner stories about what makes successful applications"
  ],
  "messaging_strategy": "How students should frame their applications: what to emphasize, what tone to use, and what stories to tell"
}

**Instructions:**
1. The priority_weights MUST each be between 0.0 and 1.0 and MUST sum to exactly 1.0
2. {category_keys_instruction}
3. Look beyond stated criteria to identify hidden priorities in the language used
4. If winner stories are provided, extract concrete patterns about what they emphasized; otherwise return an empty success_patterns list
5. Provide an actionable messaging strategy that goes beyond generic advice

{json_only_instruction}"#;
