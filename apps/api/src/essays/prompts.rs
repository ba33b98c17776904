// Prompt constants for the Essay Strategist.

pub const ESSAY_SYSTEM: &str = "You are an expert scholarship essay writer who helps students \
    craft compelling, authentic applications. You understand how to tailor messaging to \
    different scholarship personalities while maintaining the student's genuine voice. You know \
    how to strategically emphasize certain experiences over others based on what each \
    scholarship values.";

/// Replace: {title}, {organization}, {analysis_json}, {question}, {word_limit},
///          {student_summary}, {angle_instruction}, {angle_focus}, {json_only_instruction}
pub const ESSAY_PROMPT_TEMPLATE: &str = r#"Generate a scholarship essay that strategically positions this student for the specific scholarship.

**Scholarship:** {title}
**Organization:** {organization}

**Scholarship Analysis:**
{analysis_json}

**Essay Prompt:**
{question}

**Word Limit:** {word_limit} words

**Student Profile:**
{student_summary}

**Essay Angle:** {angle_instruction}{angle_focus}

**Requirements:**
1. Stay within {word_limit} words (strict limit)
2. Use authentic student voice - sound like a real high school/college student
3. Strategically emphasize experiences that align with the scholarship's priority_weights
4. Mirror success_patterns from the scholarship analysis
5. Match the tone from the personality_profile
6. Be specific with details and examples, not generic
7. Follow the angle description to determine what to emphasize
8. Create a compelling narrative arc

Respond in this JSON format:

{
  "content": "The full essay text here",
  "word_count": 0,
  "reasoning": "Detailed explanation of your strategic choices: why you led with certain experiences, what you emphasized vs de-emphasized, how you matched the scholarship personality, which success patterns you incorporated",
  "highlighted_experiences": [
    "Specific student experiences you chose to feature prominently and why"
  ]
}

Write an excellent essay that would genuinely improve this student's chances of winning this specific scholarship. Be strategic and purposeful in every choice.

{json_only_instruction}"#;

/// Appended to the angle line for `primary_strength`. Replace: {first}, {second}
pub const PRIMARY_FOCUS_TEMPLATE: &str =
    "\n**Highest-Weighted Priorities:** {first} and {second}. Open with the student's strongest evidence in these areas.";
