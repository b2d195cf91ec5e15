// All LLM prompt templates for the generation endpoints.
// Placeholders are `{name}`; fill them with `render`, never with chained
// `str::replace`, so user text containing `{...}` is embedded verbatim.

/// Interview question prompt.
/// Placeholders: {job_description}, {category}, {json_only}
pub const INTERVIEW_QUESTIONS_TEMPLATE: &str = r#"Analyze this job description and generate interview questions:
"{job_description}"

Job Category: {category}

Generate interview questions in the following JSON format:
{
  "questions": [
    {
      "type": "technical",
      "questions": [{"question": "...", "hint": "..."}]
    },
    {
      "type": "behavioral",
      "questions": [{"question": "...", "hint": "..."}]
    },
    {
      "type": "situational",
      "questions": [{"question": "...", "hint": "..."}]
    }
  ]
}

Every "question" must be a non-empty string. "hint" is optional.
{json_only}"#;

/// Study plan prompt.
/// Placeholders: {goals}, {job_description}, {available_time}, {topics},
///               {learning_style}, {current_level}, {json_only}
pub const STUDY_PLAN_TEMPLATE: &str = r#"You are a study plan generator. Create a structured learning plan based on these requirements:

Career Goals: {goals}
Job Description: {job_description}
Available Time: {available_time}
Topics: {topics}
Learning Style: {learning_style}
Current Level: {current_level}

Return a JSON object with this exact structure:
{
  "weeklySchedule": [
    {
      "week": 1,
      "topics": ["specific topic 1", "specific topic 2"],
      "resources": [
        {
          "type": "video",
          "links": ["https://example.com/resource1"],
          "description": "Brief description of resource"
        }
      ],
      "objectives": ["Clear objective 1", "Clear objective 2"],
      "assessments": ["Specific assessment 1", "Specific assessment 2"]
    }
  ],
  "estimatedCompletionTime": "X weeks",
  "prerequisites": ["prerequisite 1", "prerequisite 2"],
  "additionalResources": ["resource 1", "resource 2"]
}

"week" must be a whole number starting at 1 and "weeklySchedule" must contain at least one week.
{json_only}"#;

/// Cover letter prompt. Plain-text answer, no JSON.
/// Placeholders: {job_description}
pub const COVER_LETTER_TEMPLATE: &str = r#"Generate a professional cover letter based on this job description:
"{job_description}"

The cover letter should be:
1. Professional and engaging
2. Highlight relevant skills and experience
3. Show enthusiasm for the role
4. Be concise (max 400 words)"#;

/// Fills `{name}` placeholders in a single left-to-right pass.
/// Braces that do not form a known placeholder are copied as-is.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let extra: usize = vars.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        let matched = vars.iter().find_map(|(name, value)| {
            tail.strip_prefix('{')
                .and_then(|t| t.strip_prefix(name))
                .and_then(|t| t.strip_prefix('}'))
                .map(|after| (*value, after))
        });

        match matched {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
