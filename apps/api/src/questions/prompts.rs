// All LLM prompt constants for the question generation module.

/// System prompt for question generation — enforces plain-line output so
/// `parse_questions` can split on newlines.
pub const QUESTION_SYSTEM: &str = "You are an experienced technical interviewer. \
    Given the text of a candidate's resume, write interview questions that probe \
    the candidate's actual projects, skills, and experience. \
    Return one question per line. \
    Do NOT number the questions. \
    Do NOT use bullets or markdown. \
    Do NOT include commentary before or after the questions.";

/// Question generation prompt template. Replace `{resume_text}` before sending.
pub const QUESTION_PROMPT_TEMPLATE: &str =
    "Generate 10 interview questions based on the following resume:\n\n{resume_text}";

/// Builds the question generation prompt from extracted resume text.
pub fn build_question_prompt(resume_text: &str) -> String {
    QUESTION_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}
