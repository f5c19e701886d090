// Prompt templates for the two narrative sections of a match report.
// Both end with "1." so the model continues a numbered list.

use crate::text::truncate_chars;

/// Resume and job text are cut to this many characters before prompting.
pub const PROMPT_EXCERPT_CHARS: usize = 1000;

/// Instruction line for the strengths request.
pub const STRENGTHS_INSTRUCTION: &str = "List 5 key candidate strengths (10 words each max):";

/// Instruction line for the improvements request.
pub const IMPROVEMENTS_INSTRUCTION: &str = "List 5 specific improvements (10 words each max):";

fn comparison_prompt(instruction: &str, heading: &str, resume_text: &str, job_text: &str) -> String {
    format!(
        "Compare resume to job. {instruction}\nRESUME: {}\nJOB: {}\n{heading}:\n1.",
        truncate_chars(resume_text, PROMPT_EXCERPT_CHARS),
        truncate_chars(job_text, PROMPT_EXCERPT_CHARS),
    )
}

pub fn strengths_prompt(resume_text: &str, job_text: &str) -> String {
    comparison_prompt(STRENGTHS_INSTRUCTION, "Strengths", resume_text, job_text)
}

pub fn improvements_prompt(resume_text: &str, job_text: &str) -> String {
    comparison_prompt(IMPROVEMENTS_INSTRUCTION, "Improvements", resume_text, job_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_both_texts_and_differ() {
        let s = strengths_prompt("Rust dev", "Rust role");
        let i = improvements_prompt("Rust dev", "Rust role");

        assert!(s.contains("RESUME: Rust dev\nJOB: Rust role"));
        assert!(s.ends_with("Strengths:\n1."));
        assert!(i.ends_with("Improvements:\n1."));
        assert_ne!(s, i);
    }

    #[test]
    fn test_placeholder_like_input_is_not_substituted() {
        let prompt = strengths_prompt("uses {job} templates", "JD");
        assert!(prompt.contains("RESUME: uses {job} templates\nJOB: JD"));
    }

    #[test]
    fn test_prompts_truncate_excerpts() {
        let resume = "r".repeat(1500);
        let job = "j".repeat(1200);
        let prompt = strengths_prompt(&resume, &job);

        assert!(prompt.contains(&format!("RESUME: {}\n", "r".repeat(PROMPT_EXCERPT_CHARS))));
        assert!(prompt.contains(&format!("JOB: {}\n", "j".repeat(PROMPT_EXCERPT_CHARS))));
        assert!(!prompt.contains(&"r".repeat(PROMPT_EXCERPT_CHARS + 1)));
    }
}
