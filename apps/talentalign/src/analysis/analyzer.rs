//! Orchestrates one resume-vs-job analysis.
//!
//! Flow: similarity score → keyword comparison → strengths + improvements
//! (two independent LLM calls, joined concurrently) → bullet parsing →
//! `MatchResult`.
//!
//! `analyze` never fails. Empty input yields a zero score and empty keyword
//! lists; a failed generation yields an empty list and the failure sentinel
//! as the raw text.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analysis::bullets::parse_bullets;
use crate::analysis::keywords::{compare_keywords, extract_keywords};
use crate::analysis::similarity::SimilarityScorer;
use crate::llm_client::prompts::{improvements_prompt, strengths_prompt};
use crate::llm_client::{Generation, TextGenerator};

/// The two raw texts being compared.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisInput {
    pub resume_text: String,
    pub job_text: String,
}

/// Output of one analysis. Immutable once built; not persisted by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Semantic similarity, 0–100, two decimals.
    pub match_score: f64,
    /// Job keywords present in the resume, sorted.
    pub skills_match: Vec<String>,
    /// Job keywords absent from the resume, sorted.
    pub missing_skills: Vec<String>,
    /// At most 5.
    pub strengths: Vec<String>,
    /// At most 5.
    pub improvements: Vec<String>,
    pub raw_strengths: String,
    pub raw_improvements: String,
}

/// A parsed narrative section plus the text it was parsed from.
struct Section {
    items: Vec<String>,
    raw: String,
}

fn into_section(label: &str, generation: Generation) -> Section {
    if let Generation::Failed { attempts, reason } = &generation {
        warn!("{label}: generation failed after {attempts} attempts: {reason}");
        return Section {
            items: Vec::new(),
            raw: generation.into_text(),
        };
    }

    let raw = generation.into_text();
    let parsed = parse_bullets(&raw);
    if parsed.is_fallback() {
        info!("{label}: no bullet markers, fell back to sentence split");
    }
    debug!("{label}: {} items", parsed.items().len());
    Section {
        items: parsed.into_items(),
        raw,
    }
}

/// Combines the similarity scorer, keyword comparison and LLM sections.
///
/// Both collaborators are constructed at startup and injected here; the
/// analyzer holds no other state and is shared across requests via `Arc`.
#[derive(Clone)]
pub struct ResumeAnalyzer {
    scorer: SimilarityScorer,
    llm: Arc<dyn TextGenerator>,
}

impl ResumeAnalyzer {
    pub fn new(scorer: SimilarityScorer, llm: Arc<dyn TextGenerator>) -> Self {
        Self { scorer, llm }
    }

    pub async fn analyze(&self, resume_text: &str, job_text: &str) -> MatchResult {
        // Step 1: semantic similarity
        let match_score = self.scorer.score(resume_text, job_text);
        info!("Match score: {match_score}% ({} backend)", self.scorer.backend());

        // Step 2: keyword comparison
        let resume_keywords = extract_keywords(resume_text);
        let job_keywords = extract_keywords(job_text);
        let keywords = compare_keywords(&resume_keywords, &job_keywords);
        info!(
            "Keywords: {} matched, {} missing",
            keywords.skills_match.len(),
            keywords.missing_skills.len()
        );

        // Steps 3-4: strengths and improvements are independent
        let strengths_request = strengths_prompt(resume_text, job_text);
        let improvements_request = improvements_prompt(resume_text, job_text);
        let (strengths, improvements) = tokio::join!(
            self.llm.generate(&strengths_request),
            self.llm.generate(&improvements_request),
        );

        let strengths = into_section("Strengths", strengths);
        let improvements = into_section("Improvements", improvements);

        // Step 5: assemble
        MatchResult {
            match_score,
            skills_match: keywords.skills_match,
            missing_skills: keywords.missing_skills,
            strengths: strengths.items,
            improvements: improvements.items,
            raw_strengths: strengths.raw,
            raw_improvements: improvements.raw,
        }
    }

    pub async fn analyze_input(&self, input: &AnalysisInput) -> MatchResult {
        self.analyze(&input.resume_text, &input.job_text).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::analysis::bullets::MAX_BULLETS;
    use crate::analysis::similarity::HashEmbedder;
    use crate::llm_client::GENERATION_FAILED;

    /// Answers by prompt heading and records every prompt it receives.
    struct ScriptedGenerator {
        strengths: Generation,
        improvements: Generation,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(strengths: Generation, improvements: Generation) -> Self {
            Self {
                strengths,
                improvements,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Generation {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if prompt.ends_with("Strengths:\n1.") {
                self.strengths.clone()
            } else {
                self.improvements.clone()
            }
        }
    }

    fn analyzer_with(generator: Arc<ScriptedGenerator>) -> ResumeAnalyzer {
        let scorer = SimilarityScorer::new(Arc::new(HashEmbedder::default()));
        ResumeAnalyzer::new(scorer, generator)
    }

    fn text(s: &str) -> Generation {
        Generation::Text(s.to_string())
    }

    const RESUME: &str = "Experienced Python developer with AWS and Docker skills";
    const JOB: &str = "Looking for Python developer with Kubernetes experience";

    #[tokio::test]
    async fn test_end_to_end_example() {
        let generator = Arc::new(ScriptedGenerator::new(
            text("1. Strong Python development background\n2. Hands-on AWS cloud work"),
            text("- Add Kubernetes deployment experience\n- Quantify Docker project impact"),
        ));
        let result = analyzer_with(generator).analyze(RESUME, JOB).await;

        assert!(result.skills_match.contains(&"python".to_string()));
        assert!(result.skills_match.contains(&"developer".to_string()));
        assert!(result.missing_skills.contains(&"kubernetes".to_string()));
        assert!(!result.missing_skills.contains(&"docker".to_string()));
        assert!(!result.skills_match.contains(&"docker".to_string()));
        assert!(result.match_score > 0.0 && result.match_score < 100.0);

        assert_eq!(
            result.strengths,
            vec!["Strong Python development background", "Hands-on AWS cloud work"]
        );
        assert_eq!(
            result.improvements,
            vec!["Add Kubernetes deployment experience", "Quantify Docker project impact"]
        );
        assert!(result.raw_strengths.starts_with("1. Strong Python"));
    }

    #[tokio::test]
    async fn test_sends_two_distinct_prompts_with_excerpts() {
        let generator = Arc::new(ScriptedGenerator::new(text(""), text("")));
        analyzer_with(generator.clone()).analyze(RESUME, JOB).await;

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert_ne!(prompts[0], prompts[1]);
        assert!(prompts.iter().all(|p| p.contains(RESUME) && p.contains(JOB)));
    }

    #[tokio::test]
    async fn test_failed_generation_degrades_to_empty_section() {
        let generator = Arc::new(ScriptedGenerator::new(
            Generation::Failed {
                attempts: 3,
                reason: "API error (status 503)".to_string(),
            },
            text("1. Add measurable outcomes to each role"),
        ));
        let result = analyzer_with(generator).analyze(RESUME, JOB).await;

        assert!(result.strengths.is_empty());
        assert_eq!(result.raw_strengths, GENERATION_FAILED);
        assert_eq!(result.improvements, vec!["Add measurable outcomes to each role"]);
        // score and keywords survive the failure
        assert!(result.match_score > 0.0);
        assert!(!result.skills_match.is_empty());
    }

    #[tokio::test]
    async fn test_empty_inputs_produce_well_formed_result() {
        let generator = Arc::new(ScriptedGenerator::new(text(""), text("")));
        let result = analyzer_with(generator).analyze("", "").await;

        assert_eq!(result.match_score, 0.0);
        assert!(result.skills_match.is_empty());
        assert!(result.missing_skills.is_empty());
        assert!(result.strengths.is_empty());
        assert!(result.improvements.is_empty());
    }

    #[tokio::test]
    async fn test_prose_response_uses_sentence_fallback_and_cap() {
        let prose = "The candidate writes production Python daily. \
                     They have shipped services to AWS. \
                     Their Docker usage shows container fluency. \
                     They communicate clearly in written form. \
                     They mentor peers on code review practice. \
                     They have led a migration to managed databases.";
        let generator = Arc::new(ScriptedGenerator::new(text(prose), text(prose)));
        let result = analyzer_with(generator).analyze(RESUME, JOB).await;

        assert_eq!(result.strengths.len(), MAX_BULLETS);
        assert_eq!(result.strengths[0], "The candidate writes production Python daily");
        assert_eq!(result.raw_strengths, prose);
    }

    #[tokio::test]
    async fn test_keyword_lists_are_disjoint_and_sorted() {
        let generator = Arc::new(ScriptedGenerator::new(text(""), text("")));
        let result = analyzer_with(generator)
            .analyze(
                "Rust Tokio Axum PostgreSQL Redis Terraform",
                "Rust Kafka Tokio Kubernetes PostgreSQL Helm",
            )
            .await;

        assert_eq!(result.skills_match, vec!["postgresql", "rust", "tokio"]);
        assert_eq!(result.missing_skills, vec!["helm", "kafka", "kubernetes"]);
    }

    #[tokio::test]
    async fn test_result_serializes_all_fields() {
        let generator = Arc::new(ScriptedGenerator::new(text(""), text("")));
        let result = analyzer_with(generator).analyze(RESUME, JOB).await;
        let json = serde_json::to_value(&result).unwrap();

        for field in [
            "match_score",
            "skills_match",
            "missing_skills",
            "strengths",
            "improvements",
            "raw_strengths",
            "raw_improvements",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }
}
