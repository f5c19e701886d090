//! Presentation of a `MatchResult`: text blocks for the web form, the HTML
//! page around them, and the terminal report.

use crate::analysis::analyzer::MatchResult;

/// Matched/missing keyword lists are cut to this many entries in the form.
pub const FORM_SKILL_LIMIT: usize = 15;

pub const BLANK_FIELDS_NOTICE: &str = "Please fill in both fields!";

/// The five text blocks shown in the web form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub score: String,
    pub matched: String,
    pub missing: String,
    pub strengths: String,
    pub improvements: String,
}

fn dotted(items: &[String], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .map(|s| format!("• {s}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {s}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

impl FormView {
    pub fn from_result(result: &MatchResult) -> Self {
        Self {
            score: format!("{}%", result.match_score),
            matched: dotted(&result.skills_match, FORM_SKILL_LIMIT),
            missing: dotted(&result.missing_skills, FORM_SKILL_LIMIT),
            strengths: numbered(&result.strengths),
            improvements: numbered(&result.improvements),
        }
    }
}

/// Escape HTML special characters to prevent XSS
pub fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

const PAGE_STYLE: &str = r#"
body { font-family: 'Inter', sans-serif; max-width: 1200px; margin: 2rem auto; padding: 0 1rem; }
.row { display: flex; gap: 1rem; }
.col { flex: 1; }
textarea { width: 100%; box-sizing: border-box; }
pre { background: #f4f6fb; padding: 0.75rem; min-height: 8em; white-space: pre-wrap; }
#score { font-size: 48px; font-weight: bold; color: #2563eb; text-align: center; }
.notice { color: #b91c1c; font-weight: bold; }
"#;

fn output_block(label: &str, body: &str) -> String {
    format!(
        r#"<h3>{}</h3>
<pre>{}</pre>"#,
        html_escape(label),
        html_escape(body)
    )
}

fn render_results(view: &FormView) -> String {
    format!(
        r#"<div id="score">{}</div>
<div class="row">
  <div class="col">
    {}
    {}
  </div>
  <div class="col">
    {}
    {}
  </div>
</div>"#,
        html_escape(&view.score),
        output_block("✅ Matched Skills", &view.matched),
        output_block("💪 Key Strengths", &view.strengths),
        output_block("❌ Missing Skills", &view.missing),
        output_block("📈 Improvements", &view.improvements),
    )
}

/// Full HTML page: the input form (pre-filled with the last submission),
/// followed by either a notice or the analysis results.
pub fn form_page(resume: &str, job: &str, view: Option<&FormView>, notice: Option<&str>) -> String {
    let notice_html = notice
        .map(|n| format!(r#"<p class="notice">{}</p>"#, html_escape(n)))
        .unwrap_or_default();
    let results_html = view.map(render_results).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>TalentAlignAI</title>
<style>{PAGE_STYLE}</style>
</head>
<body>
<h1>🤖 TalentAlignAI</h1>
<h3>Align your talent with opportunity using AI-powered insights</h3>
<form method="post" action="/analyze">
<div class="row">
  <div class="col">
    <label for="resume">📄 Your Resume</label>
    <textarea id="resume" name="resume" rows="15" placeholder="Paste your resume here...">{}</textarea>
  </div>
  <div class="col">
    <label for="job">💼 Job Description</label>
    <textarea id="job" name="job" rows="15" placeholder="Paste job description here...">{}</textarea>
  </div>
</div>
<p><button type="submit">🚀 Analyze Resume</button></p>
</form>
{notice_html}
{results_html}
<hr>
<p><em>Powered by Google Gemini AI</em></p>
</body>
</html>
"#,
        html_escape(resume),
        html_escape(job),
    )
}

/// Terminal report for the interactive prompt loop. Lists are not truncated.
pub fn console_report(result: &MatchResult) -> String {
    let mut out = String::from("\n===== MATCH REPORT =====\n");
    out.push_str(&format!("Match Score: {}%\n", result.match_score));

    for (title, items) in [
        ("Skills Matched", &result.skills_match),
        ("Missing Skills", &result.missing_skills),
        ("Strengths", &result.strengths),
        ("Improvements", &result.improvements),
    ] {
        out.push_str(&format!("\n{title}:\n"));
        for item in items {
            out.push_str(&format!("  - {item}\n"));
        }
    }

    out.push_str("========================\n");
    out
}
