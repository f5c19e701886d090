use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::analysis::report::{write_report, AnalysisReport};
use crate::ingest::{load_input, DEFAULT_JOB_PATH, DEFAULT_RESUME_PATH};
use crate::render::console_report;

const RESUME_PROMPT: &str = "Please paste your resume here";
const JOB_PROMPT: &str = "Please paste the job description here";

#[derive(Parser)]
#[command(name = "talentalign")]
#[command(version, about = "Compare a resume against a job description")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Paste both texts in the terminal and print the match report (default)
    Interactive,
    /// Serve the web form and JSON API
    Serve {
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Analyze files and write a JSON report; missing or empty files are prompted for
    Analyze {
        #[arg(long, default_value = DEFAULT_RESUME_PATH)]
        resume: PathBuf,
        #[arg(long, default_value = DEFAULT_JOB_PATH)]
        job: PathBuf,
        /// Overrides REPORT_PATH
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

/// Reads lines until one equal to `END` (any case, surrounding whitespace
/// ignored) or EOF. The terminator line is not part of the result.
pub fn read_block<R: BufRead, W: Write>(
    mut reader: R,
    writer: &mut W,
    prompt: &str,
) -> io::Result<String> {
    writeln!(writer, "{prompt} (Type 'END' on a new line to finish):")?;
    writer.flush()?;

    let mut lines = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let content = line.trim_end_matches(['\n', '\r']);
        if content.trim().eq_ignore_ascii_case("END") {
            break;
        }
        lines.push(content.to_string());
    }
    Ok(lines.join("\n"))
}

/// `read_block` over the process stdin/stdout, off the async executor.
async fn prompt_block(prompt: &'static str) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        read_block(stdin.lock(), &mut stdout, prompt)
    })
    .await
    .context("Input task panicked")?
    .context("Failed to read from stdin")
}

pub async fn run_interactive(analyzer: &ResumeAnalyzer) -> Result<()> {
    let resume_text = prompt_block(RESUME_PROMPT).await?;
    let job_text = prompt_block(JOB_PROMPT).await?;

    println!("\nRunning LLM analysis...\n");
    let result = analyzer.analyze(&resume_text, &job_text).await;
    print!("{}", console_report(&result));
    Ok(())
}

async fn load_or_prompt(path: &Path, prompt: &'static str) -> Result<String> {
    match load_input(path).await? {
        Some(text) => Ok(text),
        None => prompt_block(prompt).await,
    }
}

pub async fn run_batch(
    analyzer: &ResumeAnalyzer,
    resume: &Path,
    job: &Path,
    report_path: &Path,
) -> Result<()> {
    let resume_text = load_or_prompt(resume, RESUME_PROMPT).await?;
    let job_text = load_or_prompt(job, JOB_PROMPT).await?;

    info!("Analyzing resume against job description");
    let result = analyzer.analyze(&resume_text, &job_text).await;

    let report = AnalysisReport::from_result(&result);
    write_report(&report, report_path).await?;
    print!("{}", report.summary());
    Ok(())
}
