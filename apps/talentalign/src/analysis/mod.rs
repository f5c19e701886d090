// Resume-vs-job analysis core.
// Keyword comparison and similarity scoring are pure; only the analyzer
// reaches the network, through `llm_client::TextGenerator`.

pub mod analyzer;
pub mod bullets;
pub mod keywords;
pub mod report;
pub mod similarity;
