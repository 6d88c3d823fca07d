use std::path::PathBuf;

use qa_logging::qa_info;
use serde::Deserialize;
use serde_json::json;

use crate::persist::{read_records_json, split_destination, AtomicFileWriter, PersistError};

pub const DEFAULT_PROMPT_TEMPLATE: &str = "Q: {question}\nA: {answer}";

/// Turns a QA JSON file into JSON Lines training text for an external trainer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrainingExportConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// `{question}` and `{answer}` are substituted per pair.
    pub prompt_template: String,
}

impl Default for TrainingExportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("results").join("qa_pairs.json"),
            output: PathBuf::from("results").join("training_corpus.jsonl"),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub pair_count: usize,
    pub skipped_rows: usize,
    pub output_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no question/answer pairs in {0:?}")]
    NoPairs(PathBuf),
}

pub fn export_training_corpus(config: &TrainingExportConfig) -> Result<ExportSummary, ExportError> {
    let records = read_records_json(&config.input)?;

    let mut lines = Vec::new();
    let mut skipped_rows = 0;
    for record in &records {
        let Some(pair) = record.as_qa() else {
            skipped_rows += 1;
            continue;
        };
        let text = render_prompt(&config.prompt_template, &pair.question, &pair.answer);
        lines.push(serde_json::to_string(&json!({ "text": text }))?);
    }
    if lines.is_empty() {
        return Err(ExportError::NoPairs(config.input.clone()));
    }

    let mut buffer = lines.join("\n");
    buffer.push('\n');

    let (dir, filename) = split_destination(&config.output)?;
    let output_path = AtomicFileWriter::new(dir).write(&filename, buffer)?;
    qa_info!(
        "Exported {} training examples to {:?}",
        lines.len(),
        output_path
    );

    Ok(ExportSummary {
        pair_count: lines.len(),
        skipped_rows,
        output_path,
    })
}

/// Single pass over the template so substituted text is never re-expanded.
fn render_prompt(template: &str, question: &str, answer: &str) -> String {
    let mut out = String::with_capacity(template.len() + question.len() + answer.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{question}") {
            out.push_str(question);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{answer}") {
            out.push_str(answer);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::render_prompt;

    #[test]
    fn placeholders_are_substituted_once() {
        assert_eq!(
            render_prompt("Q: {question}\nA: {answer}", "what {answer}?", "x"),
            "Q: what {answer}?\nA: x"
        );
        assert_eq!(render_prompt("{other} {question", "q", "a"), "{other} {question");
    }
}
