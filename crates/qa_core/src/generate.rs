use serde::Deserialize;

use crate::{segment, QaPair, Record, SegmentMode, TableRow, TextUnit};

pub const DEFAULT_TITLE_TEMPLATE: &str = "What is the key information in '{title}'?";
pub const DEFAULT_SEGMENT_TEMPLATE: &str = "What is discussed in section {n}?";
pub const UNTITLED: &str = "untitled";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    pub mode: SegmentMode,
    /// Segments kept per text unit; later segments are dropped.
    pub max_segments: usize,
    /// Question template; `{n}` is replaced by the 1-based segment position.
    pub question_template: String,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            mode: SegmentMode::Sentences,
            max_segments: 5,
            question_template: DEFAULT_SEGMENT_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationMode {
    /// One pair per unit; `{title}` in the template is replaced by the unit title.
    TitleBody { question_template: String },
    Segmented(SegmentConfig),
}

/// Turns text units into QA records.
///
/// Output depends only on the input units and the mode, so identical input
/// yields identical records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairGenerator {
    mode: GenerationMode,
}

impl PairGenerator {
    pub fn new(mode: GenerationMode) -> Self {
        Self { mode }
    }

    pub fn title_body() -> Self {
        Self::with_title_template(DEFAULT_TITLE_TEMPLATE)
    }

    pub fn with_title_template(template: impl Into<String>) -> Self {
        Self::new(GenerationMode::TitleBody {
            question_template: template.into(),
        })
    }

    pub fn segmented(config: SegmentConfig) -> Self {
        Self::new(GenerationMode::Segmented(config))
    }

    pub fn mode(&self) -> &GenerationMode {
        &self.mode
    }

    pub fn generate(&self, units: &[TextUnit]) -> Vec<Record> {
        match &self.mode {
            GenerationMode::TitleBody { question_template } => units
                .iter()
                .map(|unit| {
                    let title = unit.title.as_deref().unwrap_or(UNTITLED);
                    let question = question_template.replace("{title}", title);
                    Record::Qa(QaPair::new(question, unit.text.clone()))
                })
                .collect(),
            GenerationMode::Segmented(config) => units
                .iter()
                .flat_map(|unit| segment_unit(unit, config))
                .collect(),
        }
    }
}

fn segment_unit(unit: &TextUnit, config: &SegmentConfig) -> Vec<Record> {
    segment(&unit.text, &config.mode)
        .into_iter()
        .take(config.max_segments)
        .enumerate()
        .map(|(i, answer)| {
            let question = config.question_template.replace("{n}", &(i + 1).to_string());
            Record::Qa(QaPair::new(question, answer))
        })
        .collect()
}

/// Table rows are already records; this keeps their order.
pub fn rows_to_records(rows: Vec<TableRow>) -> Vec<Record> {
    rows.into_iter().map(Record::Row).collect()
}
