use std::path::PathBuf;

use qa_core::{CleanConfig, SegmentConfig, DEFAULT_TITLE_TEMPLATE};
use serde::Deserialize;

use crate::{FetchSettings, TrainingExportConfig};

/// Everything a pipeline run needs. Missing sections and fields fall back to
/// their defaults when loaded from a config file.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub fetch: FetchSettings,
    pub articles: ArticleConfig,
    pub table: TableConfig,
    pub papers: PaperConfig,
    pub training: TrainingExportConfig,
}

/// Paginated article listing turned into title/body QA pairs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArticleConfig {
    pub base_url: String,
    pub max_pages: u32,
    pub container_selector: String,
    pub title_selector: String,
    pub body_selector: String,
    pub question_template: String,
    pub clean: CleanConfig,
    pub output: PathBuf,
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://arxiv.org/pdf/2410.23303".to_string(),
            max_pages: 5,
            container_selector: "div.article-container".to_string(),
            title_selector: "h2".to_string(),
            body_selector: "p".to_string(),
            question_template: DEFAULT_TITLE_TEMPLATE.to_string(),
            clean: CleanConfig::whitespace_only(),
            output: PathBuf::from("qa_pairs.json"),
        }
    }
}

/// A single page holding a data table, saved as CSV rows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub url: String,
    pub table_selector: String,
    pub header_selector: String,
    pub row_selector: String,
    pub cell_selector: String,
    pub clean: CleanConfig,
    pub output_dir: PathBuf,
    pub output_file: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            url: "https://www.materialsforbatteries.org/data/".to_string(),
            table_selector: "table".to_string(),
            header_selector: "thead th".to_string(),
            row_selector: "tbody tr".to_string(),
            cell_selector: "td".to_string(),
            clean: CleanConfig::whitespace_only(),
            output_dir: PathBuf::from("scraped_battery_data"),
            output_file: "battery_articles.csv".to_string(),
        }
    }
}

impl TableConfig {
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }
}

/// arXiv search -> PDF download -> text -> segmented QA pairs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaperConfig {
    pub search_url: String,
    pub query: String,
    pub search_type: String,
    pub search_source: String,
    pub max_papers: usize,
    /// Base for resolving relative PDF links found on the search page.
    pub link_base: String,
    pub pdf_dir: PathBuf,
    pub extracted_dir: PathBuf,
    pub cleaned_dir: PathBuf,
    pub results_dir: PathBuf,
    pub qa_file: String,
    pub clean: CleanConfig,
    pub segmentation: SegmentConfig,
    pub write_statistics: bool,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            search_url: "https://arxiv.org/search/".to_string(),
            query: "battery".to_string(),
            search_type: "all".to_string(),
            search_source: "header".to_string(),
            max_papers: 5,
            link_base: "https://arxiv.org".to_string(),
            pdf_dir: PathBuf::from("pdfs"),
            extracted_dir: PathBuf::from("extracted_text"),
            cleaned_dir: PathBuf::from("cleaned_text"),
            results_dir: PathBuf::from("results"),
            qa_file: "qa_pairs.json".to_string(),
            clean: CleanConfig::restricted(),
            segmentation: SegmentConfig::default(),
            write_statistics: true,
        }
    }
}

impl PaperConfig {
    pub fn qa_path(&self) -> PathBuf {
        self.results_dir.join(&self.qa_file)
    }
}
