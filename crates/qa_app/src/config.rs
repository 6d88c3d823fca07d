use std::fs;
use std::path::Path;

use anyhow::Context;
use qa_engine::PipelineConfig;
use qa_logging::qa_info;

/// Built-in defaults when no file is given, otherwise the parsed RON file.
///
/// Sections and fields missing from the file keep their defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    qa_info!("Loaded configuration from {:?}", path);
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<PipelineConfig, ron::error::SpannedError> {
    ron::from_str(content)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use qa_core::SegmentMode;

    use super::*;

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(load_config(None).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse_config(
            r#"(
                fetch: (request_timeout: 2.5),
                papers: (
                    query: "solid state electrolyte",
                    max_papers: 2,
                    segmentation: (mode: Delimiter(". "), max_segments: 3),
                ),
            )"#,
        )
        .unwrap();

        assert_eq!(config.fetch.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.papers.query, "solid state electrolyte");
        assert_eq!(config.papers.max_papers, 2);
        assert_eq!(
            config.papers.segmentation.mode,
            SegmentMode::Delimiter(". ".to_string())
        );
        assert_eq!(config.papers.segmentation.max_segments, 3);
        assert_eq!(config.papers.search_type, "all");
        assert_eq!(config.articles, PipelineConfig::default().articles);
    }

    #[test]
    fn example_config_parses() {
        let config = parse_config(include_str!("../battery_qa.example.ron")).unwrap();
        assert_eq!(config.table.output_dir, PathBuf::from("scraped_battery_data"));
        assert!(config.papers.clean.restrict_charset);
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("missing.ron");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("broken.ron");
        fs::write(&path, "(articles: (max_pages: \"five\"))").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
