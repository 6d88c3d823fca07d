use std::fs;

use pretty_assertions::assert_eq;
use qa_core::{QaPair, Record, TableRow};
use qa_engine::{
    export_training_corpus, persist_records, write_statistics, CorpusStatistics, ExportError,
    QaStatistics, RecordFormat, TrainingExportConfig, WhitespaceWordCounter,
};
use tempfile::TempDir;

#[test]
fn qa_pairs_become_prompt_lines() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("qa_pairs.json");
    let mut row = TableRow::new();
    row.insert("Material".to_string(), "LiFePO4".to_string());
    let records = vec![
        Record::from(QaPair::new("What is in 'a'?", "Alpha.")),
        Record::from(row),
        Record::from(QaPair::new("What is in \"b\"?", "Beta.")),
    ];
    persist_records(&records, &input, RecordFormat::Json).unwrap();

    let config = TrainingExportConfig {
        input,
        output: temp.path().join("training").join("corpus.jsonl"),
        ..TrainingExportConfig::default()
    };
    let summary = export_training_corpus(&config).unwrap();

    assert_eq!(summary.pair_count, 2);
    assert_eq!(summary.skipped_rows, 1);
    assert_eq!(summary.output_path, config.output);
    assert_eq!(
        fs::read_to_string(&config.output).unwrap(),
        "{\"text\":\"Q: What is in 'a'?\\nA: Alpha.\"}\n{\"text\":\"Q: What is in \\\"b\\\"?\\nA: Beta.\"}\n"
    );
}

#[test]
fn export_without_pairs_fails() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("rows.json");
    fs::write(&input, "[{\"Material\": \"LiFePO4\"}]").unwrap();

    let config = TrainingExportConfig {
        input,
        output: temp.path().join("corpus.jsonl"),
        ..TrainingExportConfig::default()
    };

    assert!(matches!(
        export_training_corpus(&config),
        Err(ExportError::NoPairs(_))
    ));
    assert!(!config.output.exists());
}

#[test]
fn statistics_files_are_written() {
    let temp = TempDir::new().unwrap();
    let corpus = CorpusStatistics::from_texts(
        [("paper_1.txt", "one two three"), ("paper_2.txt", "four")],
        &WhitespaceWordCounter,
    );
    let qa = QaStatistics::from_records(
        &[Record::from(QaPair::new("What is in x?", "one two."))],
        &WhitespaceWordCounter,
    );

    let paths = write_statistics(temp.path(), &corpus, &qa).unwrap();

    assert_eq!(corpus.total_words, 4);
    assert_eq!(qa.pairs, 1);
    assert_eq!(qa.question_words.max, 4);
    assert_eq!(
        paths,
        vec![
            temp.path().join("word_counts.json"),
            temp.path().join("qa_statistics.json")
        ]
    );
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths[0]).unwrap()).unwrap();
    assert_eq!(written["total_words"], 4);
    assert_eq!(written["files"][0]["file"], "paper_1.txt");
    assert_eq!(written["files"][0]["words"], 3);
}
