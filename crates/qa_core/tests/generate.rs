use pretty_assertions::assert_eq;
use qa_core::{
    rows_to_records, CleanConfig, Cleaner, PairGenerator, QaPair, Record, SegmentConfig,
    SegmentMode, TableRow, TextUnit,
};

#[test]
fn title_body_pairs_use_template_and_verbatim_body() {
    let unit = TextUnit::titled(
        0,
        "Battery Degradation",
        "Cells degrade with cycling.   Heat accelerates it.",
    );
    let whitespace = Cleaner::new(CleanConfig::whitespace_only());
    let cleaned = TextUnit::titled(0, "Battery Degradation", whitespace.clean(&unit.text));

    let records = PairGenerator::title_body().generate(&[cleaned]);

    assert_eq!(
        records,
        vec![Record::Qa(QaPair::new(
            "What is the key information in 'Battery Degradation'?",
            "Cells degrade with cycling. Heat accelerates it.",
        ))]
    );
}

#[test]
fn title_body_without_title_falls_back_to_untitled() {
    let records = PairGenerator::title_body().generate(&[TextUnit::new(3, "body")]);
    assert_eq!(
        records[0].get("question"),
        Some("What is the key information in 'untitled'?")
    );
}

#[test]
fn segmented_mode_caps_records_per_unit() {
    let units = vec![
        TextUnit::new(0, "One. Two. Three. Four. Five. Six. Seven."),
        TextUnit::new(1, "Only one sentence here"),
        TextUnit::new(2, "   "),
        TextUnit::new(3, "A. B. C."),
    ];
    let cap = 5;
    let generator = PairGenerator::segmented(SegmentConfig {
        max_segments: cap,
        ..SegmentConfig::default()
    });

    let records = generator.generate(&units);

    // 5 (capped from 7) + 1 + 0 + 3
    assert_eq!(records.len(), 9);
    let questions: Vec<_> = records
        .iter()
        .map(|r| r.get("question").unwrap().to_string())
        .collect();
    assert_eq!(
        questions[..5],
        [
            "What is discussed in section 1?",
            "What is discussed in section 2?",
            "What is discussed in section 3?",
            "What is discussed in section 4?",
            "What is discussed in section 5?",
        ]
    );
    assert_eq!(questions[5], "What is discussed in section 1?");
    assert_eq!(records[8].get("answer"), Some("C."));
}

#[test]
fn segment_positions_strictly_increase_within_a_unit() {
    let generator = PairGenerator::segmented(SegmentConfig {
        mode: SegmentMode::Delimiter(". ".to_string()),
        max_segments: 10,
        question_template: "Section {n}".to_string(),
    });
    let text = (1..=14)
        .map(|i| format!("part {i}"))
        .collect::<Vec<_>>()
        .join(". ");
    let records = generator.generate(&[TextUnit::new(0, text)]);

    assert_eq!(records.len(), 10);
    let positions: Vec<usize> = records
        .iter()
        .map(|r| {
            r.get("question")
                .unwrap()
                .trim_start_matches("Section ")
                .parse()
                .unwrap()
        })
        .collect();
    assert_eq!(positions, (1..=10).collect::<Vec<_>>());
    assert_eq!(records[9].get("answer"), Some("part 10"));
}

#[test]
fn zero_cap_yields_no_records() {
    let generator = PairGenerator::segmented(SegmentConfig {
        max_segments: 0,
        ..SegmentConfig::default()
    });
    assert!(generator.generate(&[TextUnit::new(0, "A. B.")]).is_empty());
}

#[test]
fn generation_is_deterministic() {
    let units = vec![
        TextUnit::new(0, "Anode swelling. Electrolyte loss! Capacity fade?"),
        TextUnit::new(1, "Lithium plating at low temperature."),
    ];
    let generator = PairGenerator::segmented(SegmentConfig::default());

    let first = serde_json::to_vec(&generator.generate(&units)).unwrap();
    let second = serde_json::to_vec(&generator.generate(&units)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn table_rows_become_row_records_in_order() {
    let rows: Vec<TableRow> = vec![
        [("Material".to_string(), "LFP".to_string())].into_iter().collect(),
        [("Material".to_string(), "NMC".to_string())].into_iter().collect(),
    ];
    let records = rows_to_records(rows);
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].get("Material"), Some("NMC"));
}
