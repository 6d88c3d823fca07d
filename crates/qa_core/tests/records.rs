use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use qa_core::{Batch, QaPair, Record, TableRow};

fn row(pairs: &[(&str, &str)]) -> TableRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn qa_record_serializes_as_flat_object() {
    let record = Record::Qa(QaPair::new("Why?", "Because."));
    let json = serde_json::to_string(&record).unwrap();
    assert_eq!(json, r#"{"question":"Why?","answer":"Because."}"#);
}

#[test]
fn json_round_trip_preserves_keys_and_values() {
    let records = vec![
        Record::Qa(QaPair::new("What is SEI?", "Solid electrolyte interphase — a film.")),
        Record::Row(row(&[("Material", "LiFePO₄"), ("Voltage (V)", "3.2"), ("", "")])),
        Record::Row(row(&[("question", "q"), ("extra", "x")])),
    ];

    let json = serde_json::to_string_pretty(&records).unwrap();
    let back: Vec<Record> = serde_json::from_str(&json).unwrap();

    assert_eq!(back.len(), records.len());
    for (original, restored) in records.iter().zip(&back) {
        assert_eq!(original.keys(), restored.keys());
        for key in original.keys() {
            assert_eq!(original.get(key), restored.get(key));
        }
    }
    assert_eq!(back[0], records[0]);
    assert_eq!(back[2], records[2]);
}

#[test]
fn row_serialization_keeps_column_order() {
    let record = Record::Row(row(&[("z", "1"), ("a", "2")]));
    let json = serde_json::to_string(&record).unwrap();
    assert_eq!(json, r#"{"z":"1","a":"2"}"#);
}

#[test]
fn batch_accumulates_records_in_order() {
    let mut batch = Batch::new();
    assert!(batch.is_empty());
    batch.push(QaPair::new("q1", "a1"));
    batch.extend(vec![Record::Row(row(&[("k", "v")]))]);

    assert_eq!(batch.len(), 2);
    assert_eq!(batch.column_union(), vec!["question", "answer", "k"]);
    let empty: IndexMap<String, String> = IndexMap::new();
    assert_ne!(batch.records()[1], Record::Row(empty));
}
