use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::TableRow;

pub const QUESTION_KEY: &str = "question";
pub const ANSWER_KEY: &str = "answer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Final persisted unit of output.
///
/// Serialized without a tag: a QA pair is the object `{"question", "answer"}`,
/// a table row is a flat object of its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Qa(QaPair),
    Row(TableRow),
}

impl Record {
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Record::Qa(_) => vec![QUESTION_KEY, ANSWER_KEY],
            Record::Row(row) => row.keys().map(String::as_str).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            Record::Qa(pair) => match key {
                QUESTION_KEY => Some(pair.question.as_str()),
                ANSWER_KEY => Some(pair.answer.as_str()),
                _ => None,
            },
            Record::Row(row) => row.get(key).map(String::as_str),
        }
    }

    pub fn as_qa(&self) -> Option<&QaPair> {
        match self {
            Record::Qa(pair) => Some(pair),
            Record::Row(_) => None,
        }
    }
}

impl From<QaPair> for Record {
    fn from(pair: QaPair) -> Self {
        Record::Qa(pair)
    }
}

impl From<TableRow> for Record {
    fn from(row: TableRow) -> Self {
        Record::Row(row)
    }
}

/// Ordered records accumulated for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Batch {
    records: Vec<Record>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: impl Into<Record>) {
        self.records.push(record.into());
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Union of every record's keys, in first-seen order.
    pub fn column_union(&self) -> Vec<String> {
        column_union(&self.records)
    }
}

impl From<Vec<Record>> for Batch {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

pub fn column_union(records: &[Record]) -> Vec<String> {
    let mut columns: IndexSet<&str> = IndexSet::new();
    for record in records {
        columns.extend(record.keys());
    }
    columns.into_iter().map(ToOwned::to_owned).collect()
}
