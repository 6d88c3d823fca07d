use std::path::{Path, PathBuf};

use qa_core::Record;
use serde::Serialize;

use crate::persist::{to_json_pretty, AtomicFileWriter, PersistError};

pub const HISTOGRAM_BINS: usize = 10;
pub const WORD_COUNTS_FILE: &str = "word_counts.json";
pub const QA_STATISTICS_FILE: &str = "qa_statistics.json";

pub trait WordCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceWordCounter;

impl WordCounter for WhitespaceWordCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileWordCount {
    pub file: String,
    pub words: usize,
}

/// Word count per extracted text file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusStatistics {
    pub files: Vec<FileWordCount>,
    pub total_words: usize,
}

impl CorpusStatistics {
    pub fn from_texts<'a>(
        texts: impl IntoIterator<Item = (&'a str, &'a str)>,
        counter: &dyn WordCounter,
    ) -> Self {
        let files: Vec<FileWordCount> = texts
            .into_iter()
            .map(|(file, text)| FileWordCount {
                file: file.to_string(),
                words: counter.count(text),
            })
            .collect();
        let total_words = files.iter().map(|f| f.words).sum();
        Self { files, total_words }
    }
}

/// Distribution of word lengths over a set of strings.
///
/// `histogram` has [`HISTOGRAM_BINS`] equal-width bins spanning `min..=max`;
/// the last bin is closed. When every value is equal all land in the first bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthSummary {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub bin_width: f64,
    pub histogram: Vec<usize>,
}

impl LengthSummary {
    pub fn from_lengths(lengths: &[usize]) -> Self {
        let mut histogram = vec![0; HISTOGRAM_BINS];
        let (Some(&min), Some(&max)) = (lengths.iter().min(), lengths.iter().max()) else {
            return Self {
                min: 0,
                max: 0,
                mean: 0.0,
                bin_width: 0.0,
                histogram,
            };
        };
        let bin_width = (max - min) as f64 / HISTOGRAM_BINS as f64;
        for &len in lengths {
            let bin = if bin_width == 0.0 {
                0
            } else {
                (((len - min) as f64 / bin_width) as usize).min(HISTOGRAM_BINS - 1)
            };
            histogram[bin] += 1;
        }
        let mean = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
        Self {
            min,
            max,
            mean,
            bin_width,
            histogram,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QaStatistics {
    pub pairs: usize,
    pub question_words: LengthSummary,
    pub answer_words: LengthSummary,
}

impl QaStatistics {
    /// Only QA records count; table rows are ignored.
    pub fn from_records(records: &[Record], counter: &dyn WordCounter) -> Self {
        let pairs: Vec<_> = records.iter().filter_map(Record::as_qa).collect();
        let questions: Vec<usize> = pairs.iter().map(|p| counter.count(&p.question)).collect();
        let answers: Vec<usize> = pairs.iter().map(|p| counter.count(&p.answer)).collect();
        Self {
            pairs: pairs.len(),
            question_words: LengthSummary::from_lengths(&questions),
            answer_words: LengthSummary::from_lengths(&answers),
        }
    }
}

/// Write `word_counts.json` and `qa_statistics.json` into `dir`.
pub fn write_statistics(
    dir: &Path,
    corpus: &CorpusStatistics,
    qa: &QaStatistics,
) -> Result<Vec<PathBuf>, PersistError> {
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let corpus_path = writer.write(WORD_COUNTS_FILE, to_json_pretty(corpus)?)?;
    let qa_path = writer.write(QA_STATISTICS_FILE, to_json_pretty(qa)?)?;
    Ok(vec![corpus_path, qa_path])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_spreads_values_over_bins() {
        let summary = LengthSummary::from_lengths(&[0, 5, 10, 10]);
        assert_eq!(summary.min, 0);
        assert_eq!(summary.max, 10);
        assert_eq!(summary.bin_width, 1.0);
        assert_eq!(summary.histogram, vec![1, 0, 0, 0, 0, 1, 0, 0, 0, 2]);
        assert_eq!(summary.mean, 6.25);
    }

    #[test]
    fn equal_lengths_fall_into_first_bin() {
        let summary = LengthSummary::from_lengths(&[7, 7, 7]);
        assert_eq!(summary.histogram[0], 3);
        assert_eq!(summary.histogram.iter().sum::<usize>(), 3);
    }

    #[test]
    fn empty_lengths_give_zeroed_summary() {
        let summary = LengthSummary::from_lengths(&[]);
        assert_eq!(summary.histogram, vec![0; HISTOGRAM_BINS]);
        assert_eq!(summary.mean, 0.0);
    }
}
