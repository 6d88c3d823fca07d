use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use qa_core::{column_union, Record};
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("invalid destination {0:?}")]
    InvalidDestination(PathBuf),
    #[error("no records to save")]
    Empty,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Create `dir` if needed and check that files can be created in it.
///
/// Calling it again on a ready directory changes nothing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let unusable = |err: io::Error| PersistError::OutputDir(format!("{}: {err}", dir.display()));
    if dir.exists() && !dir.is_dir() {
        return Err(PersistError::OutputDir(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    fs::create_dir_all(dir).map_err(unusable)?;
    NamedTempFile::new_in(dir).map_err(unusable)?;
    Ok(())
}

/// Writes whole files into one directory through a temp file and a rename,
/// so readers never observe a half-written file.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Returns the path written; an existing file of that name is replaced.
    pub fn write(&self, filename: &str, content: impl AsRef<[u8]>) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(content.as_ref())?;
        staged.as_file().sync_all()?;

        let target = self.dir.join(filename);
        staged
            .persist(&target)
            .map_err(|err| PersistError::Io(err.error))?;
        Ok(target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    /// `.csv` selects CSV; anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => RecordFormat::Csv,
            _ => RecordFormat::Json,
        }
    }
}

/// Serialize `records` to `destination`, creating its parent directory.
///
/// An empty slice is refused with [`PersistError::Empty`] and nothing is written.
pub fn persist_records(
    records: &[Record],
    destination: &Path,
    format: RecordFormat,
) -> Result<PathBuf, PersistError> {
    if records.is_empty() {
        return Err(PersistError::Empty);
    }
    let (dir, filename) = split_destination(destination)?;
    let content = match format {
        RecordFormat::Json => records_to_json(records)?,
        RecordFormat::Csv => records_to_csv(records)?,
    };
    AtomicFileWriter::new(dir).write(&filename, content)
}

pub fn read_records_json(path: &Path) -> Result<Vec<Record>, PersistError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write one UTF-8 text file into `dir`, creating the directory if needed.
pub fn write_text_file(dir: &Path, filename: &str, text: &str) -> Result<PathBuf, PersistError> {
    AtomicFileWriter::new(dir.to_path_buf()).write(filename, text)
}

/// `paper_1.pdf` -> `paper_1.txt`.
pub fn text_filename_for(pdf_filename: &str) -> String {
    Path::new(pdf_filename)
        .with_extension("txt")
        .to_string_lossy()
        .into_owned()
}

/// Regular files in `dir` with the given extension, sorted by file name.
pub fn list_files_with_extension(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .collect();
    files.sort();
    Ok(files)
}

pub(crate) fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}

fn records_to_json(records: &[Record]) -> Result<Vec<u8>, PersistError> {
    Ok(to_json_pretty(records)?)
}

fn records_to_csv(records: &[Record]) -> Result<Vec<u8>, PersistError> {
    let columns = column_union(records);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|column| record.get(column).unwrap_or("")))?;
    }
    writer
        .into_inner()
        .map_err(|err| PersistError::Io(err.into_error()))
}

pub(crate) fn split_destination(destination: &Path) -> Result<(PathBuf, String), PersistError> {
    let filename = destination
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| PersistError::InvalidDestination(destination.to_path_buf()))?;
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, filename.to_string()))
}
