//! Line-delimited JSON datasets.
//!
//! One JSON object per line. Readers report malformed lines instead of
//! failing the whole file; writers either truncate (fresh files) or append
//! one flushed line per record (generation output).

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// An instruction/response pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionRecord {
    /// Advisor brief.
    pub instruction: String,
    /// Extra context. Empty unless set explicitly.
    #[serde(default)]
    pub context: String,
    /// Drafted client communication. Empty until generated.
    #[serde(default)]
    pub response: String,
}

impl InstructionRecord {
    /// A record with only an instruction.
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            context: String::new(),
            response: String::new(),
        }
    }

    /// Copy of this record with `response` set.
    #[must_use]
    pub fn with_response(&self, response: impl Into<String>) -> Self {
        Self {
            instruction: self.instruction.clone(),
            context: self.context.clone(),
            response: response.into(),
        }
    }
}

/// Dataset I/O errors.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// File could not be opened, read, or written.
    #[error("{op} {path}: {source}")]
    Io {
        /// What was attempted.
        op: &'static str,
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A record could not be serialized.
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl DatasetError {
    pub(crate) fn io(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A line that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    /// Why the line was rejected.
    pub reason: String,
}

/// Result of reading a dataset file.
#[derive(Debug, Clone)]
pub struct ReadOutcome<T> {
    /// Parsed records in file order.
    pub records: Vec<T>,
    /// Malformed lines, in file order.
    pub skipped: Vec<SkippedLine>,
}

/// Read every JSON line of `path` as `T`. Blank lines are ignored.
///
/// # Errors
///
/// Returns [`DatasetError::Io`] if the file cannot be opened or read.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<ReadOutcome<T>, DatasetError> {
    let file = File::open(path).map_err(|e| DatasetError::io("failed to open", path, e))?;
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| DatasetError::io("failed to read", path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => skipped.push(SkippedLine {
                line: idx.saturating_add(1),
                reason: e.to_string(),
            }),
        }
    }

    Ok(ReadOutcome { records, skipped })
}

/// Read instruction records, also rejecting blank instructions.
///
/// # Errors
///
/// Returns [`DatasetError::Io`] if the file cannot be opened or read.
pub fn read_instructions(path: &Path) -> Result<ReadOutcome<InstructionRecord>, DatasetError> {
    let file = File::open(path).map_err(|e| DatasetError::io("failed to open", path, e))?;
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| DatasetError::io("failed to read", path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let reason = match serde_json::from_str::<InstructionRecord>(&line) {
            Ok(record) if !record.instruction.trim().is_empty() => {
                records.push(record);
                continue;
            }
            Ok(_) => "empty instruction".to_owned(),
            Err(e) => e.to_string(),
        };
        skipped.push(SkippedLine {
            line: idx.saturating_add(1),
            reason,
        });
    }

    Ok(ReadOutcome { records, skipped })
}

/// Write `records` to `path`, replacing any previous content.
///
/// # Errors
///
/// Returns [`DatasetError`] on I/O or encoding failure.
pub fn write_jsonl<'a, T, I>(path: &Path, records: I) -> Result<usize, DatasetError>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let file = File::create(path).map_err(|e| DatasetError::io("failed to create", path, e))?;
    let mut writer = BufWriter::new(file);
    let mut written = 0_usize;
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer
            .write_all(b"\n")
            .map_err(|e| DatasetError::io("failed to write", path, e))?;
        written = written.saturating_add(1);
    }
    writer
        .flush()
        .map_err(|e| DatasetError::io("failed to flush", path, e))?;
    Ok(written)
}

/// Destination for completed records.
pub trait RecordSink {
    /// Persist one record.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the record cannot be stored.
    fn write(&mut self, record: &InstructionRecord) -> Result<(), DatasetError>;
}

impl RecordSink for Vec<InstructionRecord> {
    fn write(&mut self, record: &InstructionRecord) -> Result<(), DatasetError> {
        self.push(record.clone());
        Ok(())
    }
}

/// Appends records to a file, one flushed line at a time.
///
/// A run interrupted at any point leaves only complete lines behind.
#[derive(Debug)]
pub struct JsonlAppender {
    path: PathBuf,
    file: File,
}

impl JsonlAppender {
    /// Open `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, DatasetError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| DatasetError::io("failed to open", path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// File being appended to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for JsonlAppender {
    fn write(&mut self, record: &InstructionRecord) -> Result<(), DatasetError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.file
            .write_all(&line)
            .and_then(|()| self.file.flush())
            .map_err(|e| DatasetError::io("failed to append to", &self.path, e))
    }
}
