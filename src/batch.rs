//! Processing several input files where one bad file must not stop the rest.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// A file that could not be processed.
#[derive(Debug)]
pub struct FileError {
    pub file_name: String,
    pub error: Error,
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_name, self.error)
    }
}

impl Serialize for FileError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("FileError", 2)?;
        s.serialize_field("file_name", &self.file_name)?;
        s.serialize_field("error", &self.error.to_string())?;
        s.end()
    }
}

/// Result of one successfully processed file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutput<T> {
    pub file_name: String,
    pub value: T,
}

/// Outcome of a batch: successes and failures, each in input order.
#[derive(Debug, Serialize)]
pub struct BatchReport<T> {
    pub successes: Vec<FileOutput<T>>,
    pub failures: Vec<FileError>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    /// Total number of inputs.
    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether there were inputs and every one of them failed.
    pub fn all_failed(&self) -> bool {
        self.successes.is_empty() && !self.failures.is_empty()
    }

    /// Successful values without their file names.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.successes.iter().map(|s| &s.value)
    }
}

impl<T: Clone> BatchReport<Vec<T>> {
    /// Concatenate list results in input order.
    pub fn merged(&self) -> Vec<T> {
        self.successes
            .iter()
            .flat_map(|s| s.value.iter().cloned())
            .collect()
    }
}

/// Run `process` on every input; a failure is recorded and the batch goes on.
pub fn process_batch<I, T, F>(inputs: I, mut process: F) -> BatchReport<T>
where
    I: IntoIterator,
    I::Item: AsRef<Path>,
    F: FnMut(&Path) -> Result<T>,
{
    let mut report = BatchReport::default();

    for input in inputs {
        let path = input.as_ref();
        let file_name = display_name(path);

        match process(path) {
            Ok(value) => {
                log::info!("{}: processed", file_name);
                report.successes.push(FileOutput { file_name, value });
            }
            Err(error) => {
                log::warn!("{}: {}", file_name, error);
                report.failures.push(FileError { file_name, error });
            }
        }
    }

    report
}

/// File name of a path, or the whole path when it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| PathBuf::from(path).display().to_string())
}
