//! Append-only CSV datasets for measurement records.
//!
//! Each [`Dataset`] maps to one file. Files are opened in append mode so that
//! repeated invocations accumulate samples; the header row is written only
//! when a file is empty.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use super::benchmark_errors::{BenchmarkError, BenchmarkResult};
use super::benchmark_types::{Dataset, MeasurementRecord};

/// Destination for measurement records.
pub trait ResultsSink {
    /// Appends one record to `dataset`. Called right after each measurement.
    fn append(&mut self, dataset: Dataset, record: &MeasurementRecord) -> BenchmarkResult<()>;
}

/// Writes every dataset to `<dir>/<dataset file name>`.
pub struct CsvResultsSink {
    dir: PathBuf,
    files: BTreeMap<Dataset, File>,
}

impl CsvResultsSink {
    /// Opens (or creates) every dataset file under `dir`.
    ///
    /// Any failure here is fatal: without the files the measurements would be
    /// lost silently.
    pub fn open(dir: impl AsRef<Path>) -> BenchmarkResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(&dir).map_err(|source| BenchmarkError::SinkOpenError {
                path: dir.display().to_string(),
                source,
            })?;
        }

        let mut files = BTreeMap::new();
        for dataset in Dataset::ALL {
            let path = dir.join(dataset.file_name());
            let file = open_with_header(&path, dataset).map_err(|source| {
                BenchmarkError::SinkOpenError {
                    path: path.display().to_string(),
                    source,
                }
            })?;
            files.insert(dataset, file);
        }

        Ok(Self { dir, files })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, dataset: Dataset) -> PathBuf {
        self.dir.join(dataset.file_name())
    }
}

fn open_with_header(path: &Path, dataset: Dataset) -> std::io::Result<File> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if file.metadata()?.len() == 0 {
        writeln!(file, "{}", dataset.header())?;
        debug!("Wrote header to {}", path.display());
    }
    Ok(file)
}

impl ResultsSink for CsvResultsSink {
    fn append(&mut self, dataset: Dataset, record: &MeasurementRecord) -> BenchmarkResult<()> {
        let path = self.path_for(dataset);
        let file = self
            .files
            .get_mut(&dataset)
            .ok_or_else(|| BenchmarkError::SinkOpenError {
                path: path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "dataset not opened"),
            })?;
        writeln!(file, "{}", record.to_csv_row())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Elapsed;

    #[test]
    fn test_open_creates_every_dataset_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvResultsSink::open(dir.path()).unwrap();
        for dataset in Dataset::ALL {
            let content = fs::read_to_string(sink.path_for(dataset)).unwrap();
            assert_eq!(content, format!("{}\n", dataset.header()));
        }
    }

    #[test]
    fn test_header_written_once_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let record = MeasurementRecord::new("4", Elapsed { seconds: 1, micros: 5 }, false);

        for _ in 0..2 {
            let mut sink = CsvResultsSink::open(dir.path()).unwrap();
            sink.append(Dataset::ParallelData, &record).unwrap();
        }

        let content = fs::read_to_string(dir.path().join("parallel-data.csv")).unwrap();
        assert_eq!(content, "threads,sec,us,suspect\n4,1,5,0\n4,1,5,0\n");
    }

    #[test]
    fn test_open_fails_when_dir_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let result = CsvResultsSink::open(&blocker);
        assert!(matches!(result, Err(BenchmarkError::SinkOpenError { .. })));
    }
}
