//! Job book persistence (pretty JSON).

use std::fs::{self, File};
use std::path::Path;

use tracing::{debug, info};

use crate::error::AppError;
use crate::jobs::JobBook;

/// Read the job book. A missing file is an empty book.
pub fn read_job_book(path: &Path) -> Result<JobBook, AppError> {
    if !path.exists() {
        debug!(path = %path.display(), "no job book yet");
        return Ok(JobBook::new());
    }
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open job book '{}': {e}", path.display())))?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid job book '{}': {e}", path.display())))
}

pub fn write_job_book(path: &Path, book: &JobBook) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", parent.display())))?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create job book '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, book)
        .map_err(|e| AppError::new(2, format!("Failed to write job book: {e}")))?;
    info!(path = %path.display(), jobs = book.len(), "saved job book");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CutKind;
    use crate::jobs::{JobEntry, RecordedCut};
    use chrono::Local;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let book = read_job_book(&dir.path().join("jobs.json")).unwrap();
        assert!(book.is_empty());
    }

    #[test]
    fn write_creates_parent_dirs_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("jobs.json");

        let mut book = JobBook::new();
        book.record(
            "Boiler",
            JobEntry {
                recorded_at: Local::now(),
                kind: CutKind::LayIn,
                summary: "Overall C2C: 20".to_string(),
                cuts: vec![RecordedCut {
                    label: "Cut 1 (A -> Lay-in)".to_string(),
                    decimal: "11.40000".to_string(),
                    fraction: "11 3/8".to_string(),
                }],
                shaved: true,
            },
        );
        write_job_book(&path, &book).unwrap();

        let back = read_job_book(&path).unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn corrupt_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(read_job_book(&path).unwrap_err().exit_code(), 2);
    }
}
