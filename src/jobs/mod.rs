//! Job checklist bookkeeping.
//!
//! A job is a named list of recorded calculations (e.g. one per site or
//! drawing). Entries store the rendered strings shown to the operator, so a job
//! reads back exactly as it was displayed.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::CutKind;

/// One cut as it was displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedCut {
    pub label: String,
    pub decimal: String,
    pub fraction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEntry {
    pub recorded_at: DateTime<Local>,
    pub kind: CutKind,
    /// Connections and measurements, one per line.
    pub summary: String,
    pub cuts: Vec<RecordedCut>,
    pub shaved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub created_at: DateTime<Local>,
    pub entries: Vec<JobEntry>,
}

/// All jobs, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobBook {
    jobs: BTreeMap<String, Job>,
}

impl JobBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, creating the job on first use.
    pub fn record(&mut self, job_name: &str, entry: JobEntry) -> &Job {
        let name = job_name.trim().to_string();
        let job = self.jobs.entry(name.clone()).or_insert_with(|| Job {
            name,
            created_at: entry.recorded_at,
            entries: Vec::new(),
        });
        job.entries.push(entry);
        job
    }

    pub fn get(&self, job_name: &str) -> Option<&Job> {
        self.jobs.get(job_name.trim())
    }

    pub fn remove(&mut self, job_name: &str) -> Option<Job> {
        self.jobs.remove(job_name.trim())
    }

    /// Jobs in name order.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
