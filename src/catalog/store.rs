//! In-memory fitting catalog.
//!
//! Rows are kept in source order (so the CSV writer can persist them back
//! unchanged) and indexed by `(fitting_type, normalized size)` at build time.
//! When the source holds the same key twice the first row wins and the later
//! row is reported through [`Catalog::duplicates`].

use std::collections::HashMap;

use tracing::warn;

use crate::catalog::normalize::{normalize_size, parse_offset_value};
use crate::error::CutError;
use crate::math::Inches;

/// One reference row. Offset cells are kept as written and parsed on use, so a
/// single bad cell does not prevent the rest of the catalog from loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub fitting_type: String,
    pub size: String,
    pub primary_offset: Option<String>,
    pub secondary_offset: Option<String>,
}

impl CatalogEntry {
    pub fn new(
        fitting_type: impl Into<String>,
        size: impl Into<String>,
        primary_offset: Option<String>,
        secondary_offset: Option<String>,
    ) -> Self {
        Self {
            fitting_type: fitting_type.into(),
            size: size.into(),
            primary_offset,
            secondary_offset,
        }
    }

    pub fn normalized_size(&self) -> String {
        normalize_size(&self.size)
    }

    /// Parsed primary offset.
    pub fn primary(&self) -> Result<Inches, CutError> {
        match parse_offset_value(self.primary_offset.as_deref()) {
            Ok(Some(v)) => Ok(v),
            Ok(None) => Err(CutError::MissingOffset {
                fitting_type: self.fitting_type.clone(),
                size: self.size.clone(),
            }),
            Err(CutError::InvalidOffsetFormat { value, .. }) => Err(CutError::InvalidOffsetFormat {
                value,
                context: Some(format!("{} size {}", self.fitting_type, self.size)),
            }),
            Err(other) => Err(other),
        }
    }

    /// Parsed secondary offset; absent and unparseable cells are both `None`.
    pub fn secondary(&self) -> Option<Inches> {
        parse_offset_value(self.secondary_offset.as_deref()).ok().flatten()
    }
}

type Key = (String, String);

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<Key, usize>,
    by_type: HashMap<String, Vec<usize>>,
    duplicates: Vec<usize>,
}

impl Catalog {
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut catalog = Self {
            entries,
            ..Self::default()
        };
        catalog.rebuild();
        catalog
    }

    fn rebuild(&mut self) {
        self.index.clear();
        self.by_type.clear();
        self.duplicates.clear();

        for (idx, entry) in self.entries.iter().enumerate() {
            self.by_type
                .entry(entry.fitting_type.clone())
                .or_default()
                .push(idx);

            let key = (entry.fitting_type.clone(), entry.normalized_size());
            if let Some(first) = self.index.get(&key).copied() {
                warn!(
                    fitting_type = %entry.fitting_type,
                    size = %entry.size,
                    first_row = first,
                    duplicate_row = idx,
                    "duplicate catalog entry; keeping the first row"
                );
                self.duplicates.push(idx);
            } else {
                self.index.insert(key, idx);
            }
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` when at least one row carries this type.
    pub fn has_type(&self, fitting_type: &str) -> bool {
        self.by_type.contains_key(fitting_type)
    }

    /// Distinct fitting types in first-seen order.
    pub fn types(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.fitting_type.as_str()) {
                seen.push(entry.fitting_type.as_str());
            }
        }
        seen
    }

    /// Exact lookup by already-normalized size.
    pub fn lookup(&self, fitting_type: &str, normalized_size: &str) -> Option<&CatalogEntry> {
        let key = (fitting_type.to_string(), normalized_size.to_string());
        self.index.get(&key).map(|&idx| &self.entries[idx])
    }

    /// Distinct normalized sizes for a type, in row order.
    pub fn sizes(&self, fitting_type: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for &idx in self.by_type.get(fitting_type).into_iter().flatten() {
            let size = self.entries[idx].normalized_size();
            if !out.contains(&size) {
                out.push(size);
            }
        }
        out
    }

    /// Rows shadowed by an earlier row with the same key.
    pub fn duplicates(&self) -> Vec<&CatalogEntry> {
        self.duplicates.iter().map(|&idx| &self.entries[idx]).collect()
    }

    /// Append a new row. Unlike loaded rows, offsets are validated up front.
    pub fn add_entry(&mut self, entry: CatalogEntry) -> Result<(), CutError> {
        if self.lookup(&entry.fitting_type, &entry.normalized_size()).is_some() {
            return Err(CutError::DuplicateEntry {
                fitting_type: entry.fitting_type,
                size: entry.size,
            });
        }
        entry.primary()?;
        parse_offset_value(entry.secondary_offset.as_deref())?;

        self.entries.push(entry);
        self.rebuild();
        Ok(())
    }

    /// Remove the row that resolves for `(fitting_type, size)`.
    pub fn remove_entry(&mut self, fitting_type: &str, size: &str) -> Option<CatalogEntry> {
        let key = (fitting_type.to_string(), normalize_size(size));
        let idx = *self.index.get(&key)?;
        let removed = self.entries.remove(idx);
        self.rebuild();
        Some(removed)
    }
}
