//! Read session override files.
//!
//! An override file is a JSON array of records:
//!
//! ```json
//! [
//!   { "fitting_type": "Elbow 90(Socket x Socket)", "size": "2", "primary": "5/8" },
//!   { "fitting_type": "Tee (Reducing)", "size": "2x2x1", "primary": 0.5, "secondary": 0.25 }
//! ]
//! ```
//!
//! Offsets may be given as strings (decimal, fraction or mixed number) or as
//! plain JSON numbers.

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::catalog::{OffsetOverride, SessionOverrides};
use crate::error::AppError;
use crate::math::{Inches, from_f64, parse_rational};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OffsetText {
    Text(String),
    Number(f64),
}

impl OffsetText {
    fn to_inches(&self) -> Option<Inches> {
        match self {
            OffsetText::Text(s) => parse_rational(s),
            OffsetText::Number(v) => from_f64(*v),
        }
    }

    fn describe(&self) -> String {
        match self {
            OffsetText::Text(s) => s.clone(),
            OffsetText::Number(v) => v.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct OverrideRecord {
    fitting_type: String,
    size: String,
    #[serde(default)]
    primary: Option<OffsetText>,
    #[serde(default)]
    secondary: Option<OffsetText>,
}

/// Read an override file from disk.
pub fn read_overrides_json(path: &Path) -> Result<SessionOverrides, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open overrides '{}': {e}", path.display())))?;
    let overrides = parse_overrides(file)?;
    info!(path = %path.display(), count = overrides.len(), "loaded offset overrides");
    Ok(overrides)
}

pub fn parse_overrides<R: std::io::Read>(source: R) -> Result<SessionOverrides, AppError> {
    let records: Vec<OverrideRecord> =
        serde_json::from_reader(source).map_err(|e| AppError::new(2, format!("Invalid overrides JSON: {e}")))?;

    let mut overrides = SessionOverrides::new();
    for (idx, record) in records.iter().enumerate() {
        let fitting_type = record.fitting_type.trim();
        if fitting_type.is_empty() {
            return Err(AppError::new(2, format!("Override #{}: missing fitting_type.", idx + 1)));
        }
        let primary = convert(idx, "primary", record.primary.as_ref())?;
        let secondary = convert(idx, "secondary", record.secondary.as_ref())?;
        overrides.set(fitting_type, &record.size, OffsetOverride { primary, secondary });
    }
    Ok(overrides)
}

fn convert(idx: usize, field: &str, value: Option<&OffsetText>) -> Result<Option<Inches>, AppError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.to_inches() {
        Some(v) if v >= Inches::from_integer(0) => Ok(Some(v)),
        _ => Err(AppError::new(
            2,
            format!(
                "Override #{}: cannot convert {field} '{}' to a numeric offset",
                idx + 1,
                value.describe()
            ),
        )),
    }
}
