//! Shared domain types.
//!
//! These are the values that flow between the catalog resolver, the
//! calculator and the front-ends:
//!
//! - requested fittings (`FittingSpec`) and their resolved form (`Connection`)
//! - the three request shapes (`CutRequest`) and their output (`CutResult`)
//! - the immutable catalog configuration (`CatalogConfig`)

use num_traits::CheckedSub;
use serde::{Deserialize, Serialize};

use crate::math::Inches;

/// Fitting types offered when no list is configured.
pub const DEFAULT_SUPPORTED_TYPES: [&str; 5] = [
    "Tee (Socket x Socket x Socket)",
    "Tee (Reducing)",
    "Bushing (Spigot x Socket)",
    "Elbow 90(Socket x Socket)",
    "Union (Socket x Socket)",
];

/// The fitting type used for the middle fitting of a bushing cut.
pub const DEFAULT_BUSHING_TYPE: &str = "Bushing (Spigot x Socket)";

/// Which of the formulas to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CutKind {
    /// Two fittings, one center-to-center measurement.
    Standard,
    /// A -> lay-in fitting -> B, overall and sub-span measurements.
    LayIn,
    /// A -> bushing -> B, one measurement plus bushing thickness.
    Bushing,
}

impl CutKind {
    pub const ALL: [CutKind; 3] = [CutKind::Standard, CutKind::LayIn, CutKind::Bushing];

    pub fn display_name(self) -> &'static str {
        match self {
            CutKind::Standard => "Standard Cut",
            CutKind::LayIn => "Lay-in Cut",
            CutKind::Bushing => "Bushing Cut",
        }
    }
}

/// Which offset column a fitting contributes.
///
/// Some connector roles seat differently and use the catalog's alternate
/// (secondary) offset instead of the primary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetVariant {
    #[default]
    Primary,
    Secondary,
}

/// Position of a fitting within a cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FittingRole {
    A,
    B,
    LayIn,
    Bushing,
}

impl FittingRole {
    pub fn label(self) -> &'static str {
        match self {
            FittingRole::A => "Connection A",
            FittingRole::B => "Connection B",
            FittingRole::LayIn => "Lay-in",
            FittingRole::Bushing => "Bushing",
        }
    }
}

/// A fitting as requested by the operator, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FittingSpec {
    pub fitting_type: String,
    pub size: String,
    pub variant: OffsetVariant,
}

impl FittingSpec {
    pub fn new(fitting_type: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            fitting_type: fitting_type.into(),
            size: size.into(),
            variant: OffsetVariant::Primary,
        }
    }

    pub fn with_variant(mut self, variant: OffsetVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// A fitting bound to the offset that will be subtracted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub role: FittingRole,
    pub fitting_type: String,
    pub size: String,
    pub offset: Inches,
    /// The variant actually applied (a secondary request falls back to primary
    /// when the catalog has no alternate offset).
    pub variant: OffsetVariant,
}

/// Inputs of one calculation: resolved connections plus measurements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CutRequest {
    Standard {
        a: Connection,
        b: Connection,
        c2c: Inches,
    },
    LayIn {
        a: Connection,
        lay_in: Connection,
        b: Connection,
        c2c_overall: Inches,
        c2c_lay_in: Inches,
    },
    Bushing {
        a: Connection,
        bushing: Connection,
        b: Connection,
        c2c: Inches,
        thickness: Inches,
    },
}

impl CutRequest {
    pub fn kind(&self) -> CutKind {
        match self {
            CutRequest::Standard { .. } => CutKind::Standard,
            CutRequest::LayIn { .. } => CutKind::LayIn,
            CutRequest::Bushing { .. } => CutKind::Bushing,
        }
    }

    pub fn connections(&self) -> Vec<&Connection> {
        match self {
            CutRequest::Standard { a, b, .. } => vec![a, b],
            CutRequest::LayIn { a, lay_in, b, .. } => vec![a, lay_in, b],
            CutRequest::Bushing { a, bushing, b, .. } => vec![a, bushing, b],
        }
    }
}

/// One computed pipe length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutLength {
    pub label: &'static str,
    pub value: Inches,
}

/// One or two computed lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutResult {
    pub lengths: Vec<CutLength>,
}

impl CutResult {
    pub fn single(label: &'static str, value: Inches) -> Self {
        Self {
            lengths: vec![CutLength { label, value }],
        }
    }

    pub fn pair(first: (&'static str, Inches), second: (&'static str, Inches)) -> Self {
        Self {
            lengths: vec![
                CutLength {
                    label: first.0,
                    value: first.1,
                },
                CutLength {
                    label: second.0,
                    value: second.1,
                },
            ],
        }
    }

    /// Subtract the same amount from every length; `None` on overflow.
    pub fn less(&self, amount: Inches) -> Option<Self> {
        let lengths = self
            .lengths
            .iter()
            .map(|l| {
                l.value.checked_sub(&amount).map(|value| CutLength {
                    label: l.label,
                    value,
                })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self { lengths })
    }
}

/// Immutable catalog configuration handed to the loader and resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub supported_types: Vec<String>,
    /// Header of the primary offset column.
    pub primary_column: String,
    /// Header of the optional secondary offset column.
    pub secondary_column: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            supported_types: DEFAULT_SUPPORTED_TYPES.iter().map(|s| s.to_string()).collect(),
            primary_column: "G".to_string(),
            secondary_column: "G1".to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn is_supported(&self, fitting_type: &str) -> bool {
        self.supported_types.iter().any(|t| t == fitting_type)
    }
}
