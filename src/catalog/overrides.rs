//! Session-scoped offset overrides.
//!
//! Fittings added during a session can be used before they are written to the
//! catalog. An override always wins over a catalog row with the same key.

use std::collections::HashMap;

use crate::catalog::normalize::normalize_size;
use crate::math::{Inches, is_non_negative};

/// Override values for one `(fitting_type, size)` key. Either side may be
/// absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OffsetOverride {
    pub primary: Option<Inches>,
    pub secondary: Option<Inches>,
}

impl OffsetOverride {
    pub fn primary(primary: Inches) -> Self {
        Self {
            primary: Some(primary),
            secondary: None,
        }
    }

    /// A usable primary override.
    pub fn usable_primary(&self) -> Option<Inches> {
        self.primary.filter(is_non_negative)
    }

    /// A usable secondary override; zero counts as "not set".
    pub fn usable_secondary(&self) -> Option<Inches> {
        self.secondary.filter(|v| *v > Inches::from_integer(0))
    }
}

/// Overrides keyed by fitting type and normalized size.
#[derive(Debug, Clone, Default)]
pub struct SessionOverrides {
    map: HashMap<(String, String), OffsetOverride>,
}

impl SessionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(fitting_type: &str, size: &str) -> (String, String) {
        (fitting_type.trim().to_string(), normalize_size(size))
    }

    pub fn set(&mut self, fitting_type: &str, size: &str, value: OffsetOverride) {
        self.map.insert(Self::key(fitting_type, size), value);
    }

    pub fn get(&self, fitting_type: &str, size: &str) -> Option<&OffsetOverride> {
        self.map.get(&Self::key(fitting_type, size))
    }

    pub fn remove(&mut self, fitting_type: &str, size: &str) -> Option<OffsetOverride> {
        self.map.remove(&Self::key(fitting_type, size))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
