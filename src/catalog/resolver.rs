//! Fitting offset resolution.
//!
//! Precedence for every lookup:
//!
//! 1. a usable session override for `(type, size)`
//! 2. the catalog row whose normalized size equals the normalized input
//!
//! The fitting type is trimmed once on entry, so both paths see the same key.
//!
//! Errors distinguish an unsupported type, a supported type with no rows, and
//! a known type without the requested size (listing the sizes that exist).

use tracing::debug;

use crate::catalog::normalize::normalize_size;
use crate::catalog::overrides::SessionOverrides;
use crate::catalog::store::{Catalog, CatalogEntry};
use crate::domain::{CatalogConfig, Connection, FittingRole, FittingSpec, OffsetVariant};
use crate::error::CutError;
use crate::math::Inches;

pub struct Resolver<'a> {
    catalog: &'a Catalog,
    config: &'a CatalogConfig,
    overrides: Option<&'a SessionOverrides>,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a CatalogConfig) -> Self {
        Self {
            catalog,
            config,
            overrides: None,
        }
    }

    pub fn with_overrides(mut self, overrides: &'a SessionOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Primary offset for a fitting.
    pub fn resolve(&self, fitting_type: &str, size: &str) -> Result<Inches, CutError> {
        let fitting_type = fitting_type.trim();
        if let Some(v) = self
            .overrides
            .and_then(|o| o.get(fitting_type, size))
            .and_then(|o| o.usable_primary())
        {
            debug!(fitting_type, size, "primary offset from session override");
            return Ok(v);
        }

        match self.find_row(fitting_type, size)? {
            Some(entry) => entry.primary(),
            None => Err(CutError::SizeNotFound {
                fitting_type: fitting_type.to_string(),
                size: size.to_string(),
                available: self.catalog.sizes(fitting_type),
            }),
        }
    }

    /// Alternate offset for a fitting, if it has one.
    ///
    /// A missing size or an unparseable cell is "no value" rather than an
    /// error; an unsupported or empty type still fails.
    pub fn resolve_secondary(&self, fitting_type: &str, size: &str) -> Result<Option<Inches>, CutError> {
        let fitting_type = fitting_type.trim();
        if let Some(o) = self.overrides.and_then(|o| o.get(fitting_type, size)) {
            if let Some(v) = o.usable_secondary() {
                debug!(fitting_type, size, "secondary offset from session override");
                return Ok(Some(v));
            }
            // Session-defined fittings may not exist in the catalog at all.
            if !self.catalog.has_type(fitting_type) {
                return Ok(None);
            }
        }

        Ok(self
            .find_row(fitting_type, size)?
            .and_then(CatalogEntry::secondary))
    }

    /// Resolve a requested fitting into a [`Connection`] for `role`.
    ///
    /// A secondary request uses the primary offset when no alternate exists;
    /// the returned connection records which one was applied.
    pub fn connection(&self, role: FittingRole, spec: &FittingSpec) -> Result<Connection, CutError> {
        let secondary = match spec.variant {
            OffsetVariant::Secondary => self.resolve_secondary(&spec.fitting_type, &spec.size)?,
            OffsetVariant::Primary => None,
        };

        let (offset, variant) = match secondary {
            Some(v) => (v, OffsetVariant::Secondary),
            None => (
                self.resolve(&spec.fitting_type, &spec.size)?,
                OffsetVariant::Primary,
            ),
        };

        Ok(Connection {
            role,
            fitting_type: spec.fitting_type.trim().to_string(),
            size: spec.size.clone(),
            offset,
            variant,
        })
    }

    /// Thickness to subtract for a bushing: the supplied value, else the
    /// bushing's secondary offset.
    pub fn bushing_thickness(&self, bushing: &FittingSpec, supplied: Option<Inches>) -> Result<Inches, CutError> {
        if let Some(v) = supplied {
            return Ok(v);
        }
        self.resolve_secondary(&bushing.fitting_type, &bushing.size)?
            .ok_or_else(|| CutError::MissingBushingThickness {
                fitting_type: bushing.fitting_type.clone(),
                size: bushing.size.clone(),
            })
    }

    /// Validate the type and look up the row for `size`.
    fn find_row(&self, fitting_type: &str, size: &str) -> Result<Option<&'a CatalogEntry>, CutError> {
        let known = self.catalog.has_type(fitting_type);
        if !known && !self.config.is_supported(fitting_type) {
            return Err(CutError::UnsupportedType {
                fitting_type: fitting_type.to_string(),
                supported: self.config.supported_types.clone(),
            });
        }
        if !known {
            return Err(CutError::UnknownType {
                fitting_type: fitting_type.to_string(),
            });
        }

        Ok(self.catalog.lookup(fitting_type, &normalize_size(size)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::overrides::OffsetOverride;
    use num_rational::Ratio;

    const ELBOW: &str = "Elbow 90(Socket x Socket)";
    const TEE_R: &str = "Tee (Reducing)";
    const UNION: &str = "Union (Socket x Socket)";
    const BUSHING: &str = "Bushing (Spigot x Socket)";

    fn row(t: &str, size: &str, primary: &str, secondary: Option<&str>) -> CatalogEntry {
        CatalogEntry::new(t, size, Some(primary.to_string()), secondary.map(str::to_string))
    }

    fn catalog() -> Catalog {
        Catalog::from_entries(vec![
            row(ELBOW, "1.5", "0.6875", None),
            row(ELBOW, "2.0", "0.75", Some("0.5")),
            row(TEE_R, "2x2x1", "15/32", None),
            row(BUSHING, "2x1.5", "0.25", Some("1/8")),
            row("Cap", "1", "3/0", None),
        ])
    }

    #[test]
    fn resolves_any_equivalent_size_spelling() {
        let catalog = catalog();
        let config = CatalogConfig::default();
        let resolver = Resolver::new(&catalog, &config);
        for size in ["2", "2.0", " 2.00 "] {
            assert_eq!(resolver.resolve(ELBOW, size).unwrap(), Ratio::new(3, 4));
        }
        assert_eq!(resolver.resolve(TEE_R, "2X2X1").unwrap(), Ratio::new(15, 32));
    }

    #[test]
    fn distinguishes_unsupported_unknown_and_missing_size() {
        let catalog = catalog();
        let config = CatalogConfig::default();
        let resolver = Resolver::new(&catalog, &config);

        assert!(matches!(
            resolver.resolve("Cross", "2"),
            Err(CutError::UnsupportedType { .. })
        ));
        assert_eq!(
            resolver.resolve(UNION, "2"),
            Err(CutError::UnknownType {
                fitting_type: UNION.to_string()
            })
        );
        assert_eq!(
            resolver.resolve(ELBOW, "3"),
            Err(CutError::SizeNotFound {
                fitting_type: ELBOW.to_string(),
                size: "3".to_string(),
                available: vec!["1.5".to_string(), "2".to_string()],
            })
        );
    }

    #[test]
    fn padded_type_names_resolve_like_overrides_do() {
        let catalog = catalog();
        let config = CatalogConfig::default();
        let padded = format!(" {ELBOW} ");

        let plain = Resolver::new(&catalog, &config);
        assert_eq!(plain.resolve(&padded, "2").unwrap(), Ratio::new(3, 4));
        assert_eq!(plain.resolve_secondary(&padded, "2").unwrap(), Some(Ratio::new(1, 2)));
        let conn = plain
            .connection(FittingRole::A, &FittingSpec::new(padded.as_str(), "1.5"))
            .unwrap();
        assert_eq!(conn.fitting_type, ELBOW);

        let mut overrides = SessionOverrides::new();
        overrides.set(ELBOW, "1.5", OffsetOverride::primary(Ratio::new(5, 8)));
        let overridden = Resolver::new(&catalog, &config).with_overrides(&overrides);
        assert_eq!(overridden.resolve(&padded, "1.5").unwrap(), Ratio::new(5, 8));
        assert_eq!(overridden.resolve(&padded, "2").unwrap(), Ratio::new(3, 4));
    }

    #[test]
    fn types_present_only_in_the_catalog_are_accepted() {
        let catalog = catalog();
        let config = CatalogConfig::default();
        let resolver = Resolver::new(&catalog, &config);
        assert!(matches!(
            resolver.resolve("Cap", "1"),
            Err(CutError::InvalidOffsetFormat { .. })
        ));
    }

    #[test]
    fn override_beats_a_well_formed_catalog_row() {
        let catalog = catalog();
        let config = CatalogConfig::default();
        let mut overrides = SessionOverrides::new();
        overrides.set(
            ELBOW,
            "2",
            OffsetOverride {
                primary: Some(Ratio::new(7, 8)),
                secondary: Some(Ratio::new(1, 16)),
            },
        );
        overrides.set("Wye", "3", OffsetOverride::primary(Ratio::new(2, 1)));

        let resolver = Resolver::new(&catalog, &config).with_overrides(&overrides);
        assert_eq!(resolver.resolve(ELBOW, "2.0").unwrap(), Ratio::new(7, 8));
        assert_eq!(resolver.resolve_secondary(ELBOW, "2").unwrap(), Some(Ratio::new(1, 16)));
        // Unsupported and absent from the catalog, but overridden.
        assert_eq!(resolver.resolve("Wye", "3").unwrap(), Ratio::from_integer(2));
        assert_eq!(resolver.resolve_secondary("Wye", "3").unwrap(), None);
    }

    #[test]
    fn secondary_is_optional_but_type_errors_still_fail() {
        let catalog = catalog();
        let config = CatalogConfig::default();
        let resolver = Resolver::new(&catalog, &config);
        assert_eq!(resolver.resolve_secondary(ELBOW, "2").unwrap(), Some(Ratio::new(1, 2)));
        assert_eq!(resolver.resolve_secondary(ELBOW, "1.5").unwrap(), None);
        assert_eq!(resolver.resolve_secondary(ELBOW, "9").unwrap(), None);
        assert!(resolver.resolve_secondary(UNION, "2").is_err());
    }

    #[test]
    fn connection_falls_back_to_primary() {
        let catalog = catalog();
        let config = CatalogConfig::default();
        let resolver = Resolver::new(&catalog, &config);

        let alt = FittingSpec::new(ELBOW, "2").with_variant(OffsetVariant::Secondary);
        let conn = resolver.connection(FittingRole::A, &alt).unwrap();
        assert_eq!(conn.offset, Ratio::new(1, 2));
        assert_eq!(conn.variant, OffsetVariant::Secondary);

        let alt = FittingSpec::new(ELBOW, "1.5").with_variant(OffsetVariant::Secondary);
        let conn = resolver.connection(FittingRole::B, &alt).unwrap();
        assert_eq!(conn.offset, Ratio::new(11, 16));
        assert_eq!(conn.variant, OffsetVariant::Primary);
    }

    #[test]
    fn bushing_thickness_prefers_supplied_value() {
        let catalog = catalog();
        let config = CatalogConfig::default();
        let resolver = Resolver::new(&catalog, &config);
        let bushing = FittingSpec::new(BUSHING, "2x1.5");

        assert_eq!(
            resolver.bushing_thickness(&bushing, Some(Ratio::new(1, 4))).unwrap(),
            Ratio::new(1, 4)
        );
        assert_eq!(resolver.bushing_thickness(&bushing, None).unwrap(), Ratio::new(1, 8));

        let elbow = FittingSpec::new(ELBOW, "1.5");
        assert!(matches!(
            resolver.bushing_thickness(&elbow, None),
            Err(CutError::MissingBushingThickness { .. })
        ));
    }
}
