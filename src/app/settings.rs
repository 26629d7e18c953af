//! Runtime settings from the environment (`.env` supported) and global flags.

use std::path::PathBuf;

use crate::domain::CatalogConfig;

pub const ENV_CATALOG: &str = "PIPECUT_CATALOG";
pub const ENV_JOBS: &str = "PIPECUT_JOBS";
pub const ENV_SUPPORTED_TYPES: &str = "PIPECUT_SUPPORTED_TYPES";
pub const ENV_PRIMARY_COLUMN: &str = "PIPECUT_PRIMARY_COLUMN";
pub const ENV_SECONDARY_COLUMN: &str = "PIPECUT_SECONDARY_COLUMN";

const DEFAULT_CATALOG_PATH: &str = "data/catalog.csv";
const DEFAULT_JOBS_PATH: &str = "data/jobs.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub catalog_path: PathBuf,
    pub jobs_path: PathBuf,
    pub overrides_path: Option<PathBuf>,
    pub catalog: CatalogConfig,
}

impl Settings {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = CatalogConfig::default();

        let supported_types = get(ENV_SUPPORTED_TYPES)
            .map(|list| {
                list.split(';')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|types| !types.is_empty())
            .unwrap_or(defaults.supported_types);

        Self {
            catalog_path: get(ENV_CATALOG).map_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH), PathBuf::from),
            jobs_path: get(ENV_JOBS).map_or_else(|| PathBuf::from(DEFAULT_JOBS_PATH), PathBuf::from),
            overrides_path: None,
            catalog: CatalogConfig {
                supported_types,
                primary_column: get(ENV_PRIMARY_COLUMN).unwrap_or(defaults.primary_column),
                secondary_column: get(ENV_SECONDARY_COLUMN).unwrap_or(defaults.secondary_column),
            },
        }
    }

    /// Apply command-line paths on top of the environment.
    pub fn with_paths(mut self, catalog: Option<PathBuf>, jobs: Option<PathBuf>, overrides: Option<PathBuf>) -> Self {
        if let Some(p) = catalog {
            self.catalog_path = p;
        }
        if let Some(p) = jobs {
            self.jobs_path = p;
        }
        if overrides.is_some() {
            self.overrides_path = overrides;
        }
        self
    }
}
