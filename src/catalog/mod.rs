//! Fitting catalog: normalization, indexed storage, session overrides and
//! offset resolution.

pub mod normalize;
pub mod overrides;
pub mod resolver;
pub mod store;

pub use normalize::{normalize_size, parse_offset_value};
pub use overrides::{OffsetOverride, SessionOverrides};
pub use resolver::Resolver;
pub use store::{Catalog, CatalogEntry};
