//! Localization: resource catalogs with positional substitution.

pub mod catalog;

pub use catalog::{format, NlsError, ResourceCatalog};
