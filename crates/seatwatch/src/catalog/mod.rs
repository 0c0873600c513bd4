//! Course catalog access: typed read-only queries against the remote
//! OData service.
//!
//! The resolver consumes the catalog through the [`CourseCatalog`] trait so
//! tests can substitute an in-memory catalog; [`CatalogClient`] is the live
//! HTTP implementation.

mod client;
mod error;
mod query;
mod types;

pub use client::{CatalogClient, CatalogConfig, CourseCatalog, CATALOG_BASE_URL};
pub use error::CatalogError;
pub use types::{ClassRecord, Course, DisplayWindow, Meeting, Page, Section, Subject};
