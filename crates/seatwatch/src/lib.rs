//! Interactive course-section finder and seat notifier for Purdue's
//! public course catalog.
//!
//! The flow: an account gate (register or log in), then a narrowing
//! search over the catalog's OData API that commits a term, a subject, a
//! course number, and finally one section, then an optional SMS carrying
//! the resolved section's details. Every prompt honors the `quit`
//! sentinel, invalid input loops in place with a diagnostic, and a
//! catalog failure ends the run rather than limping on with partial
//! data.

pub mod catalog;
pub mod console;
pub mod duration;
pub mod notify;
pub mod resolver;
pub mod session;
pub mod store;
pub mod term;

pub use resolver::{Resolution, ResolvedSection, SectionResolver};
pub use term::TermCode;
