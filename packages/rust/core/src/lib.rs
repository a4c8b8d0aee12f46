//! The two blogsmith pipelines.
//!
//! [`ScrapeOrchestrator`] ingests listing cards into the store;
//! [`EnhanceOrchestrator`] turns the latest record into a published,
//! parent-linked rewrite. Both are strictly sequential single passes: each
//! run is stateless, executes to completion or raises, and leaves whatever
//! already succeeded in place (no rollback of prior upserts).

pub mod enhance;
pub mod scrape;

pub use enhance::{EnhanceOrchestrator, EnhanceReport};
pub use scrape::{ScrapeOrchestrator, ScrapeReport};
