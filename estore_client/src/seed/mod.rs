//! Contract seeding
//!
//! Stamps a catalog with one shared auction window and price, submits every
//! product as its own write and confirms the run with a read of the
//! product index.

pub mod catalog;
pub mod client;

pub use catalog::{Catalog, CatalogItem, SeedWindow, SAMPLE_CATEGORY};
pub use client::{CallState, SeedReport, SeedingClient, SettlePolicy, WriteOutcome};
