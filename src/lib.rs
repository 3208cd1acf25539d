//! Tubesmith library
//!
//! Exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod compose;
pub mod config;
pub mod console;
pub mod encoder;
pub mod fetch;
pub mod schedule;
pub mod youtube;

pub use catalog::{Artist, Artwork, Catalog, CatalogError, ItemState, Track, Video};
pub use config::AppConfig;
