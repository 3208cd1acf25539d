mod models;
pub mod persistence;
mod store;

pub use models::{Artist, Artwork, ItemState, Track, Video};
pub use store::{Catalog, CatalogError, Slot};
