//! Command implementations. Each command mutates the in-memory catalog;
//! persistence happens once in `main` after the command completes.

pub mod add;
pub mod desc;
pub mod schedule;
pub mod upload;

use crate::catalog::Catalog;
use anyhow::Result;

pub fn status(catalog: &Catalog) {
    println!("{}", catalog.video_status());
}

pub fn dump_json(catalog: &Catalog) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(catalog)?);
    Ok(())
}
