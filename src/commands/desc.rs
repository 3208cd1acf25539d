//! The `desc` command: preview upcoming video descriptions, append lines to
//! a buffered track's description, or register artist links.

use crate::catalog::{Catalog, Video};
use crate::cli::DescArgs;
use crate::compose::VideoPlan;
use crate::config::AppConfig;
use anyhow::Result;
use crossterm::style::Stylize;

pub fn run(catalog: &mut Catalog, config: &AppConfig, args: DescArgs) -> Result<()> {
    if let Some(artist) = &args.link {
        if !args.items.is_empty() {
            catalog.update_artist_links(artist, &args.items);
            return Ok(());
        }
    }

    let batch = crate::schedule::Batch::plan(catalog)?;
    let n = args.index.max(1);
    if n > batch.len() {
        return Ok(());
    }
    let mut count = args.count.clamp(n, batch.len());

    if !args.items.is_empty() {
        let track = &mut catalog.tracks[batch.tracks[n - 1]];
        track.description = args.items.join("\n");
    }
    if args.all {
        count = batch.len();
    }

    for i in (n - 1)..count {
        let track = catalog.tracks[batch.tracks[i]].clone();
        let artwork = catalog.artwork[batch.artwork[i]].clone();
        let plan = VideoPlan::new(&track, &artwork, &config.templates, &config.encoder.extension);
        let video = plan.build(catalog, None)?;
        println!();
        describe_video(&video);
        println!();
    }
    Ok(())
}

/// Print a video heading and its full description.
pub fn describe_video(video: &Video) {
    let heading = video.to_string();
    println!("{}", heading.as_str().cyan().bold());
    println!("{}", "-".repeat(heading.len()));
    println!("{}", video.description);
}
