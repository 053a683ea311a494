use std::time::Instant;

use anyhow::{anyhow, Result};
use scrollpin_core::AppConfig;

use super::page::{self, describe};

/// Resolve `index`, jump there and show the settled frame
pub fn run(config: &AppConfig, index: i64, width: f64, height: f64, json: bool) -> Result<()> {
    let mut config = config.clone();
    // headless: land immediately instead of animating
    config.scroll.smooth_enabled = false;

    let mut engine = page::mount(&config, width, height)?;
    let target = engine
        .seek_target(index)
        .ok_or_else(|| anyhow!("Nothing to seek to"))?;
    engine.seek(index, Instant::now());

    if json {
        let out = serde_json::json!({
            "target": target,
            "frame": engine.frame(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if target.index as i64 != target.requested {
        println!("Index {} clamped to {}", target.requested, target.index);
    }
    println!(
        "seek {} -> t = {:.3}, scroll = {:.1} px",
        target.index, target.unit_time, target.scroll
    );
    println!("{}", describe(engine.frame()));
    Ok(())
}
