use std::time::Instant;

use anyhow::Result;
use scrollpin_core::AppConfig;

use super::page::{self, describe};

/// Scrub from just before the pin to just after it, printing each frame
pub fn run(config: &AppConfig, width: f64, height: f64, samples: usize, json: bool) -> Result<()> {
    let mut engine = page::mount(config, width, height)?;
    let Some(binding) = engine.binding().cloned() else {
        return Ok(());
    };

    let range = binding.range;
    let first = range.start - height * 0.25;
    let last = range.end() + height * 0.25;
    let steps = samples.max(2) - 1;

    if !json {
        println!(
            "{} | {} participants | range {:.0}..{:.0} px | T = {}",
            engine.choreography(),
            binding.timeline.participants(),
            range.start,
            range.end(),
            binding.timeline.length()
        );
        if let Some(pin) = engine.stage().pin() {
            println!(
                "pinned at {:.0} px from the top, spacer {:.0} px",
                pin.top_offset, pin.spacer
            );
        }
        println!("{:>8}  {:>6}  {:>6}  states", "scroll", "p", "t");
    }

    for k in 0..=steps {
        let position = first + (last - first) * k as f64 / steps as f64;
        engine.on_scroll_position(position, Instant::now());
        let frame = engine.frame();
        if json {
            println!("{}", serde_json::to_string(frame)?);
        } else {
            println!(
                "{:>8.0}  {:>6.3}  {:>6.3}  {}",
                frame.scroll,
                frame.progress,
                frame.unit_time,
                describe(frame)
            );
        }
    }

    if !json {
        let stats = engine.stats();
        println!(
            "\n{} samples applied, {} dropped",
            stats.applied_samples, stats.dropped_samples
        );
    }
    Ok(())
}
