//! Configuration validation command.

use std::path::Path;

use crate::app::Config;
use crate::error::Result;

/// Validate configuration file without starting the sampler.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    println!("Checking configuration: {}", path.display());
    println!();

    let config = Config::load(path)?;

    println!("✓ Configuration file is valid");
    println!();
    println!("Summary:");
    println!("  Instrument: {}", config.instrument);
    let ids: Vec<String> = config.source_ids().iter().map(ToString::to_string).collect();
    println!("  Sources: {}", ids.join(", "));
    println!(
        "  Cadence: {}ms, deadline: {}ms, retries: {}",
        config.sampler.cadence_ms, config.sampler.deadline_ms, config.sampler.max_retries
    );
    println!("  Threshold: {}%", config.detector.threshold_pct);
    println!(
        "  History: {} samples, {} opportunities",
        config.history.sample_capacity, config.history.opportunity_capacity
    );
    println!("  Trade log: {}", config.trade_log.path.display());
    if config.dashboard.enabled {
        println!("  Dashboard: http://{}", config.dashboard.bind);
    } else {
        println!("  Dashboard: disabled");
    }
    println!();
    println!("Configuration is ready to use.");

    Ok(())
}
