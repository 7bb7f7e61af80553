//! Budget LRU - demonstration driver
//!
//! Fills a small cache round-robin with five keys, then reads them back in
//! reverse order to show which ones survived eviction.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use budget_lru::{Cache, Config};

const KEYS: [&str; 5] = ["key0", "key1", "key2", "key3", "key4"];
const VALUES: [&str; 5] = ["value0", "value1", "value2", "value3", "value4"];

/// Entry point for the demonstration driver.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache
/// 4. Insert the five keys round-robin, each value padded to the average item size
/// 5. Get the keys back newest first
/// 6. Print statistics and destroy the cache
fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "budget_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_size={}, average_item_size={}, rounds={}",
        config.cache_size, config.average_item_size, config.demo_rounds
    );

    let cache = Cache::from_config(&config).context("failed to create cache")?;

    let payload_len =
        usize::try_from(config.average_item_size).context("average item size too large")?;
    info!("Setting values...");
    for round in 0..config.demo_rounds {
        let slot = round % KEYS.len();
        let mut value = VALUES[slot].as_bytes().to_vec();
        value.resize(payload_len.max(value.len()), 0);
        cache
            .set(KEYS[slot], value)
            .with_context(|| format!("set of {} failed", KEYS[slot]))?;
    }

    info!("Getting values...");
    for key in KEYS.iter().rev() {
        let value = cache
            .get_with(key.as_bytes(), |bytes| {
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                String::from_utf8_lossy(&bytes[..end]).into_owned()
            })
            .with_context(|| format!("get of {} failed", key))?;
        match value {
            Some(value) => println!("{}: {}", key, value),
            None => println!("{}: <evicted>", key),
        }
    }

    let stats = cache.stats().context("failed to read statistics")?;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    cache.destroy().context("failed to destroy cache")?;
    info!("Cache is freed");

    Ok(())
}
