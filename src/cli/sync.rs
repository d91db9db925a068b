//! One-shot sync and the polling loop

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use tokio::time::MissedTickBehavior;

use crate::bridge::{IntegrationBridge, SyncReport};
use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::client::KlereoClient;
use crate::error::{Error, Result};
use crate::models::SyncDisplay;
use crate::output::Formattable;

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Register everything and push all readings once
pub async fn once(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let mut bridge = ctx.bridge()?;

    let pb = spinner("Publishing Klereo pools to Home Assistant...");
    let discovered = bridge.discover_and_register_pools().await;
    let updated = bridge.update_all_sensors().await;
    pb.finish_and_clear();

    for (device_id, pool_name, at) in bridge.registered_devices() {
        debug!("Device {} ({}) registered at {}", device_id, pool_name, at);
    }

    let report = SyncReport {
        pools_seen: discovered.pools_seen,
        pools_registered: discovered.pools_registered + updated.pools_registered,
        sensors_registered: discovered.sensors_registered + updated.sensors_registered,
        states_updated: updated.states_updated,
        failures: discovered.failures + updated.failures,
    };

    vec![SyncDisplay::from(&report)].print(ctx.format)?;

    if report.failures > 0 {
        return Err(Error::Other(format!(
            "{} Home Assistant updates failed",
            report.failures
        )));
    }
    Ok(())
}

/// Publish until Ctrl-C, updating every `interval` seconds
pub async fn run(opts: &GlobalOptions, interval: Option<u64>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let mut bridge = ctx.bridge()?;

    let every = Duration::from_secs(interval.unwrap_or(ctx.config.polling.interval_secs).max(1));
    info!("Updating Home Assistant every {}s", every.as_secs());

    if !bridge.test_ha_connection().await {
        warn!("Home Assistant is not reachable yet, will keep trying");
    }
    bridge.discover_and_register_pools().await;

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    poll_until(every, ctrl_c, async || tick(&mut bridge, &ctx.client).await).await;

    info!(
        "Interrupted, stopping with {} sensors registered",
        bridge.registered_entity_count()
    );
    Ok(())
}

/// Call `on_tick` every `every` until `shutdown` resolves, returning the
/// number of completed ticks.
///
/// `shutdown` is polled from a single pinned future, so a signal raised while
/// `on_tick` runs ends the loop right after it.
async fn poll_until<S, F>(every: Duration, shutdown: S, mut on_tick: F) -> usize
where
    S: Future<Output = ()>,
    F: AsyncFnMut(),
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    tokio::pin!(shutdown);
    let mut ticks = 0;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                on_tick().await;
                ticks += 1;
            }
        }
    }
    ticks
}

async fn tick(bridge: &mut IntegrationBridge<KlereoClient>, client: &KlereoClient) {
    let report = bridge.update_all_sensors().await;
    if report.pools_registered > 0 {
        info!("Registered {} new pools", report.pools_registered);
    }
    if report.failures > 0 {
        warn!("{} Home Assistant updates failed", report.failures);
    }

    let stats = client.cache_stats();
    debug!(
        "Cache: {} valid, {} expired entries",
        stats.valid_entries, stats.expired_entries
    );
}
