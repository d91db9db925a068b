//! Pool and probe listing commands

use log::debug;

use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::error::Result;
use crate::models::{PoolDisplay, ProbeDisplay};
use crate::output::Formattable;

/// Run the pools command
pub async fn list(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let pools = ctx.client.get_pools().await?;
    debug!("Fetched {} pools", pools.len());

    let rows: Vec<PoolDisplay> = pools.into_iter().map(PoolDisplay::from).collect();
    rows.print(ctx.format)
}

/// Run the probes command for one pool
pub async fn probes(opts: &GlobalOptions, pool_id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let probes = ctx.client.get_pool_probes(pool_id).await?;
    debug!("Fetched {} probes for pool {}", probes.len(), pool_id);

    let rows: Vec<ProbeDisplay> = probes
        .iter()
        .map(|probe| ProbeDisplay::new(pool_id, probe))
        .collect();
    rows.print(ctx.format)
}
