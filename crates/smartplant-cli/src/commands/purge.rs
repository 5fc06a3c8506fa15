use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::{GlobalFlags, PurgeArgs};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PurgeResponse {
    reference: DateTime<Utc>,
    expired: Vec<String>,
}

/// Handle `smartplant purge`.
///
/// Hydration already drops entries expired at the current time; those are
/// reported together with anything expired at `--at`.
pub async fn handle(
    args: &PurgeArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let reference = match &args.at {
        Some(at) => parse_reference(at)?,
        None => Utc::now(),
    };

    let report = ctx.store.hydrate().await?;
    let mut expired = report.expired;
    expired.extend(ctx.store.purge_stale_species(reference).await?);
    expired.sort();

    tracing::info!(count = expired.len(), "purge complete");
    output(&PurgeResponse { reference, expired }, flags.format)
}

fn parse_reference(at: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(at)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("invalid --at '{at}': expected an RFC 3339 timestamp"))
}
