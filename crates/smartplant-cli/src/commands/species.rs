use chrono::{DateTime, Utc};
use serde::Serialize;
use smartplant_core::entities::CachedSpeciesEntry;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeciesRow {
    #[serde(flatten)]
    entry: CachedSpeciesEntry,
    /// Absent when the expiry lies past the representable date range.
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

/// Handle `smartplant species`.
pub async fn handle(ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.store.hydrate().await?;
    let rows: Vec<SpeciesRow> = ctx
        .store
        .list_cached_species_entries()
        .into_iter()
        .map(|entry| SpeciesRow {
            expires_at: entry.expires_at(),
            entry,
        })
        .collect();
    output(&rows, flags.format)
}
