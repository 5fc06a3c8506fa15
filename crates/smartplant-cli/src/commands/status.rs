use serde::Serialize;
use smartplant_store::HydrateReport;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    backend: String,
    namespace: String,
    plants: usize,
    species: usize,
    hydrate: HydrateReport,
}

/// Handle `smartplant status`.
pub async fn handle(ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let hydrate = ctx.store.hydrate().await?;
    let state = ctx.store.get_state();
    output(
        &StatusResponse {
            backend: ctx.config.storage.backend.to_string(),
            namespace: ctx.config.storage.namespace.clone(),
            plants: state.plants.len(),
            species: state.species_cache.len(),
            hydrate,
        },
        flags.format,
    )
}
