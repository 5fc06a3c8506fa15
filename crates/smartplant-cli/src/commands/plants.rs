use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `smartplant plants`.
pub async fn handle(ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.store.hydrate().await?;
    output(&ctx.store.list_plants(), flags.format)
}
