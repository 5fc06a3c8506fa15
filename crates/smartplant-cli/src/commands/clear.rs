use anyhow::bail;
use serde_json::json;

use crate::cli::{ClearArgs, GlobalFlags};
use crate::context::AppContext;
use crate::output::output;

/// Handle `smartplant clear`.
pub async fn handle(
    args: &ClearArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if !args.yes {
        bail!(
            "refusing to wipe namespace '{}' without --yes",
            ctx.config.storage.namespace
        );
    }
    ctx.store.clear().await?;
    output(
        &json!({"cleared": true, "namespace": ctx.config.storage.namespace}),
        flags.format,
    )
}
