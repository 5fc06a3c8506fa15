use crate::cli::{Commands, GlobalFlags};
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Status => commands::status::handle(ctx, flags).await,
        Commands::Plants => commands::plants::handle(ctx, flags).await,
        Commands::Species => commands::species::handle(ctx, flags).await,
        Commands::Purge(args) => commands::purge::handle(&args, ctx, flags).await,
        Commands::Clear(args) => commands::clear::handle(&args, ctx, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
