use anyhow::{Context, bail};
use smartplant_schema::SchemaRegistry;

use crate::cli::{GlobalFlags, SchemaArgs};
use crate::output::output;

/// Handle `smartplant schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();
    if args.list {
        return output(&registry.names(), flags.format);
    }
    let Some(name) = args.name.as_deref() else {
        bail!("a schema name or --list is required");
    };
    let schema = registry
        .get(name)
        .with_context(|| format!("unknown schema '{name}' (try --list)"))?;
    output(schema, flags.format)
}
