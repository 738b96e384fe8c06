//! Post-generation hook entry point.
//!
//! Invoked by the templating engine right after a project skeleton is
//! rendered. Flags arrive through the `SCAFFOLD_*` environment variables;
//! a failing build target makes the whole process exit non-zero, which
//! aborts the generation step.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use bitacora::scaffold::{run_post_gen, MakeRunner, TemplateFlags};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let flags = TemplateFlags::from_env();
    run_post_gen(flags, &mut MakeRunner::new())?;
    Ok(())
}
