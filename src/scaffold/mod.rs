//! Project Scaffolding - the post-generation hook
//!
//! Runs at template-generation time, not training time: reads the three
//! rendered template flags and conditionally invokes the matching
//! build-automation targets, fail-fast. See the `post-gen` binary for the
//! executable entry point.

mod flags;
mod hook;

pub use flags::{TemplateFlags, CREATE_VENV_VAR, INIT_DVC_VAR, INIT_GIT_VAR, YES_TOKEN};
pub use hook::{run_post_gen, BuildTarget, MakeRunner, TargetRunner};
