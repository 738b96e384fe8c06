//! Post-generation hook - conditional build-target invocation
//!
//! Runs once after a project skeleton is generated. Each enabled flag
//! maps to one idempotent build-automation target, invoked as a blocking
//! child process in fixed order: environment, then git, then data version
//! control (git before DVC, since DVC tooling usually expects a
//! repository). The first failing target aborts the hook; there is no
//! rollback of earlier steps and no retry.
//!
//! Cross-flag preconditions are not validated: skipping git while
//! requesting DVC surfaces only as whatever error the DVC target itself
//! produces.

use std::path::PathBuf;
use std::process::Command;

use tracing::info;

use super::TemplateFlags;
use crate::error::{Error, Result};

/// Build-automation targets the hook can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTarget {
    /// Create the project virtual environment.
    InitVenv,
    /// Initialize a git repository.
    InitGit,
    /// Initialize data version control.
    InitDvc,
}

impl BuildTarget {
    /// Name of the build-automation target.
    #[must_use]
    pub const fn target_name(self) -> &'static str {
        match self {
            Self::InitVenv => "init_venv",
            Self::InitGit => "init_git",
            Self::InitDvc => "init_dvc",
        }
    }
}

/// Seam for invoking build targets; the real implementation shells out.
pub trait TargetRunner {
    /// Invoke one target, blocking until it exits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TargetFailed`] on a non-zero exit status, or an
    /// IO error if the child cannot be spawned.
    fn run(&mut self, target: BuildTarget) -> Result<()>;
}

/// Runner that invokes `make <target>` in the generated project.
#[derive(Debug, Default)]
pub struct MakeRunner {
    workdir: Option<PathBuf>,
}

impl MakeRunner {
    /// Create a runner invoking `make` in the current directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner invoking `make` in the given directory.
    #[must_use]
    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(workdir.into()),
        }
    }
}

impl TargetRunner for MakeRunner {
    fn run(&mut self, target: BuildTarget) -> Result<()> {
        let mut command = Command::new("make");
        command.arg(target.target_name());
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }
        let status = command.status()?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::TargetFailed {
                target: target.target_name(),
                code: status.code(),
            })
        }
    }
}

/// Run the post-generation hook: invoke the target for every enabled
/// flag, in fixed order, aborting on the first failure.
///
/// # Errors
///
/// Propagates the first runner failure; later targets are not invoked.
pub fn run_post_gen(flags: TemplateFlags, runner: &mut dyn TargetRunner) -> Result<()> {
    let steps = [
        (flags.create_venv, BuildTarget::InitVenv),
        (flags.init_git, BuildTarget::InitGit),
        (flags.init_dvc, BuildTarget::InitDvc),
    ];
    for (enabled, target) in steps {
        if !enabled {
            continue;
        }
        info!(target = target.target_name(), "running build target");
        runner.run(target)?;
    }
    Ok(())
}
