//! Template flags - booleans resolved at project-generation time
//!
//! The templating engine substitutes literal tokens into the generated
//! project; a flag is on exactly when its token equals `"Yes"`. Any other
//! string, including different casing, means off.

use std::env;

/// Token that switches a template flag on.
pub const YES_TOKEN: &str = "Yes";

/// Environment variable carrying the environment-creation flag.
pub const CREATE_VENV_VAR: &str = "SCAFFOLD_CREATE_VENV";
/// Environment variable carrying the git-initialization flag.
pub const INIT_GIT_VAR: &str = "SCAFFOLD_INIT_GIT";
/// Environment variable carrying the data-version-control flag.
pub const INIT_DVC_VAR: &str = "SCAFFOLD_INIT_DVC";

/// The three independent post-generation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemplateFlags {
    /// Create the project virtual environment.
    pub create_venv: bool,
    /// Initialize a git repository.
    pub init_git: bool,
    /// Initialize data version control.
    pub init_dvc: bool,
}

impl TemplateFlags {
    /// Resolve flags from template-substituted tokens.
    ///
    /// Each token is compared for equality against [`YES_TOKEN`].
    #[must_use]
    pub fn from_tokens(create_venv: &str, init_git: &str, init_dvc: &str) -> Self {
        Self {
            create_venv: create_venv == YES_TOKEN,
            init_git: init_git == YES_TOKEN,
            init_dvc: init_dvc == YES_TOKEN,
        }
    }

    /// Resolve flags from the rendered hook environment.
    ///
    /// Missing variables read as off.
    #[must_use]
    pub fn from_env() -> Self {
        let token = |var| env::var(var).unwrap_or_default();
        Self::from_tokens(
            &token(CREATE_VENV_VAR),
            &token(INIT_GIT_VAR),
            &token(INIT_DVC_VAR),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_token_switches_on() {
        let flags = TemplateFlags::from_tokens("Yes", "Yes", "Yes");
        assert!(flags.create_venv && flags.init_git && flags.init_dvc);
    }

    #[test]
    fn test_anything_else_is_off() {
        let flags = TemplateFlags::from_tokens("No", "yes", "");
        assert!(!flags.create_venv);
        assert!(!flags.init_git);
        assert!(!flags.init_dvc);
    }

    #[test]
    fn test_flags_are_independent() {
        let flags = TemplateFlags::from_tokens("No", "Yes", "No");
        assert!(!flags.create_venv);
        assert!(flags.init_git);
        assert!(!flags.init_dvc);
    }
}
