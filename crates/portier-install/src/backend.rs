//! Installer backend definitions
//!
//! A closed enum over the package managers Portier knows how to drive.
//! Adding a backend means adding a variant and extending the mapping
//! functions here; dispatch stays compile-time-checked instead of growing
//! runtime string branches.

/// Supported installer backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Python packages via pip
    Pip,
    /// Node packages via npm (global install)
    Npm,
}

impl Backend {
    /// Total mapping from an ecosystem tag to a backend; unknown tags map
    /// to `None` and are rejected before any subprocess is spawned.
    pub fn for_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "pip" | "pypi" => Some(Backend::Pip),
            "npm" => Some(Backend::Npm),
            _ => None,
        }
    }

    /// Canonical tag recorded in install results and audit records
    pub fn tag(&self) -> &'static str {
        match self {
            Backend::Pip => "pip",
            Backend::Npm => "npm",
        }
    }

    /// Program invoked for this backend
    pub fn program(&self) -> &'static str {
        match self {
            // `python3 -m pip` rather than a bare `pip` so the install
            // lands in the interpreter actually on PATH
            Backend::Pip => "python3",
            Backend::Npm => "npm",
        }
    }

    /// Arguments for installing a distribution target
    pub fn install_args(&self, target: &str) -> Vec<String> {
        match self {
            Backend::Pip => vec![
                "-m".to_string(),
                "pip".to_string(),
                "install".to_string(),
                "--quiet".to_string(),
                target.to_string(),
            ],
            Backend::Npm => vec![
                "install".to_string(),
                "--global".to_string(),
                target.to_string(),
            ],
        }
    }

    /// All supported backends
    pub fn all() -> &'static [Backend] {
        &[Backend::Pip, Backend::Npm]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_tag_known() {
        assert_eq!(Backend::for_tag("pip"), Some(Backend::Pip));
        assert_eq!(Backend::for_tag("pypi"), Some(Backend::Pip));
        assert_eq!(Backend::for_tag("npm"), Some(Backend::Npm));
    }

    #[test]
    fn test_for_tag_is_case_insensitive() {
        assert_eq!(Backend::for_tag("NPM"), Some(Backend::Npm));
    }

    #[test]
    fn test_for_tag_unknown() {
        assert_eq!(Backend::for_tag("cargo"), None);
        assert_eq!(Backend::for_tag(""), None);
    }

    #[test]
    fn test_pip_install_args() {
        let args = Backend::Pip.install_args("mcp-server-rabel");
        assert_eq!(args, vec!["-m", "pip", "install", "--quiet", "mcp-server-rabel"]);
    }

    #[test]
    fn test_npm_install_args() {
        let args = Backend::Npm.install_args("@hookline/cli");
        assert_eq!(args, vec!["install", "--global", "@hookline/cli"]);
    }

    #[test]
    fn test_tags_round_trip() {
        for backend in Backend::all() {
            assert_eq!(Backend::for_tag(backend.tag()), Some(*backend));
        }
    }
}
