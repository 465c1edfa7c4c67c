//! Build identity: package version plus the git state vergen recorded.
//!
//! [`BuildInfo::current`] is what the binary logs at startup; the
//! `User-Agent` sent upstream only carries the package version.

use std::fmt;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Product token sent in the `User-Agent` header.
pub const AGENT_NAME: &str = "MembitContextAgent";

const SHORT_SHA_LEN: usize = 7;

/// Version and git metadata of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    /// `None` when built outside a git checkout.
    pub branch: Option<&'static str>,
    pub sha: Option<&'static str>,
    pub dirty: bool,
}

impl BuildInfo {
    /// Metadata of the running binary.
    pub fn current() -> Self {
        Self {
            version: PKG_VERSION,
            branch: option_env!("VERGEN_GIT_BRANCH"),
            sha: option_env!("VERGEN_GIT_SHA"),
            dirty: option_env!("VERGEN_GIT_DIRTY") == Some("true"),
        }
    }

    /// Commit hash cut to seven characters.
    pub fn short_sha(&self) -> Option<&'static str> {
        self.sha.map(|sha| sha.get(..SHORT_SHA_LEN).unwrap_or(sha))
    }

    pub fn user_agent(&self) -> String {
        format!("{AGENT_NAME}/{}", self.version)
    }
}

/// `{version}+{branch}.{sha}[.dirty]`, or the bare version without git data.
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.version)?;
        if self.branch.is_none() && self.sha.is_none() {
            return Ok(());
        }
        write!(
            f,
            "+{}.{}",
            self.branch.unwrap_or("unknown"),
            self.short_sha().unwrap_or("unknown")
        )?;
        if self.dirty {
            f.write_str(".dirty")?;
        }
        Ok(())
    }
}

/// `User-Agent` sent with every upstream request.
pub fn user_agent() -> String {
    BuildInfo::current().user_agent()
}
