//! Installation context - the prefix and resolved runtime dependency paths.

use crate::error::{FormulaError, Result};
use crate::formula;
use std::fs;
use std::path::{Path, PathBuf};

/// Detect the installation prefix on this system
pub fn detect_prefix() -> PathBuf {
    // First check environment variables
    if let Ok(prefix) = std::env::var("HANIF_FORMULA_PREFIX") {
        return PathBuf::from(prefix);
    }
    if let Ok(prefix) = std::env::var("HOMEBREW_PREFIX") {
        return PathBuf::from(prefix);
    }

    // Detect by architecture
    #[cfg(target_arch = "aarch64")]
    {
        PathBuf::from("/opt/homebrew")
    }
    #[cfg(target_arch = "x86_64")]
    {
        PathBuf::from("/usr/local")
    }
    #[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64")))]
    {
        PathBuf::from("/usr/local")
    }
}

/// Default opt path for a runtime dependency: `<prefix>/opt/<dep>/bin/<dep>`
pub fn opt_bin(prefix: &Path, dep: &str) -> PathBuf {
    prefix.join("opt").join(dep).join("bin").join(dep)
}

/// Everything the install and verify operations need from the engine:
/// where the staged tree is, where files go, and which runtimes resolved.
#[derive(Debug, Clone)]
pub struct FormulaContext {
    pub prefix: PathBuf,
    pub source_root: PathBuf,
    pub bash: PathBuf,
    pub git: PathBuf,
}

impl FormulaContext {
    /// Build a context, falling back to the detected prefix and the
    /// per-dependency opt paths for anything not supplied.
    pub fn resolve(
        source_root: PathBuf,
        prefix: Option<PathBuf>,
        bash: Option<PathBuf>,
        git: Option<PathBuf>,
    ) -> Self {
        let prefix = prefix.unwrap_or_else(detect_prefix);
        let bash = bash.unwrap_or_else(|| opt_bin(&prefix, "bash"));
        let git = git.unwrap_or_else(|| opt_bin(&prefix, "git"));
        Self {
            prefix,
            source_root,
            bash,
            git,
        }
    }

    /// Library directory inside the staged source tree
    pub fn lib_source(&self) -> PathBuf {
        self.source_root.join("lib")
    }

    /// Executable file inside the staged source tree
    pub fn executable_source(&self) -> PathBuf {
        self.source_root.join("bin").join(formula::HANIF.name)
    }

    /// Private library target: `<prefix>/libexec/lib`
    pub fn libexec_lib(&self) -> PathBuf {
        self.prefix.join("libexec").join("lib")
    }

    /// Public executable target: `<prefix>/bin/hanif`
    pub fn installed_executable(&self) -> PathBuf {
        self.prefix.join("bin").join(formula::HANIF.name)
    }

    /// The bash runtime must exist and be executable before any write
    pub fn ensure_bash(&self) -> Result<()> {
        let meta = fs::metadata(&self.bash).map_err(|_| {
            FormulaError::SourceMissing(format!("bash runtime at {}", self.bash.display()))
        })?;

        if !meta.is_file() {
            return Err(FormulaError::SourceMissing(format!(
                "bash runtime at {} (not a file)",
                self.bash.display()
            )));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if meta.permissions().mode() & 0o111 == 0 {
                return Err(FormulaError::SourceMissing(format!(
                    "bash runtime at {} (not executable)",
                    self.bash.display()
                )));
            }
        }

        Ok(())
    }
}
