//! Installing the staged hanif tree into the prefix.
//!
//! The staged source tree (unpacked by the fetch step, out of scope here)
//! contains a `lib/` directory and a `bin/hanif` script:
//! ```text
//! Input:  <staged>/lib/**        <staged>/bin/hanif
//! Output: <prefix>/libexec/lib/**  <prefix>/bin/hanif (shebang patched)
//! ```
//!
//! The library copy is verbatim and recursive; the executable is copied with
//! mode 0755 and then, strictly after it is in place, its interpreter
//! directive is rewritten to the resolved bash runtime. A failure partway
//! through the copy leaves already-copied files behind; no rollback is
//! attempted.

use crate::context::FormulaContext;
use crate::error::{FormulaError, Result};
use crate::receipt::InstallReceipt;
use crate::shebang;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Install the staged tree into the prefix and write the receipt.
///
/// Fails with `SourceMissing` before any write if the staged tree lacks
/// `lib/` or `bin/hanif`, or if the bash runtime is absent. Filesystem
/// errors under the prefix surface as `WriteFailure`.
pub fn install(ctx: &FormulaContext) -> Result<InstallReceipt> {
    // Validate everything before touching the prefix
    let lib_source = ctx.lib_source();
    if !lib_source.is_dir() {
        return Err(FormulaError::SourceMissing(format!(
            "library directory at {}",
            lib_source.display()
        )));
    }

    let exe_source = ctx.executable_source();
    if !exe_source.is_file() {
        return Err(FormulaError::SourceMissing(format!(
            "executable at {}",
            exe_source.display()
        )));
    }

    ctx.ensure_bash()?;

    // Install library files
    let mut installed = copy_tree(&lib_source, &ctx.libexec_lib())?;

    // Install bin files
    let exe_target = ctx.installed_executable();
    install_executable(&exe_source, &exe_target)?;
    installed.push(exe_target.clone());

    // Fix shebang to use the resolved bash; only valid once the file is in place
    let patched = shebang::patch_shebang(&exe_target, &ctx.bash)?;

    let receipt = InstallReceipt::new(ctx, installed, patched);
    receipt.write(&ctx.prefix)?;

    Ok(receipt)
}

/// Recursively copy a directory, preserving relative structure.
/// Returns the target paths of every copied file.
fn copy_tree(source: &Path, target: &Path) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::new();

    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| anyhow::anyhow!("Path outside source tree: {}", e))?;
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| FormulaError::WriteFailure {
                path: dest.clone(),
                source: e,
            })?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &dest).map_err(|e| FormulaError::WriteFailure {
                path: dest.clone(),
                source: e,
            })?;
            copied.push(dest);
        }
    }

    Ok(copied)
}

/// Place the executable at its target path with mode 0755
fn install_executable(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| FormulaError::WriteFailure {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::copy(source, target).map_err(|e| FormulaError::WriteFailure {
        path: target.to_path_buf(),
        source: e,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(target, fs::Permissions::from_mode(0o755)).map_err(|e| {
            FormulaError::WriteFailure {
                path: target.to_path_buf(),
                source: e,
            }
        })?;
    }

    Ok(())
}
