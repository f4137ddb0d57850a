//! Interpreter-line patching for installed scripts.
//!
//! The staged executable ships with an ambient `#!/usr/bin/env bash`
//! directive. After install it must point at the formula-resolved bash so the
//! script runs with the packaged runtime rather than whatever `PATH` finds.

use crate::error::{FormulaError, Result};
use std::fs;
use std::path::Path;

/// The only first line that triggers a rewrite.
const AMBIENT_DIRECTIVE: &str = "#!/usr/bin/env bash";

/// Replace an ambient bash interpreter directive with an absolute runtime path.
///
/// Returns the (possibly rewritten) content and whether the directive matched.
/// Only an exact `#!/usr/bin/env bash` first line is rewritten; any other
/// first line is returned untouched. Idempotent: a rewritten file no longer
/// matches, so a second pass is a no-op.
pub fn rewrite_interpreter(content: &str, runtime: &Path) -> (String, bool) {
    let line_end = content.find('\n').unwrap_or(content.len());
    if &content[..line_end] != AMBIENT_DIRECTIVE {
        return (content.to_string(), false);
    }

    let mut rewritten = format!("#!{}", runtime.display());
    rewritten.push_str(&content[line_end..]);
    (rewritten, true)
}

/// Apply the interpreter rewrite to an installed file, preserving its
/// permission bits. A non-matching directive is not an error: the file stays
/// as installed and the miss is logged.
pub fn patch_shebang(path: &Path, runtime: &Path) -> Result<bool> {
    let content = fs::read_to_string(path)?;
    let (rewritten, matched) = rewrite_interpreter(&content, runtime);

    if !matched {
        tracing::warn!(
            "Interpreter directive in {} does not match `{}`, leaving file unmodified",
            path.display(),
            AMBIENT_DIRECTIVE
        );
        return Ok(false);
    }

    let permissions = fs::metadata(path)?.permissions();
    fs::write(path, rewritten).map_err(|e| FormulaError::WriteFailure {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::set_permissions(path, permissions)?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const RUNTIME: &str = "/opt/homebrew/opt/bash/bin/bash";

    #[test]
    fn test_rewrite_ambient_bash() {
        let script = "#!/usr/bin/env bash\necho hello\n";
        let (out, matched) = rewrite_interpreter(script, Path::new(RUNTIME));
        assert!(matched);
        assert_eq!(out, "#!/opt/homebrew/opt/bash/bin/bash\necho hello\n");
    }

    #[test]
    fn test_other_interpreters_untouched() {
        let script = "#!/usr/bin/env python3\nprint('hi')\n";
        let (out, matched) = rewrite_interpreter(script, Path::new(RUNTIME));
        assert!(!matched);
        assert_eq!(out, script);
    }

    #[test]
    fn test_directive_not_on_first_line_untouched() {
        let script = "echo hello\n#!/usr/bin/env bash\n";
        let (out, matched) = rewrite_interpreter(script, Path::new(RUNTIME));
        assert!(!matched);
        assert_eq!(out, script);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let script = "#!/usr/bin/env bash\necho hello\n";
        let (once, matched_once) = rewrite_interpreter(script, Path::new(RUNTIME));
        let (twice, matched_twice) = rewrite_interpreter(&once, Path::new(RUNTIME));
        assert!(matched_once);
        assert!(!matched_twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_single_line_script() {
        let (out, matched) = rewrite_interpreter("#!/usr/bin/env bash", Path::new(RUNTIME));
        assert!(matched);
        assert_eq!(out, "#!/opt/homebrew/opt/bash/bin/bash");
    }

    #[test]
    fn test_partial_directive_is_not_a_match() {
        // A longer line that merely starts with the ambient directive
        let script = "#!/usr/bin/env bash -e\necho hello\n";
        let (out, matched) = rewrite_interpreter(script, Path::new(RUNTIME));
        assert!(!matched);
        assert_eq!(out, script);
    }

    #[cfg(unix)]
    #[test]
    fn test_patch_preserves_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hanif");
        fs::write(&path, "#!/usr/bin/env bash\necho hello\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        let matched = patch_shebang(&path, Path::new(RUNTIME)).unwrap();
        assert!(matched);

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("#!/opt/homebrew/opt/bash/bin/bash\n"));
    }

    #[test]
    fn test_patch_miss_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hanif");
        fs::write(&path, "#!/usr/bin/env python3\nprint('hi')\n").unwrap();

        let matched = patch_shebang(&path, &PathBuf::from(RUNTIME)).unwrap();
        assert!(!matched);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "#!/usr/bin/env python3\nprint('hi')\n"
        );
    }
}
