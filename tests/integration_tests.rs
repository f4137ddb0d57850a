// End-to-end install + verify flow against an isolated prefix.
// Uses /bin/sh as the resolved runtime so the patched script stays runnable.

use hanif_formula::error::FormulaError;
use hanif_formula::{FormulaContext, InstallReceipt, Verifier, install};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HANIF_SCRIPT: &str = r#"#!/usr/bin/env bash
case "$1" in
  version) echo "hanif CLI v1.0.0" ;;
  help) echo "Usage: hanif [command]" ;;
  *) echo "unknown command" ;;
esac
"#;

/// Isolated staged tree + prefix, cleaned up on drop
struct TestEnvironment {
    _temp: TempDir,
    staged: PathBuf,
    prefix: PathBuf,
}

impl TestEnvironment {
    fn new(script: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let staged = temp.path().join("staged");
        let prefix = temp.path().join("prefix");

        fs::create_dir_all(staged.join("lib/git")).unwrap();
        fs::write(staged.join("lib/common.sh"), "say() { echo \"$1\"; }\n").unwrap();
        fs::write(staged.join("lib/git/nf.sh"), "nf() { :; }\n").unwrap();
        fs::create_dir_all(staged.join("bin")).unwrap();
        fs::write(staged.join("bin/hanif"), script).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(
                staged.join("bin/hanif"),
                fs::Permissions::from_mode(0o755),
            )
            .unwrap();
        }

        Self {
            _temp: temp,
            staged,
            prefix,
        }
    }

    fn context(&self) -> FormulaContext {
        FormulaContext::resolve(
            self.staged.clone(),
            Some(self.prefix.clone()),
            Some(PathBuf::from("/bin/sh")),
            None,
        )
    }
}

#[test]
fn install_then_verify_passes() {
    let env = TestEnvironment::new(HANIF_SCRIPT);
    let ctx = env.context();

    let receipt = install::install(&ctx).unwrap();
    assert!(receipt.shebang_patched);

    let exe = ctx.installed_executable();
    let first_line = fs::read_to_string(&exe)
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string();
    assert_eq!(first_line, "#!/bin/sh");

    let report = Verifier::new(&exe).run().unwrap();
    assert!(report.ok(), "expected both checks to pass: {:?}", report);
}

#[test]
fn install_produces_expected_layout() {
    let env = TestEnvironment::new(HANIF_SCRIPT);
    let ctx = env.context();
    install::install(&ctx).unwrap();

    assert!(env.prefix.join("bin/hanif").is_file());
    assert!(env.prefix.join("libexec/lib/common.sh").is_file());
    assert!(env.prefix.join("libexec/lib/git/nf.sh").is_file());

    // Library copy is byte-identical with relative paths preserved
    assert_eq!(
        fs::read(env.staged.join("lib/git/nf.sh")).unwrap(),
        fs::read(env.prefix.join("libexec/lib/git/nf.sh")).unwrap()
    );

    let receipt = InstallReceipt::read(&env.prefix).unwrap();
    assert_eq!(receipt.formula, "hanif");
    let bash_dep = receipt
        .runtime_dependencies
        .iter()
        .find(|d| d.name == "bash")
        .unwrap();
    assert_eq!(bash_dep.path, Path::new("/bin/sh"));
}

#[test]
fn broken_version_output_fails_only_that_check() {
    let broken = r#"#!/usr/bin/env bash
case "$1" in
  version) echo "unknown tool" ;;
  help) echo "Usage: hanif [command]" ;;
esac
"#;
    let env = TestEnvironment::new(broken);
    let ctx = env.context();
    install::install(&ctx).unwrap();

    let report = Verifier::new(ctx.installed_executable()).run().unwrap();
    assert!(!report.ok());

    let failed: Vec<&str> = report.failures().map(|r| r.check.name).collect();
    assert_eq!(failed, vec!["version"]);
    assert!(matches!(
        report.error(),
        Some(FormulaError::AssertionFailed(_))
    ));
}

#[test]
fn verify_without_install_is_execution_failure() {
    let env = TestEnvironment::new(HANIF_SCRIPT);
    let ctx = env.context();

    let err = Verifier::new(ctx.installed_executable()).run().unwrap_err();
    assert!(matches!(err, FormulaError::ExecutionFailed(_, _)));
}
