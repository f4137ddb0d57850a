//! Post-install smoke checks for the installed executable.
//!
//! Runs `hanif version` and `hanif help` against the installed binary and
//! asserts each output contains its expected marker. Assertion failures
//! accumulate so a broken install reports its full failure surface in one
//! pass; only launch failures and deadline overruns abort early.

use crate::error::{FormulaError, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// One smoke check: an argument to pass and a substring stdout must contain
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub name: &'static str,
    pub arg: &'static str,
    pub expect: &'static str,
}

/// The formula's post-install contract
pub const CHECKS: &[Check] = &[
    Check {
        name: "version",
        arg: "version",
        expect: "hanif CLI v",
    },
    Check {
        name: "help",
        arg: "help",
        expect: "Usage: hanif",
    },
];

#[derive(Debug)]
pub enum CheckOutcome {
    Passed,
    Failed { expected: &'static str, stdout: String },
}

#[derive(Debug)]
pub struct CheckResult {
    pub check: Check,
    pub outcome: CheckOutcome,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Passed)
    }
}

/// Accumulated results of all checks
#[derive(Debug, Default)]
pub struct VerifyReport {
    pub results: Vec<CheckResult>,
}

impl VerifyReport {
    pub fn ok(&self) -> bool {
        self.results.iter().all(CheckResult::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    /// The engine-facing error for a failed report, naming every failed check
    pub fn error(&self) -> Option<FormulaError> {
        let failed: Vec<&str> = self.failures().map(|r| r.check.name).collect();
        if failed.is_empty() {
            None
        } else {
            Some(FormulaError::AssertionFailed(failed.join(", ")))
        }
    }
}

/// Runs the installed executable and evaluates the smoke checks
pub struct Verifier {
    executable: PathBuf,
    timeout: Option<Duration>,
}

impl Verifier {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: None,
        }
    }

    /// Per-check deadline; a child exceeding it is killed and the run
    /// surfaces `Cancelled` instead of hanging
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run every check and accumulate the outcomes
    pub fn run(&self) -> Result<VerifyReport> {
        let mut report = VerifyReport::default();

        for check in CHECKS {
            let stdout = self.capture(check)?;
            let outcome = if stdout.contains(check.expect) {
                CheckOutcome::Passed
            } else {
                CheckOutcome::Failed {
                    expected: check.expect,
                    stdout,
                }
            };
            report.results.push(CheckResult {
                check: *check,
                outcome,
            });
        }

        Ok(report)
    }

    /// Spawn `<executable> <arg>` and capture its stdout
    fn capture(&self, check: &Check) -> Result<String> {
        let mut child = Command::new(&self.executable)
            .arg(check.arg)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                FormulaError::ExecutionFailed(self.executable.display().to_string(), e)
            })?;

        if let Some(limit) = self.timeout {
            let deadline = Instant::now() + limit;
            loop {
                let status = child.try_wait().map_err(|e| {
                    FormulaError::ExecutionFailed(self.executable.display().to_string(), e)
                })?;
                match status {
                    Some(_) => break,
                    None if Instant::now() >= deadline => {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(FormulaError::Cancelled(check.name.to_string()));
                    }
                    None => std::thread::sleep(Duration::from_millis(25)),
                }
            }
        }

        let output = child.wait_with_output().map_err(|e| {
            FormulaError::ExecutionFailed(self.executable.display().to_string(), e)
        })?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
