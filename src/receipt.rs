//! Install receipt generation and metadata.
//!
//! Each successful install writes an `INSTALL_RECEIPT.json` at the prefix
//! root recording what was installed, when, and with which resolved runtime
//! dependencies. A later inspection can answer whether the shebang patch
//! fired and which files the install produced.

use crate::context::FormulaContext;
use crate::formula;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const RECEIPT_FILE: &str = "INSTALL_RECEIPT.json";

/// A runtime dependency resolved to an absolute path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeDependency {
    pub name: String,
    pub path: PathBuf,
}

/// Receipt written beside the installed files
#[derive(Debug, Serialize, Deserialize)]
pub struct InstallReceipt {
    pub formula: String,
    pub version: String,
    pub installer_version: String,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub runtime_dependencies: Vec<RuntimeDependency>,
    pub shebang_patched: bool,
    #[serde(default)]
    pub installed_files: Vec<PathBuf>,
}

impl InstallReceipt {
    /// Create a receipt for a completed install
    pub fn new(ctx: &FormulaContext, installed_files: Vec<PathBuf>, shebang_patched: bool) -> Self {
        Self {
            formula: formula::HANIF.name.to_string(),
            version: formula::HANIF.version.to_string(),
            installer_version: format!("hanif-formula/{}", env!("CARGO_PKG_VERSION")),
            time: Utc::now(),
            runtime_dependencies: vec![
                RuntimeDependency {
                    name: "bash".to_string(),
                    path: ctx.bash.clone(),
                },
                RuntimeDependency {
                    name: "git".to_string(),
                    path: ctx.git.clone(),
                },
            ],
            shebang_patched,
            installed_files,
        }
    }

    /// Read an existing receipt from a prefix
    pub fn read(prefix: &Path) -> Result<Self> {
        let receipt_path = prefix.join(RECEIPT_FILE);
        let contents = fs::read_to_string(&receipt_path)
            .with_context(|| format!("Failed to read receipt: {}", receipt_path.display()))?;
        let receipt: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse receipt: {}", receipt_path.display()))?;
        Ok(receipt)
    }

    /// Write the receipt to `<prefix>/INSTALL_RECEIPT.json`
    pub fn write(&self, prefix: &Path) -> Result<()> {
        let receipt_path = prefix.join(RECEIPT_FILE);
        let json = serde_json::to_string_pretty(self).context("Failed to serialize receipt")?;

        fs::write(&receipt_path, json)
            .with_context(|| format!("Failed to write receipt: {}", receipt_path.display()))?;

        Ok(())
    }
}
