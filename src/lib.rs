//! Library interface for the hanif formula installer.
//!
//! This library exposes the install and verify operations for testing and
//! for embedding in a larger orchestrator.

pub mod context;
pub mod error;
pub mod formula;
pub mod install;
pub mod receipt;
pub mod shebang;
pub mod verify;

// Re-export commonly used items
pub use context::FormulaContext;
pub use error::{FormulaError, Result};
pub use install::install;
pub use receipt::InstallReceipt;
pub use verify::{Verifier, VerifyReport};
