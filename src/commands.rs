//! User-facing command implementations for the orchestrator binary.

use colored::Colorize;
use hanif_formula::error::Result;
use hanif_formula::verify::CheckOutcome;
use hanif_formula::{FormulaContext, Verifier, formula, install};
use std::path::PathBuf;
use std::time::Duration;

pub fn install_cmd(
    source: PathBuf,
    prefix: Option<PathBuf>,
    bash: Option<PathBuf>,
    git: Option<PathBuf>,
) -> Result<()> {
    let ctx = FormulaContext::resolve(source, prefix, bash, git);

    println!(
        "Installing {} {} to {}...",
        formula::HANIF.name.bold(),
        formula::HANIF.version,
        ctx.prefix.display()
    );

    let receipt = install::install(&ctx)?;

    println!(
        "  {} {} files installed",
        "✓".green(),
        receipt.installed_files.len().to_string().bold()
    );
    if receipt.shebang_patched {
        println!("  {} shebang now points at {}", "✓".green(), ctx.bash.display());
    } else {
        println!("  {} shebang left as shipped", "-".yellow());
    }

    println!("\n{}", formula::caveats());
    Ok(())
}

pub fn test_cmd(prefix: Option<PathBuf>, timeout: Option<u64>) -> Result<()> {
    let prefix = prefix.unwrap_or_else(hanif_formula::context::detect_prefix);
    let executable = prefix.join("bin").join(formula::HANIF.name);

    println!("Testing {}...", executable.display().to_string().bold());

    let mut verifier = Verifier::new(&executable);
    if let Some(secs) = timeout {
        verifier = verifier.with_timeout(Duration::from_secs(secs));
    }
    let report = verifier.run()?;

    for result in &report.results {
        match &result.outcome {
            CheckOutcome::Passed => {
                println!("  {} hanif {}", "✓".green(), result.check.arg);
            }
            CheckOutcome::Failed { expected, stdout } => {
                println!(
                    "  {} hanif {}: expected output containing {:?}",
                    "✗".red(),
                    result.check.arg,
                    expected
                );
                let got = stdout.trim();
                if got.is_empty() {
                    println!("    (no output)");
                } else {
                    println!("    got: {}", got);
                }
            }
        }
    }

    match report.error() {
        None => {
            println!("{} All checks passed", "✓".green());
            Ok(())
        }
        Some(err) => Err(err),
    }
}

pub fn caveats_cmd() {
    println!("{}", formula::caveats());
}

pub fn info_cmd() {
    let f = formula::HANIF;
    println!("{} {}", f.name.bold(), f.version);
    println!("{}", f.desc);
    println!("{}: {}", "Homepage".bold(), f.homepage.cyan());
    println!("{}: {}", "License".bold(), f.license);
    println!("{}: {}", "Dependencies".bold(), f.dependencies.join(", "));
}
