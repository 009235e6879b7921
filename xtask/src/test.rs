use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running test suite...".cyan().bold());
    println!();

    let total_start = Instant::now();
    let run_all = !unit_only && !integration_only;

    // Unit tests across the workspace libraries
    if run_all || unit_only {
        println!("{}", "  Running unit tests...".cyan());
        let unit_start = Instant::now();

        let unit_output = Command::new("cargo")
            .args(["test", "--workspace", "--lib"])
            .output()
            .context("Failed to run unit tests")?;

        if !unit_output.status.success() {
            eprintln!("{}", "  ✗ Unit tests failed".red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&unit_output.stdout));
            eprintln!("{}", String::from_utf8_lossy(&unit_output.stderr));
            anyhow::bail!("Unit tests failed");
        }

        let summary = extract_test_summary(&unit_output.stdout);
        println!(
            "{}",
            format!(
                "  ✓ Unit tests passed in {:.2}s {}",
                unit_start.elapsed().as_secs_f64(),
                summary
            )
            .green()
        );
        println!();
    }

    // Wake-cycle integration tests against the mock hardware
    if run_all || integration_only {
        println!("{}", "  Running cycle integration tests...".cyan());
        let integration_start = Instant::now();

        let integration_output = Command::new("cargo")
            .args(["test", "-p", "firmware", "--test", "cycle"])
            .output()
            .context("Failed to run integration tests")?;

        if !integration_output.status.success() {
            eprintln!("{}", "  ✗ Integration tests failed".red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&integration_output.stdout));
            eprintln!("{}", String::from_utf8_lossy(&integration_output.stderr));
            anyhow::bail!("Integration tests failed");
        }

        let summary = extract_test_summary(&integration_output.stdout);
        println!(
            "{}",
            format!(
                "  ✓ Integration tests passed in {:.2}s {}",
                integration_start.elapsed().as_secs_f64(),
                summary
            )
            .green()
        );
        println!();
    }

    // Doc tests (non-fatal, informational)
    if run_all {
        println!("{}", "  Running doc tests...".cyan());

        let doc_output = Command::new("cargo")
            .args(["test", "--workspace", "--doc"])
            .output()
            .context("Failed to run doc tests")?;

        if doc_output.status.success() {
            println!("{}", "  ✓ Doc tests passed".green());
        } else {
            eprintln!("{}", "  ⚠ Doc tests had issues".yellow());
        }
        println!();
    }

    println!(
        "{}",
        format!(
            "✓ All tests completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

/// Pulls the "N passed; M failed" summary out of cargo test output.
fn extract_test_summary(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    for line in text.lines() {
        if let Some(summary) = line.split("test result:").nth(1) {
            return format!("({})", summary.trim());
        }
    }
    String::new()
}
