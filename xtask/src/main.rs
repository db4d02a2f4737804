//! Development automation tasks for the callhop workspace.
//!
//! Run with: `cargo run -p xtask -- <command>`
//!
//! Output is for a developer at a terminal, so it is printed directly.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::{Command, ExitCode};

use anyhow::{bail, Context};

/// Crates whose tests `test` runs one at a time, so failures name the crate.
const CRATES: [&str; 3] = ["callhop-domain", "callhop-core", "callhop-infra"];

fn main() -> ExitCode {
    let task = env::args().nth(1);

    let result = match task.as_deref() {
        Some("ci") => run_ci(),
        Some("fmt") => run_fmt(),
        Some("clippy") => run_clippy(),
        Some("test") => run_test(),
        Some("doc") => run_doc(),
        Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown task: {unknown}");
            eprintln!();
            print_help();
            Err(anyhow::anyhow!("Unknown task"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Task failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("callhop development tasks");
    println!();
    println!("USAGE:");
    println!("    cargo run -p xtask -- <TASK>");
    println!();
    println!("TASKS:");
    println!("    ci        Run fmt, clippy, test and doc in sequence");
    println!("    fmt       Check Rust code formatting");
    println!("    clippy    Run Clippy lints on all targets");
    println!("    test      Run each crate's tests");
    println!("    doc       Build docs with warnings denied");
    println!("    help      Show this help message");
}

fn run_ci() -> anyhow::Result<()> {
    let steps: [(&str, fn() -> anyhow::Result<()>); 4] = [
        ("Checking format", run_fmt),
        ("Running Clippy", run_clippy),
        ("Running tests", run_test),
        ("Building docs", run_doc),
    ];

    for (index, (label, step)) in steps.iter().enumerate() {
        println!("==> Step {}/{}: {label}...", index + 1, steps.len());
        step()?;
    }

    println!("\nAll CI checks passed");
    Ok(())
}

fn run_fmt() -> anyhow::Result<()> {
    cargo(&["fmt", "--all", "--", "--check"])
        .context("format check failed; run 'cargo fmt --all' to fix")
}

fn run_clippy() -> anyhow::Result<()> {
    cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
}

fn run_test() -> anyhow::Result<()> {
    for name in CRATES {
        println!("--> {name}");
        cargo(&["test", "-p", name]).with_context(|| format!("tests failed in {name}"))?;
    }
    Ok(())
}

fn run_doc() -> anyhow::Result<()> {
    let status = Command::new("cargo")
        .args(["doc", "--workspace", "--no-deps"])
        .env("RUSTDOCFLAGS", "-D warnings")
        .status()
        .context("failed to spawn cargo")?;

    if !status.success() {
        bail!("cargo doc failed");
    }
    Ok(())
}

fn cargo(args: &[&str]) -> anyhow::Result<()> {
    let status = Command::new("cargo").args(args).status().context("failed to spawn cargo")?;

    if !status.success() {
        bail!("`cargo {}` exited with {status}", args.join(" "));
    }
    Ok(())
}
