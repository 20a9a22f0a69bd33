//! Custom cargo commands for guardstack.
//!
//!   cargo xtask verify            markers, tests, clippy, kani constants
//!   cargo xtask test              debug suite, then integration in release
//!   cargo xtask check             check + clippy, no tests
//!   cargo xtask bench             criterion benches
//!   cargo xtask kani              proofs in kani-proofs/ (needs cargo-kani)
//!   cargo xtask fuzz [target] [s] one fuzz target for a while (needs cargo-fuzz)

use anyhow::{bail, ensure, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Constants that must agree between the crate and the Kani proofs.
const SHARED_CONSTANTS: &[&str] = &["HASH_MUL", "HASH_MOD"];

/// Fewest `INVARIANT:` comments `src/` may carry.
const MIN_INVARIANT_MARKERS: usize = 5;

fn main() -> Result<()> {
    let root = workspace_root();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let arg = |i: usize| args.get(i).map(String::as_str);

    match arg(0) {
        Some("verify") => {
            count_invariant_markers(&root)?;
            cargo(&root, &["test", "--quiet"])?;
            cargo(&root, &["clippy", "--quiet", "--", "-D", "warnings"])?;
            check_kani_constants(&root)?;
            println!("verify: all checks passed");
        }
        Some("test") => {
            cargo(&root, &["test"])?;
            cargo(&root, &["test", "--release", "--test", "integration"])?;
        }
        Some("check") => {
            cargo(&root, &["check", "--all-targets"])?;
            cargo(&root, &["clippy", "--quiet", "--", "-D", "warnings"])?;
        }
        Some("bench") => cargo(&root, &["bench"])?,
        Some("kani") => cargo(&root.join("kani-proofs"), &["kani"])?,
        Some("fuzz") => {
            let target = arg(1).unwrap_or("op_sequence");
            let seconds: u64 = arg(2)
                .map(str::parse::<u64>)
                .transpose()
                .context("fuzz duration must be a number of seconds")?
                .unwrap_or(60);
            let max_time = format!("-max_total_time={}", seconds);
            cargo(&root, &["+nightly", "fuzz", "run", target, "--", &max_time])?;
        }
        _ => eprintln!("usage: cargo xtask <verify|test|check|bench|kani|fuzz [target] [seconds]>"),
    }
    Ok(())
}

/// xtask lives one level below the workspace root.
fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn cargo(dir: &Path, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .current_dir(dir)
        .status()
        .with_context(|| format!("could not start cargo in {}", dir.display()))?;
    ensure!(status.success(), "cargo {} failed", args.join(" "));
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))
}

/// Walk `src/` and count `INVARIANT:` comments, so they can't quietly vanish.
fn count_invariant_markers(root: &Path) -> Result<()> {
    fn walk(dir: &Path, count: &mut usize) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                walk(&path, count)?;
            } else if path.extension().is_some_and(|e| e == "rs") {
                *count += read(&path)?.matches("INVARIANT:").count();
            }
        }
        Ok(())
    }

    let mut count = 0;
    walk(&root.join("src"), &mut count)?;
    ensure!(
        count >= MIN_INVARIANT_MARKERS,
        "found {} INVARIANT markers in src/, expected at least {}",
        count,
        MIN_INVARIANT_MARKERS
    );
    println!("==> {} invariant markers", count);
    Ok(())
}

/// The proofs copy the checksum constants; make sure the copies agree.
fn check_kani_constants(root: &Path) -> Result<()> {
    let ours = read(&root.join("src/verify/checksum.rs"))?;
    let proofs = read(&root.join("kani-proofs/src/lib.rs"))?;

    for name in SHARED_CONSTANTS {
        let (Some(a), Some(b)) = (const_value(&ours, name), const_value(&proofs, name)) else {
            bail!("{} missing from src/verify/checksum.rs or kani-proofs/src/lib.rs", name);
        };
        ensure!(a == b, "{}: crate has {} but kani-proofs has {}", name, a, b);
        println!("==> {} = {}", name, a);
    }
    Ok(())
}

/// Value of `pub const NAME: u64 = 1_000;`, underscores stripped.
fn const_value(source: &str, name: &str) -> Option<u64> {
    let prefix = format!("pub const {}:", name);
    source.lines().find_map(|line| {
        let rest = line.trim().strip_prefix(&prefix)?;
        let value = rest.split('=').nth(1)?.trim().trim_end_matches(';');
        value.replace('_', "").parse().ok()
    })
}
