// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use std::io::{self, Write};
use std::process;

use guardstack::testing::filled_stack;
use guardstack::{default_hash, GuardedStack, StackConfig};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{Cli, Commands, InjectTarget};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let result = match cli.command {
        Commands::Demo { json } => run_demo(json),
        Commands::Inject { target, size, json } => run_inject(target, size as usize, json),
        Commands::Stress {
            count,
            release_mode,
        } => run_stress(count, release_mode),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_demo(json: bool) -> io::Result<()> {
    let mut stack = filled_stack(5, "aac".to_string());
    stack.pop();
    stack.push("aap".to_string());

    let mut out = io::stdout().lock();
    if json {
        writeln!(out, "{}", stack.snapshot().to_json()?)
    } else {
        stack.dump_to(&mut out, "demo")
    }
}

fn run_inject(target: InjectTarget, size: usize, json: bool) -> io::Result<()> {
    let mut stack = filled_stack(size, "a".to_string());
    let victim = size / 3;

    {
        let mut tamper = stack.tamper();
        match target {
            InjectTarget::Leading => tamper.set_leading_sentinel(0),
            InjectTarget::Trailing => tamper.poke_trailing_byte(1, 0),
            InjectTarget::Element => tamper.zero_slot(victim).zero_slot(victim + 1),
            InjectTarget::Shadow => tamper.set_shadow_size(size + 1),
            InjectTarget::Checksum => tamper.set_checksum(0),
        };
    }

    let mut out = io::stdout().lock();
    if json {
        writeln!(out, "{}", stack.snapshot().to_json()?)?;
    }
    writeln!(out, "Corrupted {:?}; pushing \"hash_sum\"", target)?;
    out.flush()?;
    drop(out);

    stack.push("hash_sum".to_string());

    Err(io::Error::new(
        io::ErrorKind::Other,
        format!("{:?} corruption was not detected", target),
    ))
}

fn run_stress(count: usize, release_mode: bool) -> io::Result<()> {
    let config = if release_mode {
        StackConfig::release()
    } else {
        StackConfig::diagnostic()
    };
    let mut stack = GuardedStack::with_config(config, default_hash::<String>);

    for _ in 0..count {
        stack.push("a".to_string());
    }
    if count > 0 && stack.top() != "a" {
        return Err(io::Error::new(io::ErrorKind::Other, "top() is not \"a\""));
    }
    let capacity = stack.capacity();
    for _ in 0..count {
        stack.pop();
    }

    println!(
        "pushed and popped {} elements: size {}, capacity {}, ok {}",
        count,
        stack.len(),
        capacity,
        stack.ok()
    );
    tracing::info!(count, capacity, release_mode, "stress run finished");
    Ok(())
}
