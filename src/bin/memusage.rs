//! memusage - shows how much memory a few allocations cost this process.
//!
//! Runs three measurements and prints a report table for each:
//! - a scope around a large allocation
//! - a wrapped function that allocates and returns an array
//! - explicit checkpoints around a large allocation, then a smaller one
//!   after the first is freed
//!
//! Usage:
//!   memusage                   # 200000-element allocations
//!   memusage -e 5000000        # larger allocations
//!   memusage --no-purge -vv    # keep freed pages in jemalloc, trace logging

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::hint::black_box;
use std::process::ExitCode;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

use memusage::{Field, MemoryUsage, Scope, UsageError, measured};

/// Measure the memory cost of allocations in this process.
#[derive(Parser)]
#[command(name = "memusage", about = "Process memory usage demo", version)]
struct Args {
    /// Number of u64 elements in each large allocation.
    #[arg(short, long, default_value = "200000")]
    elements: usize,

    /// Number of u64 elements in the allocation made after the first is freed.
    #[arg(long, default_value = "50000")]
    smaller: usize,

    /// Keep freed memory in the allocator instead of returning it to the OS.
    #[arg(long)]
    no_purge: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Returns unused jemalloc pages to the OS so freed blocks show up as a
/// drop in resident set size.
#[cfg(not(target_env = "msvc"))]
fn release_memory_to_os() {
    // SAFETY: mallctl with a valid NUL-terminated name and no in/out values.
    // Arena index 4096 (MALLCTL_ARENAS_ALL) purges every arena.
    unsafe {
        tikv_jemalloc_sys::mallctl(
            c"arena.4096.purge".as_ptr().cast(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            0,
        );
    }
}

#[cfg(target_env = "msvc")]
fn release_memory_to_os() {}

/// Initializes the tracing subscriber. Logs go to stderr so reports on
/// stdout stay readable.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), UsageError> {
    let purge = || {
        if !args.no_purge {
            release_memory_to_os();
        }
    };

    println!("Scoped allocation of {} elements:", args.elements);
    {
        let _scope = Scope::enter()?;
        let block = black_box(vec![1u64; args.elements]);
        debug!(len = block.len(), "allocated scoped block");
    }
    purge();

    println!("\nWrapped function allocating {} elements:", args.elements);
    let mut gen_array = measured(|n: usize| black_box(vec![2u64; n]))?;
    let block = gen_array(args.elements);
    debug!(len = block.len(), "wrapped function returned");
    drop(block);
    purge();

    println!(
        "\nCheckpoints: {} elements, then {} after freeing:",
        args.elements, args.smaller
    );
    let mut usage = MemoryUsage::new()?;
    let block = black_box(vec![3u64; args.elements]);
    let first = usage.usage()?;
    drop(block);
    purge();

    let smaller = black_box(vec![4u64; args.smaller]);
    let second = usage.usage()?;
    drop(smaller);

    info!(
        first_kb = first.increase(Field::VmRss),
        second_kb = second.increase(Field::VmRss),
        snapshots = usage.snapshots().len(),
        "resident set changes"
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);
    info!("memusage {} starting", env!("CARGO_PKG_VERSION"));

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
