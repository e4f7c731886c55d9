//! Measurement sessions.
//!
//! [`MemoryUsage`] owns the snapshot history and drives the
//! read → diff → report pipeline. [`Scope`] reports once when it goes out of
//! scope, and [`Measured`] wraps a callable so every invocation runs inside
//! its own scope.
//!
//! ```no_run
//! use memusage::{measured, MemoryUsage, Scope};
//!
//! // Explicit checkpoints.
//! let mut usage = MemoryUsage::new()?;
//! let block = vec![0u64; 200_000];
//! usage.usage()?;
//! drop(block);
//!
//! // Scoped: baseline now, report at the end of the block.
//! {
//!     let _scope = Scope::enter()?;
//!     let _block = vec![1u64; 200_000];
//! }
//!
//! // Wrapped callable.
//! let mut make = measured(|n: usize| vec![2u64; n])?;
//! let block = make(200_000);
//! assert_eq!(block.len(), 200_000);
//! # Ok::<(), memusage::UsageError>(())
//! ```

use std::io::{self, Stdout, Write};

use tracing::{debug, error, info};

use crate::collector::{self, HostEngine, StatusEngine};
use crate::diff::{self, DiffRecord};
use crate::error::UsageError;
use crate::fmt::{summary, write_report};
use crate::storage::{Snapshot, SnapshotStore};

/// Memory measurement session for the current process.
///
/// Holds every snapshot taken since construction. Diffs always compare the
/// two most recent snapshots.
pub struct MemoryUsage<E: StatusEngine = HostEngine, W: Write = Stdout> {
    engine: E,
    store: SnapshotStore,
    sink: W,
    print_report: bool,
}

impl MemoryUsage {
    /// Creates a session on the host engine, reporting to stdout.
    ///
    /// Fails with [`UsageError::UnsupportedHost`] on non-Linux hosts.
    pub fn new() -> Result<Self, UsageError> {
        Self::with_engine(collector::host()?, io::stdout())
    }
}

impl<E: StatusEngine, W: Write> MemoryUsage<E, W> {
    /// Creates a session and takes the baseline snapshot.
    pub fn with_engine(engine: E, sink: W) -> Result<Self, UsageError> {
        let mut session = Self {
            engine,
            store: SnapshotStore::new(),
            sink,
            print_report: true,
        };
        session.record()?;
        Ok(session)
    }

    /// Enables or disables writing reports to the sink.
    ///
    /// With printing disabled, [`usage`](Self::usage) still returns the record
    /// and logs the summary.
    pub fn set_print_report(&mut self, enabled: bool) {
        self.print_report = enabled;
    }

    /// Takes a snapshot and appends it to the history.
    pub fn record(&mut self) -> Result<(), UsageError> {
        let status = self.engine.read_status()?;
        let snapshot = self.store.push(status);
        debug!(
            engine = self.engine.name(),
            seq = snapshot.seq,
            rss_kb = snapshot.status.vm_rss,
            "memory snapshot taken"
        );
        Ok(())
    }

    /// Diff of the two most recent snapshots, without taking a new one.
    pub fn diff(&self) -> Result<DiffRecord, UsageError> {
        let (prev, curr) = self.store.last_two()?;
        Ok(diff::diff(prev, curr))
    }

    /// Takes a snapshot, diffs it against the previous one and reports it.
    pub fn usage(&mut self) -> Result<DiffRecord, UsageError> {
        self.record()?;
        let record = self.diff()?;

        info!(
            from = record.from_seq,
            to = record.to_seq,
            "memory usage: {}",
            summary(&record)
        );
        if self.print_report {
            write_report(&mut self.sink, &record)?;
        }
        Ok(record)
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        self.store.as_slice()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_sink(self) -> W {
        self.sink
    }
}

/// Guard that measures the memory used while it is alive.
///
/// Creating the guard takes the baseline; dropping it performs one
/// [`MemoryUsage::usage`], including when the scope is left by unwinding.
/// Errors at drop time are logged; call [`finish`](Self::finish) to get
/// them back instead.
pub struct Scope<E: StatusEngine = HostEngine, W: Write = Stdout> {
    session: MemoryUsage<E, W>,
    armed: bool,
}

impl Scope {
    /// Opens a scope on the host engine, reporting to stdout.
    pub fn enter() -> Result<Self, UsageError> {
        Self::new(collector::host()?, io::stdout())
    }
}

impl<E: StatusEngine, W: Write> Scope<E, W> {
    pub fn new(engine: E, sink: W) -> Result<Self, UsageError> {
        Ok(Self {
            session: MemoryUsage::with_engine(engine, sink)?,
            armed: true,
        })
    }

    /// Records an intermediate checkpoint; the exit report diffs against it.
    pub fn record(&mut self) -> Result<(), UsageError> {
        self.session.record()
    }

    pub fn session(&self) -> &MemoryUsage<E, W> {
        &self.session
    }

    pub fn set_print_report(&mut self, enabled: bool) {
        self.session.set_print_report(enabled);
    }

    /// Closes the scope now and returns its report.
    pub fn finish(mut self) -> Result<DiffRecord, UsageError> {
        self.armed = false;
        self.session.usage()
    }
}

impl<E: StatusEngine, W: Write> Drop for Scope<E, W> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        if let Err(e) = self.session.usage() {
            error!(error = %e, "scoped memory measurement failed");
        }
    }
}

/// A callable whose every invocation is measured in its own [`Scope`].
///
/// Arguments and return value pass through unchanged. Callables taking
/// several arguments take them as a tuple; zero-argument callables take `()`.
pub struct Measured<F, E: StatusEngine + Clone = HostEngine, W: Write = Stdout> {
    func: F,
    engine: E,
    sink: W,
}

impl<F> Measured<F> {
    /// Wraps `func` using the host engine and stdout.
    ///
    /// The host check happens here, so an unsupported host fails before the
    /// callable is ever invoked.
    pub fn new(func: F) -> Result<Self, UsageError> {
        Ok(Self::with_engine(func, collector::host()?, io::stdout()))
    }
}

impl<F, E: StatusEngine + Clone, W: Write> Measured<F, E, W> {
    pub fn with_engine(func: F, engine: E, sink: W) -> Self {
        Self { func, engine, sink }
    }

    /// Invokes the callable between a baseline and a report.
    ///
    /// If the baseline cannot be taken the callable still runs, unmeasured.
    pub fn call<A, R>(&mut self, args: A) -> R
    where
        F: FnMut(A) -> R,
    {
        let scope = match Scope::new(self.engine.clone(), &mut self.sink) {
            Ok(scope) => Some(scope),
            Err(e) => {
                error!(error = %e, "memory baseline failed, running unmeasured");
                None
            }
        };
        let result = (self.func)(args);
        drop(scope);
        result
    }

    /// Like [`call`](Self::call), but measurement failures are returned.
    ///
    /// A failed baseline returns before the callable runs. A failed exit
    /// report drops the callable's result.
    pub fn try_call<A, R>(&mut self, args: A) -> Result<(R, DiffRecord), UsageError>
    where
        F: FnMut(A) -> R,
    {
        let scope = Scope::new(self.engine.clone(), &mut self.sink)?;
        let result = (self.func)(args);
        let record = scope.finish()?;
        Ok((result, record))
    }

    /// Turns the wrapper into a plain closure with the callable's signature.
    pub fn into_fn<A, R>(mut self) -> impl FnMut(A) -> R
    where
        F: FnMut(A) -> R,
    {
        move |args| self.call(args)
    }

    pub fn into_sink(self) -> W {
        self.sink
    }
}

/// Wraps `func` so each call reports its memory usage to stdout.
pub fn measured<F, A, R>(func: F) -> Result<impl FnMut(A) -> R, UsageError>
where
    F: FnMut(A) -> R,
{
    Ok(Measured::new(func)?.into_fn())
}
