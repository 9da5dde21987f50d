//! stopuhr - very high level benchmarking helpers
//!
//! This library provides two cooperating timing primitives built on the
//! platform's monotonic clock:
//!
//! - [`Stopwatch`]: a single-use, named scope timer that reports its elapsed
//!   time when the scope ends (RAII guard or closure wrapper).
//! - [`Chronometer`]: a stateful collection of named measurements that
//!   accumulates counts and totals per label, prints summary statistics and
//!   exports the recorded samples as tabular data.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! // Report a single block.
//! {
//!     let _sw = stopuhr::stopwatch("Sleeping");
//!     std::thread::sleep(Duration::from_millis(200));
//! } // prints "Sleeping took 0.20s"
//!
//! // Accumulate over a loop and summarize.
//! let mut timer = stopuhr::Chronometer::new();
//! for _ in 0..5 {
//!     timer.time("Sleeping", || std::thread::sleep(Duration::from_millis(200)));
//! }
//! timer.summary(); // "Sleeping took 0.20 ± 0.00s (n=5 -> total=1.00s)"
//! ```

use std::sync::{Arc, Mutex};

pub mod chronometer;
pub mod error;
pub mod export;
pub mod stats;
pub mod stopwatch;

pub use chronometer::{AggregateRecord, Chronometer, LabelSummary, Measure, Retention};
pub use error::{Error, Result};
pub use export::{DataColumn, DataTable};
pub use stopwatch::{stopwatch, timed, wrap, wrap_with, Stopwatch};

/// Library version
pub const VERSION: &str = "0.1.0";

/// Where formatted report lines are sent.
///
/// Any function receiving exactly one string line qualifies: the default
/// prints to stdout, tests substitute a capturing closure, applications can
/// hand in a logging adapter.
pub type Printer = Arc<dyn Fn(&str) + Send + Sync>;

/// The default report destination: one line per report on stdout.
pub fn default_printer() -> Printer {
    Arc::new(|line: &str| println!("{line}"))
}

lazy_static::lazy_static! {
    static ref GLOBAL: Mutex<Chronometer> = Mutex::new(Chronometer::new());
}

/// A process-wide default [`Chronometer`] for quick instrumentation.
///
/// The mutex is the only synchronization offered: callers time blocks while
/// holding the lock, or prefer one [`Chronometer`] per worker combined with
/// [`Chronometer::merge`] afterwards.
pub fn global() -> &'static Mutex<Chronometer> {
    &GLOBAL
}

pub(crate) fn format_report(label: &str, secs: f64, precision: usize) -> String {
    format!("{label} took {secs:.precision$}s")
}
