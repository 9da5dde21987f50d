//! Scoped timing of a single block or closure.

use std::time::{Duration, Instant};

use crate::{default_printer, format_report, Printer};

/// A named scope timer which starts keeping track of time immediately.
///
/// On every exit path of the surrounding scope - normal completion, early
/// return or a propagating panic - the guard's drop computes the elapsed
/// time and reports `"<label> took <secs>s"` to the configured printer.
///
/// ```no_run
/// {
///     let _sw = stopuhr::stopwatch("My Timer").precision(2);
///     // ... work ...
/// } // prints e.g. "My Timer took 2.00s"
/// ```
pub struct Stopwatch {
    label: String,
    precision: usize,
    verbose: bool,
    printer: Printer,
    start: Instant,
    reported: bool,
}

impl Stopwatch {
    /// Start a new stopwatch. The clock runs from this call on.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            precision: 2,
            verbose: true,
            printer: default_printer(),
            start: Instant::now(),
            reported: false,
        }
    }

    /// Number of decimal places in the reported seconds. Default 2.
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Suppress the report; the measurement still happens and can be read
    /// through [`Stopwatch::elapsed`] or [`Stopwatch::stop`].
    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }

    /// Send reports somewhere other than stdout.
    pub fn printer(mut self, printer: Printer) -> Self {
        self.printer = printer;
        self
    }

    /// Time elapsed since construction, without stopping the watch.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop now: report once and return the elapsed time. The guard emits
    /// nothing further when it drops.
    pub fn stop(mut self) -> Duration {
        let elapsed = self.start.elapsed();
        self.reported = true;
        self.report(elapsed);
        elapsed
    }

    /// Time exactly one invocation of `f`, returning its result unchanged.
    ///
    /// The clock restarts at the call so builder configuration is not
    /// counted. The report is emitted even when `f` panics; the panic then
    /// propagates unchanged.
    pub fn time<R>(mut self, f: impl FnOnce() -> R) -> R {
        self.start = Instant::now();
        f()
    }

    fn report(&self, elapsed: Duration) {
        if self.verbose {
            let line = format_report(&self.label, elapsed.as_secs_f64(), self.precision);
            (self.printer)(&line);
        }
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        if !self.reported {
            self.report(self.start.elapsed());
        }
    }
}

/// Start a [`Stopwatch`] with default configuration.
pub fn stopwatch(label: impl Into<String>) -> Stopwatch {
    Stopwatch::new(label)
}

/// Time one call of `f` under `label` with default configuration.
pub fn timed<R>(label: impl Into<String>, f: impl FnOnce() -> R) -> R {
    Stopwatch::new(label).time(f)
}

/// Wrap a closure so that every later invocation is timed and reported
/// independently, the decorator pattern without decorator syntax.
///
/// Closures taking arguments are wrapped by capturing them at the call
/// site, or timed per call with [`timed`].
pub fn wrap<F, R>(label: impl Into<String>, f: F) -> impl FnMut() -> R
where
    F: FnMut() -> R,
{
    let label = label.into();
    wrap_with(move || Stopwatch::new(label.clone()), f)
}

/// Like [`wrap`], but each invocation's guard comes from `build`, so the
/// wrapped closure can carry a custom precision or printer.
pub fn wrap_with<B, F, R>(mut build: B, mut f: F) -> impl FnMut() -> R
where
    B: FnMut() -> Stopwatch,
    F: FnMut() -> R,
{
    move || build().time(&mut f)
}
