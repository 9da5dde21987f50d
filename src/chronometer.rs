//! Stateful aggregation of named measurements.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::export::DataTable;
use crate::{default_printer, format_report, stats, Printer};

/// Whether a [`Chronometer`] keeps every individual sample or only the
/// running count and total per label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retention {
    /// Keep every sample. Required for standard deviations and for export.
    #[default]
    Samples,
    /// Keep only count and total per label. Cheaper for long-running loops;
    /// summaries omit the standard deviation and export is unavailable.
    TotalsOnly,
}

/// Accumulated measurements for one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRecord {
    label: String,
    samples: Vec<Duration>,
    count: usize,
    total: Duration,
}

impl AggregateRecord {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            samples: Vec::new(),
            count: 0,
            total: Duration::ZERO,
        }
    }

    fn fold(&mut self, elapsed: Duration, retention: Retention) {
        self.count += 1;
        self.total += elapsed;
        if retention == Retention::Samples {
            self.samples.push(elapsed);
        }
    }

    fn clear(&mut self) {
        self.samples.clear();
        self.count = 0;
        self.total = Duration::ZERO;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    /// Retained samples, oldest first. Empty in totals-only retention.
    pub fn samples(&self) -> &[Duration] {
        &self.samples
    }

    /// Mean duration, `None` while no measurement has completed.
    pub fn mean(&self) -> Option<Duration> {
        if self.count == 0 {
            None
        } else {
            Some(self.total / self.count as u32)
        }
    }
}

/// Per-label statistics as produced by [`Chronometer::summaries`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSummary {
    pub label: String,
    pub count: usize,
    pub total_secs: f64,
    pub mean_secs: f64,
    /// Sample standard deviation; `None` with fewer than two retained
    /// samples.
    pub stdev_secs: Option<f64>,
}

/// A stateful timer accumulating measurements per label.
///
/// Labels appear in first-seen order (or in pre-declared order via
/// [`Chronometer::with_labels`]), and summaries and exports follow that
/// order deterministically. Records grow monotonically; nothing removes a
/// label short of [`Chronometer::reset`] / [`Chronometer::reset_label`].
///
/// Nested measurement under the same label is allowed: each [`Measure`]
/// guard carries its own start time, and the explicit [`Chronometer::start`]
/// / [`Chronometer::stop`] pair resolves oldest-first (FIFO).
///
/// There is no internal locking. Accumulating into one instance from
/// several threads must be serialized by the caller; the intended pattern
/// for parallel work is one chronometer per worker, folded together with
/// [`Chronometer::merge`] or [`Chronometer::combine`].
pub struct Chronometer {
    records: Vec<AggregateRecord>,
    pending: HashMap<String, VecDeque<Instant>>,
    precision: usize,
    verbose: bool,
    printer: Printer,
    retention: Retention,
}

impl Default for Chronometer {
    fn default() -> Self {
        Self::new()
    }
}

impl Chronometer {
    /// An empty chronometer: stdout printer, precision 2, per-measurement
    /// reporting off, samples retained.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            pending: HashMap::new(),
            precision: 2,
            verbose: false,
            printer: default_printer(),
            retention: Retention::default(),
        }
    }

    /// Pre-declare labels so summaries and exports carry them in this order
    /// even before their first measurement.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for label in labels {
            let label = label.into();
            if !self.records.iter().any(|r| r.label == label) {
                self.records.push(AggregateRecord::new(label));
            }
        }
        self
    }

    /// Number of decimal places in report and summary lines. Default 2.
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Report each measurement as it completes, in addition to accumulating
    /// it. Default off: accumulate silently, report via
    /// [`Chronometer::summary`].
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Send report and summary lines somewhere other than stdout.
    pub fn printer(mut self, printer: Printer) -> Self {
        self.printer = printer;
        self
    }

    /// Choose between full sample retention and totals-only bookkeeping.
    pub fn retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    /// Measure a scope: the returned guard folds its elapsed time into
    /// `label`'s record when it drops, on every exit path including panics.
    pub fn measure(&mut self, label: impl Into<String>) -> Measure<'_> {
        Measure {
            label: label.into(),
            start: Instant::now(),
            chrono: self,
        }
    }

    /// Time exactly one invocation of `f` under `label`, returning its
    /// result unchanged. The elapsed time is folded in even when `f`
    /// panics; the panic then propagates.
    pub fn time<R>(&mut self, label: impl Into<String>, f: impl FnOnce() -> R) -> R {
        let _measure = self.measure(label);
        f()
    }

    /// Start a measurement under `label` without a guard. Repeated starts
    /// queue up and are paired with [`Chronometer::stop`] oldest-first.
    pub fn start(&mut self, label: impl Into<String>) {
        self.pending
            .entry(label.into())
            .or_default()
            .push_back(Instant::now());
    }

    /// Close the oldest pending [`Chronometer::start`] for `label`, fold
    /// the elapsed time into its record and return it.
    pub fn stop(&mut self, label: &str) -> Result<Duration> {
        let end = Instant::now();
        let start = self
            .pending
            .get_mut(label)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| Error::NotStarted(label.to_string()))?;
        let elapsed = end - start;
        self.fold(label, elapsed);
        Ok(elapsed)
    }

    fn record_mut(&mut self, label: &str) -> &mut AggregateRecord {
        let index = match self.records.iter().position(|r| r.label == label) {
            Some(index) => index,
            None => {
                self.records.push(AggregateRecord::new(label));
                self.records.len() - 1
            }
        };
        &mut self.records[index]
    }

    fn fold(&mut self, label: &str, elapsed: Duration) {
        let retention = self.retention;
        self.record_mut(label).fold(elapsed, retention);
        if self.verbose {
            let line = format_report(label, elapsed.as_secs_f64(), self.precision);
            (self.printer)(&line);
        }
    }

    /// Records in label order, for programmatic inspection.
    pub fn records(&self) -> &[AggregateRecord] {
        &self.records
    }

    /// Per-label statistics in label order.
    pub fn summaries(&self) -> Vec<LabelSummary> {
        self.records
            .iter()
            .map(|rec| {
                let total_secs = rec.total.as_secs_f64();
                let mean_secs = if rec.count == 0 {
                    0.0
                } else {
                    total_secs / rec.count as f64
                };
                let secs: Vec<f64> = rec.samples.iter().map(Duration::as_secs_f64).collect();
                LabelSummary {
                    label: rec.label.clone(),
                    count: rec.count,
                    total_secs,
                    mean_secs,
                    stdev_secs: stats::sample_stdev(&secs),
                }
            })
            .collect()
    }

    /// Print one summary line per label to the configured printer.
    ///
    /// - no measurements: `"<label> has no durations recorded"`
    /// - one measurement: `"<label> took <total>s"`
    /// - several: `"<label> took <mean> ± <stdev>s (n=<n> -> total=<total>s)"`,
    ///   without the `± <stdev>` part when samples are not retained.
    pub fn summary(&self) {
        self.summary_with(self.precision, &self.printer);
    }

    /// Like [`Chronometer::summary`] with precision and printer overridden.
    pub fn summary_with(&self, precision: usize, printer: &Printer) {
        for rec in &self.records {
            (printer)(&self.summary_line(rec, precision));
        }
    }

    fn summary_line(&self, rec: &AggregateRecord, precision: usize) -> String {
        match rec.count {
            0 => format!("{} has no durations recorded", rec.label),
            1 => format_report(&rec.label, rec.total.as_secs_f64(), precision),
            n => {
                let total = rec.total.as_secs_f64();
                let mean = total / n as f64;
                let secs: Vec<f64> = rec.samples.iter().map(Duration::as_secs_f64).collect();
                match stats::sample_stdev(&secs) {
                    Some(stdev) => format!(
                        "{} took {mean:.precision$} \u{b1} {stdev:.precision$}s (n={n} -> total={total:.precision$}s)",
                        rec.label
                    ),
                    None => format!(
                        "{} took {mean:.precision$}s (n={n} -> total={total:.precision$}s)",
                        rec.label
                    ),
                }
            }
        }
    }

    /// Forget all records and pending starts.
    pub fn reset(&mut self) {
        self.records.clear();
        self.pending.clear();
    }

    /// Reinitialize one label's record to the zero state and drop its
    /// pending starts. The label keeps its position in the order.
    pub fn reset_label(&mut self, label: &str) {
        if let Some(rec) = self.records.iter_mut().find(|r| r.label == label) {
            rec.clear();
        }
        self.pending.remove(label);
    }

    /// Fold another chronometer's records into this one, label-wise.
    ///
    /// Handy to fan in per-worker chronometers after parallel work. Pending
    /// starts are not merged. Samples from a totals-only source are gone
    /// for good; their counts and totals still add up.
    pub fn merge(&mut self, other: &Chronometer) {
        for src in &other.records {
            let retention = self.retention;
            let rec = self.record_mut(&src.label);
            rec.count += src.count;
            rec.total += src.total;
            if retention == Retention::Samples {
                rec.samples.extend(src.samples.iter().copied());
            }
        }
    }

    /// Combine several chronometers into a fresh one carrying the first
    /// one's configuration. An empty iterator yields an empty default
    /// chronometer.
    pub fn combine<I>(timers: I) -> Chronometer
    where
        I: IntoIterator<Item = Chronometer>,
    {
        let mut iter = timers.into_iter();
        let mut combined = match iter.next() {
            Some(first) => {
                let mut combined = Chronometer::new()
                    .precision(first.precision)
                    .verbose(first.verbose)
                    .printer(Arc::clone(&first.printer))
                    .retention(first.retention);
                combined.merge(&first);
                combined
            }
            None => Chronometer::new(),
        };
        for timer in iter {
            combined.merge(&timer);
        }
        combined
    }

    /// Export the retained samples as a column-per-label [`DataTable`],
    /// shorter columns padded with absent cells.
    ///
    /// Fails with [`Error::ExportUnavailable`] when the crate was built
    /// without the `export` feature, and with [`Error::SamplesNotRetained`]
    /// in totals-only retention.
    pub fn export(&self) -> Result<DataTable> {
        if cfg!(not(feature = "export")) {
            return Err(Error::ExportUnavailable);
        }
        if self.retention == Retention::TotalsOnly {
            return Err(Error::SamplesNotRetained);
        }
        Ok(DataTable::from_records(
            self.records
                .iter()
                .map(|rec| (rec.label.as_str(), rec.samples.as_slice())),
        ))
    }
}

/// Guard returned by [`Chronometer::measure`]; folds its elapsed time into
/// the chronometer when dropped.
pub struct Measure<'a> {
    chrono: &'a mut Chronometer,
    label: String,
    start: Instant,
}

impl Measure<'_> {
    /// Time elapsed since the guard was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Measure<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let label = std::mem::take(&mut self.label);
        self.chrono.fold(&label, elapsed);
    }
}
