use std::sync::{Arc, Mutex};
use std::thread::sleep;
use std::time::Duration;

use stopuhr::{stopwatch, timed, Chronometer, Printer};

fn capture() -> (Printer, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let printer: Printer = Arc::new(move |line: &str| sink.lock().unwrap().push(line.into()));
    (printer, lines)
}

#[test]
fn stopwatch_reports_a_slept_block() {
    let (printer, lines) = capture();
    {
        let _sw = stopwatch("Sleeping").printer(printer);
        sleep(Duration::from_millis(20));
    }
    let lines = lines.lock().unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Sleeping took "));
    assert!(lines[0].ends_with('s'));
}

#[test]
fn timed_passes_the_result_through() {
    let (printer, lines) = capture();
    let sum = stopuhr::Stopwatch::new("sum")
        .printer(printer)
        .time(|| (1..=10).sum::<u32>());
    assert_eq!(sum, 55);
    assert_eq!(lines.lock().unwrap().len(), 1);

    // Default-configured variant; result still passes through unchanged.
    assert_eq!(timed("noop", || "done"), "done");
}

#[test]
fn chronometer_accumulates_over_a_loop() {
    let mut timer = Chronometer::new();
    for _ in 0..3 {
        timer.time("loop", || sleep(Duration::from_millis(10)));
    }

    let summaries = timer.summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].label, "loop");
    assert_eq!(summaries[0].count, 3);
    assert!(summaries[0].total_secs >= 0.030);
    assert!(summaries[0].mean_secs >= 0.010);
    assert!((summaries[0].mean_secs - summaries[0].total_secs / 3.0).abs() < 1e-9);
}

#[test]
fn two_labels_stay_independent() {
    let mut timer = Chronometer::new();
    timer.time("a", || sleep(Duration::from_millis(5)));
    for _ in 0..2 {
        timer.time("b", || ());
    }

    let summaries = timer.summaries();
    assert_eq!(summaries[0].count, 1);
    assert_eq!(summaries[1].count, 2);
    assert!(summaries[0].total_secs > summaries[1].total_secs);
}

#[test]
fn summaries_serialize_for_downstream_analysis() {
    let mut timer = Chronometer::new();
    timer.time("calc", || ());
    let json = serde_json::to_string(&timer.summaries()).unwrap();
    assert!(json.contains(r#""label":"calc""#));
    assert!(json.contains(r#""count":1"#));
}

#[cfg(feature = "export")]
#[test]
fn export_agrees_with_the_summaries() {
    let mut timer = Chronometer::new();
    for _ in 0..2 {
        timer.time("test", || sleep(Duration::from_millis(5)));
    }
    timer.time("test2", || sleep(Duration::from_millis(5)));

    let table = timer.export().unwrap();
    assert_eq!(table.num_columns(), 2);
    assert_eq!(table.num_rows(), 2);

    for summary in timer.summaries() {
        let column = table.column(&summary.label).unwrap();
        let values: Vec<f64> = column.iter().flatten().copied().collect();
        assert_eq!(values.len(), summary.count);
        assert!((values.iter().sum::<f64>() - summary.total_secs).abs() < 1e-9);
    }
}

#[cfg(feature = "export")]
#[test]
fn export_renders_and_writes_csv() {
    let mut timer = Chronometer::new();
    timer.time("step", || ());

    let table = timer.export().unwrap();
    let rendered = table.render(2);
    assert!(rendered.contains("step"));

    let csv = table.to_csv_string().unwrap();
    let mut rows = csv.lines();
    assert_eq!(rows.next(), Some("step"));
    assert_eq!(rows.clone().count(), 1);
}

#[test]
fn global_chronometer_is_shared_and_resettable() {
    let mut timer = stopuhr::global().lock().unwrap();
    timer.time("global-check", || ());
    assert!(timer
        .summaries()
        .iter()
        .any(|s| s.label == "global-check" && s.count == 1));
    timer.reset_label("global-check");
}
