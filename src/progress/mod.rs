//! Progress reporting behind a narrow sink interface.
//!
//! Core components report units of work through [`ProgressSink`] without
//! knowing whether a terminal bar, a log line, or nothing at all is
//! attached. [`Reporter`] hands out one sink per labelled task.

use indicatif::{ProgressBar, ProgressStyle};

pub trait ProgressSink: Send + Sync {
    fn report(&self, n: u64);
    fn close(&self);
}

/// Creates one [`ProgressSink`] per task, with a label and a known total.
pub trait Reporter: Send + Sync {
    fn task(&self, label: &str, total: u64) -> Box<dyn ProgressSink>;
}

/// Sink that discards all progress. Used when running non-verbose and in
/// tests that do not care about reporting.
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn report(&self, _n: u64) {}
    fn close(&self) {}
}

pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn task(&self, _label: &str, _total: u64) -> Box<dyn ProgressSink> {
        Box::new(NoopSink)
    }
}

struct BarSink {
    bar: ProgressBar,
}

impl ProgressSink for BarSink {
    fn report(&self, n: u64) {
        self.bar.inc(n);
    }

    fn close(&self) {
        self.bar.finish();
    }
}

/// Reporter that draws an indicatif bar per task on stderr.
pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn task(&self, label: &str, total: u64) -> Box<dyn ProgressSink> {
        let bar = ProgressBar::new(total);
        bar.set_style(bar_style());
        bar.set_message(label.to_string());
        Box::new(BarSink { bar })
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:30} [{bar:40}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}
