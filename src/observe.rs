//! Observability hooks for CSV ingestion outcomes.

use std::path::PathBuf;

use crate::error::FrameError;

/// Severity classification used for observer callbacks and alert thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the read failed on its input).
    Error,
    /// Critical error (I/O and other infrastructure failures).
    Critical,
}

/// Context about a CSV read attempt.
#[derive(Debug, Clone)]
pub struct ReadContext {
    /// The input path.
    pub path: PathBuf,
}

/// Minimal stats reported on a successful read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    /// Number of ingested rows.
    pub rows: usize,
    /// Number of ingested columns.
    pub columns: usize,
}

/// Observer interface for CSV read outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ReadObserver: Send + Sync {
    /// Called when a read succeeds.
    fn on_success(&self, _ctx: &ReadContext, _stats: ReadStats) {}

    /// Called when a read fails.
    fn on_failure(&self, _ctx: &ReadContext, _severity: Severity, _error: &FrameError) {}

    /// Called when a failure meets the configured alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ReadContext, severity: Severity, error: &FrameError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Logs read events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ReadObserver for StdErrObserver {
    fn on_success(&self, ctx: &ReadContext, stats: ReadStats) {
        eprintln!(
            "[read_csv][ok] path={} rows={} cols={}",
            ctx.path.display(),
            stats.rows,
            stats.columns
        );
    }

    fn on_failure(&self, ctx: &ReadContext, severity: Severity, error: &FrameError) {
        eprintln!(
            "[read_csv][{severity:?}] path={} err={error}",
            ctx.path.display()
        );
    }

    fn on_alert(&self, ctx: &ReadContext, severity: Severity, error: &FrameError) {
        eprintln!(
            "[ALERT][read_csv][{severity:?}] path={} err={error}",
            ctx.path.display()
        );
    }
}

/// I/O-rooted failures are infrastructure problems; everything else means
/// the input itself was rejected.
pub(crate) fn severity_for_error(error: &FrameError) -> Severity {
    match error {
        FrameError::Io(_) => Severity::Critical,
        FrameError::Csv(err) => match err.kind() {
            csv::ErrorKind::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        _ => Severity::Error,
    }
}
