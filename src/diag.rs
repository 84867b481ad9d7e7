/*!
Optional diagnostics emitted while processing patch records.

The patcher and the diff generator accept a sink through their `diagnose`
builder methods. A sink only observes; processing behaves identically with
or without one.
*/

use std::fmt;

/// Severity of a diagnostic event.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Severity {
    /// Per-record progress.
    Debug,
    /// Recoverable problems, e.g. records skipped as out of bounds.
    Warn,
}

/// Best-effort sink receiving diagnostic events.
pub trait Sink {
    /// Handle one diagnostic event.
    fn report(&mut self, severity: Severity, message: fmt::Arguments<'_>);
}

/// Sink forwarding events to the `log` facade.
///
/// ```
/// use std::io::Cursor;
/// use qips::{diag, Ipspatch};
///
/// let mut data = [0u8; 4];
/// Ipspatch::new(Cursor::new(b"PATCH\x00\x00\x01\x00\x02\xff\xffEOF"))
///     .diagnose(&mut diag::Log)
///     .apply(&mut data[..]);
/// ```
pub struct Log;

impl Sink for Log {
    fn report(&mut self, severity: Severity, message: fmt::Arguments<'_>) {
        match severity {
            Severity::Debug => log::debug!("{}", message),
            Severity::Warn => log::warn!("{}", message),
        }
    }
}

/// Report to an optional sink.
#[inline]
pub(crate) fn report(
    sink: &mut Option<&mut dyn Sink>,
    severity: Severity,
    message: fmt::Arguments<'_>,
) {
    if let Some(sink) = sink.as_mut() {
        sink.report(severity, message);
    }
}
