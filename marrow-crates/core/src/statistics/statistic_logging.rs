//! The process-wide destination of statistics. Nothing is written until
//! [`configure_statistic_logging`] is called.

use std::fmt::Display;
use std::io::stdout;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

/// Where statistics go, and how each line is framed.
struct StatisticSink {
    /// Written before every `name=value` pair.
    prefix: &'static str,
    /// Written after a block of statistics, if set.
    closing_line: Option<&'static str>,
    writer: Box<dyn Write + Send + Sync>,
}

static STATISTIC_SINK: OnceLock<Mutex<StatisticSink>> = OnceLock::new();

/// Runs `action` on the configured sink; does nothing when logging is not configured or a
/// previous writer panicked.
fn with_sink(action: impl FnOnce(&mut StatisticSink)) {
    if let Some(Ok(mut sink)) = STATISTIC_SINK.get().map(Mutex::lock) {
        action(&mut sink);
    }
}

/// Configures the logging of the statistics. Only the first call has an effect.
///
/// Every statistic is written as `{prefix} {name}={value}`, and
/// [`log_statistic_postfix`] writes `closing_line` after a block of statistics. Without a
/// `writer`, stdout is used.
pub fn configure_statistic_logging(
    prefix: &'static str,
    closing_line: Option<&'static str>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = STATISTIC_SINK.get_or_init(|| {
        Mutex::new(StatisticSink {
            prefix,
            closing_line,
            writer: writer.unwrap_or_else(|| Box::new(stdout())),
        })
    });
}

pub fn log_statistic(name: impl Display, value: impl Display) {
    with_sink(|sink| {
        let _ = writeln!(sink.writer, "{} {name}={value}", sink.prefix);
    });
}

/// Ends a block of statistics with the configured closing line.
pub fn log_statistic_postfix() {
    with_sink(|sink| {
        if let Some(closing_line) = sink.closing_line {
            let _ = writeln!(sink.writer, "{closing_line}");
        }
    });
}

pub fn should_log_statistics() -> bool {
    STATISTIC_SINK.get().is_some()
}
