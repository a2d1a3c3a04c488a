//! Forward `tracing` events into a [`Logger`]

use std::fmt;
use tierlog_core::{Field, Severity};
use tierlog_sink::Caller;
use tracing::field::{Field as TracingField, Visit};
use tracing::subscriber::Interest;
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::logger::Logger;

/// A `tracing_subscriber` layer that writes events through a logger.
///
/// Events are gated by the logger's threshold and never escalate, so a
/// bridged ERROR is an ordinary Error entry.
#[derive(Debug, Clone)]
pub struct TierlogLayer {
    logger: Logger,
}

impl TierlogLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

fn severity(level: &Level) -> Severity {
    match *level {
        Level::TRACE | Level::DEBUG => Severity::Debug,
        Level::INFO => Severity::Info,
        Level::WARN => Severity::Warn,
        Level::ERROR => Severity::Error,
    }
}

impl<S: Subscriber> Layer<S> for TierlogLayer {
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        // The threshold can change at runtime
        Interest::sometimes()
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        !metadata.is_event() || self.logger.enabled(severity(metadata.level()))
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = severity(metadata.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        visitor
            .fields
            .push(Field::string("target", metadata.target()));

        let caller = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => Some(Caller::new(file, line)),
            _ => None,
        };
        self.logger
            .write(level, &visitor.message, &visitor.fields, caller);
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<Field>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(Field::string(field.name(), value));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.fields.push(Field::int(field.name(), value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.fields.push(Field::uint(field.name(), value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.fields.push(Field::float(field.name(), value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.fields.push(Field::bool(field.name(), value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.fields.push(Field::string(field.name(), value.to_string()));
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields
                .push(Field::string(field.name(), format!("{:?}", value)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::options::Options;
    use tierlog_sink::BufferWriter;
    use tracing_subscriber::prelude::*;

    fn bridged(level: Severity) -> (Logger, BufferWriter) {
        let out = BufferWriter::new();
        let (logger, _) = build(
            Options::new()
                .level(level)
                .add_caller()
                .console_output(out.clone()),
        )
        .unwrap();
        (logger, out)
    }

    #[test]
    fn test_events_are_forwarded_with_fields() {
        let (logger, out) = bridged(Severity::Debug);
        let subscriber = tracing_subscriber::registry().with(TierlogLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(port = 8080u64, secure = false, peer = "10.0.0.7", "listener degraded");
        });

        let line = out.contents();
        assert!(line.contains("warn"));
        assert!(line.contains("listener degraded"));
        assert!(line.contains("\"port\":8080"));
        assert!(line.contains("\"secure\":false"));
        assert!(line.contains("\"peer\":\"10.0.0.7\""));
        assert!(line.contains("src/bridge.rs:"));
    }

    #[test]
    fn test_trace_maps_to_debug_and_respects_threshold() {
        let (logger, out) = bridged(Severity::Info);
        let threshold = logger.threshold().clone();
        let subscriber = tracing_subscriber::registry().with(TierlogLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!("too quiet");
            tracing::debug!("still too quiet");
            tracing::info!("heard");
            threshold.set_level(Severity::Debug);
            tracing::trace!(attempt = 2i64, "now heard");
        });

        let lines = out.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("heard"));
        assert!(lines[1].contains("debug"));
        assert!(lines[1].contains("now heard"));
    }

    #[test]
    fn test_error_events_do_not_escalate() {
        let (logger, out) = bridged(Severity::Debug);
        let subscriber = tracing_subscriber::registry().with(TierlogLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(code = 503i64, "upstream unavailable");
        });
        assert!(out.contents().contains("upstream unavailable"));
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(severity(&Level::TRACE), Severity::Debug);
        assert_eq!(severity(&Level::DEBUG), Severity::Debug);
        assert_eq!(severity(&Level::INFO), Severity::Info);
        assert_eq!(severity(&Level::WARN), Severity::Warn);
        assert_eq!(severity(&Level::ERROR), Severity::Error);
    }
}
