//! `tracing` layer that writes events through an xlog [`Logger`]

use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;
use xlog::{CallSite, Logger, Severity};

/// Map a tracing level onto the xlog scale; TRACE folds into DEBUG
pub fn severity_of(level: &Level) -> Severity {
    match *level {
        Level::ERROR => Severity::Error,
        Level::WARN => Severity::Warn,
        Level::INFO => Severity::Info,
        Level::DEBUG | Level::TRACE => Severity::Debug,
    }
}

/// Forwards every event to an xlog logger
#[derive(Debug, Clone)]
pub struct XlogLayer {
    logger: Logger,
}

impl XlogLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl<S> Layer<S> for XlogLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let severity = severity_of(metadata.level());
        if !self.logger.enabled(severity) {
            return;
        }

        let site = CallSite::new(
            metadata.file().unwrap_or("???"),
            metadata.line().unwrap_or(1),
            metadata.target(),
        );
        self.logger
            .emit_at(severity, site, format_args!("{}", EventText(event)));
    }
}

/// Renders an event as `message key=value ...` straight into the formatter
struct EventText<'a, 'b>(&'a Event<'b>);

impl fmt::Display for EventText<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut message = FieldWriter {
            f: &mut *f,
            pass: Pass::Message,
            wrote: false,
            result: Ok(()),
        };
        self.0.record(&mut message);
        let wrote = message.wrote;
        message.result?;

        let mut rest = FieldWriter {
            f,
            pass: Pass::Fields,
            wrote,
            result: Ok(()),
        };
        self.0.record(&mut rest);
        rest.result
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pass {
    Message,
    Fields,
}

struct FieldWriter<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
    pass: Pass,
    wrote: bool,
    result: fmt::Result,
}

impl FieldWriter<'_, '_> {
    fn write(&mut self, field: &Field, value: &dyn fmt::Debug, plain: Option<&str>) {
        if self.result.is_err() {
            return;
        }
        let is_message = field.name() == "message";
        if is_message != (self.pass == Pass::Message) {
            return;
        }
        let sep = if self.wrote { " " } else { "" };
        self.result = match (is_message, plain) {
            (true, Some(s)) => write!(self.f, "{}{}", sep, s),
            (true, None) => write!(self.f, "{}{:?}", sep, value),
            (false, Some(s)) => write!(self.f, "{}{}={}", sep, field.name(), s),
            (false, None) => write!(self.f, "{}{}={:?}", sep, field.name(), value),
        };
        self.wrote = true;
    }
}

impl Visit for FieldWriter<'_, '_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.write(field, &value, Some(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.write(field, value, None);
    }
}
