use std::fmt::Write;
use std::str::FromStr;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use wasm_bindgen::JsValue;

/// Forwards `tracing` events from the core crate to the browser console.
pub struct ConsoleLayer {
    write: fn(Level, &str),
}

impl ConsoleLayer {
    pub fn console() -> Self {
        ConsoleLayer {
            write: write_console,
        }
    }
}

fn write_console(level: Level, line: &str) {
    let line = JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&line),
        Level::WARN => web_sys::console::warn_1(&line),
        Level::INFO => web_sys::console::info_1(&line),
        _ => web_sys::console::debug_1(&line),
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let meta = event.metadata();
        let line = format!("{}: {}{}", meta.target(), visitor.message, visitor.fields);
        (self.write)(*meta.level(), &line);
    }
}

/// Install the console subscriber. `level` is a `tracing` level name;
/// anything unrecognized falls back to `info`.
pub fn init(level: &str) {
    let filter = Level::from_str(level)
        .map(LevelFilter::from_level)
        .unwrap_or(LevelFilter::INFO);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(ConsoleLayer::console());
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        crate::utils::warn("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    thread_local! {
        static LINES: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    fn capture(level: Level, line: &str) {
        LINES.with(|l| l.borrow_mut().push((level, line.to_string())));
    }

    #[test]
    fn events_become_console_lines_with_fields() {
        let subscriber = tracing_subscriber::registry()
            .with(LevelFilter::INFO)
            .with(ConsoleLayer { write: capture });
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(seq = 3, "dropping stale highlight response");
            tracing::debug!("filtered out");
        });
        let lines = LINES.with(|l| l.borrow().clone());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::WARN);
        assert!(lines[0].1.ends_with(": dropping stale highlight response seq=3"));
    }
}
