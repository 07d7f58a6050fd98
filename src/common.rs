use uuid::Uuid;
use web_sys::{DomRect, MouseEvent, Window};

use crate::errors::{DragError, DragResult};

pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn window() -> DragResult<Window> {
    web_sys::window().ok_or_else(|| DragError::Other("no global window".to_string()))
}

pub fn client_point(event: &MouseEvent) -> (f64, f64) {
    (event.client_x() as f64, event.client_y() as f64)
}

/// `(left, top, right, bottom)`
pub fn rect_edges(rect: &DomRect) -> (f64, f64, f64, f64) {
    (rect.left(), rect.top(), rect.right(), rect.bottom())
}

/// Sets `user-select` on the page body, if there is one.
pub fn set_body_user_select(value: &str) -> DragResult<()> {
    let body = window()?.document().and_then(|document| document.body());
    if let Some(body) = body {
        body.style().set_property("user-select", value)?;
    }
    Ok(())
}

/// Forwards `log` records to the browser console. Warnings and errors go to
/// `console.warn`, everything else to `console.log`.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.target(), record.args());
        match record.level() {
            log::Level::Error | log::Level::Warn => crate::warn(&line),
            _ => crate::log(&line),
        }
    }

    fn flush(&self) {}
}

static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

/// Installs the console logger at `level`. Returns `false`, changing nothing,
/// when a logger is already set; Rust embedders bring their own that way.
pub fn install_console_logger(level: log::LevelFilter) -> bool {
    match log::set_logger(&CONSOLE_LOGGER) {
        Ok(()) => {
            log::set_max_level(level);
            true
        }
        Err(_) => false,
    }
}
