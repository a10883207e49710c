//! User-facing alerts.
//!
//! Compile and link failures are shown to the user rather than only logged.
//! In the browser this is `window.alert`; headless runs route alerts to the
//! log.

/// Receives user-facing alert messages.
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// A [`Notifier`] that writes alerts to the `log` facade at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        log::error!("{message}");
    }
}
