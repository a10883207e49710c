#![deny(unsafe_code)]
//! WASM bindings for the point demo.
//!
//! `start()` runs the flow against the page layout the demo ships with
//! (`myCanvas`, `shaderVs`, `shaderFs`); `start_with_config(json)` takes a
//! `DemoConfig` as JSON.

mod fetch;
mod host;

use point_demo_core::{DemoConfig, Notifier};
use wasm_bindgen::prelude::*;

pub use fetch::WebFetcher;
pub use host::CanvasHost;

/// Shows alerts with `window.alert`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn alert(&self, message: &str) {
        let shown = web_sys::window().map(|w| w.alert_with_message(message));
        if !matches!(shown, Some(Ok(()))) {
            log::error!("{message}");
        }
    }
}

/// Reports whether the console logger was installed by this call.
///
/// A second `start*` call on the same page finds a logger already set;
/// that is logged through the existing logger and otherwise ignored.
fn logger_installed(result: Result<(), log::SetLoggerError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::debug!("console logger already installed: {e}");
            false
        }
    }
}

fn init() {
    console_error_panic_hook::set_once();
    logger_installed(console_log::init_with_level(log::Level::Info));
}

fn spawn(config: DemoConfig) {
    wasm_bindgen_futures::spawn_local(async move {
        let outcome =
            point_demo_core::run(&config, &CanvasHost, &WebFetcher, &AlertNotifier).await;
        if !outcome.is_rendered() {
            log::warn!("point demo stopped in {:?}", outcome.state);
        }
    });
}

/// Runs the demo with the default configuration.
#[wasm_bindgen]
pub fn start() {
    init();
    spawn(DemoConfig::default());
}

/// Runs the demo with a JSON `DemoConfig`.
#[wasm_bindgen]
pub fn start_with_config(json: &str) -> Result<(), JsValue> {
    init();
    let config = DemoConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    spawn(config);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NopLogger;

    impl log::Log for NopLogger {
        fn enabled(&self, _: &log::Metadata) -> bool {
            false
        }

        fn log(&self, _: &log::Record) {}

        fn flush(&self) {}
    }

    static NOP: NopLogger = NopLogger;

    #[test]
    fn second_logger_install_is_reported_not_fatal() {
        // The first call may or may not win depending on test order; the
        // second one always finds a logger in place.
        let _ = log::set_logger(&NOP);
        assert!(!logger_installed(log::set_logger(&NOP)));
    }

    #[test]
    fn successful_install_is_reported() {
        assert!(logger_installed(Ok(())));
    }
}
