//! Canvas lookup and WebGL context creation.

use point_demo_core::{ContextError, SurfaceHost};
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGlRenderingContext};

/// Looks surfaces up by element id in the current document and creates a
/// WebGL 1 context wrapped in `glow`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanvasHost;

impl SurfaceHost for CanvasHost {
    type Context = glow::Context;

    fn acquire_context(&self, surface_id: &str) -> Result<glow::Context, ContextError> {
        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(surface_id))
            .ok_or_else(|| ContextError::SurfaceNotFound(surface_id.to_owned()))?;

        let canvas: HtmlCanvasElement = element
            .dyn_into()
            .map_err(|_| ContextError::NotACanvas(surface_id.to_owned()))?;

        let webgl: WebGlRenderingContext = canvas
            .get_context("webgl")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into().ok())
            .ok_or_else(|| ContextError::Unsupported(surface_id.to_owned()))?;

        Ok(glow::Context::from_webgl1_context(webgl))
    }
}
