//! Display surfaces and the rendering contexts they hand out.

use crate::error::ContextError;
use crate::render::RenderApi;

/// Something that can look up a display surface by name and create a
/// rendering context for it.
pub trait SurfaceHost {
    type Context: RenderApi;

    /// Acquires a rendering context for `surface_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`ContextError`] describing why no context is available.
    fn acquire_context(&self, surface_id: &str) -> Result<Self::Context, ContextError>;
}
