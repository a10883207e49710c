//! Error types for the point demo core.
//!
//! Each stage of the flow has its own error enum; [`DemoError`] wraps them so
//! the flow can report whichever one ended it.

use thiserror::Error;

use crate::render::shader::ShaderError;
use crate::state::FlowState;

/// Failures while acquiring a rendering context from a display surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// No element with the given identifier exists.
    #[error("surface not found: {0}")]
    SurfaceNotFound(String),

    /// The element exists but is not a drawable canvas.
    #[error("element '{0}' is not a canvas")]
    NotACanvas(String),

    /// The surface exists but cannot provide the required context.
    #[error("failed to get the rendering context for surface '{0}'")]
    Unsupported(String),
}

/// Failures while resolving or fetching shader source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request completed with a non-success status.
    #[error("fetch of '{uri}' returned status {status}")]
    Status { uri: String, status: u16 },

    /// The request could not be performed at all.
    #[error("fetch of '{uri}' failed: {message}")]
    Transport { uri: String, message: String },

    /// A locator could not be turned into a URI by this fetcher.
    #[error("cannot resolve source locator: {0}")]
    Unresolved(String),
}

/// Invalid demo configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration JSON could not be parsed.
    #[error("invalid config JSON: {0}")]
    Parse(String),

    /// A required field was present but empty.
    #[error("config field '{0}' must not be empty")]
    EmptyField(&'static str),
}

/// A flow state transition that the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid flow transition: {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: FlowState,
    pub to: FlowState,
}

/// Any error that can end a demo run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DemoError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}
