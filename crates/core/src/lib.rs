#![deny(unsafe_code)]
//! Core of the point demo: acquire a rendering context, fetch a vertex and a
//! fragment shader one after the other, compile and link them, clear to black
//! and draw a single point.
//!
//! The flow is written against small traits ([`SurfaceHost`],
//! [`SourceFetcher`], [`Notifier`], [`RenderApi`]) so the same code runs in
//! the browser (see the `point-demo-wasm` crate) and headless against the
//! [`RecordingContext`].

pub mod config;
pub mod error;
pub mod fetch;
pub mod flow;
pub mod notify;
pub mod render;
pub mod state;
pub mod surface;

pub use config::{DemoConfig, SourceLocator};
pub use error::{ConfigError, ContextError, DemoError, FetchError, TransitionError};
pub use fetch::{FileFetcher, SourceFetcher};
pub use flow::{run, Outcome};
pub use notify::{LogNotifier, Notifier};
pub use render::{
    ClearColor, ClearMask, FrameSpec, GlCommand, HeadlessHost, Primitive, RecordingContext,
    RenderApi, ShaderError, ShaderStage,
};
pub use state::{Flow, FlowState};
pub use surface::SurfaceHost;
