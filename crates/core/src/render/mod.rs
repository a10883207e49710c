//! Rendering infrastructure.
//!
//! The flow talks to the GPU through the narrow [`RenderApi`] trait, which
//! covers exactly the calls the demo makes. Two backends implement it:
//!
//! - [`recording`] -- headless backend that records every command. Always
//!   available.
//! - `gl` -- `glow::Context`. Only available with the `render` feature.
//!
//! # Module overview
//!
//! - [`shader`] -- Shader compilation, linking, and error formatting.
//! - [`frame`] -- The single clear + draw the demo performs.

pub mod frame;
#[cfg(feature = "render")]
pub mod gl;
pub mod recording;
pub mod shader;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use frame::{render_frame, FrameSpec};
pub use recording::{GlCommand, HeadlessHost, RecordingContext};
pub use shader::{
    compile_shader, format_shader_error, init_shaders, link_program, ShaderError,
};

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// The GL enum value (`GL_VERTEX_SHADER` / `GL_FRAGMENT_SHADER`).
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => 0x8B31,
            ShaderStage::Fragment => 0x8B30,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Primitive assembly mode for `draw_arrays`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Primitive {
    Points,
    Lines,
    LineStrip,
    Triangles,
}

impl Primitive {
    pub fn gl_enum(self) -> u32 {
        match self {
            Primitive::Points => 0x0000,
            Primitive::Lines => 0x0001,
            Primitive::LineStrip => 0x0003,
            Primitive::Triangles => 0x0004,
        }
    }
}

/// An RGBA clear color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ClearColor {
    pub const OPAQUE_BLACK: ClearColor = ClearColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
}

/// Buffer bits accepted by [`RenderApi::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClearMask(pub u32);

impl ClearMask {
    pub const DEPTH: ClearMask = ClearMask(0x0000_0100);
    pub const STENCIL: ClearMask = ClearMask(0x0000_0400);
    pub const COLOR: ClearMask = ClearMask(0x0000_4000);

    pub fn contains(self, other: ClearMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ClearMask {
    type Output = ClearMask;

    fn bitor(self, rhs: ClearMask) -> ClearMask {
        ClearMask(self.0 | rhs.0)
    }
}

/// The subset of a WebGL-style context the demo drives.
///
/// Methods take `&self` like `glow::HasContext`; implementations that keep
/// state use interior mutability. Status queries return plain `bool`s and
/// log queries return the driver's text; turning those into `Result`s is the
/// job of [`shader`].
pub trait RenderApi {
    type Shader: Copy;
    type Program: Copy;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);
    fn use_program(&self, program: Option<Self::Program>);

    fn clear_color(&self, color: ClearColor);
    fn clear(&self, mask: ClearMask);
    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32);
}
