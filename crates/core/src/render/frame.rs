//! The one frame the demo draws.

use serde::{Deserialize, Serialize};

use super::{ClearColor, ClearMask, Primitive, RenderApi};

/// What a frame clears to and what it draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSpec {
    pub clear_color: ClearColor,
    pub primitive: Primitive,
    pub first: i32,
    pub count: i32,
}

impl Default for FrameSpec {
    /// Opaque black background, a single point from vertex 0.
    fn default() -> Self {
        Self {
            clear_color: ClearColor::OPAQUE_BLACK,
            primitive: Primitive::Points,
            first: 0,
            count: 1,
        }
    }
}

/// Clears the color buffer and issues one draw call.
///
/// Expects a program to already be in use.
pub fn render_frame<G: RenderApi + ?Sized>(gl: &G, frame: &FrameSpec) {
    gl.clear_color(frame.clear_color);
    gl.clear(ClearMask::COLOR);
    gl.draw_arrays(frame.primitive, frame.first, frame.count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{GlCommand, RecordingContext};

    #[test]
    fn default_frame_is_single_point_on_black() {
        let frame = FrameSpec::default();
        assert_eq!(frame.clear_color, ClearColor::OPAQUE_BLACK);
        assert_eq!(frame.primitive, Primitive::Points);
        assert_eq!((frame.first, frame.count), (0, 1));
    }

    #[test]
    fn render_frame_clears_before_drawing() {
        let gl = RecordingContext::new();
        render_frame(&gl, &FrameSpec::default());

        assert_eq!(
            gl.commands(),
            vec![
                GlCommand::ClearColor {
                    r: 0.0,
                    g: 0.0,
                    b: 0.0,
                    a: 1.0
                },
                GlCommand::Clear {
                    mask: ClearMask::COLOR
                },
                GlCommand::DrawArrays {
                    mode: Primitive::Points,
                    first: 0,
                    count: 1
                },
            ]
        );
    }
}
