//! [`RenderApi`] for a live `glow::Context`.
//!
//! glow exposes raw GL calls as `unsafe`; every call here passes handles that
//! were produced by the same context and GL enum values taken from glow's own
//! constants.

use glow::HasContext;

use super::{ClearColor, ClearMask, Primitive, RenderApi, ShaderStage};

fn stage_enum(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn primitive_enum(mode: Primitive) -> u32 {
    match mode {
        Primitive::Points => glow::POINTS,
        Primitive::Lines => glow::LINES,
        Primitive::LineStrip => glow::LINE_STRIP,
        Primitive::Triangles => glow::TRIANGLES,
    }
}

#[allow(unsafe_code)]
impl RenderApi for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;

    fn create_shader(&self, stage: ShaderStage) -> Result<glow::Shader, String> {
        // SAFETY: stage_enum only yields valid shader type constants.
        unsafe { HasContext::create_shader(self, stage_enum(stage)) }
    }

    fn shader_source(&self, shader: glow::Shader, source: &str) {
        // SAFETY: shader was created by this context.
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: glow::Shader) {
        // SAFETY: shader was created by this context.
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: glow::Shader) -> bool {
        // SAFETY: shader was created by this context.
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: glow::Shader) -> String {
        // SAFETY: shader was created by this context.
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: glow::Shader) {
        // SAFETY: shader was created by this context and is not used afterwards.
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<glow::Program, String> {
        // SAFETY: no arguments; failure is reported through the Result.
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: glow::Program, shader: glow::Shader) {
        // SAFETY: both handles were created by this context.
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn link_program(&self, program: glow::Program) {
        // SAFETY: program was created by this context.
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: glow::Program) -> bool {
        // SAFETY: program was created by this context.
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: glow::Program) -> String {
        // SAFETY: program was created by this context.
        unsafe { self.get_program_info_log(program) }
    }

    fn delete_program(&self, program: glow::Program) {
        // SAFETY: program was created by this context and is not used afterwards.
        unsafe { HasContext::delete_program(self, program) }
    }

    fn use_program(&self, program: Option<glow::Program>) {
        // SAFETY: program is None or a linked program from this context.
        unsafe { HasContext::use_program(self, program) }
    }

    fn clear_color(&self, color: ClearColor) {
        // SAFETY: plain state setter.
        unsafe { HasContext::clear_color(self, color.r, color.g, color.b, color.a) }
    }

    fn clear(&self, mask: ClearMask) {
        // SAFETY: ClearMask only carries GL buffer bit values.
        unsafe { HasContext::clear(self, mask.0) }
    }

    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32) {
        // SAFETY: draws from the currently bound program; no client memory is read.
        unsafe { HasContext::draw_arrays(self, primitive_enum(mode), first, count) }
    }
}
