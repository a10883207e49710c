//! Shader compilation and linking helpers.
//!
//! Provides error types, source formatting for debugging, and functions
//! to compile individual shader stages, link them into programs, and make
//! the result the active program. Everything goes through [`RenderApi`], so
//! the same code drives a live WebGL context and the headless recorder.

use thiserror::Error;

use super::{RenderApi, ShaderStage};

/// Errors that can occur during shader compilation or program linking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    #[error("shader compile error ({stage}):\n{log}")]
    CompileError {
        /// The shader stage that failed.
        stage: ShaderStage,
        /// The driver's info log describing the error.
        log: String,
    },
    /// A program failed to link.
    #[error("shader link error:\n{0}")]
    LinkError(String),
}

impl ShaderError {
    /// The text shown to the user in an alert.
    pub fn alert_message(&self) -> String {
        match self {
            ShaderError::CompileError { log, .. } => format!("Error compiling shader: {log}"),
            ShaderError::LinkError(log) => {
                format!("Unable to initialize the shader program: {log}")
            }
        }
    }
}

/// Formats a shader compilation error for human-readable debugging.
///
/// Prepends right-aligned line numbers to each line of `source`, then
/// appends the driver's error `log`. This makes it easy to correlate
/// error messages (which reference line numbers) with the actual GLSL.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let source_lines: Vec<&str> = source.lines().collect();

    let width = source_lines.len().max(1).to_string().len();

    let numbered: String = source_lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1, width = width))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Compiles a single shader stage.
///
/// On failure the shader object is deleted and the numbered source is
/// logged alongside the driver's info log.
///
/// # Errors
///
/// Returns `ShaderError::CompileError` if the source fails to compile or the
/// shader object cannot be created.
pub fn compile_shader<G: RenderApi + ?Sized>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<G::Shader, ShaderError> {
    let shader = gl
        .create_shader(stage)
        .map_err(|log| ShaderError::CompileError { stage, log })?;

    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if gl.shader_compile_status(shader) {
        return Ok(shader);
    }

    let info_log = gl.shader_info_log(shader);
    gl.delete_shader(shader);
    log::error!(
        "{stage} shader failed to compile:\n{}",
        format_shader_error(source, &info_log)
    );
    Err(ShaderError::CompileError {
        stage,
        log: info_log,
    })
}

/// Links a vertex and fragment shader into a program.
///
/// # Errors
///
/// Returns `ShaderError::LinkError` if linking fails. The program object is
/// deleted in that case.
pub fn link_program<G: RenderApi + ?Sized>(
    gl: &G,
    vertex: G::Shader,
    fragment: G::Shader,
) -> Result<G::Program, ShaderError> {
    let program = gl.create_program().map_err(ShaderError::LinkError)?;

    gl.attach_shader(program, vertex);
    gl.attach_shader(program, fragment);
    gl.link_program(program);

    if gl.program_link_status(program) {
        Ok(program)
    } else {
        let info_log = gl.program_info_log(program);
        gl.delete_program(program);
        Err(ShaderError::LinkError(info_log))
    }
}

/// Compiles both stages, links them, and makes the program current.
///
/// Stops at the first failure: a vertex compile error means the fragment
/// source is never compiled, and no program is ever put in use unless
/// linking succeeded.
///
/// # Errors
///
/// Returns `ShaderError::CompileError` if either shader fails to compile,
/// or `ShaderError::LinkError` if linking fails.
pub fn init_shaders<G: RenderApi + ?Sized>(
    gl: &G,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<G::Program, ShaderError> {
    let vert = compile_shader(gl, ShaderStage::Vertex, vertex_src)?;
    let frag = match compile_shader(gl, ShaderStage::Fragment, fragment_src) {
        Ok(f) => f,
        Err(e) => {
            gl.delete_shader(vert);
            return Err(e);
        }
    };

    let program = match link_program(gl, vert, frag) {
        Ok(p) => p,
        Err(e) => {
            gl.delete_shader(vert);
            gl.delete_shader(frag);
            return Err(e);
        }
    };

    gl.use_program(Some(program));
    Ok(program)
}
