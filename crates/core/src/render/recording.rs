//! Headless rendering backend that records every command it receives.
//!
//! `RecordingContext` stands in for a GPU context when there is none: the CLI
//! traces the flow with it and the tests assert against its command log.
//! Compilation runs a structural GLSL check (balanced delimiters, a `main`
//! entry point, terminated comments); linking requires exactly one compiled
//! vertex and one compiled fragment shader.

use std::cell::RefCell;

use serde::Serialize;

use super::{ClearColor, ClearMask, Primitive, RenderApi, ShaderStage};
use crate::error::ContextError;
use crate::surface::SurfaceHost;

/// Handle to a shader object created by a [`RecordingContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordedShader(pub u32);

/// Handle to a program object created by a [`RecordingContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordedProgram(pub u32);

/// One call made against the context, in issue order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GlCommand {
    CreateShader {
        shader: RecordedShader,
        stage: ShaderStage,
    },
    ShaderSource {
        shader: RecordedShader,
        len: usize,
    },
    CompileShader {
        shader: RecordedShader,
        success: bool,
    },
    DeleteShader {
        shader: RecordedShader,
    },
    CreateProgram {
        program: RecordedProgram,
    },
    AttachShader {
        program: RecordedProgram,
        shader: RecordedShader,
    },
    LinkProgram {
        program: RecordedProgram,
        success: bool,
    },
    DeleteProgram {
        program: RecordedProgram,
    },
    UseProgram {
        program: Option<RecordedProgram>,
    },
    ClearColor {
        r: f32,
        g: f32,
        b: f32,
        a: f32,
    },
    Clear {
        mask: ClearMask,
    },
    DrawArrays {
        mode: Primitive,
        first: i32,
        count: i32,
    },
}

#[derive(Debug)]
struct ShaderSlot {
    stage: ShaderStage,
    source: String,
    log: String,
    compiled: bool,
}

#[derive(Debug, Default)]
struct ProgramSlot {
    attached: Vec<RecordedShader>,
    log: String,
    linked: bool,
}

#[derive(Debug, Default)]
struct Recorder {
    commands: Vec<GlCommand>,
    // Index 0 of each table is the GL null object; live handles start at 1.
    shaders: Vec<Option<ShaderSlot>>,
    programs: Vec<Option<ProgramSlot>>,
    active_program: Option<RecordedProgram>,
}

/// A [`RenderApi`] backend with no GPU behind it.
#[derive(Debug, Default)]
pub struct RecordingContext {
    inner: RefCell<Recorder>,
    link_failure: Option<String>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every link attempt fail with `log`.
    pub fn with_link_failure(mut self, log: impl Into<String>) -> Self {
        self.link_failure = Some(log.into());
        self
    }

    /// Every command issued so far.
    pub fn commands(&self) -> Vec<GlCommand> {
        self.inner.borrow().commands.clone()
    }

    /// The program currently in use, if any.
    pub fn active_program(&self) -> Option<RecordedProgram> {
        self.inner.borrow().active_program
    }

    /// `(mode, first, count)` of every draw call.
    pub fn draw_calls(&self) -> Vec<(Primitive, i32, i32)> {
        self.inner
            .borrow()
            .commands
            .iter()
            .filter_map(|c| match *c {
                GlCommand::DrawArrays { mode, first, count } => Some((mode, first, count)),
                _ => None,
            })
            .collect()
    }

    /// The most recently set clear color.
    pub fn last_clear_color(&self) -> Option<ClearColor> {
        self.inner
            .borrow()
            .commands
            .iter()
            .rev()
            .find_map(|c| match *c {
                GlCommand::ClearColor { r, g, b, a } => Some(ClearColor { r, g, b, a }),
                _ => None,
            })
    }

    fn record(&self, command: GlCommand) {
        log::trace!("gl: {command:?}");
        self.inner.borrow_mut().commands.push(command);
    }
}

impl Recorder {
    fn shader(&self, shader: RecordedShader) -> Option<&ShaderSlot> {
        self.shaders
            .get(shader.0 as usize)
            .and_then(Option::as_ref)
    }

    fn shader_mut(&mut self, shader: RecordedShader) -> Option<&mut ShaderSlot> {
        self.shaders
            .get_mut(shader.0 as usize)
            .and_then(Option::as_mut)
    }

    fn program(&self, program: RecordedProgram) -> Option<&ProgramSlot> {
        self.programs
            .get(program.0 as usize)
            .and_then(Option::as_ref)
    }

    fn program_mut(&mut self, program: RecordedProgram) -> Option<&mut ProgramSlot> {
        self.programs
            .get_mut(program.0 as usize)
            .and_then(Option::as_mut)
    }

    fn next_handle<T>(table: &mut Vec<Option<T>>, slot: T) -> u32 {
        if table.is_empty() {
            table.push(None);
        }
        table.push(Some(slot));
        (table.len() - 1) as u32
    }

    fn check_link(&self, program: &ProgramSlot) -> Result<(), String> {
        let mut vertex = 0;
        let mut fragment = 0;
        for &handle in &program.attached {
            let slot = self
                .shader(handle)
                .ok_or_else(|| format!("ERROR: shader {} has been deleted", handle.0))?;
            if !slot.compiled {
                return Err(format!(
                    "ERROR: {} shader {} is not compiled",
                    slot.stage, handle.0
                ));
            }
            match slot.stage {
                ShaderStage::Vertex => vertex += 1,
                ShaderStage::Fragment => fragment += 1,
            }
        }
        if vertex != 1 || fragment != 1 {
            return Err(format!(
                "ERROR: program needs one vertex and one fragment shader, \
                 got {vertex} vertex and {fragment} fragment"
            ));
        }
        Ok(())
    }
}

impl RenderApi for RecordingContext {
    type Shader = RecordedShader;
    type Program = RecordedProgram;

    fn create_shader(&self, stage: ShaderStage) -> Result<RecordedShader, String> {
        let handle = {
            let mut inner = self.inner.borrow_mut();
            let slot = ShaderSlot {
                stage,
                source: String::new(),
                log: String::new(),
                compiled: false,
            };
            RecordedShader(Recorder::next_handle(&mut inner.shaders, slot))
        };
        self.record(GlCommand::CreateShader {
            shader: handle,
            stage,
        });
        Ok(handle)
    }

    fn shader_source(&self, shader: RecordedShader, source: &str) {
        if let Some(slot) = self.inner.borrow_mut().shader_mut(shader) {
            slot.source = source.to_owned();
        }
        self.record(GlCommand::ShaderSource {
            shader,
            len: source.len(),
        });
    }

    fn compile_shader(&self, shader: RecordedShader) {
        let success = match self.inner.borrow_mut().shader_mut(shader) {
            Some(slot) => {
                match check_glsl_structure(&slot.source) {
                    Ok(()) => {
                        slot.compiled = true;
                        slot.log.clear();
                    }
                    Err(log) => {
                        slot.compiled = false;
                        slot.log = log;
                    }
                }
                slot.compiled
            }
            None => false,
        };
        self.record(GlCommand::CompileShader { shader, success });
    }

    fn shader_compile_status(&self, shader: RecordedShader) -> bool {
        self.inner
            .borrow()
            .shader(shader)
            .is_some_and(|slot| slot.compiled)
    }

    fn shader_info_log(&self, shader: RecordedShader) -> String {
        self.inner
            .borrow()
            .shader(shader)
            .map(|slot| slot.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: RecordedShader) {
        if let Some(entry) = self.inner.borrow_mut().shaders.get_mut(shader.0 as usize) {
            *entry = None;
        }
        self.record(GlCommand::DeleteShader { shader });
    }

    fn create_program(&self) -> Result<RecordedProgram, String> {
        let handle = {
            let mut inner = self.inner.borrow_mut();
            RecordedProgram(Recorder::next_handle(
                &mut inner.programs,
                ProgramSlot::default(),
            ))
        };
        self.record(GlCommand::CreateProgram { program: handle });
        Ok(handle)
    }

    fn attach_shader(&self, program: RecordedProgram, shader: RecordedShader) {
        if let Some(slot) = self.inner.borrow_mut().program_mut(program) {
            slot.attached.push(shader);
        }
        self.record(GlCommand::AttachShader { program, shader });
    }

    fn link_program(&self, program: RecordedProgram) {
        let success = {
            let mut inner = self.inner.borrow_mut();
            let result = match (&self.link_failure, inner.program(program)) {
                (_, None) => None,
                (Some(log), Some(_)) => Some(Err(log.clone())),
                (None, Some(slot)) => Some(inner.check_link(slot)),
            };
            match (result, inner.program_mut(program)) {
                (Some(result), Some(slot)) => {
                    slot.linked = result.is_ok();
                    slot.log = result.err().unwrap_or_default();
                    slot.linked
                }
                _ => false,
            }
        };
        self.record(GlCommand::LinkProgram { program, success });
    }

    fn program_link_status(&self, program: RecordedProgram) -> bool {
        self.inner
            .borrow()
            .program(program)
            .is_some_and(|slot| slot.linked)
    }

    fn program_info_log(&self, program: RecordedProgram) -> String {
        self.inner
            .borrow()
            .program(program)
            .map(|slot| slot.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: RecordedProgram) {
        {
            let mut inner = self.inner.borrow_mut();
            if let Some(entry) = inner.programs.get_mut(program.0 as usize) {
                *entry = None;
            }
            if inner.active_program == Some(program) {
                inner.active_program = None;
            }
        }
        self.record(GlCommand::DeleteProgram { program });
    }

    fn use_program(&self, program: Option<RecordedProgram>) {
        {
            let mut inner = self.inner.borrow_mut();
            let usable = program.map_or(true, |p| inner.program(p).is_some_and(|s| s.linked));
            if usable {
                inner.active_program = program;
            }
        }
        self.record(GlCommand::UseProgram { program });
    }

    fn clear_color(&self, color: ClearColor) {
        self.record(GlCommand::ClearColor {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        });
    }

    fn clear(&self, mask: ClearMask) {
        self.record(GlCommand::Clear { mask });
    }

    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32) {
        self.record(GlCommand::DrawArrays { mode, first, count });
    }
}

/// Structural GLSL check used as the recorder's "compiler".
///
/// Strips comments, verifies that `()`, `{}` and `[]` nest correctly and
/// that a `main` function is declared. Errors are reported in the
/// `ERROR: 0:<line>: <message>` shape drivers use.
pub fn check_glsl_structure(source: &str) -> Result<(), String> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut code = String::with_capacity(source.len());
    let mut line = 1;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\n' => {
                line += 1;
                code.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                while chars.next_if(|&n| n != '\n').is_some() {}
            }
            '/' if chars.peek() == Some(&'*') => {
                let start = line;
                chars.next();
                let mut prev = '\0';
                loop {
                    match chars.next() {
                        None => return Err(format!("ERROR: 0:{start}: unterminated comment")),
                        Some('/') if prev == '*' => break,
                        Some(n) => {
                            if n == '\n' {
                                line += 1;
                                code.push('\n');
                            }
                            prev = n;
                        }
                    }
                }
                code.push(' ');
            }
            '(' | '{' | '[' => {
                stack.push((c, line));
                code.push(c);
            }
            ')' | '}' | ']' => {
                let open = match c {
                    ')' => '(',
                    '}' => '{',
                    _ => '[',
                };
                match stack.pop() {
                    Some((o, _)) if o == open => code.push(c),
                    _ => return Err(format!("ERROR: 0:{line}: syntax error, unexpected '{c}'")),
                }
            }
            _ => code.push(c),
        }
    }

    if let Some((open, at)) = stack.pop() {
        return Err(format!("ERROR: 0:{at}: syntax error, unclosed '{open}'"));
    }
    if !declares_main(&code) {
        return Err("ERROR: 0:0: missing entry point 'main'".to_owned());
    }
    Ok(())
}

fn declares_main(code: &str) -> bool {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    code.match_indices("main").any(|(i, _)| {
        let before_ok = code[..i].chars().next_back().map_or(true, |c| !is_ident(c));
        let rest = &code[i + "main".len()..];
        let after_ok = rest.chars().next().map_or(false, |c| !is_ident(c));
        before_ok && after_ok && rest.trim_start().starts_with('(')
    })
}

/// A [`SurfaceHost`] that knows a fixed set of surface names and hands out
/// fresh [`RecordingContext`]s for them.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    surfaces: Vec<String>,
    link_failure: Option<String>,
}

impl HeadlessHost {
    pub fn new<I, S>(surfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            surfaces: surfaces.into_iter().map(Into::into).collect(),
            link_failure: None,
        }
    }

    /// Contexts from this host fail every link with `log`.
    pub fn with_link_failure(mut self, log: impl Into<String>) -> Self {
        self.link_failure = Some(log.into());
        self
    }
}

impl SurfaceHost for HeadlessHost {
    type Context = RecordingContext;

    fn acquire_context(&self, surface_id: &str) -> Result<RecordingContext, ContextError> {
        if !self.surfaces.iter().any(|s| s == surface_id) {
            return Err(ContextError::SurfaceNotFound(surface_id.to_owned()));
        }
        let gl = RecordingContext::new();
        Ok(match &self.link_failure {
            Some(log) => gl.with_link_failure(log.clone()),
            None => gl,
        })
    }
}
