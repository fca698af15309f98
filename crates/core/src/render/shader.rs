//! Stage compilation, program linking and uniform lookup.
//!
//! Stage objects never outlive a build: a stage that fails to compile is
//! deleted before the error is returned, and [`link`] consumes both stages
//! and deletes them whether or not linking succeeds. A [`ProgramHandle`]
//! can only be obtained from a successful link and validate, so an unusable
//! program is never handed to the renderer.

use glam::Vec4;
use thiserror::Error;

use super::driver::Driver;
use crate::error::RenderError;
use crate::source::{ShaderKind, ShaderSourceSet};

/// Errors that can occur during shader compilation or program linking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    #[error("{stage} error: {log}")]
    CompileError {
        /// The stage that failed.
        stage: ShaderKind,
        /// The source with line numbers, followed by the driver's info log.
        log: String,
    },
    /// The program failed to link or validate.
    #[error("link error: {0}")]
    LinkError(String),
}

/// A compiled, not yet linked, shader stage.
#[derive(Debug, PartialEq)]
pub struct StageHandle<S> {
    kind: ShaderKind,
    raw: S,
}

impl<S: Copy> StageHandle<S> {
    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn raw(&self) -> S {
        self.raw
    }
}

/// A linked and validated program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgramHandle<P> {
    raw: P,
}

impl<P: Copy> ProgramHandle<P> {
    pub fn raw(&self) -> P {
        self.raw
    }
}

/// A resolved uniform slot and the last value written through it.
#[derive(Debug, Clone)]
pub struct UniformBinding<L> {
    name: String,
    location: L,
    last: Option<Vec4>,
}

impl<L> UniformBinding<L> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    /// The most recent value pushed, if any.
    pub fn last(&self) -> Option<Vec4> {
        self.last
    }

    /// Writes `value` to the currently bound program.
    pub fn push<D>(&mut self, driver: &D, value: Vec4)
    where
        D: Driver<UniformLocation = L> + ?Sized,
    {
        driver.uniform_4_f32(&self.location, value);
        self.last = Some(value);
    }
}

/// Formats a shader compilation error for human-readable debugging.
///
/// Prepends right-aligned line numbers to each line of `source`, then
/// appends the driver's error `log`. Both may be empty.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let source_lines: Vec<&str> = source.lines().collect();
    let width = source_lines.len().max(1).to_string().len();

    let numbered = source_lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
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
/// On failure the stage object is deleted, one diagnostic line is logged,
/// and the error carries the numbered source and the compiler log.
///
/// # Errors
///
/// Returns `ShaderError::CompileError` tagged with `kind`.
pub fn compile_stage<D: Driver + ?Sized>(
    driver: &D,
    kind: ShaderKind,
    source: &str,
) -> Result<StageHandle<D::Shader>, ShaderError> {
    let shader = match driver.create_shader(kind) {
        Ok(shader) => shader,
        Err(message) => {
            log::error!("{kind} error: {message}");
            return Err(ShaderError::CompileError {
                stage: kind,
                log: message,
            });
        }
    };

    driver.shader_source(shader, source);
    driver.compile_shader(shader);

    if driver.shader_compile_status(shader) {
        return Ok(StageHandle { kind, raw: shader });
    }

    let info_log = driver.shader_info_log(shader);
    driver.delete_shader(shader);
    log::error!("{kind} error: {}", info_log.trim_end());
    Err(ShaderError::CompileError {
        stage: kind,
        log: format_shader_error(source, &info_log),
    })
}

/// Links a vertex and a fragment stage into a validated program.
///
/// Both stages are detached and deleted before returning, on every path.
///
/// # Errors
///
/// Returns `ShaderError::LinkError` if the program cannot be created, fails
/// to link, or fails validation.
pub fn link<D: Driver + ?Sized>(
    driver: &D,
    vertex: StageHandle<D::Shader>,
    fragment: StageHandle<D::Shader>,
) -> Result<ProgramHandle<D::Program>, ShaderError> {
    let release_stages = || {
        driver.delete_shader(vertex.raw);
        driver.delete_shader(fragment.raw);
    };

    let program = match driver.create_program() {
        Ok(program) => program,
        Err(e) => {
            release_stages();
            return Err(ShaderError::LinkError(e));
        }
    };

    driver.attach_shader(program, vertex.raw);
    driver.attach_shader(program, fragment.raw);
    driver.link_program(program);

    let outcome = if !driver.program_link_status(program) {
        Err(ShaderError::LinkError(driver.program_info_log(program)))
    } else if !driver.validate_program(program) {
        Err(ShaderError::LinkError(format!(
            "validation failed: {}",
            driver.program_info_log(program)
        )))
    } else {
        Ok(ProgramHandle { raw: program })
    };

    driver.detach_shader(program, vertex.raw);
    driver.detach_shader(program, fragment.raw);
    release_stages();

    if let Err(err) = &outcome {
        driver.delete_program(program);
        log::error!("{}", err.to_string().trim_end());
    }
    outcome
}

/// Compiles both stages of `sources` and links them.
///
/// A stage compile failure is fatal for the whole program: if the fragment
/// stage fails, the already compiled vertex stage is deleted and nothing is
/// linked.
///
/// # Errors
///
/// Returns the first `ShaderError` encountered.
pub fn build_program<D: Driver + ?Sized>(
    driver: &D,
    sources: &ShaderSourceSet,
) -> Result<ProgramHandle<D::Program>, ShaderError> {
    log::debug!("vertex shader:\n{}", sources.vertex());
    log::debug!("fragment shader:\n{}", sources.fragment());

    let vertex = compile_stage(driver, ShaderKind::Vertex, sources.vertex())?;
    let fragment = match compile_stage(driver, ShaderKind::Fragment, sources.fragment()) {
        Ok(f) => f,
        Err(e) => {
            driver.delete_shader(vertex.raw);
            return Err(e);
        }
    };

    link(driver, vertex, fragment)
}

/// Resolves a uniform by name once, for reuse every frame.
///
/// # Errors
///
/// Returns `RenderError::UniformNotFound` if the name is not an active
/// uniform of `program`.
pub fn resolve_uniform<D: Driver + ?Sized>(
    driver: &D,
    program: &ProgramHandle<D::Program>,
    name: &str,
) -> Result<UniformBinding<D::UniformLocation>, RenderError> {
    match driver.uniform_location(program.raw, name) {
        Some(location) => Ok(UniformBinding {
            name: name.to_owned(),
            location,
            last: None,
        }),
        None => {
            log::error!("uniform {name} error: not an active uniform of the program");
            Err(RenderError::UniformNotFound(name.to_owned()))
        }
    }
}

/// Deletes a program at shutdown.
pub fn destroy_program<D: Driver + ?Sized>(driver: &D, program: ProgramHandle<D::Program>) {
    driver.delete_program(program.raw);
}
