//! The seam between the renderer and the low-level graphics driver.
//!
//! [`Driver`] lists exactly the primitives this crate issues. The real
//! implementation for `glow::Context` lives in [`super::gl`] behind the
//! `render` feature; tests drive the same code through a recording fake.
//!
//! The driver keeps a sticky error register. [`check_errors`] drains it
//! after a guarded call, writes one diagnostic line per residual error, and
//! hands the first one back as a typed [`DriverError`] so the caller decides
//! between aborting and propagating.

use glam::Vec4;
use std::fmt;
use thiserror::Error;

use crate::layout::VertexAttribute;
use crate::source::ShaderKind;

pub const NO_ERROR: u32 = 0;
pub const INVALID_ENUM: u32 = 0x0500;
pub const INVALID_VALUE: u32 = 0x0501;
pub const INVALID_OPERATION: u32 = 0x0502;
pub const OUT_OF_MEMORY: u32 = 0x0505;
pub const INVALID_FRAMEBUFFER_OPERATION: u32 = 0x0506;

/// Upper bound on errors drained per check. A lost context can report the
/// same error forever.
const MAX_DRAINED_ERRORS: usize = 32;

/// Context reported for errors raised outside any guarded call.
pub const STALE_CONTEXT: &str = "stale";

/// Buffer binding points used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data.
    Array,
    /// Index data for indexed draws.
    ElementArray,
}

/// Low-level graphics primitives, in the shape of the GL API.
///
/// Every method maps to a single driver call and assumes a current context.
/// Handles are opaque associated types so that the real driver and test
/// doubles can use their own representation.
pub trait Driver {
    type Shader: Copy + fmt::Debug + PartialEq;
    type Program: Copy + fmt::Debug + PartialEq;
    type Buffer: Copy + fmt::Debug + PartialEq;
    type VertexArray: Copy + fmt::Debug + PartialEq;
    type UniformLocation: Clone + fmt::Debug;

    fn create_shader(&self, kind: ShaderKind) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    /// Validates the program against the current state and returns the status.
    fn validate_program(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);
    fn use_program(&self, program: Option<Self::Program>);

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;
    fn uniform_4_f32(&self, location: &Self::UniformLocation, value: Vec4);

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>);
    /// Uploads `data` to the buffer bound at `target` with static usage.
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&self, buffer: Self::Buffer);

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);
    fn enable_vertex_attrib(&self, index: u32);
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        attribute: &VertexAttribute,
        stride: usize,
        offset: usize,
    );

    fn clear_color(&self, color: Vec4);
    /// Clears the color target.
    fn clear(&self);
    /// Draws `count` `u32` indices from the bound index buffer as a triangle list.
    fn draw_indexed_triangles(&self, count: usize);

    /// Pops one code from the error register, or [`NO_ERROR`] when empty.
    fn error_code(&self) -> u32;
    /// Human-readable driver version string.
    fn version(&self) -> String;
}

/// A residual driver error found after a guarded call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} error: {}", .context, code_name(*.code))]
pub struct DriverError {
    /// The call (or group of calls) that was being checked.
    pub context: String,
    /// Raw error code from the driver.
    pub code: u32,
}

impl DriverError {
    pub fn new(context: impl Into<String>, code: u32) -> Self {
        Self {
            context: context.into(),
            code,
        }
    }
}

/// Symbolic name for a driver error code; unknown codes print in hex.
pub fn code_name(code: u32) -> String {
    match code {
        NO_ERROR => "NO_ERROR".into(),
        INVALID_ENUM => "INVALID_ENUM".into(),
        INVALID_VALUE => "INVALID_VALUE".into(),
        INVALID_OPERATION => "INVALID_OPERATION".into(),
        OUT_OF_MEMORY => "OUT_OF_MEMORY".into(),
        INVALID_FRAMEBUFFER_OPERATION => "INVALID_FRAMEBUFFER_OPERATION".into(),
        other => format!("0x{other:04X}"),
    }
}

/// Drains errors left over from earlier calls so the next check only sees
/// errors caused by the guarded call.
///
/// Each drained error is still logged as a `"stale error: <message>"` line.
pub fn clear_errors<D: Driver + ?Sized>(driver: &D) {
    for _ in 0..MAX_DRAINED_ERRORS {
        let code = driver.error_code();
        if code == NO_ERROR {
            break;
        }
        log::warn!("{}", DriverError::new(STALE_CONTEXT, code));
    }
}

/// Drains the error register after a guarded call.
///
/// Logs one `"<context> error: <message>"` line per residual error.
///
/// # Errors
///
/// Returns the first residual error as a `DriverError`.
pub fn check_errors<D: Driver + ?Sized>(driver: &D, context: &str) -> Result<(), DriverError> {
    let mut first = None;
    for _ in 0..MAX_DRAINED_ERRORS {
        let code = driver.error_code();
        if code == NO_ERROR {
            break;
        }
        let err = DriverError::new(context, code);
        log::error!("{err}");
        first.get_or_insert(err);
    }
    first.map_or(Ok(()), Err)
}
