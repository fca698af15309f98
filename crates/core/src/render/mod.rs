//! Program building and per-frame drawing.
//!
//! # Module overview
//!
//! - [`driver`] -- The `Driver` trait and residual-error checks.
//! - [`shader`] -- Stage compilation, linking and uniform lookup.
//! - [`geometry`] -- Vertex/index buffers and their attribute layout.
//! - [`state`] -- Explicit mirror of the driver's binding registers.
//! - [`frame`] -- The per-frame draw procedure.
//! - [`run`] -- The render loop over a window `Surface`.
//! - `gl` -- `Driver` for `glow::Context` (`render` feature).

pub mod driver;
pub mod frame;
pub mod geometry;
pub mod run;
pub mod shader;
pub mod state;

#[cfg(feature = "render")]
pub mod gl;

#[cfg(test)]
pub(crate) mod recording;

// Re-export key types at the render module level for convenience.
pub use driver::{check_errors, clear_errors, BufferTarget, Driver, DriverError};
pub use frame::{FrameRenderer, COLOR_UNIFORM};
pub use geometry::{GeometryBuffers, QUAD_INDICES, QUAD_POSITIONS};
pub use run::{run, Surface};
pub use shader::{
    build_program, compile_stage, destroy_program, format_shader_error, link, resolve_uniform,
    ProgramHandle, ShaderError, StageHandle, UniformBinding,
};
pub use state::{FrameStage, GraphicsState, StateError};
