//! Error types for the quad renderer core.

use thiserror::Error;

use crate::render::driver::DriverError;
use crate::render::shader::ShaderError;
use crate::render::state::StateError;

/// Errors produced while building or drawing the quad.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A stage failed to compile, or the program failed to link or validate.
    #[error(transparent)]
    Shader(#[from] ShaderError),

    /// A uniform the renderer writes is not active in the linked program.
    #[error("uniform not found: {0}")]
    UniformNotFound(String),

    /// The driver reported an error after a guarded call.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// A binding was issued out of order within a frame.
    #[error(transparent)]
    State(#[from] StateError),

    /// A vertex layout was empty, malformed, or disagreed with its stride.
    #[error("invalid vertex layout: {0}")]
    InvalidLayout(String),

    /// The index list was empty or not a whole number of triangles.
    #[error("invalid index count {0}: expected a non-zero multiple of 3")]
    InvalidIndexCount(usize),

    /// An index referenced a vertex past the end of the vertex data.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    /// A driver object could not be created.
    #[error("failed to create {what}: {message}")]
    Create { what: &'static str, message: String },

    /// Reading a shader or config file failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// A configuration file was malformed or held invalid values.
    #[error("invalid config: {0}")]
    Config(String),

    /// The window collaborator failed to present a frame.
    #[error("surface error: {0}")]
    Surface(String),
}
